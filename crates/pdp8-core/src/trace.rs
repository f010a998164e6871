//! Execution tracing capability.
//!
//! The simulator reports three kinds of event: an instruction retired, a
//! word was stored, and the machine halted. [`NullTracer`] ignores all of
//! them and costs nothing; [`RecordingTracer`] keeps them in order.

/// Receiver for execution events.
pub trait Tracer {
    /// Called after an instruction has executed and the program counter has
    /// been updated.
    fn on_instruction_executed(
        &mut self,
        old_pc: u16,
        instruction: u16,
        accumulator: u16,
        link: bool,
        new_pc: u16,
    );

    /// Called from inside every store to memory.
    fn on_memory_write(&mut self, address: u16, value: u16);

    /// Called from inside the halt micro-operation.
    fn on_halt(&mut self, pc: u16);
}

/// Tracer that discards every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullTracer;

impl Tracer for NullTracer {
    #[inline]
    fn on_instruction_executed(&mut self, _: u16, _: u16, _: u16, _: bool, _: u16) {}

    #[inline]
    fn on_memory_write(&mut self, _: u16, _: u16) {}

    #[inline]
    fn on_halt(&mut self, _: u16) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn on_instruction_executed(
        &mut self,
        old_pc: u16,
        instruction: u16,
        accumulator: u16,
        link: bool,
        new_pc: u16,
    ) {
        (**self).on_instruction_executed(old_pc, instruction, accumulator, link, new_pc);
    }

    fn on_memory_write(&mut self, address: u16, value: u16) {
        (**self).on_memory_write(address, value);
    }

    fn on_halt(&mut self, pc: u16) {
        (**self).on_halt(pc);
    }
}

/// A recorded execution event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// An instruction retired.
    InstructionExecuted {
        /// Address the instruction was fetched from.
        old_pc: u16,
        /// Raw instruction word.
        instruction: u16,
        /// Accumulator after execution.
        accumulator: u16,
        /// Link after execution.
        link: bool,
        /// Program counter after execution.
        new_pc: u16,
    },
    /// A word was stored.
    MemoryWrite {
        /// Target address.
        address: u16,
        /// Stored (masked) value.
        value: u16,
    },
    /// The machine halted.
    Halt {
        /// Program counter at the moment of the halt.
        pc: u16,
    },
}

/// Tracer that records every event in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingTracer {
    /// Events in the order they were reported.
    pub events: Vec<TraceEvent>,
}

impl RecordingTracer {
    /// Returns true once a halt has been recorded.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, TraceEvent::Halt { .. }))
    }

    /// Returns every recorded memory write as `(address, value)` pairs.
    #[must_use]
    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::MemoryWrite { address, value } => Some((*address, *value)),
                _ => None,
            })
            .collect()
    }
}

impl Tracer for RecordingTracer {
    fn on_instruction_executed(
        &mut self,
        old_pc: u16,
        instruction: u16,
        accumulator: u16,
        link: bool,
        new_pc: u16,
    ) {
        self.events.push(TraceEvent::InstructionExecuted {
            old_pc,
            instruction,
            accumulator,
            link,
            new_pc,
        });
    }

    fn on_memory_write(&mut self, address: u16, value: u16) {
        self.events.push(TraceEvent::MemoryWrite { address, value });
    }

    fn on_halt(&mut self, pc: u16) {
        self.events.push(TraceEvent::Halt { pc });
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingTracer, TraceEvent, Tracer};

    #[test]
    fn recording_tracer_keeps_event_order() {
        let mut tracer = RecordingTracer::default();
        tracer.on_memory_write(0o10, 0o7);
        tracer.on_halt(0o201);
        assert_eq!(
            tracer.events,
            vec![
                TraceEvent::MemoryWrite {
                    address: 0o10,
                    value: 0o7
                },
                TraceEvent::Halt { pc: 0o201 },
            ]
        );
        assert!(tracer.halted());
        assert_eq!(tracer.writes(), vec![(0o10, 0o7)]);
    }

    fn report_halt<T: Tracer>(mut tracer: T) {
        tracer.on_halt(3);
    }

    #[test]
    fn mutable_reference_forwards_events() {
        let mut tracer = RecordingTracer::default();
        report_halt(&mut tracer);
        assert_eq!(tracer.events, vec![TraceEvent::Halt { pc: 3 }]);
    }
}
