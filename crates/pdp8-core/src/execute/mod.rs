//! Fetch-decode-execute engine.
//!
//! Each step fetches the word at PC, advances PC by one, then dispatches on
//! the 3-bit opcode. Memory-reference handlers resolve their effective
//! address exactly once, before touching memory. Operate instructions are
//! handed to the micro-op sequencer in [`operate`].

/// Effective-address computation.
pub mod address;
/// Twelve-bit arithmetic and rotate primitives.
pub mod alu;
/// Operate-group micro-op sequencing.
pub mod operate;

pub use address::effective_address;
pub use alu::{add_with_carry, rotate_left, rotate_right, to_signed, SIGN_BIT};
pub use operate::{execute_group1, execute_group2, skip_condition};

use log::{debug, trace, warn};

use crate::decoder::{Instruction, OperateGroup};
use crate::peripherals::{Punch, Reader, PUNCH_DEVICE, READER_DEVICE};
use crate::trace::{NullTracer, Tracer};
use crate::{
    CoreConfig, CpuSnapshot, Fault, Memory, Opcode, Registers, RunOptions, RunOutcome, RunState,
    StepOutcome,
};

/// What the run loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Halt,
}

/// A complete simulated machine: registers, 4K memory, console devices,
/// and an attached tracer.
#[derive(Debug)]
pub struct Cpu<T: Tracer = NullTracer> {
    registers: Registers,
    memory: Memory,
    run_state: RunState,
    config: CoreConfig,
    punch: Punch,
    reader: Reader,
    tracer: T,
}

impl Default for Cpu<NullTracer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu<NullTracer> {
    /// Creates a machine with zeroed memory and no tracing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tracer(NullTracer)
    }
}

impl<T: Tracer> Cpu<T> {
    /// Creates a machine that reports execution events to `tracer`.
    #[must_use]
    pub fn with_tracer(tracer: T) -> Self {
        Self::with_config(CoreConfig::default(), tracer)
    }

    /// Creates a machine with an explicit configuration.
    #[must_use]
    pub fn with_config(config: CoreConfig, tracer: T) -> Self {
        Self {
            registers: Registers::default(),
            memory: Memory::new(),
            run_state: RunState::Stopped,
            config,
            punch: Punch::new(),
            reader: Reader,
            tracer,
        }
    }

    /// Returns the register file.
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Returns the register file for direct manipulation.
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.registers.pc()
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> u16 {
        self.registers.ac()
    }

    /// Reads the link.
    #[must_use]
    pub const fn link(&self) -> bool {
        self.registers.link()
    }

    /// Returns memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns memory for direct manipulation. Writes made through this
    /// reference are not traced.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Replaces memory with a program image starting at address 0.
    pub fn load_image(&mut self, image: &[u16]) {
        self.memory.load(image);
    }

    /// Returns the current execution state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns true while instructions are being executed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Sets the front-panel switch register read by `OSR`.
    pub const fn set_switch_register(&mut self, value: u16) {
        self.config.switch_register = value & crate::WORD_MASK;
    }

    /// Returns the teleprinter.
    #[must_use]
    pub const fn punch(&self) -> &Punch {
        &self.punch
    }

    /// Returns everything printed on the teleprinter so far.
    #[must_use]
    pub fn output(&self) -> &str {
        self.punch.output()
    }

    /// Returns and clears the teleprinter output.
    pub fn take_output(&mut self) -> String {
        self.punch.take_output()
    }

    /// Returns the attached tracer.
    #[must_use]
    pub const fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Returns the attached tracer mutably.
    pub const fn tracer_mut(&mut self) -> &mut T {
        &mut self.tracer
    }

    /// Consumes the machine and returns its tracer.
    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Captures registers, run state, and device flags.
    #[must_use]
    pub const fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            registers: self.registers,
            run_state: self.run_state,
            punch_ready: self.punch.ready(),
        }
    }

    /// Runs the machine.
    ///
    /// Seeds the program counter when `options.start` is set, then executes
    /// until `HLT`, a fault, or (when stepping) exactly one instruction.
    ///
    /// # Errors
    ///
    /// Returns the [`Fault`] that stopped execution. The fault is also
    /// latched in [`Cpu::run_state`] and all state is left as it was at the
    /// point of failure.
    pub fn run(&mut self, options: RunOptions) -> Result<RunOutcome, Fault> {
        if let Some(start) = options.start {
            self.registers.set_pc(start);
        }
        self.run_state = RunState::Running;
        debug!(
            "run from {:04o} (stepping: {})",
            self.registers.pc(),
            options.stepping
        );

        let mut steps = 0_u64;
        loop {
            let outcome = self.execute_next()?;
            steps += 1;
            if outcome == StepOutcome::Halted {
                debug!("halted at {:04o} after {steps} steps", self.registers.pc());
                return Ok(RunOutcome {
                    steps,
                    final_step: outcome,
                });
            }
            if options.stepping {
                self.run_state = RunState::Stopped;
                return Ok(RunOutcome {
                    steps,
                    final_step: outcome,
                });
            }
        }
    }

    /// Executes exactly one instruction at the current program counter.
    ///
    /// # Errors
    ///
    /// Returns the [`Fault`] raised by the instruction.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        self.run(RunOptions::step()).map(|outcome| outcome.final_step)
    }

    fn execute_next(&mut self) -> Result<StepOutcome, Fault> {
        let old_pc = self.registers.pc();
        let instruction = Instruction::new(self.memory.read(old_pc));
        self.registers.set_pc(old_pc.wrapping_add(1));

        let control = match self.dispatch(instruction, old_pc) {
            Ok(control) => control,
            Err(fault) => {
                warn!("{fault}");
                self.run_state = RunState::FaultLatched(fault);
                return Err(fault);
            }
        };

        trace!(
            "{old_pc:04o}: {:04o} ac={:04o} l={} pc={:04o}",
            instruction.raw(),
            self.registers.ac(),
            u8::from(self.registers.link()),
            self.registers.pc()
        );
        if self.config.tracing_enabled {
            self.tracer.on_instruction_executed(
                old_pc,
                instruction.raw(),
                self.registers.ac(),
                self.registers.link(),
                self.registers.pc(),
            );
        }

        Ok(match control {
            Control::Continue => StepOutcome::Retired,
            Control::Halt => StepOutcome::Halted,
        })
    }

    fn dispatch(&mut self, instruction: Instruction, old_pc: u16) -> Result<Control, Fault> {
        match instruction.opcode() {
            Opcode::And => {
                let operand = self.load(instruction, old_pc);
                self.registers.set_ac(self.registers.ac() & operand);
            }
            Opcode::Tad => {
                let operand = self.load(instruction, old_pc);
                let (sum, carry) = add_with_carry(self.registers.ac(), operand);
                self.registers.set_ac(sum);
                self.registers.set_link(carry);
            }
            Opcode::Isz => {
                let addr = effective_address(instruction, old_pc, &self.memory);
                let value = self.memory.read(addr).wrapping_add(1);
                self.store(addr, value);
                if self.memory.read(addr) == 0 {
                    self.registers.skip();
                }
            }
            Opcode::Dca => {
                let addr = effective_address(instruction, old_pc, &self.memory);
                self.store(addr, self.registers.ac());
                self.registers.set_ac(0);
            }
            Opcode::Jms => {
                let addr = effective_address(instruction, old_pc, &self.memory);
                self.store(addr, self.registers.pc());
                self.registers.set_pc(addr.wrapping_add(1));
            }
            Opcode::Jmp => {
                let addr = effective_address(instruction, old_pc, &self.memory);
                self.registers.set_pc(addr);
            }
            Opcode::Iot => self.iot(instruction, old_pc)?,
            Opcode::Opr => return self.operate(instruction, old_pc),
        }
        Ok(Control::Continue)
    }

    fn load(&self, instruction: Instruction, old_pc: u16) -> u16 {
        let addr = effective_address(instruction, old_pc, &self.memory);
        self.memory.read(addr)
    }

    fn store(&mut self, addr: u16, value: u16) {
        self.memory.write(addr, value);
        if self.config.tracing_enabled {
            self.tracer.on_memory_write(addr, self.memory.read(addr));
        }
    }

    fn iot(&mut self, instruction: Instruction, old_pc: u16) -> Result<(), Fault> {
        let operation = instruction.io_operation();
        let skip = match instruction.device() {
            READER_DEVICE => self.reader.transfer(operation),
            PUNCH_DEVICE => self.punch.transfer(operation, self.registers.ac()),
            device => {
                return Err(Fault::UnknownDevice {
                    pc: old_pc,
                    device,
                    instruction: instruction.raw(),
                })
            }
        };
        if skip {
            self.registers.skip();
        }
        Ok(())
    }

    fn operate(&mut self, instruction: Instruction, old_pc: u16) -> Result<Control, Fault> {
        match instruction.operate_group() {
            Some(OperateGroup::One) => {
                execute_group1(instruction, &mut self.registers);
                Ok(Control::Continue)
            }
            Some(OperateGroup::Two) => {
                let halt = execute_group2(
                    instruction,
                    &mut self.registers,
                    self.config.switch_register,
                );
                if halt {
                    self.halt();
                    Ok(Control::Halt)
                } else {
                    Ok(Control::Continue)
                }
            }
            None => Err(Fault::Decode {
                pc: old_pc,
                instruction: instruction.raw(),
            }),
        }
    }

    fn halt(&mut self) {
        self.run_state = RunState::Halted;
        if self.config.tracing_enabled {
            self.tracer.on_halt(self.registers.pc());
        }
    }
}
