//! Instruction semantics driven through single assembled lines.

#![allow(clippy::pedantic, clippy::nursery)]

use log as _;
use pal_assembler::Pal;
use pdp8_core::{Cpu, RecordingTracer, RunOptions, StepOutcome};
use proptest as _;
use rstest::rstest;
use tempfile as _;
use thiserror as _;

struct Machine {
    cpu: Cpu<RecordingTracer>,
    pal: Pal,
}

impl Machine {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            cpu: Cpu::with_tracer(RecordingTracer::default()),
            pal: Pal::new(),
        }
    }

    fn put(&mut self, address: u16, text: &str) {
        let word = self.pal.instruction(text).expect("line assembles");
        self.cpu.memory_mut().write(address, word);
    }

    fn set(&mut self, address: u16, value: u16) {
        self.cpu.memory_mut().write(address, value);
    }

    fn step_from(&mut self, start: u16) -> StepOutcome {
        self.cpu
            .run(RunOptions::from(start).stepping(true))
            .expect("instruction executes")
            .final_step
    }
}

#[test]
fn and() {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(0o7070);
    m.put(0, "AND 2");
    m.set(2, 0o1120);
    m.step_from(0);
    assert_eq!(m.cpu.accumulator(), 0o1020);
}

#[rstest]
#[case::without_carry(0o0007, 1, 0o0010, false)]
#[case::with_carry(0o7777, 1, 0o0000, true)]
fn tad(#[case] ac: u16, #[case] operand: u16, #[case] expected: u16, #[case] link: bool) {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_link(true);
    m.cpu.registers_mut().set_ac(ac);
    m.put(0, "TAD 2");
    m.set(2, operand);
    m.step_from(0);
    assert_eq!((m.cpu.accumulator(), m.cpu.link()), (expected, link));
}

#[rstest]
#[case::no_skip(1, 2, 1)]
#[case::skip(0o7777, 0, 2)]
fn isz(#[case] before: u16, #[case] after: u16, #[case] pc: u16) {
    let mut m = Machine::new();
    m.put(0, "ISZ 2");
    m.set(2, before);
    m.step_from(0);
    assert_eq!(m.cpu.memory().read(2), after);
    assert_eq!(m.cpu.pc(), pc);
}

#[test]
fn dca() {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(1);
    m.put(0, "DCA 2");
    m.set(2, 0o7777);
    m.step_from(0);
    assert_eq!(m.cpu.memory().read(2), 1);
    assert_eq!(m.cpu.accumulator(), 0);
    assert_eq!(m.cpu.pc(), 1);
    assert_eq!(m.cpu.tracer().writes(), vec![(2, 1)]);
}

#[test]
fn jms_and_jmp() {
    let mut m = Machine::new();
    m.put(0, "JMS 2");
    m.step_from(0);
    assert_eq!(m.cpu.memory().read(2), 1);
    assert_eq!(m.cpu.pc(), 3);

    m.put(0, "JMP 2");
    m.step_from(0);
    assert_eq!(m.cpu.pc(), 2);
}

// Each line is assembled at 0 and executed at `at`; a current-page
// reference therefore lands on the executing page.
#[rstest]
#[case::indirect("AND I 2", 0o000, &[(0o002, 0o003), (0o003, 4)])]
#[case::page_zero("AND Z 2", 0o200, &[(0o002, 4)])]
#[case::current_page("AND 2", 0o200, &[(0o202, 4)])]
#[case::indirect_current_page("AND I 2", 0o200, &[(0o202, 0o203), (0o203, 4)])]
#[case::indirect_page_zero("AND I Z 2", 0o200, &[(0o002, 0o203), (0o203, 4)])]
fn and_addressing_modes(#[case] line: &str, #[case] at: u16, #[case] memory: &[(u16, u16)]) {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(7);
    m.put(at, line);
    for &(address, value) in memory {
        m.set(address, value);
    }
    m.step_from(at);
    assert_eq!(m.cpu.accumulator(), 4, "{line}");
}

#[rstest]
#[case::indirect("DCA I 2", 0o000, 0o002, 0o003)]
#[case::page_zero("DCA Z 2", 0o200, 0o002, 0o002)]
#[case::current_page("DCA 2", 0o200, 0o202, 0o202)]
#[case::indirect_current_page("DCA I 2", 0o200, 0o202, 0o203)]
#[case::indirect_page_zero("DCA I Z 2", 0o200, 0o002, 0o203)]
fn dca_addressing_modes(
    #[case] line: &str,
    #[case] at: u16,
    #[case] pointer: u16,
    #[case] target: u16,
) {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(7);
    m.put(at, line);
    if pointer != target {
        m.set(pointer, target);
    }
    m.step_from(at);
    assert_eq!(m.cpu.memory().read(target), 7, "{line}");
    assert_eq!(m.cpu.accumulator(), 0);
}

#[rstest]
#[case::nop("NOP", 0o1234, true, 0o1234, true)]
#[case::cla("CLA", 0o1234, false, 0, false)]
#[case::cll("CLL", 0o1234, true, 0o1234, false)]
#[case::cla_cll("CLA CLL", 0o1234, true, 0, false)]
#[case::cll_cla("CLL CLA", 0o1234, true, 0, false)]
#[case::cma("CMA", 0o1234, false, 0o6543, false)]
#[case::cml_from_clear("CML", 0, false, 0, true)]
#[case::cml_from_set("CML", 0, true, 0, false)]
#[case::rar_00("RAR", 0o0002, false, 0o0001, false)]
#[case::rar_01("RAR", 0o0001, false, 0o0000, true)]
#[case::rar_10("RAR", 0o0000, true, 0o4000, false)]
#[case::rar_11("RAR", 0o0001, true, 0o4000, true)]
#[case::rtr("RTR", 0o0001, false, 0o4000, false)]
#[case::ral_00("RAL", 0o0001, false, 0o0002, false)]
#[case::ral_01("RAL", 0o4000, false, 0o0000, true)]
#[case::ral_10("RAL", 0o0000, true, 0o0001, false)]
#[case::ral_11("RAL", 0o4000, true, 0o0001, true)]
#[case::rtl("RTL", 0o4000, false, 0o0001, false)]
#[case::iac("IAC", 0o0005, false, 0o0006, false)]
#[case::iac_wrap("IAC", 0o7777, false, 0, true)]
#[case::iac_before_ral("RAL IAC", 0o7777, false, 1, false)]
#[case::fixed_order("RAL IAC CLA CMA", 0o1234, false, 1, false)]
fn group1(
    #[case] line: &str,
    #[case] ac: u16,
    #[case] link: bool,
    #[case] expected_ac: u16,
    #[case] expected_link: bool,
) {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(ac);
    m.cpu.registers_mut().set_link(link);
    m.put(0, line);
    m.step_from(0);
    assert_eq!(
        (m.cpu.accumulator(), m.cpu.link()),
        (expected_ac, expected_link),
        "{line}"
    );
}

#[rstest]
#[case::sma("SMA", 0o7777, false)]
#[case::sza("SZA", 0, false)]
#[case::snl("SNL", 0, true)]
#[case::spa("SPA", 1, false)]
#[case::sna("SNA", 1, false)]
#[case::szl("SZL", 1, false)]
#[case::skp("SKP", 0, true)]
fn group2_skips(#[case] line: &str, #[case] ac: u16, #[case] link: bool) {
    let mut m = Machine::new();
    m.cpu.registers_mut().set_ac(ac);
    m.cpu.registers_mut().set_link(link);
    m.put(0, line);
    m.step_from(0);
    assert_eq!(m.cpu.pc(), 2, "{line}");
}

#[test]
fn hlt_reaches_the_tracer() {
    let mut m = Machine::new();
    m.put(0, "HLT");
    assert_eq!(m.step_from(0), StepOutcome::Halted);
    assert!(m.cpu.tracer().halted());
}
