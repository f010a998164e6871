//! Whole programs assembled, loaded, and run to completion.

#![allow(clippy::pedantic, clippy::nursery)]

use log as _;
use pal_assembler::{AssembleErrorKind, Pal, Program};
use pdp8_core::{disassemble, Cpu, RunOptions, RunState};
use proptest::prelude::*;
use rstest as _;
use tempfile as _;
use thiserror as _;

fn assemble(source: &str) -> Program {
    let _ = env_logger::builder().is_test(true).try_init();
    Pal::new().assemble(source).expect("program assembles")
}

fn run(program: &Program, start: u16) -> Cpu {
    let mut cpu = Cpu::new();
    program.load_into(&mut cpu);
    cpu.run(RunOptions::from(start)).expect("program halts");
    assert_eq!(cpu.run_state(), RunState::Halted);
    cpu
}

const MULTIPLY: &str = "
/ Multiply
*200            / start at octal 200
START,  CLA CLL
        TAD A
        CMA IAC
        DCA TALLY
LOOP,   TAD B
        ISZ TALLY
        JMP LOOP
        HLT
A,      0022
B,      0044
TALLY,  0000
";

#[test]
fn multiply_by_repeated_addition() {
    let program = assemble(MULTIPLY);
    assert_eq!(program.symbol("START"), Some(0o200));
    assert_eq!(program.symbol("TALLY"), Some(0o212));
    let cpu = run(&program, 0o200);
    assert_eq!(cpu.accumulator(), 0o1210);
    assert_eq!(cpu.memory().read(0o212), 0);
}

#[test]
fn multiply_with_absolute_addresses() {
    let program = assemble(
        "*200
START,  CLA CLL
        TAD 210
        CMA IAC
        DCA 212
        TAD 211
        ISZ 212
        JMP 204
        HLT
A,      0022
B,      0044
TALLY,  0000
",
    );
    assert_eq!(run(&program, 0o200).accumulator(), 0o1210);
}

#[test]
fn multiply_in_page_zero() {
    let program = assemble(
        "START,  CLA CLL
        TAD 10
        CMA IAC
        DCA 12
        TAD 11
        ISZ 12
        JMP 4
        HLT
        0022
        0044
        0000
",
    );
    assert_eq!(run(&program, 0).accumulator(), 0o1210);
}

#[test]
fn subroutine_with_indirect_return() {
    // adds 6 to a page-zero counter through a subroutine
    let program = assemble(
        "*20
COUNT,  0
*200
START,  CLA
        TAD SIX
        JMS ADDIN
        HLT
SIX,    6
ADDIN,  0
        TAD COUNT
        DCA COUNT
        JMP I ADDIN
",
    );
    assert_eq!(program.symbol("COUNT"), Some(0o20));
    let cpu = run(&program, 0o200);
    assert_eq!(cpu.memory().read(0o20), 6);
    assert_eq!(cpu.memory().read(0o205), 0o203);
    assert_eq!(cpu.pc(), 0o204);
}

#[test]
fn search_for_a_value() {
    // counts down through a table until it finds 1234, leaving AC zero
    let program = assemble(
        "*200
START,  CLA CLL
NEXT,   TAD I PTR
        TAD MINUS
        SZA CLA
        JMP BUMP
        HLT
BUMP,   ISZ PTR
        JMP NEXT
PTR,    TABLE
MINUS,  -1234
TABLE,  1
        2
        1234
        3
",
    );
    let cpu = run(&program, 0o200);
    assert_eq!(cpu.accumulator(), 0);
    assert_eq!(cpu.memory().read(program.symbol("PTR").unwrap()), 0o214);
}

#[test]
fn hello_world_on_the_teleprinter() {
    let program = assemble(
        "*200
START,  CLA CLL
LOOP,   TAD I PTR
        SNA
        HLT
        TLS
        TSF
        JMP .-1
        CLA
        ISZ PTR
        JMP LOOP
PTR,    MSG
DECIMAL
MSG,    72
        73
        33
        0
",
    );
    let mut cpu = run(&program, 0o200);
    assert_eq!(cpu.take_output(), "HI!");
    assert!(cpu.punch().ready());
}

#[test]
fn switch_register_round_trip() {
    let program = assemble("*200\nCLA OSR\nDCA 20\nHLT\n");
    let mut cpu = Cpu::new();
    cpu.set_switch_register(0o4321);
    program.load_into(&mut cpu);
    cpu.run(RunOptions::from(0o200)).expect("halts");
    assert_eq!(cpu.memory().read(0o20), 0o4321);
}

#[test]
fn page_fault_is_reported() {
    let err = Pal::new()
        .assemble("*200\nTAD 400\n")
        .expect_err("page 2 is unreachable from page 1");
    assert_eq!(
        err.kind,
        AssembleErrorKind::PageFault {
            address: 0o400,
            here: 0o200
        }
    );
    assert_eq!(err.line, 2);
}

#[test]
fn explicit_page_zero_keeps_the_low_seven_bits() {
    let program = assemble("*200\nTAD Z 202\nHLT\n");
    assert_eq!(program.word(0o200), 0o1202);

    let mut cpu = Cpu::new();
    program.load_into(&mut cpu);
    cpu.memory_mut().write(0o002, 0o0005);
    cpu.run(RunOptions::from(0o200)).expect("halts");
    assert_eq!(cpu.accumulator(), 0o0005);
}

#[test]
fn mistyped_mnemonic_is_a_syntax_error() {
    let err = Pal::new()
        .assemble("*200\nCLA\nHTL\n")
        .expect_err("HTL is neither a mnemonic nor a label");
    assert_eq!(err.kind, AssembleErrorKind::Syntax);
    assert_eq!(err.line, 3);
    assert_eq!(err.text, "HTL");
}

#[test]
fn symbol_constants_plant_label_addresses() {
    let program = assemble("*200\nPTR, DATA\nDATA, 7\n");
    assert_eq!(program.word(0o200), 0o201);
}

#[test]
fn undefined_symbols_are_reported() {
    let err = Pal::new()
        .assemble("*200\nJMP NOWHERE\n")
        .expect_err("NOWHERE is never defined");
    assert_eq!(
        err.kind,
        AssembleErrorKind::UndefinedSymbol("NOWHERE".into())
    );
}

#[test]
fn invalid_literals_are_reported() {
    let err = Pal::new().assemble("*200\n0089\n").expect_err("octal");
    assert_eq!(err.kind, AssembleErrorKind::InvalidLiteral("0089".into()));
    let err = Pal::new().assemble("*9\n").expect_err("octal origin");
    assert_eq!(err.kind, AssembleErrorKind::InvalidLiteral("9".into()));
}

#[test]
fn syntax_errors_quote_the_line() {
    let err = Pal::new()
        .assemble("*200\nCLA TAD 10 / nonsense\n")
        .expect_err("mixed mnemonics");
    assert_eq!(err.kind, AssembleErrorKind::Syntax);
    assert_eq!(err.text, "CLA TAD 10 / nonsense");
    assert_eq!(
        err.to_string(),
        "line 2: syntax error: CLA TAD 10 / nonsense"
    );
}

#[test]
fn overflowing_memory_is_reported() {
    let err = Pal::new()
        .assemble("*7777\n1\n2\n")
        .expect_err("no room for the second word");
    assert_eq!(err.kind, AssembleErrorKind::AddressOverflow);
    assert_eq!(err.line, 3);
}

#[test]
fn redefinition_keeps_the_last_address() {
    let program = assemble("*200\nX, 1\nX, 2\nJMP X\n");
    assert_eq!(program.symbol("X"), Some(0o201));
    assert_eq!(program.word(0o202), 0o5001);
}

proptest! {
    #[test]
    fn disassembly_reassembles_to_the_same_word(word in 0_u16..=0o7777, address in 0_u16..=0o7777) {
        let text = disassemble(word, address);
        let source = format!("*{address:o}\n{text}\n");
        let program = Pal::new().assemble(&source).expect("disassembly assembles");
        prop_assert_eq!(program.word(address), word, "{} at {:04o}", text, address);
    }
}
