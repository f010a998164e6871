//! CLI entry point for the `pal8` assembler and runner.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use pal_assembler::{AssembleError, Pal, Program};
use pdp8_core::execute::to_signed;
use pdp8_core::{
    disassemble, disassemble_window, CoreConfig, Cpu, Fault, RunOptions, RunState, Tracer,
    WORD_MASK,
};
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: pal8 <command> [options]

Commands:
  list <input>                 Assemble and print the listing and symbols
  run  <input> [options]       Assemble, load, and run until HLT

Run options:
  --start <octal>      Start address (default: START label, else 0200)
  --switches <octal>   Front-panel switch register read by OSR
  --trace              Print every executed instruction
  --max-steps <n>      Give up after n instructions
  -h, --help           Show this help message

Examples:
  pal8 list mult.pal
  pal8 run mult.pal --trace
  pal8 run echo.pal --start 200 --switches 7777
";

const DEFAULT_START: u16 = 0o200;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List(PathBuf),
    Run(RunArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    start: Option<u16>,
    switches: u16,
    trace: bool,
    max_steps: Option<u64>,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "list" => parse_list_args(args)
            .map(Command::List)
            .map(ParseResult::Command),
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_list_args(args: impl Iterator<Item = OsString>) -> Result<PathBuf, String> {
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    input.ok_or_else(|| "missing input path".to_string())
}

fn parse_octal(flag: &str, value: Option<OsString>) -> Result<u16, String> {
    let value = value.ok_or_else(|| format!("missing value for {flag}"))?;
    let text = value.to_string_lossy();
    u16::from_str_radix(&text, 8)
        .ok()
        .filter(|word| *word <= WORD_MASK)
        .ok_or_else(|| format!("invalid octal word for {flag}: {text}"))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut start = None;
    let mut switches = 0;
    let mut trace = false;
    let mut max_steps = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--trace" {
            trace = true;
            continue;
        }

        if arg == "--start" {
            start = Some(parse_octal("--start", args.next())?);
            continue;
        }

        if arg == "--switches" {
            switches = parse_octal("--switches", args.next())?;
            continue;
        }

        if arg == "--max-steps" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for --max-steps".to_string())?;
            let text = value.to_string_lossy();
            max_steps = Some(
                text.parse::<u64>()
                    .map_err(|_| format!("invalid step count: {text}"))?,
            );
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(RunArgs {
        input,
        start,
        switches,
        trace,
        max_steps,
    })
}

/// Prints one line per executed instruction and per memory store.
#[derive(Debug, Default)]
struct ConsoleTracer;

impl Tracer for ConsoleTracer {
    fn on_instruction_executed(
        &mut self,
        old_pc: u16,
        instruction: u16,
        accumulator: u16,
        link: bool,
        new_pc: u16,
    ) {
        println!(
            "{old_pc:04o}  {instruction:04o}  {:<16} AC {accumulator:04o} ({:+5})  L {}  PC {new_pc:04o}",
            disassemble(instruction, old_pc),
            to_signed(accumulator),
            u8::from(link)
        );
    }

    fn on_memory_write(&mut self, address: u16, value: u16) {
        println!("      set {address:04o} to {value:04o}");
    }

    fn on_halt(&mut self, pc: u16) {
        println!("Halted at {pc:04o}");
    }
}

fn assemble_file(input: &Path) -> Result<Program, i32> {
    let source = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", input.display());
        1
    })?;
    Pal::new()
        .assemble(&source)
        .map_err(|e| report_assemble_error(input, &e))
}

fn report_assemble_error(input: &Path, e: &AssembleError) -> i32 {
    eprintln!("{}:{}: error: {}: {}", input.display(), e.line, e.kind, e.text);
    1
}

fn run_list(input: &Path) -> Result<(), i32> {
    let program = assemble_file(input)?;

    for entry in program.listing() {
        println!("{entry}");
    }

    let symbols = program.symbols();
    if !symbols.is_empty() {
        println!();
        println!("Symbols:");
        for (name, address) in symbols {
            println!("  {name:<8} {address:04o}");
        }
    }

    Ok(())
}

fn run_program(args: &RunArgs) -> Result<(), i32> {
    let program = assemble_file(&args.input)?;
    let start = args
        .start
        .or_else(|| program.symbol("START"))
        .unwrap_or(DEFAULT_START);

    let config = CoreConfig {
        tracing_enabled: args.trace,
        switch_register: args.switches,
    };
    let mut cpu = Cpu::with_config(config, ConsoleTracer);
    program.load_into(&mut cpu);
    debug!("loaded {}, starting at {start:04o}", args.input.display());

    let result = match args.max_steps {
        Some(limit) => run_bounded(&mut cpu, start, limit),
        None => cpu.run(RunOptions::from(start)).map(|_| ()),
    };

    let output = cpu.take_output();
    if !output.is_empty() {
        println!("{output}");
    }

    if let Err(fault) = result {
        eprintln!("error: {fault}");
        for row in disassemble_window(fault.pc(), 2, 2, cpu.memory()) {
            let marker = if row.address == fault.pc() { '>' } else { ' ' };
            eprintln!("{marker} {row}");
        }
        return Err(1);
    }

    if cpu.run_state() != RunState::Halted {
        eprintln!(
            "error: no HLT within {} steps (pc {:04o})",
            args.max_steps.unwrap_or_default(),
            cpu.pc()
        );
        return Err(1);
    }

    println!(
        "AC {:04o}  L {}  PC {:04o}",
        cpu.accumulator(),
        u8::from(cpu.link()),
        cpu.pc()
    );
    Ok(())
}

fn run_bounded<T: Tracer>(cpu: &mut Cpu<T>, start: u16, limit: u64) -> Result<(), Fault> {
    cpu.registers_mut().set_pc(start);
    for _ in 0..limit {
        cpu.step()?;
        if cpu.run_state() == RunState::Halted {
            break;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::List(input))) => match run_list(&input) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Run(args))) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
