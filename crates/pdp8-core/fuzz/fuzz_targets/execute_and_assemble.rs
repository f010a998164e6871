#![no_main]

use libfuzzer_sys::fuzz_target;
use pal_assembler::Pal;
use pdp8_core::{disassemble, Cpu, RunOptions, WORD_MASK};

const MAX_STEPS: usize = 256;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let start = u16::from_be_bytes([data[0], data[1]]) & WORD_MASK;
    let words: Vec<u16> = data[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) & WORD_MASK)
        .collect();

    let mut cpu = Cpu::new();
    cpu.memory_mut().load_at(start, &words);
    cpu.registers_mut().set_pc(start);
    for _ in 0..MAX_STEPS {
        if cpu.step().is_err() {
            break;
        }
    }

    for (offset, word) in words.iter().enumerate().take(16) {
        let _ = disassemble(*word, start.wrapping_add(offset as u16));
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Pal::new().assemble(text);
    }
});
