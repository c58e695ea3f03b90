//! Minimal Hack machine for executing translator output in tests.
//!
//! Assembles text the way the downstream assembler does (labels bound in a first pass,
//! predefined symbols, variables allocated from cell 16) and runs it until the program
//! counter falls off the end of ROM or the step budget runs out.

use std::collections::HashMap;

use crate::vm_translator::asm::PREDEFINED_SYMBOLS;

pub const RAM_SIZE: usize = 0x8000;
const FIRST_VARIABLE: u16 = 16;
const DEFAULT_STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Load(u16),
    Compute {
        dest: String,
        comp: String,
        jump: Option<String>,
    },
}

pub struct HackMachine {
    rom: Vec<Op>,
    pub ram: Vec<i16>,
    pub a: i16,
    pub d: i16,
    pub pc: usize,
    symbols: HashMap<String, u16>,
}

impl HackMachine {
    pub fn assemble(text: &str) -> HackMachine {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| match line.find("//") {
                Some(idx) => line[..idx].trim(),
                None => line.trim(),
            })
            .filter(|line| !line.is_empty())
            .collect();

        let mut symbols: HashMap<String, u16> = PREDEFINED_SYMBOLS
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();

        // Pass 1: labels
        let mut address = 0u16;
        for line in &lines {
            if let Some(label) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                // Like the reference assembler, the first declaration wins
                symbols.entry(label.to_string()).or_insert(address);
            } else {
                address += 1;
            }
        }

        // Pass 2: instructions and variables
        let mut next_variable = FIRST_VARIABLE;
        let mut rom = Vec::new();
        for line in &lines {
            if line.starts_with('(') {
                continue;
            }
            if let Some(value) = line.strip_prefix('@') {
                let resolved = match value.parse::<u16>() {
                    Ok(number) => number,
                    Err(_) => *symbols.entry(value.to_string()).or_insert_with(|| {
                        let cell = next_variable;
                        next_variable += 1;
                        cell
                    }),
                };
                rom.push(Op::Load(resolved));
                continue;
            }
            let (dest, rest) = match line.split_once('=') {
                Some((dest, rest)) => (dest.to_string(), rest),
                None => (String::new(), *line),
            };
            let (comp, jump) = match rest.split_once(';') {
                Some((comp, jump)) => (comp.to_string(), Some(jump.to_string())),
                None => (rest.to_string(), None),
            };
            rom.push(Op::Compute { dest, comp, jump });
        }

        HackMachine {
            rom,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            symbols,
        }
    }

    /// Address bound to a symbol during assembly.
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    pub fn rom_len(&self) -> usize {
        self.rom.len()
    }

    /// Run until the program counter leaves ROM. Panics when the step budget is exhausted.
    pub fn run(&mut self) {
        self.run_for(DEFAULT_STEP_LIMIT);
    }

    pub fn run_for(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                return;
            }
            self.step();
        }
        panic!("program did not finish within {} steps (pc={})", max_steps, self.pc);
    }

    fn m_index(&self) -> usize {
        (self.a as u16 as usize) % RAM_SIZE
    }

    fn step(&mut self) {
        match self.rom[self.pc].clone() {
            Op::Load(value) => {
                self.a = value as i16;
                self.pc += 1;
            }
            Op::Compute { dest, comp, jump } => {
                let value = self.compute(&comp);
                let m_address = self.m_index();
                // Registers latch at the end of the cycle, so a jump targets the old A
                let target = self.a as u16 as usize;
                if dest.contains('M') {
                    self.ram[m_address] = value;
                }
                if dest.contains('D') {
                    self.d = value;
                }
                if dest.contains('A') {
                    self.a = value;
                }
                let taken = match jump.as_deref() {
                    None => false,
                    Some("JGT") => value > 0,
                    Some("JEQ") => value == 0,
                    Some("JGE") => value >= 0,
                    Some("JLT") => value < 0,
                    Some("JNE") => value != 0,
                    Some("JLE") => value <= 0,
                    Some("JMP") => true,
                    Some(other) => panic!("unknown jump '{}'", other),
                };
                self.pc = if taken { target } else { self.pc + 1 };
            }
        }
    }

    fn compute(&self, comp: &str) -> i16 {
        let a = self.a;
        let d = self.d;
        let m = self.ram[self.m_index()];
        match comp {
            "0" => 0,
            "1" => 1,
            "-1" => -1,
            "D" => d,
            "A" => a,
            "M" => m,
            "!D" => !d,
            "!A" => !a,
            "!M" => !m,
            "-D" => d.wrapping_neg(),
            "-A" => a.wrapping_neg(),
            "-M" => m.wrapping_neg(),
            "D+1" => d.wrapping_add(1),
            "A+1" => a.wrapping_add(1),
            "M+1" => m.wrapping_add(1),
            "D-1" => d.wrapping_sub(1),
            "A-1" => a.wrapping_sub(1),
            "M-1" => m.wrapping_sub(1),
            "D+A" => d.wrapping_add(a),
            "D+M" => d.wrapping_add(m),
            "D-A" => d.wrapping_sub(a),
            "D-M" => d.wrapping_sub(m),
            "A-D" => a.wrapping_sub(d),
            "M-D" => m.wrapping_sub(d),
            "D&A" => d & a,
            "D&M" => d & m,
            "D|A" => d | a,
            "D|M" => d | m,
            other => panic!("unknown comp '{}'", other),
        }
    }

    pub fn sp(&self) -> i16 {
        self.ram[0]
    }

    /// Value just below the stack pointer.
    pub fn top(&self) -> i16 {
        self.ram[(self.sp() - 1) as usize]
    }
}
