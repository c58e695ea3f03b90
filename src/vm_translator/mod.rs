// VM Translator Module
// Lowers stack-machine VM code to Hack assembly text

pub mod asm;
pub mod codegen;
pub mod codegen_arithmetic;
pub mod codegen_branch;
pub mod codegen_functions;
pub mod codegen_segments;
pub mod codegen_stack;
pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod source;

#[cfg(test)]
mod hack_machine;

#[cfg(test)]
mod parser_tests;



pub use config::{ReturnLabelScheme, TranslatorConfig};
pub use error::{SourcePosition, TranslatorError};
pub use source::SourceUnit;

use crate::vm_translator::command::Instruction;

/// Main translator structure
pub struct VmTranslator {
    config: TranslatorConfig,
}

impl Default for VmTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl VmTranslator {
    pub fn new() -> Self {
        Self::with_config(TranslatorConfig::default())
    }

    pub fn with_config(config: TranslatorConfig) -> Self {
        VmTranslator { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate units as one program: one label counter, one user-label namespace.
    /// Nothing is returned unless every unit translates.
    pub fn translate(&self, units: &[SourceUnit]) -> Result<String, TranslatorError> {
        // Phase 1: classify every line of every unit
        let mut parsed: Vec<(&str, Vec<Instruction>)> = Vec::with_capacity(units.len());
        for unit in units {
            let instructions = parser::Parser::new(&unit.name, &unit.source).parse()?;
            parsed.push((unit.name.as_str(), instructions));
        }

        // Phase 2: lower in input order
        let mut codegen = codegen::HackCodeGen::new(self.config.clone());
        if self.config.bootstrap {
            codegen.emit_bootstrap();
        }
        for (name, instructions) in &parsed {
            codegen.set_unit(name);
            codegen.generate(instructions)?;
        }

        // Phase 3: render
        Ok(asm::render(&codegen.into_output()))
    }

    /// Single-unit shorthand for `translate`.
    pub fn translate_source(&self, unit: &str, source: &str) -> Result<String, TranslatorError> {
        self.translate(&[SourceUnit::new(unit, source)])
    }
}
