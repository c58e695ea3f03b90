// Hack Code Generator
//
// Lowers classified VM instructions into Hack assembly lines.
// One HackCodeGen is one translation: it owns the output buffer, the label counter and the
// table of declared labels, so independent translations never share label numbers.
// The emitters for each concern live in codegen_stack.rs, codegen_segments.rs,
// codegen_arithmetic.rs, codegen_branch.rs and codegen_functions.rs.

use indexmap::IndexMap;

use crate::vm_translator::asm::AsmLine;
use crate::vm_translator::command::{Category, Command, Instruction};
use crate::vm_translator::config::TranslatorConfig;
use crate::vm_translator::error::{SourcePosition, TranslatorError};

/// Initial stack pointer written by the bootstrap prologue.
pub const STACK_BASE: u16 = 256;

pub struct HackCodeGen {
    pub(crate) config: TranslatorConfig,

    // Where we are in the input
    pub(crate) unit: String,
    pub(crate) position: SourcePosition,

    pub(crate) output: Vec<AsmLine>,

    // Label bookkeeping
    label_counter: usize,
    pub(crate) declared_labels: IndexMap<String, SourcePosition>, // user label -> first declaration
    pub(crate) call_sites: IndexMap<String, usize>,               // callee -> call count

    // Diagnostics only
    pub(crate) stack_depth: i64,
    instruction_counts: IndexMap<Category, usize>,
}

impl HackCodeGen {
    pub fn new(config: TranslatorConfig) -> Self {
        HackCodeGen {
            config,
            unit: String::new(),
            position: SourcePosition::default(),
            output: Vec::new(),
            label_counter: 0,
            declared_labels: IndexMap::new(),
            call_sites: IndexMap::new(),
            stack_depth: 0,
            instruction_counts: IndexMap::new(),
        }
    }

    /// Switch to the next unit of a concatenated translation.
    /// Static symbols are qualified by this name; labels and counters carry over.
    pub fn set_unit(&mut self, unit: &str) {
        log::info!("Generating code for unit '{}'", unit);
        self.unit = unit.to_string();
        self.position = SourcePosition::new(unit, 0);
    }

    pub fn output(&self) -> &[AsmLine] {
        &self.output
    }

    pub fn into_output(self) -> Vec<AsmLine> {
        self.log_summary();
        self.output
    }

    pub fn stack_depth(&self) -> i64 {
        self.stack_depth
    }

    /// Number of label ids handed out so far.
    pub fn labels_generated(&self) -> usize {
        self.label_counter
    }

    pub(crate) fn emit(&mut self, line: AsmLine) {
        self.output.push(line);
    }

    pub(crate) fn emit_all(&mut self, lines: impl IntoIterator<Item = AsmLine>) {
        self.output.extend(lines);
    }

    /// Next id from the counter shared by comparison and return labels.
    pub(crate) fn next_label_id(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }

    /// Route one instruction to its emitter.
    pub fn generate_instruction(&mut self, instruction: &Instruction) -> Result<(), TranslatorError> {
        self.position = instruction.position.clone();
        *self
            .instruction_counts
            .entry(instruction.command.category())
            .or_insert(0) += 1;
        log::debug!(
            "{}: {} (stack depth {})",
            instruction.position,
            instruction.command,
            self.stack_depth
        );

        if self.config.annotate {
            self.emit(AsmLine::comment(instruction.text.clone()));
        }

        let result = match &instruction.command {
            Command::Arithmetic(op) => {
                self.emit_arithmetic(*op);
                Ok(())
            }
            Command::Push(segment, offset) => self.emit_push_command(*segment, *offset),
            Command::Pop(segment, offset) => self.emit_pop_command(*segment, *offset),
            Command::Label(name) => self.emit_label(name),
            Command::Goto(name) => {
                self.emit_goto(name);
                Ok(())
            }
            Command::IfGoto(name) => {
                self.emit_if_goto(name);
                Ok(())
            }
            Command::Function { name, locals } => self.emit_function(name, *locals),
            Command::Call { name, args } => {
                self.emit_call(name, *args);
                Ok(())
            }
            Command::Return => {
                self.emit_return();
                Ok(())
            }
        };

        if let Err(err) = &result {
            log::error!("{}", err);
        }
        result
    }

    /// Translate a whole instruction stream in order, stopping at the first error.
    pub fn generate(&mut self, instructions: &[Instruction]) -> Result<(), TranslatorError> {
        for instruction in instructions {
            self.generate_instruction(instruction)?;
        }
        Ok(())
    }

    /// `SP = 256` followed by a call to the entry point's `init` function.
    pub fn emit_bootstrap(&mut self) {
        log::debug!("Emitting bootstrap prologue");
        let entry = format!("{}.init", self.config.entry_point);
        self.emit(AsmLine::comment("bootstrap"));
        self.emit_all([
            AsmLine::at(STACK_BASE.to_string()),
            AsmLine::assign("D", "A"),
            AsmLine::at("SP"),
            AsmLine::assign("M", "D"),
        ]);
        self.emit_call(&entry, 0);
    }

    fn log_summary(&self) {
        let total: usize = self.instruction_counts.values().sum();
        log::info!(
            "Translation summary: {} instructions -> {} lines, {} label ids, {} user labels, {} distinct callees",
            total,
            self.output.len(),
            self.label_counter,
            self.declared_labels.len(),
            self.call_sites.len()
        );
        for (category, count) in &self.instruction_counts {
            log::debug!("  {:?}: {}", category, count);
        }
    }
}
