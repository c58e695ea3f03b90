/// codegen_branch.rs
use crate::vm_translator::asm::AsmLine;
use crate::vm_translator::codegen::HackCodeGen;
use crate::vm_translator::error::TranslatorError;

impl HackCodeGen {
    /// `(name)`. User labels share one namespace across the whole translation.
    pub fn emit_label(&mut self, name: &str) -> Result<(), TranslatorError> {
        self.declare_label(name)?;
        self.emit(AsmLine::label(name));
        Ok(())
    }

    pub fn emit_goto(&mut self, name: &str) {
        self.emit_all([AsmLine::at(name), AsmLine::jump("0", "JMP")]);
    }

    /// Pop and jump when the value is strictly positive (`D;JGT`).
    ///
    /// Comparisons push -1 for true, which this predicate treats as not taken.
    /// Callers that branch on a comparison result see the jump only for values > 0.
    pub fn emit_if_goto(&mut self, name: &str) {
        self.emit_pop();
        self.emit_all([AsmLine::at(name), AsmLine::jump("D", "JGT")]);
    }

    /// Record a user-visible label, rejecting a second declaration of the same name.
    pub(crate) fn declare_label(&mut self, name: &str) -> Result<(), TranslatorError> {
        if let Some(first) = self.declared_labels.get(name) {
            return Err(TranslatorError::DuplicateLabel(
                name.to_string(),
                first.clone(),
                self.position.clone(),
            ));
        }
        self.declared_labels
            .insert(name.to_string(), self.position.clone());
        Ok(())
    }
}
