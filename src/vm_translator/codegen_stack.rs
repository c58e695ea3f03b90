/// codegen_stack.rs
/// Push/pop against the SP cell. Values travel through the D register.
use crate::vm_translator::asm::AsmLine;
use crate::vm_translator::codegen::HackCodeGen;

impl HackCodeGen {
    /// Store D at the stack top, then advance SP.
    pub fn emit_push(&mut self) {
        self.emit_all([
            AsmLine::at("SP"),
            AsmLine::assign("A", "M"),
            AsmLine::assign("M", "D"),
            AsmLine::at("SP"),
            AsmLine::assign("M", "M+1"),
        ]);
        self.adjust_stack_depth(1);
    }

    /// Retreat SP, then load the value it addresses into D.
    pub fn emit_pop(&mut self) {
        self.emit_all([
            AsmLine::at("SP"),
            AsmLine::assign("M", "M-1"),
            AsmLine::at("SP"),
            AsmLine::assign("A", "M"),
            AsmLine::assign("D", "M"),
        ]);
        self.adjust_stack_depth(-1);
    }

    /// Track the statically known depth. Going below zero is only reported.
    pub(crate) fn adjust_stack_depth(&mut self, delta: i64) {
        self.stack_depth += delta;
        log::trace!("stack depth {:+} -> {}", delta, self.stack_depth);
        if self.stack_depth < 0 {
            log::warn!(
                "{}: stack depth below zero ({}) - popping an empty stack?",
                self.position,
                self.stack_depth
            );
        }
    }
}
