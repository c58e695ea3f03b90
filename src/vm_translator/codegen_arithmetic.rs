/// codegen_arithmetic.rs
/// The nine arithmetic/logical operators.
///
/// Binary operators pop both operands into aux0 (first popped, the VM's `b`) and aux1
/// (second popped, the VM's `a`) because only one value fits in D at a time.
/// Comparisons compute `a - b` and branch on its sign to produce -1 (true) or 0 (false).
use crate::vm_translator::asm::{AsmLine, AUX_CELLS, END_IF_LABEL_PREFIX, IF_LABEL_PREFIX};
use crate::vm_translator::codegen::HackCodeGen;
use crate::vm_translator::command::{ArithmeticOp, Comparison};

impl HackCodeGen {
    pub fn emit_arithmetic(&mut self, op: ArithmeticOp) {
        match op {
            ArithmeticOp::Add => self.emit_binary("D+M", false),
            ArithmeticOp::Sub => self.emit_binary("D-M", true),
            ArithmeticOp::And => self.emit_binary("D&M", false),
            ArithmeticOp::Or => self.emit_binary("D|M", false),
            ArithmeticOp::Neg => self.emit_unary("-D"),
            ArithmeticOp::Not => self.emit_unary("!D"),
            ArithmeticOp::Eq => self.emit_comparison(Comparison::Equal),
            ArithmeticOp::Gt => self.emit_comparison(Comparison::Greater),
            ArithmeticOp::Lt => self.emit_comparison(Comparison::Less),
        }
    }

    /// Pop b into aux0, then a into aux1.
    fn emit_operand_pair(&mut self) {
        self.emit_pop();
        self.emit_all([AsmLine::at(AUX_CELLS[0]), AsmLine::assign("M", "D")]);
        self.emit_pop();
        self.emit_all([AsmLine::at(AUX_CELLS[1]), AsmLine::assign("M", "D")]);
    }

    /// D = comp over both operands. Ordered operators compute `a op b`.
    fn emit_combine(&mut self, comp: &'static str, ordered: bool) {
        let (left, right) = if ordered {
            (AUX_CELLS[1], AUX_CELLS[0])
        } else {
            (AUX_CELLS[0], AUX_CELLS[1])
        };
        self.emit_operand_pair();
        self.emit_all([
            AsmLine::at(left),
            AsmLine::assign("D", "M"),
            AsmLine::at(right),
            AsmLine::assign("D", comp),
        ]);
    }

    fn emit_binary(&mut self, comp: &'static str, ordered: bool) {
        self.emit_combine(comp, ordered);
        self.emit_push();
    }

    fn emit_unary(&mut self, comp: &'static str) {
        self.emit_pop();
        self.emit(AsmLine::assign("D", comp));
        self.emit_push();
    }

    fn emit_comparison(&mut self, comparison: Comparison) {
        let id = self.next_label_id();
        let if_label = format!("{}{}", IF_LABEL_PREFIX, id);
        let end_label = format!("{}{}", END_IF_LABEL_PREFIX, id);
        log::trace!("comparison {:?} uses labels {}/{}", comparison, if_label, end_label);

        self.emit_combine("D-M", true);
        self.emit_all([
            AsmLine::at(if_label.clone()),
            AsmLine::jump("D", comparison.jump_mnemonic()),
            // false
            AsmLine::assign("D", "0"),
            AsmLine::at(end_label.clone()),
            AsmLine::jump("0", "JMP"),
            AsmLine::label(if_label),
            // true
            AsmLine::assign("D", "-1"),
            AsmLine::label(end_label),
        ]);
        self.emit_push();
    }
}
