/// codegen_functions.rs
/// Call/enter/return linkage.
///
/// Frame layout pushed by the caller, from the lowest cell:
///   return address, saved LCL, saved ARG, saved THIS, saved THAT
/// The callee's LCL points just past the frame, so saved pointer k sits at LCL - k
/// (THAT at LCL-1 through LCL at LCL-4) and the return address at LCL - 5.
use crate::vm_translator::asm::{AsmLine, AUX_CELLS, RETURN_LABEL_INFIX};
use crate::vm_translator::codegen::HackCodeGen;
use crate::vm_translator::command::ArithmeticOp;
use crate::vm_translator::config::ReturnLabelScheme;
use crate::vm_translator::error::TranslatorError;

/// Cells in a saved frame.
pub const FRAME_SIZE: u16 = 5;

/// Saved pointers in push order.
const SAVED_POINTERS: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

impl HackCodeGen {
    /// `function name nLocals`: entry label, then nLocals zeroed locals on the stack.
    pub fn emit_function(&mut self, name: &str, locals: u16) -> Result<(), TranslatorError> {
        self.declare_label(name)?;
        self.emit(AsmLine::label(name));

        // Depth is tracked per function body
        self.stack_depth = 0;
        for _ in 0..locals {
            self.emit_all([AsmLine::at("0"), AsmLine::assign("D", "A")]);
            self.emit_push();
        }
        Ok(())
    }

    /// `call name nArgs`. The nArgs arguments must already be on the stack.
    pub fn emit_call(&mut self, name: &str, args: u16) {
        let return_label = self.return_label(name);
        log::debug!("call {} with {} args returns to {}", name, args, return_label);

        // Save the caller's frame
        self.emit_all([AsmLine::at(return_label.clone()), AsmLine::assign("D", "A")]);
        self.emit_push();
        for pointer in SAVED_POINTERS {
            self.emit_all([AsmLine::at(pointer), AsmLine::assign("D", "M")]);
            self.emit_push();
        }

        // ARG = SP - 5 - nArgs, computed on the stack
        self.emit_all([AsmLine::at("SP"), AsmLine::assign("D", "M")]);
        self.emit_push();
        self.emit_all([AsmLine::at(FRAME_SIZE.to_string()), AsmLine::assign("D", "A")]);
        self.emit_push();
        self.emit_arithmetic(ArithmeticOp::Sub);
        self.emit_all([AsmLine::at(args.to_string()), AsmLine::assign("D", "A")]);
        self.emit_push();
        self.emit_arithmetic(ArithmeticOp::Sub);
        self.emit_pop();
        self.emit_all([AsmLine::at("ARG"), AsmLine::assign("M", "D")]);

        // LCL = SP
        self.emit_all([
            AsmLine::at("SP"),
            AsmLine::assign("D", "M"),
            AsmLine::at("LCL"),
            AsmLine::assign("M", "D"),
        ]);

        self.emit_goto(name);
        self.emit(AsmLine::label(return_label));

        // The callee's return drops the frame and the arguments and leaves one result
        self.adjust_stack_depth(1 - i64::from(FRAME_SIZE) - i64::from(args));
    }

    /// `return`: hand the top of stack to the caller and restore its frame.
    pub fn emit_return(&mut self) {
        let frame = AUX_CELLS[2];
        let return_address = AUX_CELLS[3];

        // frame = LCL
        self.emit_all([
            AsmLine::at("LCL"),
            AsmLine::assign("D", "M"),
            AsmLine::at(frame),
            AsmLine::assign("M", "D"),
        ]);

        // Read the return address before argument 0 is overwritten;
        // with no arguments they are the same cell.
        self.emit_load_from_frame(FRAME_SIZE);
        self.emit_all([AsmLine::at(return_address), AsmLine::assign("M", "D")]);

        // argument 0 = return value
        self.emit_pop();
        self.emit_indirect_write("ARG", 0);

        // SP = ARG + 1
        self.emit_all([
            AsmLine::at("ARG"),
            AsmLine::assign("D", "M+1"),
            AsmLine::at("SP"),
            AsmLine::assign("M", "D"),
        ]);

        // THAT, THIS, ARG, LCL from frame-1 .. frame-4. LCL goes last; the frame end
        // was captured from its original value.
        for (distance, pointer) in SAVED_POINTERS.iter().rev().enumerate() {
            self.emit_load_from_frame(distance as u16 + 1);
            self.emit_all([AsmLine::at(*pointer), AsmLine::assign("M", "D")]);
        }

        self.emit_all([
            AsmLine::at(return_address),
            AsmLine::assign("A", "M"),
            AsmLine::jump("0", "JMP"),
        ]);

        // Nothing after a return is reachable by falling through
        self.stack_depth = 0;
    }

    /// D = *(frame - distance)
    fn emit_load_from_frame(&mut self, distance: u16) {
        self.emit_all([
            AsmLine::at(AUX_CELLS[2]),
            AsmLine::assign("D", "M"),
            AsmLine::at(distance.to_string()),
            AsmLine::assign("A", "D-A"),
            AsmLine::assign("D", "M"),
        ]);
    }

    fn return_label(&mut self, callee: &str) -> String {
        let calls = {
            let count = self.call_sites.entry(callee.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        match self.config.return_labels {
            ReturnLabelScheme::PerCallSite => {
                let id = self.next_label_id();
                format!("{}{}.{}", callee, RETURN_LABEL_INFIX, id)
            }
            ReturnLabelScheme::PerCallee => {
                if calls > 1 {
                    log::warn!(
                        "{}: '{}' is called from {} sites; per-callee return label '{}{}' is declared more than once",
                        self.position,
                        callee,
                        calls,
                        callee,
                        RETURN_LABEL_INFIX
                    );
                }
                format!("{}{}", callee, RETURN_LABEL_INFIX)
            }
        }
    }
}
