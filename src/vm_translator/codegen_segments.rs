/// codegen_segments.rs
/// Resolution of the eight memory segments to read/write sequences.
///
/// `read` leaves the segment value in D. `write` stores the value already in D.
/// The target only has D and A live at once, so resolving `base + offset` while a value is
/// pending in D goes through two auxiliary cells: aux0 parks the value, aux1 holds the
/// computed address while the value is reloaded and stored through it.
use crate::vm_translator::asm::{AsmLine, AUX_CELLS};
use crate::vm_translator::codegen::HackCodeGen;
use crate::vm_translator::command::Segment;
use crate::vm_translator::error::TranslatorError;

/// Cells in the temp segment, addressed with offsets 1..=TEMP_SEGMENT_SIZE.
pub const TEMP_SEGMENT_SIZE: u16 = 8;

impl HackCodeGen {
    /// `push segment offset`
    pub fn emit_push_command(&mut self, segment: Segment, offset: u16) -> Result<(), TranslatorError> {
        self.emit_segment_read(segment, offset)?;
        self.emit_push();
        Ok(())
    }

    /// `pop segment offset`
    pub fn emit_pop_command(&mut self, segment: Segment, offset: u16) -> Result<(), TranslatorError> {
        // Range-check before anything is emitted for this line
        self.check_segment_offset(segment, offset)?;
        self.emit_pop();
        self.emit_segment_write(segment, offset)
    }

    pub fn emit_segment_read(&mut self, segment: Segment, offset: u16) -> Result<(), TranslatorError> {
        match segment {
            Segment::Local => self.emit_indirect_read("LCL", offset),
            Segment::Argument => self.emit_indirect_read("ARG", offset),
            Segment::This => self.emit_indirect_read("THIS", offset),
            Segment::That => self.emit_indirect_read("THAT", offset),
            Segment::Constant => {
                self.emit_all([AsmLine::at(offset.to_string()), AsmLine::assign("D", "A")]);
            }
            Segment::Static => {
                let symbol = self.static_symbol(offset);
                self.emit_all([AsmLine::at(symbol), AsmLine::assign("D", "M")]);
            }
            Segment::Temp => {
                let address = self.temp_address(offset)?;
                self.emit_all([AsmLine::at(address.to_string()), AsmLine::assign("D", "M")]);
            }
            Segment::Pointer => {
                let symbol = self.pointer_symbol(offset)?;
                self.emit_all([AsmLine::at(symbol), AsmLine::assign("D", "M")]);
            }
        }
        Ok(())
    }

    pub fn emit_segment_write(&mut self, segment: Segment, offset: u16) -> Result<(), TranslatorError> {
        match segment {
            Segment::Local => self.emit_indirect_write("LCL", offset),
            Segment::Argument => self.emit_indirect_write("ARG", offset),
            Segment::This => self.emit_indirect_write("THIS", offset),
            Segment::That => self.emit_indirect_write("THAT", offset),
            Segment::Constant => {
                return Err(TranslatorError::PopToConstant(self.position.clone()));
            }
            Segment::Static => {
                let symbol = self.static_symbol(offset);
                self.emit_all([AsmLine::at(symbol), AsmLine::assign("M", "D")]);
            }
            Segment::Temp => {
                let address = self.temp_address(offset)?;
                self.emit_all([AsmLine::at(address.to_string()), AsmLine::assign("M", "D")]);
            }
            Segment::Pointer => {
                let symbol = self.pointer_symbol(offset)?;
                self.emit_all([AsmLine::at(symbol), AsmLine::assign("M", "D")]);
            }
        }
        Ok(())
    }

    /// D = *(*base + offset), through aux0.
    fn emit_indirect_read(&mut self, base: &'static str, offset: u16) {
        self.emit_resolve_address(base, offset);
        self.emit_all([
            AsmLine::at(AUX_CELLS[0]),
            AsmLine::assign("M", "D"),
            AsmLine::at(AUX_CELLS[0]),
            AsmLine::assign("A", "M"),
            AsmLine::assign("D", "M"),
        ]);
    }

    /// *(*base + offset) = D, parking D in aux0 and the address in aux1.
    pub(crate) fn emit_indirect_write(&mut self, base: &'static str, offset: u16) {
        self.emit_all([AsmLine::at(AUX_CELLS[0]), AsmLine::assign("M", "D")]);
        self.emit_resolve_address(base, offset);
        self.emit_all([
            AsmLine::at(AUX_CELLS[1]),
            AsmLine::assign("M", "D"),
            AsmLine::at(AUX_CELLS[0]),
            AsmLine::assign("D", "M"),
            AsmLine::at(AUX_CELLS[1]),
            AsmLine::assign("A", "M"),
            AsmLine::assign("M", "D"),
        ]);
    }

    /// D = base cell value + offset
    fn emit_resolve_address(&mut self, base: &'static str, offset: u16) {
        self.emit_all([
            AsmLine::at(offset.to_string()),
            AsmLine::assign("D", "A"),
            AsmLine::at(base),
            AsmLine::assign("D", "D+M"),
        ]);
    }

    fn check_segment_offset(&self, segment: Segment, offset: u16) -> Result<(), TranslatorError> {
        match segment {
            Segment::Temp => self.temp_address(offset).map(|_| ()),
            Segment::Pointer => self.pointer_symbol(offset).map(|_| ()),
            Segment::Constant => Err(TranslatorError::PopToConstant(self.position.clone())),
            _ => Ok(()),
        }
    }

    /// `<unit>.<offset>`, so equal offsets in different units stay distinct.
    pub(crate) fn static_symbol(&self, offset: u16) -> String {
        format!("{}.{}", self.unit, offset)
    }

    /// Temp offsets are 1-based: offset 1 is the cell after the configured base.
    pub(crate) fn temp_address(&self, offset: u16) -> Result<u16, TranslatorError> {
        let address = if (1..=TEMP_SEGMENT_SIZE).contains(&offset) {
            self.config.temp_base.checked_add(offset)
        } else {
            None
        };
        address.ok_or_else(|| {
            TranslatorError::OffsetOutOfRange(
                Segment::Temp.to_string(),
                offset,
                self.position.clone(),
            )
        })
    }

    pub(crate) fn pointer_symbol(&self, offset: u16) -> Result<&'static str, TranslatorError> {
        match offset {
            0 => Ok("THIS"),
            1 => Ok("THAT"),
            _ => Err(TranslatorError::OffsetOutOfRange(
                Segment::Pointer.to_string(),
                offset,
                self.position.clone(),
            )),
        }
    }
}
