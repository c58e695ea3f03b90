// VM Source Parser
// Normalizes source lines and classifies each one into a Command

use crate::vm_translator::asm;
use crate::vm_translator::command::{ArithmeticOp, Command, Instruction, Segment};
use crate::vm_translator::error::{SourcePosition, TranslatorError};

/// Strip an inline `//` comment and surrounding whitespace.
/// Returns `None` for lines with nothing left to translate.
pub fn normalize_line(line: &str) -> Option<&str> {
    let code = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };
    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

pub struct Parser<'a> {
    unit: &'a str,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(unit: &'a str, source: &'a str) -> Self {
        Parser { unit, source }
    }

    /// Classify every non-empty line in order. The first malformed line aborts parsing.
    pub fn parse(&self) -> Result<Vec<Instruction>, TranslatorError> {
        let mut instructions = Vec::new();

        for (idx, raw) in self.source.lines().enumerate() {
            let Some(text) = normalize_line(raw) else {
                continue;
            };
            let position = SourcePosition::new(self.unit, idx + 1);
            let command = match parse_command(text, &position) {
                Ok(command) => command,
                Err(err) => {
                    log::error!("{}", err);
                    return Err(err);
                }
            };
            log::debug!("{}: {:?} <- '{}'", position, command, text);
            instructions.push(Instruction {
                command,
                position,
                text: text.to_string(),
            });
        }

        log::info!(
            "Parsed unit '{}': {} instructions",
            self.unit,
            instructions.len()
        );
        Ok(instructions)
    }
}

/// Classify one normalized line by its keyword, then check the token count for that keyword.
pub fn parse_command(text: &str, position: &SourcePosition) -> Result<Command, TranslatorError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((&keyword, operands)) = tokens.split_first() else {
        return Err(TranslatorError::UnknownCommand(String::new(), position.clone()));
    };

    let expect = |count: usize| -> Result<(), TranslatorError> {
        if operands.len() == count {
            Ok(())
        } else {
            Err(TranslatorError::WrongOperandCount(
                keyword.to_string(),
                count,
                operands.len(),
                position.clone(),
            ))
        }
    };

    if let Ok(op) = keyword.parse::<ArithmeticOp>() {
        expect(0)?;
        return Ok(Command::Arithmetic(op));
    }

    match keyword {
        "push" | "pop" => {
            expect(2)?;
            let segment = operands[0].parse::<Segment>().map_err(|_| {
                TranslatorError::UnknownSegment(operands[0].to_string(), position.clone())
            })?;
            let offset = parse_number(operands[1], position)?;
            if keyword == "push" {
                Ok(Command::Push(segment, offset))
            } else if segment == Segment::Constant {
                Err(TranslatorError::PopToConstant(position.clone()))
            } else {
                Ok(Command::Pop(segment, offset))
            }
        }
        "label" | "goto" | "if-goto" => {
            expect(1)?;
            let name = parse_symbol(operands[0], position)?;
            Ok(match keyword {
                "label" => Command::Label(name),
                "goto" => Command::Goto(name),
                _ => Command::IfGoto(name),
            })
        }
        "function" | "call" => {
            expect(2)?;
            let name = parse_symbol(operands[0], position)?;
            let count = parse_number(operands[1], position)?;
            Ok(if keyword == "function" {
                Command::Function {
                    name,
                    locals: count,
                }
            } else {
                Command::Call { name, args: count }
            })
        }
        "return" => {
            expect(0)?;
            Ok(Command::Return)
        }
        _ => Err(TranslatorError::UnknownCommand(
            keyword.to_string(),
            position.clone(),
        )),
    }
}

/// Decimal operand in the 15-bit range an address load can carry.
fn parse_number(token: &str, position: &SourcePosition) -> Result<u16, TranslatorError> {
    let invalid = || TranslatorError::InvalidNumber(token.to_string(), position.clone());
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    match token.parse::<u16>() {
        Ok(value) if value <= 0x7fff => Ok(value),
        _ => Err(invalid()),
    }
}

fn parse_symbol(token: &str, position: &SourcePosition) -> Result<String, TranslatorError> {
    if !asm::is_valid_symbol(token) {
        return Err(TranslatorError::InvalidLabel(
            token.to_string(),
            position.clone(),
        ));
    }
    if asm::is_reserved_name(token) {
        return Err(TranslatorError::ReservedLabel(
            token.to_string(),
            position.clone(),
        ));
    }
    Ok(token.to_string())
}
