// Translator Error Handling

use std::fmt;

/// Where an input error was found: the unit (file stem) and the 1-based line in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub unit: String,
    pub line: usize,
}

impl SourcePosition {
    pub fn new(unit: &str, line: usize) -> Self {
        SourcePosition {
            unit: unit.to_string(),
            line,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.unit, self.line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranslatorError {
    // Shape errors
    WrongOperandCount(String, usize, usize, SourcePosition), // keyword, expected, found
    InvalidNumber(String, SourcePosition),
    InvalidLabel(String, SourcePosition),

    // Unknown keyword
    UnknownCommand(String, SourcePosition),

    // Segment errors
    UnknownSegment(String, SourcePosition),
    PopToConstant(SourcePosition),

    // Range violations
    OffsetOutOfRange(String, u16, SourcePosition), // segment, offset

    // Label namespace errors
    DuplicateLabel(String, SourcePosition, SourcePosition), // label, first declaration, redeclaration
    ReservedLabel(String, SourcePosition),

    // Ambient errors
    ConfigError(String),
    IOError(String),
}

impl TranslatorError {
    /// Position of the offending line, for input errors.
    pub fn position(&self) -> Option<&SourcePosition> {
        match self {
            TranslatorError::WrongOperandCount(_, _, _, pos)
            | TranslatorError::InvalidNumber(_, pos)
            | TranslatorError::InvalidLabel(_, pos)
            | TranslatorError::UnknownCommand(_, pos)
            | TranslatorError::UnknownSegment(_, pos)
            | TranslatorError::PopToConstant(pos)
            | TranslatorError::OffsetOutOfRange(_, _, pos)
            | TranslatorError::DuplicateLabel(_, _, pos)
            | TranslatorError::ReservedLabel(_, pos) => Some(pos),
            TranslatorError::ConfigError(_) | TranslatorError::IOError(_) => None,
        }
    }
}

impl fmt::Display for TranslatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranslatorError::WrongOperandCount(keyword, expected, found, pos) => {
                write!(
                    f,
                    "{}: '{}' takes {} operand(s), found {}",
                    pos, keyword, expected, found
                )
            }
            TranslatorError::InvalidNumber(token, pos) => {
                write!(f, "{}: '{}' is not a valid non-negative number", pos, token)
            }
            TranslatorError::InvalidLabel(label, pos) => {
                write!(f, "{}: '{}' is not a valid label name", pos, label)
            }
            TranslatorError::UnknownCommand(keyword, pos) => {
                write!(f, "{}: unknown command '{}'", pos, keyword)
            }
            TranslatorError::UnknownSegment(segment, pos) => {
                write!(f, "{}: unknown memory segment '{}'", pos, segment)
            }
            TranslatorError::PopToConstant(pos) => {
                write!(f, "{}: the constant segment cannot be popped into", pos)
            }
            TranslatorError::OffsetOutOfRange(segment, offset, pos) => {
                write!(
                    f,
                    "{}: offset {} is out of range for segment '{}'",
                    pos, offset, segment
                )
            }
            TranslatorError::DuplicateLabel(label, first, pos) => {
                write!(
                    f,
                    "{}: label '{}' already declared at {}",
                    pos, label, first
                )
            }
            TranslatorError::ReservedLabel(label, pos) => {
                write!(f, "{}: label '{}' uses a reserved name", pos, label)
            }
            TranslatorError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            TranslatorError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TranslatorError {}

impl From<std::io::Error> for TranslatorError {
    fn from(err: std::io::Error) -> Self {
        TranslatorError::IOError(err.to_string())
    }
}
