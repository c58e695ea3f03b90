// VM Command Model
// Closed sum types for everything the input language can express

use std::fmt;
use std::str::FromStr;

use crate::vm_translator::error::SourcePosition;

/// The eight named memory regions a VM program addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
    Static,
    Temp,
    Pointer,
    Constant,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Local,
        Segment::Argument,
        Segment::This,
        Segment::That,
        Segment::Static,
        Segment::Temp,
        Segment::Pointer,
        Segment::Constant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Static => "static",
            Segment::Temp => "temp",
            Segment::Pointer => "pointer",
            Segment::Constant => "constant",
        }
    }
}

impl FromStr for Segment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .iter()
            .copied()
            .find(|segment| segment.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sign condition a comparison branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Greater,
    Less,
}

impl Comparison {
    pub fn jump_mnemonic(&self) -> &'static str {
        match self {
            Comparison::Equal => "JEQ",
            Comparison::Greater => "JGT",
            Comparison::Less => "JLT",
        }
    }
}

/// The nine zero-operand arithmetic/logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 9] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Neg,
        ArithmeticOp::Eq,
        ArithmeticOp::Gt,
        ArithmeticOp::Lt,
        ArithmeticOp::And,
        ArithmeticOp::Or,
        ArithmeticOp::Not,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }

    /// Stack operands consumed; every operator produces exactly one result.
    pub fn operand_count(&self) -> usize {
        match self {
            ArithmeticOp::Neg | ArithmeticOp::Not => 1,
            _ => 2,
        }
    }
}

impl FromStr for ArithmeticOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArithmeticOp::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, locals: u16 },
    Call { name: String, args: u16 },
    Return,
}

/// Instruction category, used for logging and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Arithmetic,
    StackMemory,
    Branch,
    Function,
}

impl Command {
    pub fn category(&self) -> Category {
        match self {
            Command::Arithmetic(_) => Category::Arithmetic,
            Command::Push(..) | Command::Pop(..) => Category::StackMemory,
            Command::Label(_) | Command::Goto(_) | Command::IfGoto(_) => Category::Branch,
            Command::Function { .. } | Command::Call { .. } | Command::Return => {
                Category::Function
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Arithmetic(op) => write!(f, "{}", op.as_str()),
            Command::Push(segment, offset) => write!(f, "push {} {}", segment, offset),
            Command::Pop(segment, offset) => write!(f, "pop {} {}", segment, offset),
            Command::Label(name) => write!(f, "label {}", name),
            Command::Goto(name) => write!(f, "goto {}", name),
            Command::IfGoto(name) => write!(f, "if-goto {}", name),
            Command::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Command::Call { name, args } => write!(f, "call {} {}", name, args),
            Command::Return => write!(f, "return"),
        }
    }
}

/// One classified source line. Immutable once produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub command: Command,
    pub position: SourcePosition,
    /// The normalized source text, used for annotation comments.
    pub text: String,
}
