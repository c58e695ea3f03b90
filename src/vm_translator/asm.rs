// Target Assembly Model
//
// Typed representation of the lines handed to the downstream assembler:
// address loads (@value), compute lines (dest=comp;jump), label declarations and comments.

use std::collections::HashMap;
use std::fmt;

lazy_static! {
    /// Symbols the downstream assembler binds before any user symbol.
    pub static ref PREDEFINED_SYMBOLS: HashMap<&'static str, u16> = {
        let mut symbols = HashMap::new();
        symbols.insert("SP", 0);
        symbols.insert("LCL", 1);
        symbols.insert("ARG", 2);
        symbols.insert("THIS", 3);
        symbols.insert("THAT", 4);
        for (register, name) in [
            "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8", "R9", "R10", "R11", "R12",
            "R13", "R14", "R15",
        ]
        .iter()
        .enumerate()
        {
            symbols.insert(*name, register as u16);
        }
        symbols.insert("SCREEN", 0x4000);
        symbols.insert("KBD", 0x6000);
        symbols
    };
}

/// Auxiliary cells. The first two hold pending values and computed addresses,
/// the last two hold the frame end and return address during `return`.
pub const AUX_CELLS: [&str; 4] = ["aux0", "aux1", "aux2", "aux3"];

/// Prefixes of the counter-generated comparison labels.
pub const IF_LABEL_PREFIX: &str = "IF.";
pub const END_IF_LABEL_PREFIX: &str = "END_IF.";

/// Infix separating a callee name from its return-address suffix.
pub const RETURN_LABEL_INFIX: &str = "$ret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmLine {
    /// `@value` - loads a number or symbol into the address register
    Address(String),
    /// `dest=comp;jump` with dest and jump optional
    Compute {
        dest: Option<&'static str>,
        comp: &'static str,
        jump: Option<&'static str>,
    },
    /// `(name)`
    Label(String),
    /// `// text`
    Comment(String),
}

impl AsmLine {
    pub fn at(value: impl Into<String>) -> Self {
        AsmLine::Address(value.into())
    }

    pub fn assign(dest: &'static str, comp: &'static str) -> Self {
        AsmLine::Compute {
            dest: Some(dest),
            comp,
            jump: None,
        }
    }

    pub fn jump(comp: &'static str, jump: &'static str) -> Self {
        AsmLine::Compute {
            dest: None,
            comp,
            jump: Some(jump),
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        AsmLine::Label(name.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        AsmLine::Comment(text.into())
    }
}

impl fmt::Display for AsmLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AsmLine::Address(value) => write!(f, "@{}", value),
            AsmLine::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            AsmLine::Label(name) => write!(f, "({})", name),
            AsmLine::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// Render lines as assembler input, one per line with a trailing newline.
pub fn render(lines: &[AsmLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

fn is_counter_label(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

/// True for names a translator-generated label could take.
pub fn is_synthetic_label(name: &str) -> bool {
    is_counter_label(name, IF_LABEL_PREFIX) || is_counter_label(name, END_IF_LABEL_PREFIX)
}

/// True for `<callee>$ret` and `<callee>$ret.<n>`.
pub fn is_return_label(name: &str) -> bool {
    match name.rfind(RETURN_LABEL_INFIX) {
        Some(idx) if idx > 0 => {
            let rest = &name[idx + RETURN_LABEL_INFIX.len()..];
            rest.is_empty() || is_counter_label(rest, ".")
        }
        _ => false,
    }
}

/// Names a user label may not take without colliding with generated code.
pub fn is_reserved_name(name: &str) -> bool {
    PREDEFINED_SYMBOLS.contains_key(name)
        || AUX_CELLS.contains(&name)
        || is_synthetic_label(name)
        || is_return_label(name)
}

/// Letters, digits, `_`, `.`, `$` and `:`, not starting with a digit.
pub fn is_valid_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_digit() && is_symbol_char(first) => {
            chars.all(is_symbol_char)
        }
        _ => false,
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}
