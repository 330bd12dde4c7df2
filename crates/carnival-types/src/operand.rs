//! Operand kinds accepted by instruction slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lexical category an operand token can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    /// `r`/`R` followed by one or two decimal digits.
    Register,
    /// One or more decimal digits. No sign, no hex.
    Number,
    /// Starts with `.`, a letter or `_`, then word characters or dots.
    Label,
    /// Single-quoted text, may contain whitespace.
    StringLiteral,
}

impl OperandKind {
    /// All kinds, in declaration order.
    pub const ALL: [OperandKind; 4] = [
        OperandKind::Register,
        OperandKind::Number,
        OperandKind::Label,
        OperandKind::StringLiteral,
    ];

    /// Name used in human-readable messages.
    pub fn name(self) -> &'static str {
        match self {
            OperandKind::Register => "Register",
            OperandKind::Number => "Number",
            OperandKind::Label => "Label",
            OperandKind::StringLiteral => "String",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
