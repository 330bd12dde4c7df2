//! Findings: the structured diagnostics produced by validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The line (or document) is wrong.
    Error,
    /// Something is missing but the document is still usable.
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A range on a single line of a document.
///
/// `line` is zero-based. `start` and `end` are byte columns within that line,
/// end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }

    /// An empty span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, col)
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A required document-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKey {
    Name,
    Version,
    Author,
}

impl MetaKey {
    /// Every meta key, in the order findings are reported.
    pub const ALL: [MetaKey; 3] = [MetaKey::Name, MetaKey::Version, MetaKey::Author];

    /// The bare key name (`name`, `version`, `author`).
    pub fn as_str(self) -> &'static str {
        match self {
            MetaKey::Name => "name",
            MetaKey::Version => "version",
            MetaKey::Author => "author",
        }
    }

    /// The declaration keyword as written in a document (`meta.name`, ...).
    pub fn declaration(self) -> &'static str {
        match self {
            MetaKey::Name => "meta.name",
            MetaKey::Version => "meta.version",
            MetaKey::Author => "meta.author",
        }
    }

    /// Value inserted by the quick fix when nothing else is configured.
    pub fn default_value(self) -> &'static str {
        match self {
            MetaKey::Name => "Program",
            MetaKey::Version => "0.1",
            MetaKey::Author => "Me",
        }
    }

    /// Match a token against the declaration keywords.
    pub fn from_declaration(token: &str) -> Option<MetaKey> {
        MetaKey::ALL.into_iter().find(|k| k.declaration() == token)
    }
}

/// Stable identifier for a class of finding.
///
/// The string form is what hosts see (for example as an LSP diagnostic code)
/// and what they hand back when asking for a corrective edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum IssueCode {
    MissingMeta(MetaKey),
    RegisterOutOfRange,
    UnknownInstruction,
    ArityMismatch,
    InvalidOperand,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::MissingMeta(MetaKey::Name) => "missing_meta.name",
            IssueCode::MissingMeta(MetaKey::Version) => "missing_meta.version",
            IssueCode::MissingMeta(MetaKey::Author) => "missing_meta.author",
            IssueCode::RegisterOutOfRange => "register_out_of_range",
            IssueCode::UnknownInstruction => "unknown_instruction",
            IssueCode::ArityMismatch => "arity_mismatch",
            IssueCode::InvalidOperand => "invalid_operand",
        }
    }

    /// Severity every finding with this code carries.
    pub fn default_severity(self) -> Severity {
        match self {
            IssueCode::MissingMeta(_) => Severity::Info,
            IssueCode::RegisterOutOfRange
            | IssueCode::UnknownInstruction
            | IssueCode::ArityMismatch
            | IssueCode::InvalidOperand => Severity::Error,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known issue code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown issue code: {0}")]
pub struct IssueCodeParseError(pub String);

impl FromStr for IssueCode {
    type Err = IssueCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(key) = s.strip_prefix("missing_meta.") {
            return MetaKey::ALL
                .into_iter()
                .find(|k| k.as_str() == key)
                .map(IssueCode::MissingMeta)
                .ok_or_else(|| IssueCodeParseError(s.to_string()));
        }
        match s {
            "register_out_of_range" => Ok(IssueCode::RegisterOutOfRange),
            "unknown_instruction" => Ok(IssueCode::UnknownInstruction),
            "arity_mismatch" => Ok(IssueCode::ArityMismatch),
            "invalid_operand" => Ok(IssueCode::InvalidOperand),
            _ => Err(IssueCodeParseError(s.to_string())),
        }
    }
}

impl From<IssueCode> for String {
    fn from(code: IssueCode) -> Self {
        code.as_str().to_string()
    }
}

impl TryFrom<String> for IssueCode {
    type Error = IssueCodeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single diagnostic produced by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<IssueCode>,
    pub message: String,
    pub span: Span,
}

impl Finding {
    /// A finding whose severity follows from its code.
    pub fn new(code: IssueCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: code.default_severity(),
            code: Some(code),
            message: message.into(),
            span,
        }
    }

    /// The meta key this finding reports as missing, if any.
    pub fn missing_meta(&self) -> Option<MetaKey> {
        match self.code {
            Some(IssueCode::MissingMeta(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.span.line + 1,
            self.span.start + 1,
            self.severity,
            self.message
        )
    }
}
