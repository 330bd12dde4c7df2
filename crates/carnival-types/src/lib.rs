//! carnival-types: pure data types shared by the Carnival tooling crates.
//!
//! Nothing in here knows how to validate a document. These are the shapes
//! that flow between the kernel (which produces findings), the language
//! server (which publishes them) and the CLI (which renders them).

mod finding;
mod operand;

pub use finding::{Finding, IssueCode, IssueCodeParseError, MetaKey, Severity, Span};
pub use operand::OperandKind;
