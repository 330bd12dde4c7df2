//! carnival-kernel: the core of the Carnival tooling.
//!
//! This crate provides:
//!
//! - **Catalog**: the fixed instruction set and each instruction's operand slots
//! - **Lexer**: splits a line into words and single-quoted strings
//! - **Validator**: meta, register-range and per-line instruction checks
//! - **Fixes**: corrective edits for missing meta declarations
//! - **Completion**: the instruction keyword list
//! - **Store**: per-document findings with replace-on-update semantics
//!
//! Everything here is synchronous and does no I/O. Hosts (the language server,
//! the CLI) own transport and rendering.

pub mod catalog;
pub mod completion;
pub mod fixes;
pub mod lexer;
pub mod operand;
pub mod store;
pub mod text;
pub mod validator;

pub use carnival_types::{
    Finding, IssueCode, IssueCodeParseError, MetaKey, OperandKind, Severity, Span,
};
pub use catalog::{Catalog, InstructionSignature, OperandSlot};
pub use store::{DocumentId, DocumentStore, Trigger};
pub use validator::{Validator, validate};
