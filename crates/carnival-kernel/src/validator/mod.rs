//! Document validation for Carnival sources.
//!
//! The validator is a pure function from document text to findings. It runs
//! three independent checks and always runs all of them:
//!
//! - **Meta presence**: `meta.name`, `meta.version` and `meta.author` must
//!   appear somewhere in the text (substring match, comments included).
//! - **Register range**: every whole-word register token (`r0`..`r99`, any
//!   case) anywhere in the text must be within r0-r15.
//! - **Instruction lines**: each line's mnemonic must be in the catalog, with
//!   the right number of operands of acceptable kinds.
//!
//! Findings come back in that order: meta (name, version, author), then
//! registers by position, then lines in order.
//!
//! # Example
//!
//! ```
//! use carnival_kernel::catalog::Catalog;
//! use carnival_kernel::validator::Validator;
//!
//! let validator = Validator::new(Catalog::global());
//! let findings = validator.validate("meta.name 'x'\nMOV 5\n");
//! assert!(findings.iter().any(|f| f.message.contains("expects 2 argument(s), got 1")));
//! ```

mod lines;
mod meta;
mod registers;

use carnival_types::Finding;

use crate::catalog::Catalog;

/// Validates documents against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c Catalog,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new(Catalog::global())
    }
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Run every check over `text`.
    pub fn validate(&self, text: &str) -> Vec<Finding> {
        let mut findings = self.check_meta(text);
        findings.extend(self.check_registers(text));
        findings.extend(self.check_lines(text));
        tracing::debug!(
            bytes = text.len(),
            findings = findings.len(),
            "validated document"
        );
        findings
    }

    /// Info findings for each missing meta declaration.
    pub fn check_meta(&self, text: &str) -> Vec<Finding> {
        meta::check(text)
    }

    /// Error findings for out-of-range registers anywhere in the text.
    pub fn check_registers(&self, text: &str) -> Vec<Finding> {
        registers::check(text)
    }

    /// Per-line mnemonic, arity and operand findings.
    pub fn check_lines(&self, text: &str) -> Vec<Finding> {
        lines::check(self.catalog, text)
    }
}

/// Validate `text` against the built-in catalog.
pub fn validate(text: &str) -> Vec<Finding> {
    Validator::default().validate(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnival_types::{IssueCode, MetaKey, Severity};

    const HEADER: &str = "meta.name 'Demo'\nmeta.version '1.0'\nmeta.author 'Ada'\n";

    #[test]
    fn clean_document_has_no_findings() {
        let text = format!("{HEADER}MOV r1 5\nADD r1 r2 r3\nHALT\n");
        assert!(validate(&text).is_empty());
    }

    #[test]
    fn checks_report_in_order() {
        let text = "FOO r1\nMOV 5 r20\n";
        let codes: Vec<_> = validate(text).into_iter().filter_map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::MissingMeta(MetaKey::Name),
                IssueCode::MissingMeta(MetaKey::Version),
                IssueCode::MissingMeta(MetaKey::Author),
                IssueCode::RegisterOutOfRange,
                IssueCode::UnknownInstruction,
            ]
        );
    }

    #[test]
    fn out_of_range_register_is_not_an_operand_error() {
        let text = format!("{HEADER}NOT r99 5\n");
        let findings = validate(&text);
        // The operand finding is for `5` in NOT's register-only slot, not r99.
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].code, Some(IssueCode::RegisterOutOfRange));
        assert_eq!(findings[1].code, Some(IssueCode::InvalidOperand));
        assert!(findings[1].message.contains("`5`"));
    }

    #[test]
    fn out_of_range_register_in_valid_slot_is_only_reported_once() {
        let text = format!("{HEADER}MOV 5 r99\n");
        let findings = validate(&text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, Some(IssueCode::RegisterOutOfRange));
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn validation_is_deterministic() {
        let text = "MOV 5\nADD r1 r2 99\nr77\nFOO\n";
        assert_eq!(validate(text), validate(text));
    }
}
