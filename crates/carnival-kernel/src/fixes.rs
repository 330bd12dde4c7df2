//! Corrective edits for findings.
//!
//! Only missing meta declarations have a fix: insert `meta.<key> '<value>'`
//! and a line break at the very start of the document.

use carnival_types::{Finding, IssueCode, MetaKey};
use serde::{Deserialize, Serialize};

/// Values inserted for missing meta declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaDefaults {
    pub name: String,
    pub version: String,
    pub author: String,
}

impl Default for MetaDefaults {
    fn default() -> Self {
        Self {
            name: MetaKey::Name.default_value().to_string(),
            version: MetaKey::Version.default_value().to_string(),
            author: MetaKey::Author.default_value().to_string(),
        }
    }
}

impl MetaDefaults {
    pub fn value_for(&self, key: MetaKey) -> &str {
        match key {
            MetaKey::Name => &self.name,
            MetaKey::Version => &self.version,
            MetaKey::Author => &self.author,
        }
    }
}

/// Text to insert at a zero-based line and byte column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInsertion {
    pub line: u32,
    pub col: u32,
    pub text: String,
}

/// A titled corrective edit for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFix {
    pub title: String,
    pub key: MetaKey,
    pub insertion: TextInsertion,
}

/// The fix for a missing meta key.
pub fn meta_fix(key: MetaKey, defaults: &MetaDefaults) -> QuickFix {
    let declaration = format!("{} '{}'", key.declaration(), defaults.value_for(key));
    QuickFix {
        title: format!("Add {declaration}"),
        key,
        insertion: TextInsertion {
            line: 0,
            col: 0,
            text: format!("{declaration}\n"),
        },
    }
}

/// The fix for `finding`, if its code has one.
pub fn quick_fix(finding: &Finding, defaults: &MetaDefaults) -> Option<QuickFix> {
    finding.missing_meta().map(|key| meta_fix(key, defaults))
}

/// The fix for a bare code string, as hosts hand them back.
pub fn quick_fix_for_code(code: &str, defaults: &MetaDefaults) -> Option<QuickFix> {
    match code.parse::<IssueCode>().ok()? {
        IssueCode::MissingMeta(key) => Some(meta_fix(key, defaults)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnival_types::Span;
    use rstest::rstest;

    #[rstest]
    #[case::name(MetaKey::Name, "meta.name 'Program'\n")]
    #[case::version(MetaKey::Version, "meta.version '0.1'\n")]
    #[case::author(MetaKey::Author, "meta.author 'Me'\n")]
    fn default_insertions(#[case] key: MetaKey, #[case] expected: &str) {
        let fix = meta_fix(key, &MetaDefaults::default());
        assert_eq!(fix.insertion.text, expected);
        assert_eq!((fix.insertion.line, fix.insertion.col), (0, 0));
    }

    #[test]
    fn configured_defaults_are_used() {
        let defaults = MetaDefaults {
            author: "Grace".to_string(),
            ..MetaDefaults::default()
        };
        let fix = meta_fix(MetaKey::Author, &defaults);
        assert_eq!(fix.title, "Add meta.author 'Grace'");
    }

    #[test]
    fn only_missing_meta_findings_have_fixes() {
        let defaults = MetaDefaults::default();
        let meta = Finding::new(
            IssueCode::MissingMeta(MetaKey::Version),
            "missing",
            Span::point(0, 0),
        );
        let arity = Finding::new(IssueCode::ArityMismatch, "bad", Span::new(3, 0, 5));
        assert_eq!(quick_fix(&meta, &defaults).map(|f| f.key), Some(MetaKey::Version));
        assert!(quick_fix(&arity, &defaults).is_none());
    }

    #[test]
    fn fixes_by_code_string() {
        let defaults = MetaDefaults::default();
        assert!(quick_fix_for_code("missing_meta.name", &defaults).is_some());
        assert!(quick_fix_for_code("invalid_operand", &defaults).is_none());
        assert!(quick_fix_for_code("garbage", &defaults).is_none());
    }

    #[test]
    fn applying_a_fix_clears_its_finding() {
        let text = "meta.version '1'\nmeta.author 'x'\nHALT\n";
        let findings = crate::validator::validate(text);
        assert_eq!(findings.len(), 1);
        let fix = quick_fix(&findings[0], &MetaDefaults::default()).expect("fixable");
        let fixed = format!("{}{text}", fix.insertion.text);
        assert!(crate::validator::validate(&fixed).is_empty());
    }
}
