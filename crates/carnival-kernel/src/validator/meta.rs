//! Required meta declarations.
//!
//! This is a substring check over the whole document, not a parse: a key
//! mentioned in a comment or inside a string counts as present.

use carnival_types::{Finding, IssueCode, MetaKey, Span};

pub(super) fn check(text: &str) -> Vec<Finding> {
    MetaKey::ALL
        .into_iter()
        .filter(|key| !text.contains(key.declaration()))
        .map(|key| {
            Finding::new(
                IssueCode::MissingMeta(key),
                format!("Missing required `{}` declaration", key.declaration()),
                Span::point(0, 0),
            )
        })
        .collect()
}
