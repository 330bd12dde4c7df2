//! Instruction completions.
//!
//! Completions are context-free: the full catalog, lower-cased, every time.
//! Prefix filtering is left to the editor.

use serde::Serialize;

use crate::catalog::Catalog;

/// Detail text attached to every instruction suggestion.
pub const INSTRUCTION_DETAIL: &str = "Carnival instruction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionSuggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub detail: &'static str,
}

/// One keyword suggestion per catalog mnemonic, in catalog order.
pub fn completions(catalog: &Catalog) -> Vec<CompletionSuggestion> {
    catalog
        .mnemonics()
        .map(|mnemonic| CompletionSuggestion {
            label: mnemonic.to_lowercase(),
            kind: SuggestionKind::Keyword,
            detail: INSTRUCTION_DETAIL,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_lowercase_keyword_per_instruction() {
        let catalog = Catalog::global();
        let items = completions(catalog);
        assert_eq!(items.len(), catalog.len());
        assert_eq!(items[0].label, "mov");
        assert!(items.iter().all(|i| i.label == i.label.to_lowercase()));
        assert!(items.iter().all(|i| i.kind == SuggestionKind::Keyword));
        assert!(items.iter().all(|i| i.detail == "Carnival instruction"));
    }
}
