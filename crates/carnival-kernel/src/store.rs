//! Per-document findings, keyed by document identity.
//!
//! Hosts call one of three entry points when a document is opened, saved or
//! changed. Each call re-validates the full text and replaces whatever was
//! stored for that document; findings from an earlier run never survive.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use carnival_types::Finding;

use crate::catalog::Catalog;
use crate::validator::Validator;

/// Opaque identity of a document, as the host names it (usually a URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// What made the host ask for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Open,
    Save,
    Change,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Open => "open",
            Trigger::Save => "save",
            Trigger::Change => "change",
        }
    }
}

#[derive(Debug, Clone)]
struct DocumentState {
    text: String,
    findings: Vec<Finding>,
}

/// Latest text and findings for every open document.
#[derive(Debug)]
pub struct DocumentStore<'c> {
    validator: Validator<'c>,
    documents: HashMap<DocumentId, DocumentState>,
}

impl Default for DocumentStore<'static> {
    fn default() -> Self {
        Self::new(Catalog::global())
    }
}

impl<'c> DocumentStore<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            validator: Validator::new(catalog),
            documents: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.validator.catalog()
    }

    /// A document was opened with `text`.
    pub fn did_open(&mut self, id: DocumentId, text: String) -> &[Finding] {
        self.replace(id, text, Trigger::Open)
    }

    /// A document was saved.
    ///
    /// Hosts that do not send the saved text pass `None`; the last known text
    /// is validated again.
    pub fn did_save(&mut self, id: DocumentId, text: Option<String>) -> &[Finding] {
        let text = match text {
            Some(text) => text,
            None => self.text(&id).map(str::to_string).unwrap_or_default(),
        };
        self.replace(id, text, Trigger::Save)
    }

    /// The full text of a document changed.
    pub fn did_change(&mut self, id: DocumentId, text: String) -> &[Finding] {
        self.replace(id, text, Trigger::Change)
    }

    /// Forget a document. Returns whether it was known.
    pub fn close(&mut self, id: &DocumentId) -> bool {
        self.documents.remove(id).is_some()
    }

    pub fn findings(&self, id: &DocumentId) -> Option<&[Finding]> {
        self.documents.get(id).map(|doc| doc.findings.as_slice())
    }

    pub fn text(&self, id: &DocumentId) -> Option<&str> {
        self.documents.get(id).map(|doc| doc.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn replace(&mut self, id: DocumentId, text: String, trigger: Trigger) -> &[Finding] {
        let findings = self.validator.validate(&text);
        tracing::debug!(
            document = %id,
            trigger = trigger.as_str(),
            findings = findings.len(),
            "replacing findings"
        );
        let state = DocumentState { text, findings };
        let doc = match self.documents.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(state);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(state),
        };
        &doc.findings
    }
}
