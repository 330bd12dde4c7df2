//! Kernel types to `lsp-types`.
//!
//! Findings carry byte columns; LSP positions are UTF-16 code units, so every
//! span is translated against the document text it came from.

use std::collections::HashMap;

use carnival_kernel::completion::{CompletionSuggestion, SuggestionKind};
use carnival_kernel::fixes::QuickFix;
use carnival_kernel::text::{LineIndex, utf16_col};
use carnival_kernel::{Finding, Severity, Span};
use lsp_types::{
    CodeAction, CodeActionKind, CompletionItem, CompletionItemKind, Diagnostic,
    DiagnosticSeverity, NumberOrString, Position, Range, TextEdit, Uri, WorkspaceEdit,
};

pub fn severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    }
}

/// Translate a byte-column span within `text` to an LSP range.
pub fn range(text: &str, index: &LineIndex, span: Span) -> Range {
    let line = index.line_text(text, span.line).unwrap_or_default();
    Range::new(
        Position::new(span.line, utf16_col(line, span.start)),
        Position::new(span.line, utf16_col(line, span.end)),
    )
}

/// All findings of one document as diagnostics.
pub fn diagnostics(text: &str, findings: &[Finding], source: &str) -> Vec<Diagnostic> {
    let index = LineIndex::new(text);
    findings
        .iter()
        .map(|finding| Diagnostic {
            range: range(text, &index, finding.span),
            severity: Some(severity(finding.severity)),
            code: finding
                .code
                .map(|code| NumberOrString::String(code.as_str().to_string())),
            source: Some(source.to_string()),
            message: finding.message.clone(),
            ..Default::default()
        })
        .collect()
}

/// The diagnostic's code, if it is a string.
pub fn diagnostic_code(diagnostic: &Diagnostic) -> Option<&str> {
    match diagnostic.code.as_ref()? {
        NumberOrString::String(code) => Some(code),
        NumberOrString::Number(_) => None,
    }
}

/// A quickfix code action applying `fix` to `uri`.
pub fn code_action(uri: &Uri, fix: QuickFix, diagnostic: Diagnostic) -> CodeAction {
    // Insertions always land at column zero, where bytes and UTF-16 agree.
    let at = Position::new(fix.insertion.line, fix.insertion.col);
    let edit = TextEdit::new(Range::new(at, at), fix.insertion.text);
    CodeAction {
        title: fix.title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic]),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn completion_item(suggestion: CompletionSuggestion) -> CompletionItem {
    let kind = match suggestion.kind {
        SuggestionKind::Keyword => CompletionItemKind::KEYWORD,
    };
    CompletionItem {
        label: suggestion.label,
        kind: Some(kind),
        detail: Some(suggestion.detail.to_string()),
        ..Default::default()
    }
}
