//! Per-line instruction validation.

use carnival_types::{Finding, IssueCode, MetaKey, OperandKind, Span};

use crate::catalog::{Catalog, InstructionSignature, OperandSlot};
use crate::lexer::{LineToken, tokenize_line};
use crate::operand;
use crate::text::to_u32;

/// Comment marker at the start of a line.
const COMMENT: char = '#';
/// Directive and label lines start with a dot.
const DIRECTIVE: char = '.';

pub(super) fn check(catalog: &Catalog, text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        check_line(catalog, to_u32(line_no), line, &mut findings);
    }
    findings
}

fn check_line(catalog: &Catalog, line_no: u32, line: &str, findings: &mut Vec<Finding>) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }
    let indent = line.len() - line.trim_start().len();
    let line_span = Span::new(line_no, to_u32(indent), to_u32(indent + trimmed.len()));

    let tokens = tokenize_line(trimmed);
    let Some((head, operands)) = tokens.split_first() else {
        return;
    };

    let mnemonic = head.text.to_uppercase();
    let Some(signature) = catalog.lookup(&mnemonic) else {
        if !is_non_instruction(head.text) {
            let span = Span::new(
                line_no,
                to_u32(indent + head.range.start),
                to_u32(indent + head.range.end),
            );
            findings.push(Finding::new(
                IssueCode::UnknownInstruction,
                format!("Unrecognized instruction `{mnemonic}`"),
                span,
            ));
        }
        return;
    };

    if operands.len() != signature.arity() {
        findings.push(Finding::new(
            IssueCode::ArityMismatch,
            format!(
                "{mnemonic} expects {} argument(s), got {}",
                signature.arity(),
                operands.len()
            ),
            line_span,
        ));
        return;
    }

    check_operands(&mnemonic, signature, operands, line_span, findings);
}

fn check_operands(
    mnemonic: &str,
    signature: &InstructionSignature,
    operands: &[LineToken<'_>],
    line_span: Span,
    findings: &mut Vec<Finding>,
) {
    for (position, (slot, token)) in signature.slots().iter().zip(operands).enumerate() {
        if slot_accepts(slot, token.text) {
            continue;
        }
        findings.push(Finding::new(
            IssueCode::InvalidOperand,
            format!(
                "{mnemonic} operand {} `{}` is invalid: expected {}",
                position + 1,
                token.text,
                describe_kinds(slot.kinds())
            ),
            line_span,
        ));
    }
}

fn slot_accepts(slot: &OperandSlot, token: &str) -> bool {
    slot.kinds().iter().any(|&kind| operand::matches(kind, token))
}

fn describe_kinds(kinds: &[OperandKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Lines that are allowed to start with something other than a mnemonic.
fn is_non_instruction(first: &str) -> bool {
    first.starts_with(COMMENT)
        || first.starts_with(DIRECTIVE)
        || MetaKey::from_declaration(first).is_some()
}
