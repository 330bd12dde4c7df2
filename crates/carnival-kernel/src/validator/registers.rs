//! Register range scan.
//!
//! Runs over the raw text, independent of line structure, so a register-shaped
//! word is checked wherever it appears: operands, comments, strings.

use std::sync::LazyLock;

use carnival_types::{Finding, IssueCode, Span};
use regex::Regex;

use crate::operand::{MAX_REGISTER, register_number};
use crate::text::{LineIndex, to_u32};

// ASCII word boundaries: `é` next to `r20` does not join it into a word.
#[allow(clippy::expect_used)]
static REGISTER_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)r[0-9]{1,2}(?-u:\b)").expect("register scan pattern is valid")
});

pub(super) fn check(text: &str) -> Vec<Finding> {
    let mut index: Option<LineIndex> = None;
    let mut findings = Vec::new();

    for whole in REGISTER_WORD.find_iter(text) {
        match register_number(whole.as_str()) {
            Some(number) if number > MAX_REGISTER => {}
            _ => continue,
        }

        let index = index.get_or_insert_with(|| LineIndex::new(text));
        let (line, start) = index.position(whole.start());
        let end = start + to_u32(whole.len());
        findings.push(Finding::new(
            IssueCode::RegisterOutOfRange,
            format!(
                "Register `{}` is out of range (valid registers are r0-r{MAX_REGISTER})",
                whole.as_str()
            ),
            Span::new(line, start, end),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::r16("r16")]
    #[case::upper("R99")]
    #[case::padded("r20")]
    fn out_of_range_registers_are_flagged(#[case] token: &str) {
        let text = format!("MOV 1 {token}");
        let findings = check(&text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(0, 6, 6 + token.len() as u32));
        assert!(findings[0].message.contains(token));
    }

    #[rstest]
    #[case::zero("r0")]
    #[case::fifteen("R15")]
    #[case::leading_zero("r07")]
    fn in_range_registers_pass(#[case] token: &str) {
        assert!(check(&format!("# {token} in a comment\nPUSH {token}")).is_empty());
    }

    #[test]
    fn only_whole_words_are_scanned() {
        assert!(check("r100 xr20 r20x r1_9").is_empty());
    }

    #[rstest]
    #[case::accent_before("OUT 'ér20'", 7)]
    #[case::accent_after("PUSH r20é", 5)]
    #[case::cjk_before("# 寄r31", 5)]
    fn non_ascii_neighbours_do_not_hide_registers(#[case] text: &str, #[case] start: u32) {
        let findings = check(text);
        assert_eq!(findings.len(), 1, "{findings:?}");
        assert_eq!(findings[0].span, Span::new(0, start, start + 3));
    }

    #[test]
    fn scans_comments_and_strings_too() {
        let text = "HALT\n# uses r31\nOUT 'r40'\n";
        let findings = check(text);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].span, Span::new(1, 7, 10));
        assert_eq!(findings[1].span, Span::new(2, 5, 8));
    }
}
