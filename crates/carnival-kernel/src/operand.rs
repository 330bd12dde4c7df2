//! Operand grammars.
//!
//! Each [`OperandKind`] has a whole-token pattern. A token may satisfy more
//! than one: `r1` is both a register and a label. Register matching here is
//! lexical only; the 0-15 range is the register scan's job.

use std::sync::LazyLock;

use carnival_types::OperandKind;
use regex::Regex;

/// Highest valid register number.
pub const MAX_REGISTER: u32 = 15;

struct Grammars {
    register: Regex,
    number: Regex,
    label: Regex,
    string: Regex,
}

#[allow(clippy::expect_used)]
static GRAMMARS: LazyLock<Grammars> = LazyLock::new(|| Grammars {
    register: Regex::new(r"^[rR][0-9]{1,2}$").expect("register pattern is valid"),
    number: Regex::new(r"^[0-9]+$").expect("number pattern is valid"),
    label: Regex::new(r"^[.A-Za-z_][A-Za-z0-9_.]*$").expect("label pattern is valid"),
    string: Regex::new(r"^'.*'$").expect("string pattern is valid"),
});

/// Does `token` have the shape of `kind`?
pub fn matches(kind: OperandKind, token: &str) -> bool {
    let grammars = &*GRAMMARS;
    match kind {
        OperandKind::Register => grammars.register.is_match(token),
        OperandKind::Number => grammars.number.is_match(token),
        OperandKind::Label => grammars.label.is_match(token),
        OperandKind::StringLiteral => grammars.string.is_match(token),
    }
}

/// The numeric part of a register-shaped token, if it is one.
pub fn register_number(token: &str) -> Option<u32> {
    if !matches(OperandKind::Register, token) {
        return None;
    }
    token[1..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use OperandKind::{Label, Number, Register, StringLiteral};

    fn kinds_of(token: &str) -> Vec<OperandKind> {
        OperandKind::ALL
            .into_iter()
            .filter(|&kind| matches(kind, token))
            .collect()
    }

    #[rstest]
    #[case::low_register("r0", &[Register, Label])]
    #[case::upper_register("R15", &[Register, Label])]
    #[case::out_of_range_register("r99", &[Register, Label])]
    #[case::three_digits("r100", &[Label])]
    #[case::number("42", &[Number])]
    #[case::negative("-1", &[])]
    #[case::hex("0x10", &[])]
    #[case::dotted_label(".loop", &[Label])]
    #[case::underscore_label("_start.inner", &[Label])]
    #[case::string("'hi there'", &[StringLiteral])]
    #[case::empty_string("''", &[StringLiteral])]
    #[case::lone_quote("'", &[])]
    #[case::non_ascii_digits("٣", &[])]
    fn classify_tokens(#[case] token: &str, #[case] expected: &[OperandKind]) {
        assert_eq!(kinds_of(token), expected);
    }

    #[test]
    fn register_range_is_separate_from_shape() {
        assert!(matches(Register, "r16"));
        assert_eq!(register_number("r16"), Some(16));
        assert_eq!(register_number("R07"), Some(7));
        assert_eq!(register_number("r09"), Some(9));
        assert_eq!(register_number("r100"), None);
        assert_eq!(register_number("x1"), None);
    }
}
