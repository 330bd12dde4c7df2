//! Line tokenizer.
//!
//! A token is either a single-quoted span (which may contain whitespace) or a
//! run of non-whitespace characters. At any position a quoted span is tried
//! first, so `'a b'c` yields `'a b'` and `c`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']*'|\S+").expect("token pattern is valid"));

/// A token and where it sits in the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineToken<'a> {
    pub text: &'a str,
    /// Byte range within the line.
    pub range: Range<usize>,
}

/// Split a line into tokens, in order.
pub fn tokenize_line(line: &str) -> Vec<LineToken<'_>> {
    TOKEN
        .find_iter(line)
        .map(|m| LineToken {
            text: m.as_str(),
            range: m.range(),
        })
        .collect()
}
