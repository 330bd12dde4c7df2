//! Line/column bookkeeping.
//!
//! Findings carry byte columns. Editors speaking LSP want UTF-16 columns, so
//! hosts convert through here.

/// Byte offsets of the start of every line in a text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Zero-based (line, byte column) of a byte offset.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (to_u32(line), to_u32(col))
    }

    /// Byte offset where `line` starts.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// The text of `line`, without its line terminator.
    pub fn line_text<'t>(&self, text: &'t str, line: u32) -> Option<&'t str> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map_or(text.len(), |next| next - 1);
        let raw = text.get(start..end)?;
        Some(raw.strip_suffix('\r').unwrap_or(raw))
    }
}

/// Convert a byte column within `line` to a UTF-16 column.
///
/// Columns past the end of the line, or inside a character, clamp to the
/// nearest preceding character boundary.
pub fn utf16_col(line: &str, byte_col: u32) -> u32 {
    let mut col = (byte_col as usize).min(line.len());
    while !line.is_char_boundary(col) {
        col -= 1;
    }
    to_u32(line[..col].encode_utf16().count())
}

pub(crate) fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
