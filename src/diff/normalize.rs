//! Line splitting and whitespace-insensitive comparison keys.

/// An ordered sequence of lines split from a text blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    /// Splits a blob on `\n`, dropping one trailing `\r` per line.
    ///
    /// Every blob has at least one line; `""` splits into one empty line.
    #[must_use]
    pub fn split(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
            .collect();
        Self { lines }
    }

    /// Lines in input order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the source holds no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true when no line carries a printable character.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

/// A display line paired with the key used to compare it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    key: String,
    display: String,
}

impl NormalizedLine {
    /// Builds the comparison key for one display line.
    #[must_use]
    pub fn new(display: impl Into<String>) -> Self {
        let display_text = display.into();
        let key = if display_text.trim().is_empty() {
            String::new()
        } else {
            display_text.clone()
        };
        Self {
            key,
            display: display_text,
        }
    }

    /// Comparison key: empty for whitespace-only lines, otherwise the text.
    ///
    /// This is also the text shown in rendered rows.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The line exactly as it was split from the source.
    #[must_use]
    pub const fn display(&self) -> &str {
        self.display.as_str()
    }

    /// Returns true for empty and whitespace-only lines.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.key.is_empty()
    }
}

/// Maps each display line to its [`NormalizedLine`].
#[must_use]
pub fn normalize_lines(lines: &[String]) -> Vec<NormalizedLine> {
    lines.iter().map(NormalizedLine::new).collect()
}
