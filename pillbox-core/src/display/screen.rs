//! 16x2 character screen

use heapless::String;

/// Characters per row
pub const COLUMNS: usize = 16;

/// Rows per screen
pub const ROWS: usize = 2;

/// One full-width row
pub type Row = String<COLUMNS>;

/// Contents of the whole screen, every row padded to [`COLUMNS`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Screen {
    rows: [Row; ROWS],
}

impl Screen {
    /// Build a screen; text is truncated or space-padded to the row width
    pub fn new(top: &str, bottom: &str) -> Self {
        Self {
            rows: [pad_row(top), pad_row(bottom)],
        }
    }

    pub fn rows(&self) -> &[Row; ROWS] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(|r| r.as_str())
    }
}

/// Truncate or pad `text` to exactly [`COLUMNS`] characters
///
/// Non-ASCII characters are replaced with `?`; the panel only has an
/// ASCII character ROM.
pub fn pad_row(text: &str) -> Row {
    let mut row = Row::new();
    for c in text.chars().take(COLUMNS) {
        let c = if c.is_ascii() && !c.is_ascii_control() { c } else { '?' };
        let _ = row.push(c);
    }
    while row.push(' ').is_ok() {}
    row
}
