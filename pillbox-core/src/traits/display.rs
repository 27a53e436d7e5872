//! Character display trait

use crate::display::Screen;

/// Trait for a fixed-geometry character display
///
/// Writers are expected to pass full-width rows so residual characters
/// from a longer previous write are overwritten; [`Screen`] rows always are.
pub trait TextDisplay {
    /// Bus or device error
    type Error;

    /// Clear the entire screen
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write text starting at column 0 of `row`
    fn write_row(&mut self, row: u8, text: &str) -> Result<(), Self::Error>;

    /// Write every row of a screen
    fn show(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        for (row, text) in screen.rows().iter().enumerate() {
            self.write_row(row as u8, text.as_str())?;
        }
        Ok(())
    }
}
