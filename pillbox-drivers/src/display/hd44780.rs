//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack exposes the LCD in 4-bit mode. PCF8574 pin mapping:
//!
//! | Bit | Signal |
//! |---|---|
//! | P0 | RS |
//! | P1 | RW (held low) |
//! | P2 | EN |
//! | P3 | Backlight |
//! | P4-P7 | D4-D7 |
//!
//! Each byte is sent as two nibbles, high first, each latched by an EN pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use pillbox_core::display::{COLUMNS, ROWS};
use pillbox_core::traits::TextDisplay;

/// Usual address of PCF8574 backpacks (A0-A2 pulled high)
pub const PCF8574_DEFAULT_ADDRESS: u8 = 0x27;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_DDRAM: u8 = 0x80;

const ENTRY_INCREMENT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_TWO_LINES: u8 = 0x08;

/// DDRAM start address of each row
const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

/// LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Row index beyond the panel
    InvalidRow,
}

/// HD44780 driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
}

impl<I2C: I2c, D: DelayNs> Hd44780<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
        }
    }

    /// Run the 4-bit initialization sequence and clear the panel
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        // Power-on settle time
        self.delay.delay_ms(50);
        self.write_expander(self.backlight_bit())?;

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_SET | FUNCTION_TWO_LINES)?;
        self.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE | ENTRY_INCREMENT)
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError<I2C::Error>> {
        self.backlight = on;
        self.write_expander(self.backlight_bit())
    }

    /// Move the cursor
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), LcdError<I2C::Error>> {
        let offset = ROW_OFFSETS
            .get(row as usize)
            .ok_or(LcdError::InvalidRow)?;
        self.command(CMD_SET_DDRAM | (offset + col.min(COLUMNS as u8 - 1)))
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(value, 0)
    }

    fn data(&mut self, value: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(value, RS)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble((value << 4) & 0xF0, mode)
    }

    /// Present a nibble on D4-D7 and pulse EN
    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), LcdError<I2C::Error>> {
        let bits = nibble | mode | self.backlight_bit();
        self.write_expander(bits | EN)?;
        self.delay.delay_us(1);
        self.write_expander(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_expander(&mut self, bits: u8) -> Result<(), LcdError<I2C::Error>> {
        self.i2c.write(self.address, &[bits]).map_err(LcdError::Bus)
    }

    fn backlight_bit(&self) -> u8 {
        if self.backlight {
            BACKLIGHT
        } else {
            0
        }
    }
}

impl<I2C: I2c, D: DelayNs> TextDisplay for Hd44780<I2C, D> {
    type Error = LcdError<I2C::Error>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.command(CMD_CLEAR)?;
        // Clear is the one slow instruction
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Write up to one row of text; characters outside printable ASCII
    /// are shown as `?`
    fn write_row(&mut self, row: u8, text: &str) -> Result<(), Self::Error> {
        self.set_cursor(row, 0)?;
        for c in text.chars().take(COLUMNS) {
            let byte = if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                b'?'
            };
            self.data(byte)?;
        }
        Ok(())
    }
}
