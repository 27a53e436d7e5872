//! DS1307 real-time clock driver
//!
//! Battery-backed RTC on I2C address 0x68. Time registers 0x00-0x06 hold
//! BCD seconds, minutes, hours, day-of-week, date, month and year.
//! Bit 7 of the seconds register is the clock-halt (CH) flag: when set the
//! oscillator is stopped, typically after a backup battery loss.

use embedded_hal::i2c::I2c;
use pillbox_core::clock::{weekday_for_date, CalendarTime, MIN_YEAR};
use pillbox_core::traits::ClockSource;

/// Fixed I2C address
pub const DS1307_ADDRESS: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const CLOCK_HALT: u8 = 0x80;
const HOUR_12H_MODE: u8 = 0x40;
const HOUR_PM: u8 = 0x20;

/// DS1307 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ds1307Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Time cannot be represented by the chip
    InvalidTime,
}

/// DS1307 driver
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Whether the oscillator is running (clock-halt bit clear)
    pub fn is_running(&mut self) -> Result<bool, Ds1307Error<I2C::Error>> {
        let mut seconds = [0u8; 1];
        self.i2c
            .write_read(DS1307_ADDRESS, &[REG_SECONDS], &mut seconds)
            .map_err(Ds1307Error::Bus)?;
        Ok(seconds[0] & CLOCK_HALT == 0)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ClockSource for Ds1307<I2C> {
    type Error = Ds1307Error<I2C::Error>;

    /// Read the time registers
    ///
    /// Values are decoded as-is; an unprogrammed or glitched chip can return
    /// out-of-range fields, which callers are expected to check. The weekday
    /// is derived from the date rather than trusted from the chip.
    fn now(&mut self) -> Result<CalendarTime, Self::Error> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(DS1307_ADDRESS, &[REG_SECONDS], &mut regs)
            .map_err(Ds1307Error::Bus)?;

        let second = bcd_to_bin(regs[0] & 0x7F);
        let minute = bcd_to_bin(regs[1] & 0x7F);
        let hour = decode_hour(regs[2]);
        let day = bcd_to_bin(regs[4] & 0x3F);
        let month = bcd_to_bin(regs[5] & 0x1F);
        let year = MIN_YEAR + bcd_to_bin(regs[6]) as u16;

        Ok(CalendarTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday: weekday_for_date(year, month, day),
        })
    }

    /// Write all time registers; this also clears the clock-halt bit
    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error> {
        if !time.in_range() {
            return Err(Ds1307Error::InvalidTime);
        }

        let frame = [
            REG_SECONDS,
            bin_to_bcd(time.second),
            bin_to_bcd(time.minute),
            bin_to_bcd(time.hour),
            time.weekday.index() + 1,
            bin_to_bcd(time.day),
            bin_to_bcd(time.month),
            bin_to_bcd((time.year - MIN_YEAR) as u8),
        ];
        self.i2c
            .write(DS1307_ADDRESS, &frame)
            .map_err(Ds1307Error::Bus)
    }
}

fn decode_hour(reg: u8) -> u8 {
    if reg & HOUR_12H_MODE != 0 {
        let hour12 = bcd_to_bin(reg & 0x1F) % 12;
        if reg & HOUR_PM != 0 {
            hour12 + 12
        } else {
            hour12
        }
    } else {
        bcd_to_bin(reg & 0x3F)
    }
}

fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
