//! Guarded clock reads
//!
//! The RTC occasionally returns garbage (bus glitch mid-transfer, oscillator
//! halted). Every reading is range-checked; a bad one is retried once after
//! a short delay before the clock is reported unavailable.

use super::{CalendarTime, ClockError};
use crate::traits::ClockSource;

/// Validating wrapper around a [`ClockSource`]
pub struct ClockGuard<C> {
    source: C,
    available: bool,
}

impl<C: ClockSource> ClockGuard<C> {
    /// Wrap a clock source
    ///
    /// The clock counts as available until a read says otherwise.
    pub fn new(source: C) -> Self {
        Self {
            source,
            available: true,
        }
    }

    /// Read the clock, retrying once on an implausible or failed reading
    ///
    /// `retry_delay` runs between the two attempts.
    pub fn read(&mut self, mut retry_delay: impl FnMut()) -> Result<CalendarTime, ClockError> {
        let reading = match self.try_read() {
            Some(time) => Some(time),
            None => {
                retry_delay();
                self.try_read()
            }
        };

        self.available = reading.is_some();
        reading.ok_or(ClockError::Unavailable)
    }

    /// Set the clock
    ///
    /// The value must pass the same plausibility check as a reading.
    pub fn set(&mut self, time: &CalendarTime) -> Result<(), ClockError> {
        if !time.in_range() {
            return Err(ClockError::InvalidTime);
        }
        self.source
            .set(time)
            .map_err(|_| ClockError::Unavailable)?;
        self.available = true;
        Ok(())
    }

    /// Whether the last read produced a valid time
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Access the wrapped source (chip-specific checks)
    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    fn try_read(&mut self) -> Option<CalendarTime> {
        self.source.now().ok().filter(CalendarTime::in_range)
    }
}
