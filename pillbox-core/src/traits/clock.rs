//! Real-time clock source trait

use crate::clock::CalendarTime;

/// A raw calendar clock (battery-backed RTC chip)
///
/// Readings are returned as-is; plausibility checks live in
/// [`ClockGuard`](crate::clock::ClockGuard).
pub trait ClockSource {
    /// Bus or device error
    type Error;

    /// Read the current wall-clock time
    fn now(&mut self) -> Result<CalendarTime, Self::Error>;

    /// Set the wall-clock time
    fn set(&mut self, time: &CalendarTime) -> Result<(), Self::Error>;
}
