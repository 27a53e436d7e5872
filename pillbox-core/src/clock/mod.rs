//! Wall-clock handling
//!
//! Calendar validation plus the guarded reader that sits between the
//! scheduling logic and the raw clock chip.

pub mod calendar;
pub mod guard;

pub use calendar::{
    days_in_month, is_leap_year, weekday_for_date, CalendarTime, Weekday, MAX_YEAR, MIN_YEAR,
};
pub use guard::ClockGuard;

/// Clock errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// No plausible reading could be obtained
    Unavailable,
    /// Calendar fields are out of range or inconsistent
    InvalidTime,
}
