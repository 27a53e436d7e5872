//! Daily schedule and trigger matching
//!
//! The daily schedule is a disposable projection of the alarm store onto
//! the current weekday. The matcher polls it against clock readings and
//! reports alarms whose minute has come.

pub mod daily;
pub mod matcher;

pub use daily::{ActiveAlarm, DailySchedule, MAX_ACTIVE};
pub use matcher::{AlarmMatcher, TickOutcome};
