//! Minute-granularity trigger matching
//!
//! Each tick:
//! 1. Rebuild the daily schedule if the weekday changed
//! 2. Fire every untriggered alarm whose hour and minute match, provided the
//!    reading is within the first `fire_window_s` seconds of the minute
//! 3. Re-arm every alarm whose minute differs from the reading
//!
//! Steps 2 and 3 run per alarm in that order. The triggered latch, not the
//! window, guarantees at most one fire per minute.

use super::DailySchedule;
use crate::alarm::{Alarm, AlarmStore};
use crate::clock::CalendarTime;

/// Default firing window in seconds
pub const DEFAULT_FIRE_WINDOW_S: u8 = 5;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Schedule was rebuilt for a new weekday
    pub rebuilt: bool,
    /// Alarms fired on this tick
    pub fired: u8,
}

/// Polls the daily schedule against clock readings
#[derive(Debug, Clone)]
pub struct AlarmMatcher {
    schedule: DailySchedule,
    fire_window_s: u8,
}

impl Default for AlarmMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FIRE_WINDOW_S)
    }
}

impl AlarmMatcher {
    /// Create a matcher with an empty, never-built schedule
    pub const fn new(fire_window_s: u8) -> Self {
        Self {
            schedule: DailySchedule::new(),
            fire_window_s,
        }
    }

    /// Process one clock reading
    ///
    /// `on_fire` is called once for each alarm that fires.
    pub fn tick(
        &mut self,
        store: &AlarmStore,
        now: &CalendarTime,
        mut on_fire: impl FnMut(&Alarm),
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.schedule.day() != Some(now.weekday) {
            self.schedule.rebuild(store, now.weekday);
            outcome.rebuilt = true;
        }

        for entry in self.schedule.iter_mut() {
            let alarm = &entry.alarm;
            if alarm.hour == now.hour
                && alarm.minute == now.minute
                && now.second <= self.fire_window_s
                && !entry.triggered
            {
                entry.triggered = true;
                on_fire(&entry.alarm);
                outcome.fired = outcome.fired.saturating_add(1);
            }

            if entry.alarm.minute != now.minute {
                entry.triggered = false;
            }
        }

        outcome
    }

    /// Today's schedule
    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    /// Mutable access for rebuilds driven by store mutations
    pub fn schedule_mut(&mut self) -> &mut DailySchedule {
        &mut self.schedule
    }
}
