//! Today's alarms

use heapless::Vec;

use crate::alarm::{Alarm, AlarmStore};
use crate::clock::Weekday;

/// Maximum number of alarms scheduled for one day
pub const MAX_ACTIVE: usize = 14;

/// An alarm materialized for today
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveAlarm {
    pub alarm: Alarm,
    /// Already fired during the current minute
    pub triggered: bool,
}

/// The subset of configured alarms due today
#[derive(Debug, Clone, Default)]
pub struct DailySchedule {
    entries: Vec<ActiveAlarm, MAX_ACTIVE>,
    day: Option<Weekday>,
}

impl DailySchedule {
    /// Create an empty schedule that has never been built
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            day: None,
        }
    }

    /// Rebuild from the store for `today`
    ///
    /// Every triggered flag is reset. Alarms beyond [`MAX_ACTIVE`] are
    /// dropped; the number dropped is returned.
    pub fn rebuild(&mut self, store: &AlarmStore, today: Weekday) -> usize {
        let mut entries = Vec::new();
        let mut dropped = 0;

        for alarm in store.iter().filter(|a| a.is_due_on(today)) {
            let entry = ActiveAlarm {
                alarm: alarm.clone(),
                triggered: false,
            };
            if entries.push(entry).is_err() {
                dropped += 1;
            }
        }

        // Swap in one step so readers never see a half-built list
        self.entries = entries;
        self.day = Some(today);
        dropped
    }

    /// Forget the last rebuilt day so the next tick rebuilds
    pub fn invalidate(&mut self) {
        self.day = None;
    }

    /// Weekday of the last rebuild
    pub fn day(&self) -> Option<Weekday> {
        self.day
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveAlarm> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActiveAlarm> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rebuild_filters_by_weekday() {
        let mut store = AlarmStore::new();
        store.add(8, 0, Weekday::Monday.mask_bit(), 1, "MON").unwrap();
        store.add(9, 0, Weekday::Tuesday.mask_bit(), 1, "TUE").unwrap();
        store.add(10, 0, 0x7F, 1, "DAILY").unwrap();

        let mut schedule = DailySchedule::new();
        assert_eq!(schedule.rebuild(&store, Weekday::Monday), 0);
        let names: std::vec::Vec<_> = schedule.iter().map(|e| e.alarm.name.as_str()).collect();
        assert_eq!(names, ["MON", "DAILY"]);
        assert_eq!(schedule.day(), Some(Weekday::Monday));
    }

    #[test]
    fn test_rebuild_resets_triggered() {
        let mut store = AlarmStore::new();
        store.add(8, 0, 0x7F, 1, "A").unwrap();
        let mut schedule = DailySchedule::new();
        schedule.rebuild(&store, Weekday::Friday);
        schedule.iter_mut().for_each(|e| e.triggered = true);

        schedule.rebuild(&store, Weekday::Friday);
        assert!(schedule.iter().all(|e| !e.triggered));
    }

    #[test]
    fn test_clear_then_rebuild_is_empty() {
        let mut store = AlarmStore::new();
        store.add(8, 0, 0x7F, 1, "A").unwrap();
        store.add(20, 0, 0x7F, 1, "B").unwrap();
        let mut schedule = DailySchedule::new();
        schedule.rebuild(&store, Weekday::Sunday);
        assert_eq!(schedule.len(), 2);

        store.clear();
        schedule.rebuild(&store, Weekday::Sunday);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let mut schedule = DailySchedule::new();
        schedule.rebuild(&AlarmStore::new(), Weekday::Sunday);
        schedule.invalidate();
        assert_eq!(schedule.day(), None);
    }

    proptest! {
        #[test]
        fn prop_added_alarm_scheduled_iff_day_selected(
            hour in 0u8..=23,
            minute in 0u8..=59,
            mask in 1u8..=255,
            doses in 1u8..=255,
            name in "[A-Z ]{0,20}",
            day in 0u8..7,
        ) {
            let today = Weekday::from_index(day).unwrap();
            let mut store = AlarmStore::new();
            store.add(hour, minute, mask, doses, &name).unwrap();

            let mut schedule = DailySchedule::new();
            schedule.rebuild(&store, today);

            if mask & today.mask_bit() != 0 {
                prop_assert_eq!(schedule.len(), 1);
                let entry = schedule.iter().next().unwrap();
                prop_assert_eq!(&entry.alarm, store.get(0).unwrap());
                prop_assert_eq!(entry.alarm.hour, hour);
                prop_assert_eq!(entry.alarm.minute, minute);
                prop_assert_eq!(entry.alarm.doses, doses);
                prop_assert!(!entry.triggered);
            } else {
                prop_assert!(schedule.is_empty());
            }
        }

        #[test]
        fn prop_rebuild_count_matches_filter(
            masks in proptest::collection::vec(1u8..=127, 0..=7),
            day in 0u8..7,
        ) {
            let today = Weekday::from_index(day).unwrap();
            let mut store = AlarmStore::new();
            for mask in &masks {
                store.add(12, 0, *mask, 1, "X").unwrap();
            }

            let mut schedule = DailySchedule::new();
            let dropped = schedule.rebuild(&store, today);
            let expected = masks.iter().filter(|m| *m & today.mask_bit() != 0).count();
            prop_assert_eq!(schedule.len(), expected.min(MAX_ACTIVE));
            prop_assert_eq!(dropped, 0);
        }
    }
}
