//! Fixed-capacity alarm store
//!
//! Alarms are index-addressed and kept in insertion order. Entries are
//! never edited in place: add, delete and clear are the only writers.

use heapless::Vec;

use super::{Alarm, AlarmError};

/// Maximum number of configured alarms
pub const MAX_ALARMS: usize = 7;

/// Owner of the configured alarms
#[derive(Debug, Clone, Default)]
pub struct AlarmStore {
    alarms: Vec<Alarm, MAX_ALARMS>,
}

impl AlarmStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self { alarms: Vec::new() }
    }

    /// Validate and append an alarm
    pub fn add(
        &mut self,
        hour: u8,
        minute: u8,
        days_mask: u8,
        doses: u8,
        name: &str,
    ) -> Result<(), AlarmError> {
        if self.alarms.is_full() {
            return Err(AlarmError::CapacityExceeded);
        }
        let alarm = Alarm::new(hour, minute, days_mask, doses, name)?;
        self.alarms
            .push(alarm)
            .map_err(|_| AlarmError::CapacityExceeded)
    }

    /// Remove the alarm at `index`, shifting later entries down
    pub fn delete(&mut self, index: usize) -> Result<Alarm, AlarmError> {
        if index >= self.alarms.len() {
            return Err(AlarmError::IndexOutOfRange);
        }
        Ok(self.alarms.remove(index))
    }

    /// Remove every alarm
    pub fn clear(&mut self) {
        self.alarms.clear();
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.alarms.is_full()
    }

    pub fn get(&self, index: usize) -> Option<&Alarm> {
        self.alarms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_with(names: &[&str]) -> AlarmStore {
        let mut store = AlarmStore::new();
        for (i, name) in names.iter().enumerate() {
            store.add(8, i as u8, 0x7F, 1, name).unwrap();
        }
        store
    }

    fn names(store: &AlarmStore) -> std::vec::Vec<std::string::String> {
        store.iter().map(|a| a.name.as_str().into()).collect()
    }

    #[test]
    fn test_add_appends_in_order() {
        let store = store_with(&["A", "B", "C"]);
        assert_eq!(names(&store), ["A", "B", "C"]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut store = store_with(&["1", "2", "3", "4", "5", "6", "7"]);
        assert!(store.is_full());
        assert_eq!(
            store.add(9, 0, 1, 1, "EIGHT"),
            Err(AlarmError::CapacityExceeded)
        );
        assert_eq!(store.len(), MAX_ALARMS);
    }

    #[test]
    fn test_capacity_checked_before_fields() {
        let mut store = store_with(&["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(
            store.add(99, 0, 0, 0, "BAD"),
            Err(AlarmError::CapacityExceeded)
        );
    }

    #[test]
    fn test_invalid_add_leaves_store_unchanged() {
        let mut store = store_with(&["A"]);
        assert_eq!(store.add(8, 0, 0, 1, "B"), Err(AlarmError::InvalidField));
        assert_eq!(names(&store), ["A"]);
    }

    #[test]
    fn test_delete_shifts_down() {
        let mut store = store_with(&["A", "B", "C", "D"]);
        let removed = store.delete(1).unwrap();
        assert_eq!(removed.name.as_str(), "B");
        assert_eq!(names(&store), ["A", "C", "D"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut store = store_with(&["A", "B"]);
        assert_eq!(store.delete(2), Err(AlarmError::IndexOutOfRange));
        assert_eq!(names(&store), ["A", "B"]);
        assert_eq!(
            AlarmStore::new().delete(0),
            Err(AlarmError::IndexOutOfRange)
        );
    }

    #[test]
    fn test_clear() {
        let mut store = store_with(&["A", "B"]);
        store.clear();
        assert!(store.is_empty());
    }

    proptest! {
        #[test]
        fn prop_delete_preserves_order(count in 1usize..=MAX_ALARMS, pick in 0usize..MAX_ALARMS) {
            let all = ["A", "B", "C", "D", "E", "F", "G"];
            let mut store = store_with(&all[..count]);
            let before = names(&store);

            if pick < count {
                store.delete(pick).unwrap();
                let mut expected = before.clone();
                expected.remove(pick);
                prop_assert_eq!(names(&store), expected);
                prop_assert_eq!(store.len(), count - 1);
            } else {
                prop_assert_eq!(store.delete(pick), Err(AlarmError::IndexOutOfRange));
                prop_assert_eq!(names(&store), before);
            }
        }
    }
}
