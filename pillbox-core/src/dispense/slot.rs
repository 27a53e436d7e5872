//! Tray slot addressing
//!
//! The tray has 14 compartments plus the neutral slot 0. Compartments are
//! laid out Monday first, two per day, with the evening compartment before
//! the morning one:
//!
//! ```text
//! slot = 1 + monday_ordinal * 2 + (0 if hour >= 12 else 1)
//! ```

use crate::clock::Weekday;

/// A dispensing compartment (1..=14)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot(u8);

impl Slot {
    /// First compartment
    pub const FIRST: Slot = Slot(1);
    /// Last compartment
    pub const LAST: Slot = Slot(14);

    /// Create a slot from its index
    pub fn new(index: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&index)
            .then_some(Self(index))
    }

    /// Compartment for a weekday and hour of day
    pub fn for_time(weekday: Weekday, hour: u8) -> Self {
        let offset: i16 = if hour >= 12 { 0 } else { 1 };
        let raw = 1 + weekday.monday_ordinal() as i16 * 2 + offset;
        Self(raw.clamp(Self::FIRST.0 as i16, Self::LAST.0 as i16) as u8)
    }

    /// Slot index
    pub fn index(self) -> u8 {
        self.0
    }

    /// Absolute steps from the neutral slot
    ///
    /// Saturates at `u32::MAX`; validated configs stay below
    /// [`MAX_STEPS_PER_SLOT`](crate::config::MAX_STEPS_PER_SLOT).
    pub fn steps(self, steps_per_slot: u32) -> u32 {
        (self.0 as u32).saturating_mul(steps_per_slot)
    }

    /// Whether this is a morning compartment
    pub fn is_morning(self) -> bool {
        (self.0 - 1) % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_monday_morning() {
        let slot = Slot::for_time(Weekday::Monday, 8);
        assert_eq!(slot.index(), 2);
        assert!(slot.is_morning());
    }

    #[test]
    fn test_sunday_evening() {
        let slot = Slot::for_time(Weekday::Sunday, 20);
        assert_eq!(slot.index(), 13);
        assert!(!slot.is_morning());
    }

    #[test]
    fn test_noon_is_evening_compartment() {
        assert_eq!(Slot::for_time(Weekday::Monday, 12).index(), 1);
        assert_eq!(Slot::for_time(Weekday::Monday, 11).index(), 2);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(Slot::for_time(Weekday::Monday, 23), Slot::FIRST);
        assert_eq!(Slot::for_time(Weekday::Sunday, 0), Slot::LAST);
    }

    #[test]
    fn test_steps() {
        assert_eq!(Slot::for_time(Weekday::Monday, 8).steps(2048), 4096);
        assert_eq!(Slot::LAST.steps(2048), 28_672);
        assert_eq!(
            Slot::LAST.steps(crate::config::MAX_STEPS_PER_SLOT),
            crate::config::MAX_STEPS_PER_SLOT * 14
        );
        assert_eq!(Slot::LAST.steps(400_000_000), u32::MAX);
    }

    #[test]
    fn test_new_bounds() {
        assert_eq!(Slot::new(0), None);
        assert_eq!(Slot::new(15), None);
        assert_eq!(Slot::new(7).map(Slot::index), Some(7));
    }

    proptest! {
        #[test]
        fn prop_slot_in_range(day in 0u8..7, hour in 0u8..=23) {
            let weekday = Weekday::from_index(day).unwrap();
            let slot = Slot::for_time(weekday, hour);
            prop_assert!(slot >= Slot::FIRST && slot <= Slot::LAST);
            prop_assert_eq!(slot.is_morning(), hour < 12);
            prop_assert_eq!((slot.index() - 1) / 2, weekday.monday_ordinal());
        }
    }
}
