//! Alarm model
//!
//! An alarm is a weekly recurring medication reminder: a time of day,
//! the weekdays it applies to, a dose count, and a short display name.

pub mod store;

pub use store::{AlarmStore, MAX_ALARMS};

use heapless::String;

use crate::clock::Weekday;

/// Maximum visible characters in an alarm name
pub const MAX_NAME_LEN: usize = 11;

/// Bounded alarm name
pub type AlarmName = String<MAX_NAME_LEN>;

/// Alarm store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Store already holds the maximum number of alarms
    CapacityExceeded,
    /// A field is out of range
    InvalidField,
    /// Index does not refer to a stored alarm
    IndexOutOfRange,
}

/// Days-of-week mask, bit n = clock weekday n (bit 0 = Sunday)
///
/// Bit 7 has no weekday and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaysMask(u8);

impl DaysMask {
    /// Every weekday
    pub const ALL: DaysMask = DaysMask(0x7F);

    /// Create a mask; an empty mask is rejected
    pub fn new(bits: u8) -> Option<Self> {
        (bits != 0).then_some(Self(bits))
    }

    /// Raw mask bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `day` is selected
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.mask_bit() != 0
    }
}

/// A configured alarm
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alarm {
    pub hour: u8,
    pub minute: u8,
    pub days: DaysMask,
    pub doses: u8,
    pub active: bool,
    pub name: AlarmName,
}

impl Alarm {
    /// Validate fields and build an active alarm
    ///
    /// Names longer than [`MAX_NAME_LEN`] are truncated.
    pub fn new(
        hour: u8,
        minute: u8,
        days_mask: u8,
        doses: u8,
        name: &str,
    ) -> Result<Self, AlarmError> {
        if hour > 23 || minute > 59 || doses == 0 {
            return Err(AlarmError::InvalidField);
        }
        let days = DaysMask::new(days_mask).ok_or(AlarmError::InvalidField)?;

        Ok(Self {
            hour,
            minute,
            days,
            doses,
            active: true,
            name: normalize_name(name),
        })
    }

    /// Whether this alarm belongs to the schedule for `day`
    pub fn is_due_on(&self, day: Weekday) -> bool {
        self.active && self.days.contains(day)
    }
}

/// Truncate free text to an [`AlarmName`] on a character boundary
pub fn normalize_name(name: &str) -> AlarmName {
    let mut out = AlarmName::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_fields() {
        assert!(Alarm::new(23, 59, 1, 1, "A").is_ok());
        assert_eq!(Alarm::new(24, 0, 1, 1, "A"), Err(AlarmError::InvalidField));
        assert_eq!(Alarm::new(0, 60, 1, 1, "A"), Err(AlarmError::InvalidField));
        assert_eq!(Alarm::new(0, 0, 0, 1, "A"), Err(AlarmError::InvalidField));
        assert_eq!(Alarm::new(0, 0, 1, 0, "A"), Err(AlarmError::InvalidField));
    }

    #[test]
    fn test_name_truncated() {
        let alarm = Alarm::new(8, 0, 0x7F, 1, "PARACETAMOL 500MG").unwrap();
        assert_eq!(alarm.name.as_str(), "PARACETAMOL");
        assert!(alarm.active);
    }

    #[test]
    fn test_name_truncation_respects_char_boundary() {
        // 10 ASCII + a 2-byte char does not fit in 11 bytes
        let name = normalize_name("ABCDEFGHIJé");
        assert_eq!(name.as_str(), "ABCDEFGHIJ");
    }

    #[test]
    fn test_days_mask() {
        let mask = DaysMask::new(0b0000_0011).unwrap();
        assert!(mask.contains(Weekday::Sunday));
        assert!(mask.contains(Weekday::Monday));
        assert!(!mask.contains(Weekday::Tuesday));

        // Bit 7 alone selects no weekday
        let odd = DaysMask::new(0x80).unwrap();
        assert!(Weekday::ALL.iter().all(|&d| !odd.contains(d)));
    }
}
