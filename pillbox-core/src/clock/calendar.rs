//! Calendar values as reported by the real-time clock

use super::ClockError;

/// Earliest year the clock can represent
pub const MIN_YEAR: u16 = 2000;

/// Latest year the clock can represent
pub const MAX_YEAR: u16 = 2099;

const SECONDS_PER_DAY: u64 = 86_400;

/// Day of the week, clock-native numbering (0 = Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// All weekdays in clock order
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Convert a clock-native index (0 = Sunday)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Clock-native index (0 = Sunday)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Bit for this day in a days-of-week mask
    pub fn mask_bit(self) -> u8 {
        1 << self.index()
    }

    /// Monday-first ordinal (Monday = 0 .. Sunday = 6)
    pub fn monday_ordinal(self) -> u8 {
        match self {
            Weekday::Sunday => 6,
            other => other.index() - 1,
        }
    }
}

/// A wall-clock reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: Weekday,
}

impl CalendarTime {
    /// Build a self-consistent calendar value
    ///
    /// Fields must be in range and the day must exist in the given month.
    /// The weekday is derived from the date.
    pub fn from_fields(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, ClockError> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(ClockError::InvalidTime);
        }

        let time = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday: weekday_for_date(year, month, day),
        };

        if time.in_range() {
            Ok(time)
        } else {
            Err(ClockError::InvalidTime)
        }
    }

    /// Convert seconds since the Unix epoch (UTC)
    pub fn from_unix(seconds: u64) -> Result<Self, ClockError> {
        let days = (seconds / SECONDS_PER_DAY) as i64;
        let secs_of_day = seconds % SECONDS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        let year = u16::try_from(year).map_err(|_| ClockError::InvalidTime)?;

        Self::from_fields(
            year,
            month,
            day,
            (secs_of_day / 3600) as u8,
            (secs_of_day % 3600 / 60) as u8,
            (secs_of_day % 60) as u8,
        )
    }

    /// Plausibility check applied to every clock reading
    pub fn in_range(&self) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&self.year)
            && (1..=12).contains(&self.month)
            && (1..=31).contains(&self.day)
            && self.hour <= 23
            && self.minute <= 59
            && self.second <= 59
    }

    /// Whether the reading falls before noon
    pub fn is_morning(&self) -> bool {
        self.hour < 12
    }
}

/// Gregorian leap year rule
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`; 0 for an invalid month
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Weekday of a (valid) Gregorian date
pub fn weekday_for_date(year: u16, month: u8, day: u8) -> Weekday {
    let days = days_from_civil(year as i64, month as i64, day as i64);
    // 1970-01-01 was a Thursday
    let index = (days + 4).rem_euclid(7) as u8;
    Weekday::from_index(index).unwrap_or(Weekday::Sunday)
}

/// Days since 1970-01-01 for a proleptic Gregorian date
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
