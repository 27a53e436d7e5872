//! Configuration type definitions
//!
//! Defaults match the stock 28BYJ-48 tray mechanism.

/// Tray motor parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorConfig {
    /// Half-steps between adjacent compartments
    pub steps_per_slot: u32,
    /// Delay between half-steps (ms)
    pub step_interval_ms: u32,
    /// Hold time at a compartment while the dose drops (ms)
    pub dwell_ms: u32,
    /// Boot self-test excursion (half-steps)
    pub self_test_steps: u32,
    /// Boot self-test hold (ms)
    pub self_test_dwell_ms: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_slot: 2048,
            step_interval_ms: 3,
            dwell_ms: 45_000,
            self_test_steps: 2048,
            self_test_dwell_ms: 300,
        }
    }
}

/// Alarm polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleConfig {
    /// Clock poll cadence (ms)
    pub poll_interval_ms: u32,
    /// Seconds into the minute during which an alarm may still fire
    pub fire_window_s: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            fire_window_s: 5,
        }
    }
}

/// Status screen parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Status screen refresh period (ms)
    pub refresh_ms: u32,
    /// How long transient notices stay up (ms)
    pub notice_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 1000,
            notice_ms: 2000,
        }
    }
}

/// Clock access parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Delay before retrying an implausible reading (ms)
    pub retry_delay_ms: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { retry_delay_ms: 10 }
    }
}

/// Complete dispenser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispenserConfig {
    pub motor: MotorConfig,
    pub schedule: ScheduleConfig,
    pub display: DisplayConfig,
    pub clock: ClockConfig,
}

/// Largest `motor.steps_per_slot` for which the farthest compartment's
/// travel still fits in a `u32`
pub const MAX_STEPS_PER_SLOT: u32 = u32::MAX / 14;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `motor.steps_per_slot` must be between 1 and [`MAX_STEPS_PER_SLOT`]
    StepsPerSlotOutOfRange,
    /// `motor.step_interval_ms` must be at least 1
    ZeroStepInterval,
    /// `schedule.poll_interval_ms` must be between 1 and 999
    PollIntervalOutOfRange,
    /// `schedule.fire_window_s` must be below 60
    FireWindowOutOfRange,
    /// `display.refresh_ms` must be non-zero
    ZeroRefresh,
}

impl DispenserConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_STEPS_PER_SLOT).contains(&self.motor.steps_per_slot) {
            return Err(ConfigError::StepsPerSlotOutOfRange);
        }
        if self.motor.step_interval_ms == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }
        if !(1..1000).contains(&self.schedule.poll_interval_ms) {
            return Err(ConfigError::PollIntervalOutOfRange);
        }
        if self.schedule.fire_window_s > 59 {
            return Err(ConfigError::FireWindowOutOfRange);
        }
        if self.display.refresh_ms == 0 {
            return Err(ConfigError::ZeroRefresh);
        }
        Ok(())
    }
}
