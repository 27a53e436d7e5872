//! Dispense orchestration
//!
//! Turns scheduled alarms, manual requests and the boot self-test into
//! cycles, and enforces that at most one cycle is ever in flight. A request
//! arriving while busy is rejected, never queued.

use super::{CycleEvent, DispenseCycle, DispenseError, Slot};
use crate::alarm::{normalize_name, Alarm, AlarmName};
use crate::clock::{CalendarTime, Weekday};
use crate::config::DispenserConfig;
use crate::traits::Actuator;

/// What triggered a dispense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispenseOrigin {
    /// A scheduled alarm fired
    Scheduled,
    /// `DISPENSE` command
    Manual,
    /// Boot-time motor check
    SelfTest,
}

/// Where a cycle travels to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispenseTarget {
    /// A tray compartment
    Slot(Slot),
    /// A fixed excursion used by the self-test
    SelfTest { steps: u32 },
}

/// A request to run one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispenseRequest {
    pub name: AlarmName,
    pub doses: u8,
    pub origin: DispenseOrigin,
    pub target: DispenseTarget,
}

impl DispenseRequest {
    /// Request for a fired alarm
    ///
    /// The weekday comes from the clock, the half of day from the alarm.
    pub fn scheduled(alarm: &Alarm, now: &CalendarTime) -> Self {
        Self {
            name: alarm.name.clone(),
            doses: alarm.doses,
            origin: DispenseOrigin::Scheduled,
            target: DispenseTarget::Slot(Slot::for_time(now.weekday, alarm.hour)),
        }
    }

    /// Request for a manual dispense at the slot for the current time
    ///
    /// Without a clock reading the Sunday morning compartment is used.
    pub fn manual(name: &str, doses: u8, now: Option<&CalendarTime>) -> Self {
        let slot = match now {
            Some(now) => Slot::for_time(now.weekday, now.hour),
            None => Slot::for_time(Weekday::Sunday, 0),
        };
        Self {
            name: normalize_name(name),
            doses: doses.max(1),
            origin: DispenseOrigin::Manual,
            target: DispenseTarget::Slot(slot),
        }
    }

    /// Boot-time motor check
    pub fn self_test(steps: u32) -> Self {
        Self {
            name: normalize_name("SELF TEST"),
            doses: 0,
            origin: DispenseOrigin::SelfTest,
            target: DispenseTarget::SelfTest { steps },
        }
    }
}

/// Travel and dwell parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispenseTiming {
    pub steps_per_slot: u32,
    pub dwell_ms: u32,
    pub self_test_dwell_ms: u32,
}

impl From<&DispenserConfig> for DispenseTiming {
    fn from(config: &DispenserConfig) -> Self {
        Self {
            steps_per_slot: config.motor.steps_per_slot,
            dwell_ms: config.motor.dwell_ms,
            self_test_dwell_ms: config.motor.self_test_dwell_ms,
        }
    }
}

impl Default for DispenseTiming {
    fn default() -> Self {
        Self::from(&DispenserConfig::default())
    }
}

/// Progress reported while polling
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispenseProgress {
    /// Holding at the target
    Dwelling,
    /// Travelling back to neutral
    Returning,
    /// Back at neutral; the finished request
    Completed(DispenseRequest),
}

/// Runs dispense cycles one at a time
#[derive(Debug, Clone)]
pub struct DispenseOrchestrator {
    timing: DispenseTiming,
    cycle: DispenseCycle,
    current: Option<DispenseRequest>,
}

impl DispenseOrchestrator {
    pub fn new(timing: DispenseTiming) -> Self {
        Self {
            timing,
            cycle: DispenseCycle::new(),
            current: None,
        }
    }

    /// Start a cycle for `request`
    pub fn begin(&mut self, request: DispenseRequest) -> Result<(), DispenseError> {
        if self.is_busy() {
            return Err(DispenseError::Busy);
        }

        let (steps, dwell_ms) = match request.target {
            DispenseTarget::Slot(slot) => (slot.steps(self.timing.steps_per_slot), self.timing.dwell_ms),
            DispenseTarget::SelfTest { steps } => (steps, self.timing.self_test_dwell_ms),
        };
        self.cycle.start(steps, dwell_ms)?;
        self.current = Some(request);
        Ok(())
    }

    /// Advance the in-flight cycle, if any
    pub fn poll<A: Actuator>(
        &mut self,
        actuator: &mut A,
        now_ms: u64,
    ) -> Result<Option<DispenseProgress>, A::Error> {
        let progress = match self.cycle.poll(actuator, now_ms)? {
            None => None,
            Some(CycleEvent::ReachedTarget) => Some(DispenseProgress::Dwelling),
            Some(CycleEvent::DwellElapsed) => Some(DispenseProgress::Returning),
            Some(CycleEvent::Completed) => self.current.take().map(DispenseProgress::Completed),
        };
        Ok(progress)
    }

    /// Whether a cycle is in flight
    pub fn is_busy(&self) -> bool {
        !self.cycle.is_idle()
    }

    /// The in-flight request
    pub fn current(&self) -> Option<&DispenseRequest> {
        self.current.as_ref()
    }

    /// The underlying cycle (step counters, phase)
    pub fn cycle(&self) -> &DispenseCycle {
        &self.cycle
    }
}
