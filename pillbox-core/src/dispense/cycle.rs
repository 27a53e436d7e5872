//! Open-loop forward/dwell/return cycle
//!
//! ```text
//! Idle --start--> Advancing --target reached--> Dwelling
//!   ^                                              |
//!   +---- all steps returned <-- Returning <--dwell elapsed
//! ```
//!
//! The cycle is advanced by `poll`, one half-step per poll while travelling.
//! The caller owns the step cadence by choosing how often to poll. Coils are
//! released at the end of each travel leg.

use super::DispenseError;
use crate::traits::{Actuator, Direction};

/// Current phase of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclePhase {
    /// At the neutral slot, coils released
    Idle,
    /// Travelling away from neutral
    Advancing,
    /// Holding at the target while the dose drops
    Dwelling,
    /// Travelling back to neutral
    Returning,
}

/// Phase transitions reported by [`DispenseCycle::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleEvent {
    /// Target reached, dwell started
    ReachedTarget,
    /// Dwell finished, return started
    DwellElapsed,
    /// Back at neutral
    Completed,
}

/// Forward/dwell/return state machine
#[derive(Debug, Clone)]
pub struct DispenseCycle {
    phase: CyclePhase,
    target_steps: u32,
    forward_steps: u32,
    return_steps: u32,
    dwell_ms: u32,
    dwell_until_ms: u64,
}

impl Default for DispenseCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl DispenseCycle {
    /// Create an idle cycle
    pub const fn new() -> Self {
        Self {
            phase: CyclePhase::Idle,
            target_steps: 0,
            forward_steps: 0,
            return_steps: 0,
            dwell_ms: 0,
            dwell_until_ms: 0,
        }
    }

    /// Start a cycle travelling `target_steps` and holding for `dwell_ms`
    pub fn start(&mut self, target_steps: u32, dwell_ms: u32) -> Result<(), DispenseError> {
        if self.phase != CyclePhase::Idle {
            return Err(DispenseError::Busy);
        }
        self.phase = CyclePhase::Advancing;
        self.target_steps = target_steps;
        self.forward_steps = 0;
        self.return_steps = 0;
        self.dwell_ms = dwell_ms;
        Ok(())
    }

    /// Advance the cycle
    ///
    /// On an actuator error the step is not counted and is retried on the
    /// next poll.
    pub fn poll<A: Actuator>(
        &mut self,
        actuator: &mut A,
        now_ms: u64,
    ) -> Result<Option<CycleEvent>, A::Error> {
        match self.phase {
            CyclePhase::Idle => Ok(None),
            CyclePhase::Advancing => {
                if self.forward_steps < self.target_steps {
                    actuator.step(Direction::Forward)?;
                    self.forward_steps += 1;
                }
                if self.forward_steps < self.target_steps {
                    return Ok(None);
                }
                actuator.release()?;
                self.phase = CyclePhase::Dwelling;
                self.dwell_until_ms = now_ms + self.dwell_ms as u64;
                Ok(Some(CycleEvent::ReachedTarget))
            }
            CyclePhase::Dwelling => {
                if now_ms < self.dwell_until_ms {
                    return Ok(None);
                }
                self.phase = CyclePhase::Returning;
                Ok(Some(CycleEvent::DwellElapsed))
            }
            CyclePhase::Returning => {
                if self.return_steps < self.forward_steps {
                    actuator.step(Direction::Reverse)?;
                    self.return_steps += 1;
                }
                if self.return_steps < self.forward_steps {
                    return Ok(None);
                }
                actuator.release()?;
                self.phase = CyclePhase::Idle;
                Ok(Some(CycleEvent::Completed))
            }
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CyclePhase::Idle
    }

    /// Half-steps taken away from neutral in the current or last cycle
    pub fn forward_steps(&self) -> u32 {
        self.forward_steps
    }

    /// Half-steps taken back towards neutral in the current or last cycle
    pub fn return_steps(&self) -> u32 {
        self.return_steps
    }

    /// Signed displacement from neutral
    pub fn displacement(&self) -> i64 {
        self.forward_steps as i64 - self.return_steps as i64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Records steps and releases
    #[derive(Default)]
    pub(crate) struct RecordingActuator {
        pub position: i64,
        pub forward: u32,
        pub reverse: u32,
        pub releases: u32,
        pub energized: bool,
        pub fail_next: bool,
    }

    impl Actuator for RecordingActuator {
        type Error = ();

        fn step(&mut self, direction: Direction) -> Result<(), ()> {
            if self.fail_next {
                self.fail_next = false;
                return Err(());
            }
            match direction {
                Direction::Forward => {
                    self.position += 1;
                    self.forward += 1;
                }
                Direction::Reverse => {
                    self.position -= 1;
                    self.reverse += 1;
                }
            }
            self.energized = true;
            Ok(())
        }

        fn release(&mut self) -> Result<(), ()> {
            self.releases += 1;
            self.energized = false;
            Ok(())
        }
    }

    /// Poll until idle, returning the events seen
    fn run(cycle: &mut DispenseCycle, actuator: &mut RecordingActuator) -> std::vec::Vec<CycleEvent> {
        let mut events = std::vec::Vec::new();
        let mut now = 0u64;
        while !cycle.is_idle() {
            if let Ok(Some(event)) = cycle.poll(actuator, now) {
                events.push(event);
            }
            now += 3;
        }
        events
    }

    #[test]
    fn test_full_cycle() {
        let mut cycle = DispenseCycle::new();
        let mut actuator = RecordingActuator::default();
        cycle.start(10, 30).unwrap();

        let events = run(&mut cycle, &mut actuator);
        assert_eq!(
            events,
            [
                CycleEvent::ReachedTarget,
                CycleEvent::DwellElapsed,
                CycleEvent::Completed
            ]
        );
        assert_eq!(actuator.position, 0);
        assert_eq!(actuator.forward, 10);
        assert_eq!(actuator.reverse, 10);
        assert_eq!(actuator.releases, 2);
        assert!(!actuator.energized);
    }

    #[test]
    fn test_dwell_is_timed() {
        let mut cycle = DispenseCycle::new();
        let mut actuator = RecordingActuator::default();
        cycle.start(1, 1000).unwrap();

        assert_eq!(cycle.poll(&mut actuator, 0), Ok(Some(CycleEvent::ReachedTarget)));
        assert_eq!(cycle.poll(&mut actuator, 999), Ok(None));
        assert_eq!(cycle.phase(), CyclePhase::Dwelling);
        assert_eq!(cycle.poll(&mut actuator, 1000), Ok(Some(CycleEvent::DwellElapsed)));
        assert_eq!(cycle.phase(), CyclePhase::Returning);
    }

    #[test]
    fn test_busy_while_in_flight() {
        let mut cycle = DispenseCycle::new();
        cycle.start(5, 0).unwrap();
        assert_eq!(cycle.start(5, 0), Err(DispenseError::Busy));
    }

    #[test]
    fn test_failed_step_is_retried() {
        let mut cycle = DispenseCycle::new();
        let mut actuator = RecordingActuator {
            fail_next: true,
            ..Default::default()
        };
        cycle.start(3, 0).unwrap();
        assert_eq!(cycle.poll(&mut actuator, 0), Err(()));
        assert_eq!(cycle.forward_steps(), 0);

        run(&mut cycle, &mut actuator);
        assert_eq!(actuator.forward, 3);
        assert_eq!(actuator.position, 0);
    }

    #[test]
    fn test_zero_steps() {
        let mut cycle = DispenseCycle::new();
        let mut actuator = RecordingActuator::default();
        cycle.start(0, 0).unwrap();
        let events = run(&mut cycle, &mut actuator);
        assert_eq!(events.len(), 3);
        assert_eq!(actuator.forward, 0);
    }

    proptest! {
        #[test]
        fn prop_zero_net_displacement(slot in 1u32..=14, steps_per_slot in 1u32..64) {
            let mut cycle = DispenseCycle::new();
            let mut actuator = RecordingActuator::default();
            cycle.start(slot * steps_per_slot, 6).unwrap();
            run(&mut cycle, &mut actuator);

            prop_assert_eq!(cycle.forward_steps(), slot * steps_per_slot);
            prop_assert_eq!(cycle.forward_steps(), cycle.return_steps());
            prop_assert_eq!(cycle.displacement(), 0);
            prop_assert_eq!(actuator.position, 0);
        }
    }
}
