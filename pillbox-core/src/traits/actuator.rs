//! Open-loop tray actuator trait
//!
//! The tray is driven by a unipolar stepper without any position feedback.
//! Correctness depends entirely on every step taken forward being taken back.

/// Tray rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Away from the neutral slot
    Forward,
    /// Back towards the neutral slot
    Reverse,
}

impl Direction {
    /// Direction for a signed step delta
    pub fn from_delta(delta: i32) -> Self {
        if delta < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// Trait for the tray actuator
///
/// Implementations perform phase sequencing for a single half-step at a time.
/// Timing between steps is owned by the caller.
pub trait Actuator {
    /// Error type of the underlying outputs
    type Error;

    /// Advance the phase sequence by one half-step
    fn step(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// De-energize all coils
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Move `|delta_steps|` half-steps in the sign's direction, then release
    ///
    /// `between` runs after every step and is where blocking callers insert
    /// the step interval.
    fn move_by(
        &mut self,
        delta_steps: i32,
        mut between: impl FnMut(),
    ) -> Result<(), Self::Error> {
        let direction = Direction::from_delta(delta_steps);
        for _ in 0..delta_steps.unsigned_abs() {
            self.step(direction)?;
            between();
        }
        self.release()
    }
}
