//! ULN2003 unipolar stepper driver
//!
//! Drives a 28BYJ-48 geared stepper through a ULN2003 darlington array
//! with four GPIO outputs (IN1-IN4) in half-step mode. 4096 half-steps make
//! one output shaft revolution.

use embedded_hal::digital::OutputPin;
use pillbox_core::traits::{Actuator, Direction};

/// Coil pattern for each of the 8 half-step phases (IN1..IN4)
pub const HALF_STEP_SEQUENCE: [[bool; 4]; 8] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// ULN2003 driver over four output pins
pub struct Uln2003<P> {
    pins: [P; 4],
    /// Index into [`HALF_STEP_SEQUENCE`] of the last applied phase
    phase: u8,
    energized: bool,
}

impl<P: OutputPin> Uln2003<P> {
    /// Create a driver with all coils released
    pub fn new(in1: P, in2: P, in3: P, in4: P) -> Result<Self, P::Error> {
        let mut driver = Self {
            pins: [in1, in2, in3, in4],
            phase: 0,
            energized: false,
        };
        driver.release()?;
        Ok(driver)
    }

    /// Current phase index (0-7)
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Whether any coil is driven
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    fn apply(&mut self, pattern: [bool; 4]) -> Result<(), P::Error> {
        for (pin, on) in self.pins.iter_mut().zip(pattern) {
            if on {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        Ok(())
    }
}

impl<P: OutputPin> Actuator for Uln2003<P> {
    type Error = P::Error;

    fn step(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let next = match direction {
            Direction::Forward => (self.phase + 1) % 8,
            Direction::Reverse => (self.phase + 7) % 8,
        };
        self.apply(HALF_STEP_SEQUENCE[next as usize])?;
        self.phase = next;
        self.energized = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.apply([false; 4])?;
        self.energized = false;
        Ok(())
    }
}
