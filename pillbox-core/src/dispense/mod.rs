//! Dispensing
//!
//! A dispense rotates the tray from the neutral slot to the compartment for
//! the current weekday and half of day, holds while the dose drops, then
//! rotates back by exactly the same number of steps. There is no position
//! feedback.

pub mod cycle;
pub mod orchestrator;
pub mod slot;

pub use cycle::{CycleEvent, CyclePhase, DispenseCycle};
pub use orchestrator::{
    DispenseOrchestrator, DispenseOrigin, DispenseProgress, DispenseRequest, DispenseTarget,
    DispenseTiming,
};
pub use slot::Slot;

/// Dispense errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispenseError {
    /// A cycle is already in flight
    Busy,
}
