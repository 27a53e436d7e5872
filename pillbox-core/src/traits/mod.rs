//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod clock;
pub mod display;

pub use actuator::{Actuator, Direction};
pub use clock::ClockSource;
pub use display::TextDisplay;
