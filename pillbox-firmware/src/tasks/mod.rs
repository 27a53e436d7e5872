//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod command_rx;
pub mod controller;
pub mod dispense;
pub mod display;
pub mod tick;

pub use command_rx::command_rx_task;
pub use controller::controller_task;
pub use dispense::dispense_task;
pub use display::display_task;
pub use tick::tick_task;
