//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use pillbox_core::clock::CalendarTime;
use pillbox_core::dispense::DispenseRequest;
use pillbox_core::display::Screen;
use pillbox_core::state::LinkState;
use pillbox_protocol::Command;

/// Channel capacity for parsed commands from the companion link
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for display events
const DISPLAY_CHANNEL_SIZE: usize = 4;

/// Parsed commands from the companion controller
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Dispense requests for the motor task
///
/// Single slot: a request only goes in while no cycle is running, and the
/// controller uses `try_send` so a full channel drops the request.
pub static DISPENSE_REQUESTS: Channel<CriticalSectionRawMutex, DispenseRequest, 1> =
    Channel::new();

/// True from the moment a cycle is accepted until the tray is back at rest
pub static DISPENSING: AtomicBool = AtomicBool::new(false);

/// Things the display task should show
#[derive(Debug, Clone)]
pub enum DisplayEvent {
    /// Replace the panel contents
    Show(Screen),
    /// An oversized command was dropped
    CommandTooLong,
}

/// Events for the display task
pub static DISPLAY_CHANNEL: Channel<CriticalSectionRawMutex, DisplayEvent, DISPLAY_CHANNEL_SIZE> =
    Channel::new();

/// Latest controller view, published after every tick
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    /// Clock reading, `None` while the clock is unavailable
    pub now: Option<CalendarTime>,
    pub link: LinkState,
}

/// Status snapshot signal (updated by controller)
pub static STATUS: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();
