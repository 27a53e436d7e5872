//! Pillbox Command Protocol
//!
//! This crate defines the serial protocol between the companion controller
//! (the Wi-Fi bridge that talks to the phone app) and the dispenser. The
//! protocol is deliberately minimal: ASCII text, one command per line, no
//! framing beyond the terminator and no acknowledgements.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────────────────────────────────────────┬────────────┐
//! │ COMMAND (colon-delimited fields)         │ CR or LF   │
//! │ 1–63 bytes                               │ 1B         │
//! └──────────────────────────────────────────┴────────────┘
//! ```
//!
//! The channel is one-directional for commands: malformed lines are dropped
//! without a reply. The only outbound traffic is a single readiness line
//! emitted at boot.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod messages;

pub use command::{Command, ParseError, Text};
pub use line::{Line, LineAccumulator, MAX_LINE_LEN};
pub use messages::DeviceMessage;
