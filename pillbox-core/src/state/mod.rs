//! Device state shared with the display
//!
//! Pairing and connectivity flags are written only by command handling
//! and read by the status screen.

pub mod link;

pub use link::{LinkState, OwnerName, MAX_OWNER_LEN};
