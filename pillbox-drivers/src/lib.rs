//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pillbox-core, written against the `embedded-hal` 1.0 traits:
//!
//! - Tray stepper (28BYJ-48 through a ULN2003 darlington array)
//! - Real-time clock (DS1307 over I2C)
//! - Character LCD (HD44780 behind a PCF8574 I2C backpack)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod rtc;
pub mod stepper;

#[cfg(test)]
pub(crate) mod mock;
