//! Board-agnostic core logic for the Pillbox dispenser firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Alarm model and fixed-capacity alarm store
//! - Daily schedule projection and minute-granularity trigger matching
//! - Calendar validation and the guarded clock reader
//! - Slot computation and the open-loop dispense cycle
//! - Link/connectivity state and status screen rendering
//! - Runtime configuration and its config-file parser
//! - Command dispatch (the controller)
//! - Hardware abstraction traits (actuator, clock source, text display)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod clock;
pub mod config;
pub mod controller;
pub mod dispense;
pub mod display;
pub mod schedule;
pub mod state;
pub mod traits;
