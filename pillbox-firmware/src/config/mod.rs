//! Configuration loading
//!
//! The dispenser configuration is embedded at build time from
//! `dispenser.toml` (already validated by build.rs) and parsed at boot by
//! the no_std parser in pillbox-core.

use defmt::*;
use pillbox_core::config::{parse_config, DispenserConfig};

/// Embedded configuration; edit dispenser.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../dispenser.toml");

/// Parse the embedded configuration
///
/// Falls back to built-in defaults if parsing fails, which can only happen
/// when the firmware parser and build.rs disagree.
pub fn load_config() -> DispenserConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", defmt::Debug2Format(&e));
            error!("Using default configuration");
            DispenserConfig::default()
        }
    }
}
