//! Minimal TOML parser for the dispenser configuration
//!
//! Handles only the subset the config file needs. It does NOT support the
//! full TOML spec.
//!
//! Supported features:
//! - `[section]` headers (`motor`, `schedule`, `display`, `clock`)
//! - `key = integer` pairs, with optional `_` digit separators
//! - Comments (`# ...`), whole-line or trailing
//!
//! Keys that are not set keep their default value. Unknown sections and
//! keys are rejected.

use super::types::{ConfigError, DispenserConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (line number)
    InvalidSection(usize),
    /// Line is not `key = value` (line number)
    InvalidLine(usize),
    /// Key not known in its section (line number)
    UnknownKey(usize),
    /// Value is not an integer or does not fit (line number)
    InvalidValue(usize),
    /// Parsed values failed validation
    Invalid(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motor,
    Schedule,
    Display,
    Clock,
}

/// Parse config text on top of the defaults
pub fn parse_config(input: &str) -> Result<DispenserConfig, ParseError> {
    let mut config = DispenserConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ParseError::InvalidLine(line_no))?;
        let key = key.trim();
        let value = parse_integer(value.trim()).ok_or(ParseError::InvalidValue(line_no))?;

        apply(&mut config, section, key, value, line_no)?;
    }

    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(line: &str) -> Option<Section> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    match name {
        "motor" => Some(Section::Motor),
        "schedule" => Some(Section::Schedule),
        "display" => Some(Section::Display),
        "clock" => Some(Section::Clock),
        _ => None,
    }
}

/// Decimal integer with optional `_` separators between digits
fn parse_integer(value: &str) -> Option<u32> {
    if value.is_empty() || value.starts_with('_') || value.ends_with('_') {
        return None;
    }

    let mut result: u32 = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10)?;
        result = result.checked_mul(10)?.checked_add(digit)?;
    }
    Some(result)
}

fn apply(
    config: &mut DispenserConfig,
    section: Section,
    key: &str,
    value: u32,
    line_no: usize,
) -> Result<(), ParseError> {
    let unknown = ParseError::UnknownKey(line_no);
    match section {
        Section::Root => return Err(unknown),
        Section::Motor => match key {
            "steps_per_slot" => config.motor.steps_per_slot = value,
            "step_interval_ms" => config.motor.step_interval_ms = value,
            "dwell_ms" => config.motor.dwell_ms = value,
            "self_test_steps" => config.motor.self_test_steps = value,
            "self_test_dwell_ms" => config.motor.self_test_dwell_ms = value,
            _ => return Err(unknown),
        },
        Section::Schedule => match key {
            "poll_interval_ms" => config.schedule.poll_interval_ms = value,
            "fire_window_s" => {
                config.schedule.fire_window_s =
                    u8::try_from(value).map_err(|_| ParseError::InvalidValue(line_no))?
            }
            _ => return Err(unknown),
        },
        Section::Display => match key {
            "refresh_ms" => config.display.refresh_ms = value,
            "notice_ms" => config.display.notice_ms = value,
            _ => return Err(unknown),
        },
        Section::Clock => match key {
            "retry_delay_ms" => config.clock.retry_delay_ms = value,
            _ => return Err(unknown),
        },
    }
    Ok(())
}
