//! Command grammar for the companion controller link
//!
//! Each line carries one command with colon-delimited fields:
//!
//! | Command | Fields |
//! |---|---|
//! | `DEVICE:LINKED:<name>` | owner name (free text) |
//! | `DEVICE:UNLINKED` | - |
//! | `WIFI:ON` / `WIFI:OFF` | - |
//! | `ADD:<hour>:<minute>:<daysMask>:<doses>:<name>` | name is the rest of the line |
//! | `DEL:<index>` | alarm index |
//! | `CLEAR` | - |
//! | `SETTIME:<year>:<month>:<day>:<hour>:<minute>:<second>` | - |
//! | `DISPENSE:<name>[:<doses>]` | doses default to 1 |
//!
//! The device/Wi-Fi pair is matched exactly. Every other command is matched
//! after upper-casing the whole line, so field text (alarm names) arrives
//! upper-cased too.
//!
//! Parsing only checks the shape of a command. Range checks (hour <= 23,
//! non-empty day mask, calendar consistency) belong to the consumers.

use heapless::String;

use crate::line::{Line, MAX_LINE_LEN};

/// Free text carried by a command (never longer than a line)
pub type Text = String<MAX_LINE_LEN>;

const DEVICE_LINKED: &str = "DEVICE:LINKED:";
const DEVICE_UNLINKED: &str = "DEVICE:UNLINKED";
const WIFI_ON: &str = "WIFI:ON";
const WIFI_OFF: &str = "WIFI:OFF";
const ADD: &str = "ADD:";
const DEL: &str = "DEL:";
const CLEAR: &str = "CLEAR";
const SETTIME: &str = "SETTIME:";
const DISPENSE: &str = "DISPENSE:";

/// Dose count used when `DISPENSE` omits it
pub const DEFAULT_MANUAL_DOSES: u8 = 1;

/// Errors produced while parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line was empty after trimming
    Empty,
    /// Line exceeds the protocol line length
    TooLong,
    /// No known command prefix matched
    UnknownCommand,
    /// A required field is absent
    MissingField,
    /// A numeric field did not parse
    InvalidNumber,
    /// Line bytes are not valid UTF-8
    InvalidEncoding,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Companion controller paired to an owner account
    DeviceLinked { owner: Text },
    /// Pairing removed
    DeviceUnlinked,
    /// Companion controller reports Wi-Fi connectivity
    WifiOn,
    /// Companion controller lost Wi-Fi connectivity
    WifiOff,
    /// Configure a new weekly alarm
    Add {
        hour: u8,
        minute: u8,
        days_mask: u8,
        doses: u8,
        name: Text,
    },
    /// Remove the alarm at `index`
    Delete { index: usize },
    /// Remove every alarm
    Clear,
    /// Set the real-time clock
    SetTime {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },
    /// Dispense immediately
    Dispense { name: Text, doses: u8 },
}

impl Command {
    /// Parse a completed line
    pub fn from_line(line: &Line) -> Result<Self, ParseError> {
        Self::parse(line.as_str().ok_or(ParseError::InvalidEncoding)?)
    }

    /// Parse a command from text
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let line = input.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if line.len() > MAX_LINE_LEN {
            return Err(ParseError::TooLong);
        }

        // Case-sensitive link/connectivity commands
        if let Some(owner) = line.strip_prefix(DEVICE_LINKED) {
            return Ok(Command::DeviceLinked {
                owner: to_text(owner)?,
            });
        }
        match line {
            DEVICE_UNLINKED => return Ok(Command::DeviceUnlinked),
            WIFI_ON => return Ok(Command::WifiOn),
            WIFI_OFF => return Ok(Command::WifiOff),
            _ => {}
        }

        let mut upper = to_text(line)?;
        upper.make_ascii_uppercase();
        let line = upper.as_str();

        if let Some(rest) = line.strip_prefix(ADD) {
            parse_add(rest)
        } else if let Some(rest) = line.strip_prefix(DEL) {
            Ok(Command::Delete {
                index: number(rest)?,
            })
        } else if line == CLEAR {
            Ok(Command::Clear)
        } else if let Some(rest) = line.strip_prefix(SETTIME) {
            parse_settime(rest)
        } else if let Some(rest) = line.strip_prefix(DISPENSE) {
            parse_dispense(rest)
        } else {
            Err(ParseError::UnknownCommand)
        }
    }

    /// Whether this command changes the configured alarms
    pub fn mutates_alarms(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Delete { .. } | Command::Clear
        )
    }
}

/// `ADD:<hour>:<minute>:<daysMask>:<doses>:<name>`
fn parse_add(rest: &str) -> Result<Command, ParseError> {
    let mut fields = rest.splitn(5, ':');
    let hour = number(field(&mut fields)?)?;
    let minute = number(field(&mut fields)?)?;
    let days_mask = number(field(&mut fields)?)?;
    let doses = number(field(&mut fields)?)?;
    let name = field(&mut fields)?;
    if name.is_empty() {
        return Err(ParseError::MissingField);
    }

    Ok(Command::Add {
        hour,
        minute,
        days_mask,
        doses,
        name: to_text(name)?,
    })
}

/// `SETTIME:<year>:<month>:<day>:<hour>:<minute>:<second>`
fn parse_settime(rest: &str) -> Result<Command, ParseError> {
    let mut fields = rest.splitn(6, ':');
    Ok(Command::SetTime {
        year: number(field(&mut fields)?)?,
        month: number(field(&mut fields)?)?,
        day: number(field(&mut fields)?)?,
        hour: number(field(&mut fields)?)?,
        minute: number(field(&mut fields)?)?,
        second: number(field(&mut fields)?)?,
    })
}

/// `DISPENSE:<name>[:<doses>]`
fn parse_dispense(rest: &str) -> Result<Command, ParseError> {
    let (name, doses) = match rest.split_once(':') {
        Some((name, doses)) => (name, number::<u8>(doses)?.max(1)),
        None => (rest, DEFAULT_MANUAL_DOSES),
    };

    Ok(Command::Dispense {
        name: to_text(name)?,
        doses,
    })
}

fn field<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<&'a str, ParseError> {
    fields.next().ok_or(ParseError::MissingField)
}

fn number<T: core::str::FromStr>(text: &str) -> Result<T, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MissingField);
    }
    text.parse().map_err(|_| ParseError::InvalidNumber)
}

fn to_text(text: &str) -> Result<Text, ParseError> {
    let mut out = Text::new();
    out.push_str(text).map_err(|_| ParseError::TooLong)?;
    Ok(out)
}
