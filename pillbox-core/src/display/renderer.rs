//! Screen builders
//!
//! Every screen the device shows, as a pure function of its inputs.

use core::fmt::Write;

use heapless::String;

use super::screen::{Screen, COLUMNS};
use crate::clock::CalendarTime;
use crate::dispense::{DispenseRequest, DispenseTarget};
use crate::state::LinkState;

/// Scratch text, wider than a row so formatting never fails before padding
type Line = String<32>;

/// Boot banner
pub fn welcome() -> Screen {
    Screen::new("WELCOME TO", "PILLBOX")
}

/// Shown after boot until the first status refresh
pub fn waiting_for_controller() -> Screen {
    Screen::new("Waiting for", "controller...")
}

/// Idle status: clock on top, link status below
pub fn status(now: Option<&CalendarTime>, link: &LinkState) -> Screen {
    let mut top = Line::new();
    let _ = match now {
        Some(t) => write!(top, "Time {:02}:{:02}:{:02}", t.hour, t.minute, t.second),
        None => write!(top, "Time --:--:--"),
    };

    let mut bottom = Line::new();
    let _ = if link.is_linked() {
        let suffix = if link.wifi_connected() {
            " Ready"
        } else {
            " No WiFi"
        };
        // Shorten the owner rather than lose the status word
        let keep = COLUMNS.saturating_sub(suffix.len());
        write!(bottom, "{}{}", truncate(link.owner(), keep), suffix)
    } else {
        write!(bottom, "Not linked")
    };

    Screen::new(&top, &bottom)
}

/// Travelling to and holding at the compartment
pub fn dispensing(request: &DispenseRequest) -> Screen {
    let mut bottom = Line::new();
    let _ = match request.target {
        DispenseTarget::Slot(slot) => write!(
            bottom,
            "Slot {} {}",
            slot.index(),
            if slot.is_morning() { "AM" } else { "PM" }
        ),
        DispenseTarget::SelfTest { .. } => write!(bottom, "Motor check"),
    };
    Screen::new(&request.name, &bottom)
}

/// Travelling back to neutral
pub fn returning() -> Screen {
    Screen::new("Returning to 0", "")
}

/// Back at neutral
pub fn at_rest() -> Screen {
    Screen::new("At rest", "Slot 0 (empty)")
}

/// An oversized command line was received
pub fn command_too_long() -> Screen {
    Screen::new("Cmd too long", "")
}

/// Longest prefix of `text` with at most `max` characters
fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Alarm;
    use crate::dispense::DispenseRequest;

    fn link(owner: Option<&str>, wifi: bool) -> LinkState {
        let mut link = LinkState::new();
        if let Some(owner) = owner {
            link.link(owner);
        }
        link.set_wifi(wifi);
        link
    }

    #[test]
    fn test_status_with_clock() {
        let now = CalendarTime::from_fields(2025, 3, 10, 9, 5, 7).unwrap();
        let screen = status(Some(&now), &link(None, false));
        assert_eq!(screen.row(0), Some("Time 09:05:07   "));
        assert_eq!(screen.row(1), Some("Not linked      "));
    }

    #[test]
    fn test_status_without_clock() {
        let screen = status(None, &link(Some("Ana"), true));
        assert_eq!(screen.row(0), Some("Time --:--:--   "));
        assert_eq!(screen.row(1), Some("Ana Ready       "));
    }

    #[test]
    fn test_status_no_wifi() {
        let screen = status(None, &link(Some("Ana"), false));
        assert_eq!(screen.row(1), Some("Ana No WiFi     "));
    }

    #[test]
    fn test_status_long_owner_keeps_suffix() {
        let screen = status(None, &link(Some("Bartholomew"), false));
        assert_eq!(screen.row(1), Some("Bartholo No WiFi"));
    }

    #[test]
    fn test_dispensing_screen() {
        let alarm = Alarm::new(8, 0, 0x7F, 1, "ASPIRIN").unwrap();
        let monday = CalendarTime::from_fields(2025, 3, 10, 8, 0, 0).unwrap();
        let screen = dispensing(&DispenseRequest::scheduled(&alarm, &monday));
        assert_eq!(screen.row(0), Some("ASPIRIN         "));
        assert_eq!(screen.row(1), Some("Slot 2 AM       "));

        let evening = Alarm::new(20, 0, 0x7F, 1, "ASPIRIN").unwrap();
        let screen = dispensing(&DispenseRequest::scheduled(&evening, &monday));
        assert_eq!(screen.row(1), Some("Slot 1 PM       "));
    }

    #[test]
    fn test_self_test_screen() {
        let screen = dispensing(&DispenseRequest::self_test(2048));
        assert_eq!(screen.row(1), Some("Motor check     "));
    }

    #[test]
    fn test_fixed_screens() {
        assert_eq!(at_rest().row(1), Some("Slot 0 (empty)  "));
        assert_eq!(returning().row(0), Some("Returning to 0  "));
        assert_eq!(command_too_long().row(0), Some("Cmd too long    "));
        assert_eq!(welcome().row(1), Some("PILLBOX         "));
    }
}
