//! Command dispatch and alarm ticking
//!
//! The controller owns the alarm store, the daily schedule (through the
//! matcher) and the link state. It is the single writer of all three.
//! Hardware effects (setting the RTC, running a cycle) are returned to the
//! caller as [`CommandOutcome`] values.

use pillbox_protocol::Command;

use crate::alarm::{AlarmError, AlarmStore};
use crate::clock::{CalendarTime, ClockError};
use crate::config::ScheduleConfig;
use crate::dispense::DispenseRequest;
use crate::schedule::{AlarmMatcher, DailySchedule, TickOutcome};
use crate::state::LinkState;

/// Why a command had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Alarm store rejected the mutation
    Alarm(AlarmError),
    /// Time fields do not form a valid calendar value
    Clock(ClockError),
}

/// Result of handling one command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Link state changed
    LinkUpdated,
    /// Alarm appended at `index`
    AlarmAdded { index: usize },
    /// Alarm at `index` removed
    AlarmDeleted { index: usize },
    /// All alarms removed
    AlarmsCleared,
    /// The clock must be set to this value; call
    /// [`Controller::clock_set`] once it has been written
    SetClock(CalendarTime),
    /// A manual dispense should run
    Dispense(DispenseRequest),
    /// Command rejected without any state change
    Dropped(DropReason),
}

/// Owner of the alarm model and link state
#[derive(Debug, Clone)]
pub struct Controller {
    store: AlarmStore,
    matcher: AlarmMatcher,
    link: LinkState,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&ScheduleConfig::default())
    }
}

impl Controller {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            store: AlarmStore::new(),
            matcher: AlarmMatcher::new(config.fire_window_s),
            link: LinkState::new(),
        }
    }

    /// Apply a command
    ///
    /// `now` is the latest valid clock reading, if any. It picks the
    /// weekday for schedule rebuilds and the slot for manual dispenses.
    pub fn handle(&mut self, command: &Command, now: Option<&CalendarTime>) -> CommandOutcome {
        let outcome = match command {
            Command::DeviceLinked { owner } => {
                self.link.link(owner);
                CommandOutcome::LinkUpdated
            }
            Command::DeviceUnlinked => {
                self.link.unlink();
                CommandOutcome::LinkUpdated
            }
            Command::WifiOn => {
                self.link.set_wifi(true);
                CommandOutcome::LinkUpdated
            }
            Command::WifiOff => {
                self.link.set_wifi(false);
                CommandOutcome::LinkUpdated
            }
            Command::Add {
                hour,
                minute,
                days_mask,
                doses,
                name,
            } => match self.store.add(*hour, *minute, *days_mask, *doses, name) {
                Ok(()) => CommandOutcome::AlarmAdded {
                    index: self.store.len() - 1,
                },
                Err(e) => CommandOutcome::Dropped(DropReason::Alarm(e)),
            },
            Command::Delete { index } => match self.store.delete(*index) {
                Ok(_) => CommandOutcome::AlarmDeleted { index: *index },
                Err(e) => CommandOutcome::Dropped(DropReason::Alarm(e)),
            },
            Command::Clear => {
                self.store.clear();
                CommandOutcome::AlarmsCleared
            }
            Command::SetTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => match CalendarTime::from_fields(*year, *month, *day, *hour, *minute, *second) {
                Ok(time) => CommandOutcome::SetClock(time),
                Err(e) => CommandOutcome::Dropped(DropReason::Clock(e)),
            },
            Command::Dispense { name, doses } => {
                CommandOutcome::Dispense(DispenseRequest::manual(name, *doses, now))
            }
        };

        if matches!(
            outcome,
            CommandOutcome::AlarmAdded { .. }
                | CommandOutcome::AlarmDeleted { .. }
                | CommandOutcome::AlarmsCleared
        ) {
            self.rebuild(now);
        }
        outcome
    }

    /// The clock was set; rebuild the schedule for the new date
    pub fn clock_set(&mut self, time: &CalendarTime) {
        self.rebuild(Some(time));
    }

    /// Run the matcher against a clock reading
    ///
    /// `None` (clock unavailable) skips the tick entirely.
    pub fn tick(
        &mut self,
        reading: Option<&CalendarTime>,
        mut on_fire: impl FnMut(DispenseRequest),
    ) -> Option<TickOutcome> {
        let now = reading?;
        Some(
            self.matcher
                .tick(&self.store, now, |alarm| on_fire(DispenseRequest::scheduled(alarm, now))),
        )
    }

    /// Rebuild for `now`'s weekday, or defer to the next valid tick
    fn rebuild(&mut self, now: Option<&CalendarTime>) {
        match now {
            Some(now) => {
                self.matcher.schedule_mut().rebuild(&self.store, now.weekday);
            }
            None => self.matcher.schedule_mut().invalidate(),
        }
    }

    pub fn store(&self) -> &AlarmStore {
        &self.store
    }

    pub fn schedule(&self) -> &DailySchedule {
        self.matcher.schedule()
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Weekday;
    use crate::dispense::{DispenseOrigin, DispenseTarget, Slot};
    use pillbox_protocol::LineAccumulator;

    fn monday(hour: u8, minute: u8, second: u8) -> CalendarTime {
        CalendarTime::from_fields(2025, 3, 10, hour, minute, second).unwrap()
    }

    fn cmd(line: &str) -> Command {
        Command::parse(line).unwrap()
    }

    #[test]
    fn test_link_commands() {
        let mut controller = Controller::default();
        controller.handle(&cmd("DEVICE:LINKED:Maria"), None);
        controller.handle(&cmd("WIFI:ON"), None);
        assert!(controller.link().is_linked());
        assert_eq!(controller.link().owner(), "Maria");
        assert!(controller.link().wifi_connected());

        controller.handle(&cmd("DEVICE:UNLINKED"), None);
        controller.handle(&cmd("WIFI:OFF"), None);
        assert!(!controller.link().is_linked());
        assert!(!controller.link().wifi_connected());
    }

    #[test]
    fn test_add_rebuilds_schedule() {
        let mut controller = Controller::default();
        let now = monday(7, 0, 0);
        let outcome = controller.handle(&cmd("ADD:8:0:127:1:aspirin"), Some(&now));
        assert_eq!(outcome, CommandOutcome::AlarmAdded { index: 0 });
        assert_eq!(controller.schedule().len(), 1);
        assert_eq!(controller.schedule().day(), Some(Weekday::Monday));
    }

    #[test]
    fn test_invalid_add_dropped() {
        let mut controller = Controller::default();
        let outcome = controller.handle(&cmd("ADD:25:0:127:1:X"), None);
        assert_eq!(
            outcome,
            CommandOutcome::Dropped(DropReason::Alarm(AlarmError::InvalidField))
        );
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_delete_out_of_range_dropped() {
        let mut controller = Controller::default();
        controller.handle(&cmd("ADD:8:0:127:1:A"), None);
        let outcome = controller.handle(&cmd("DEL:5"), None);
        assert_eq!(
            outcome,
            CommandOutcome::Dropped(DropReason::Alarm(AlarmError::IndexOutOfRange))
        );
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn test_clear_empties_schedule() {
        let mut controller = Controller::default();
        let now = monday(7, 0, 0);
        controller.handle(&cmd("ADD:8:0:127:1:A"), Some(&now));
        controller.handle(&cmd("ADD:9:0:127:1:B"), Some(&now));
        controller.handle(&cmd("CLEAR"), Some(&now));
        assert!(controller.store().is_empty());
        assert!(controller.schedule().is_empty());
    }

    #[test]
    fn test_mutation_without_clock_defers_rebuild() {
        let mut controller = Controller::default();
        controller.handle(&cmd("ADD:8:0:127:1:A"), None);
        assert_eq!(controller.schedule().day(), None);

        let outcome = controller.tick(Some(&monday(7, 0, 0)), |_| {});
        assert!(outcome.unwrap().rebuilt);
        assert_eq!(controller.schedule().len(), 1);
    }

    #[test]
    fn test_settime_validated() {
        let mut controller = Controller::default();
        let outcome = controller.handle(&cmd("SETTIME:2025:3:10:8:0:0"), None);
        assert_eq!(outcome, CommandOutcome::SetClock(monday(8, 0, 0)));

        let outcome = controller.handle(&cmd("SETTIME:2025:2:30:8:0:0"), None);
        assert_eq!(
            outcome,
            CommandOutcome::Dropped(DropReason::Clock(ClockError::InvalidTime))
        );
    }

    #[test]
    fn test_clock_set_rebuilds() {
        let mut controller = Controller::default();
        controller.handle(&cmd("ADD:8:0:2:1:MON"), None);
        controller.clock_set(&monday(6, 0, 0));
        assert_eq!(controller.schedule().len(), 1);
    }

    #[test]
    fn test_manual_dispense_request() {
        let mut controller = Controller::default();
        let outcome = controller.handle(&cmd("DISPENSE:Ibuprofen:2"), Some(&monday(20, 0, 0)));
        match outcome {
            CommandOutcome::Dispense(request) => {
                assert_eq!(request.name.as_str(), "IBUPROFEN");
                assert_eq!(request.doses, 2);
                assert_eq!(request.origin, DispenseOrigin::Manual);
                assert_eq!(request.target, DispenseTarget::Slot(Slot::new(1).unwrap()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tick_fires_scheduled_request() {
        let mut controller = Controller::default();
        let now = monday(8, 0, 0);
        controller.handle(&cmd("ADD:8:0:127:3:ASPIRIN"), Some(&now));

        let mut requests = std::vec::Vec::new();
        controller.tick(Some(&monday(8, 0, 1)), |r| requests.push(r));
        controller.tick(Some(&monday(8, 0, 2)), |r| requests.push(r));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].doses, 3);
        assert_eq!(requests[0].origin, DispenseOrigin::Scheduled);
        assert_eq!(requests[0].target, DispenseTarget::Slot(Slot::new(2).unwrap()));
    }

    #[test]
    fn test_tick_without_clock_is_noop() {
        let mut controller = Controller::default();
        controller.handle(&cmd("ADD:8:0:127:1:A"), None);
        let mut fired = false;
        assert_eq!(controller.tick(None, |_| fired = true), None);
        assert!(!fired);
        assert_eq!(controller.schedule().day(), None);
    }

    #[test]
    fn test_oversized_line_leaves_store_untouched() {
        let mut controller = Controller::default();
        let now = monday(7, 0, 0);
        controller.handle(&cmd("ADD:8:0:127:1:KEEP"), Some(&now));

        let mut acc = LineAccumulator::new();
        let mut raw = std::vec::Vec::from(&b"ADD:9:0:127:1:"[..]);
        raw.resize(90, b'Z');
        raw.push(b'\n');
        let line = acc.feed_bytes(&raw).unwrap();
        assert!(line.is_truncated());
        assert_eq!(line.len(), 63);

        // Truncated content still parses; the name is cut to the alarm bound
        if let Ok(command) = Command::from_line(&line) {
            controller.handle(&command, Some(&now));
        }
        assert_eq!(controller.store().get(0).unwrap().name.as_str(), "KEEP");
        assert!(controller.store().len() <= 2);
    }
}
