//! Main controller task
//!
//! Owns the alarm model and the RTC. Wakes on every clock tick to match
//! alarms, and on every command from the companion link.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{block_for, Duration};
use portable_atomic::Ordering;

use pillbox_core::clock::CalendarTime;
use pillbox_core::config::DispenserConfig;
use pillbox_core::controller::{CommandOutcome, Controller};
use pillbox_core::dispense::DispenseRequest;
use pillbox_protocol::Command;

use crate::board::Rtc;
use crate::channels::{StatusSnapshot, COMMAND_CHANNEL, DISPENSE_REQUESTS, DISPENSING, STATUS};
use crate::tasks::tick::TICK_SIGNAL;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut rtc: Rtc, config: DispenserConfig) {
    info!("Controller task started");

    let mut controller = Controller::new(&config.schedule);
    let retry_delay = Duration::from_millis(config.clock.retry_delay_ms as u64);

    loop {
        match select(COMMAND_CHANNEL.receive(), TICK_SIGNAL.wait()).await {
            Either::First(command) => {
                let now = read_clock(&mut rtc, retry_delay);
                handle_command(&mut controller, &mut rtc, &command, now.as_ref());
                publish(&controller, now);
            }

            Either::Second(_uptime_ms) => {
                let now = read_clock(&mut rtc, retry_delay);
                let outcome = controller.tick(now.as_ref(), |request| {
                    info!("Alarm fired: {}", request.name.as_str());
                    forward(request);
                });

                if let Some(outcome) = outcome {
                    if outcome.rebuilt {
                        info!(
                            "Schedule rebuilt for {:?}: {} alarms",
                            controller.schedule().day(),
                            controller.schedule().len()
                        );
                    }
                }
                publish(&controller, now);
            }
        }
    }
}

/// Apply a command and carry out its hardware effects
fn handle_command(
    controller: &mut Controller,
    rtc: &mut Rtc,
    command: &Command,
    now: Option<&CalendarTime>,
) {
    match controller.handle(command, now) {
        CommandOutcome::SetClock(time) => match rtc.set(&time) {
            Ok(()) => {
                info!(
                    "Clock set to {}-{:02}-{:02} {:02}:{:02}:{:02}",
                    time.year, time.month, time.day, time.hour, time.minute, time.second
                );
                controller.clock_set(&time);
            }
            Err(e) => warn!("Failed to set clock: {:?}", e),
        },
        CommandOutcome::Dispense(request) => {
            info!("Manual dispense: {}", request.name.as_str());
            forward(request);
        }
        CommandOutcome::Dropped(reason) => {
            warn!("Command dropped: {:?}", reason);
        }
        outcome => {
            debug!("Command applied: {:?}", outcome);
            if command.mutates_alarms() {
                info!("Alarm store now holds {} alarms", controller.store().len());
            }
        }
    }
}

/// Read the clock, logging availability changes
fn read_clock(rtc: &mut Rtc, retry_delay: Duration) -> Option<CalendarTime> {
    let was_available = rtc.is_available();
    let reading = rtc.read(|| block_for(retry_delay)).ok();

    match (was_available, reading.is_some()) {
        (true, false) => warn!("Clock unavailable"),
        (false, true) => info!("Clock available again"),
        _ => {}
    }
    reading
}

/// Hand a request to the dispense task unless a cycle is already running
fn forward(request: DispenseRequest) {
    if DISPENSING.swap(true, Ordering::AcqRel) {
        warn!(
            "Dispense in progress, dropping {:?} request for {}",
            request.origin,
            request.name.as_str()
        );
        return;
    }

    if DISPENSE_REQUESTS.try_send(request).is_err() {
        warn!("Dispense channel full, dropping request");
        DISPENSING.store(false, Ordering::Release);
    }
}

/// Publish the latest view for the display
fn publish(controller: &Controller, now: Option<CalendarTime>) {
    STATUS.signal(StatusSnapshot {
        now,
        link: controller.link().clone(),
    });
}
