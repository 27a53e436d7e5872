//! Display task
//!
//! Owns the LCD. Shows screens pushed by other tasks and refreshes the idle
//! status screen from the controller's latest snapshot.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::Ordering;

use pillbox_core::config::DisplayConfig;
use pillbox_core::display::{renderer, NoticeTimer, Screen};
use pillbox_core::traits::TextDisplay;

use crate::board::Lcd;
use crate::channels::{DisplayEvent, StatusSnapshot, DISPENSING, DISPLAY_CHANNEL, STATUS};

/// Display task - renders status, dispense and notice screens
#[embassy_executor::task]
pub async fn display_task(mut lcd: Lcd, config: DisplayConfig) {
    info!("Display task started");

    let mut refresh = Ticker::every(Duration::from_millis(config.refresh_ms as u64));
    let mut notice = NoticeTimer::new();
    let mut status: Option<StatusSnapshot> = None;

    loop {
        match select3(DISPLAY_CHANNEL.receive(), STATUS.wait(), refresh.next()).await {
            Either3::First(DisplayEvent::Show(screen)) => {
                show(&mut lcd, &screen);
            }

            Either3::First(DisplayEvent::CommandTooLong) => {
                show(&mut lcd, &renderer::command_too_long());
                notice.start(Instant::now().as_millis(), config.notice_ms);
            }

            Either3::Second(snapshot) => {
                status = Some(snapshot);
            }

            Either3::Third(()) => {
                // Dispense screens and notices own the panel while they last
                if DISPENSING.load(Ordering::Acquire)
                    || notice.is_active(Instant::now().as_millis())
                {
                    continue;
                }

                // Until the first snapshot the boot screen stays up
                if let Some(snapshot) = &status {
                    show(&mut lcd, &renderer::status(snapshot.now.as_ref(), &snapshot.link));
                }
            }
        }
    }
}

fn show(lcd: &mut Lcd, screen: &Screen) {
    if let Err(e) = lcd.show(screen) {
        warn!("LCD write failed: {:?}", e);
    }
}
