//! Tick task for clock polling
//!
//! Wakes the controller at the configured poll interval. The interval is
//! kept below one second so no wall-clock minute can be skipped.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Signal to notify controller of tick
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u64> = Signal::new();

/// Tick task - sends periodic tick signals with uptime
#[embassy_executor::task]
pub async fn tick_task(poll_interval_ms: u32) {
    info!("Tick task started ({}ms)", poll_interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms as u64));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(Instant::now().as_millis());
    }
}
