//! Pillbox - Weekly Medication Dispenser Firmware
//!
//! Main firmware binary for RP2040-based dispensers. A 14-compartment tray
//! (morning and evening for each weekday) is rotated by a stepper to the
//! compartment due at each alarm, held open, then returned to the empty
//! rest position. Alarms and the clock are set over a line-oriented UART
//! link from a paired companion controller.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{block_for, Delay, Duration};
use embedded_io_async::Write;
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pillbox_core::clock::{CalendarTime, ClockGuard};
use pillbox_core::display::{renderer, Screen};
use pillbox_core::traits::TextDisplay;
use pillbox_drivers::display::{Hd44780, PCF8574_DEFAULT_ADDRESS};
use pillbox_drivers::rtc::Ds1307;
use pillbox_drivers::stepper::Uln2003;
use pillbox_protocol::DeviceMessage;

use crate::board::{Lcd, Rtc, COMMAND_BAUD, I2C_FREQUENCY_HZ};
use crate::channels::DISPENSING;
use crate::config::load_config;

mod board;
mod channels;
mod config;
mod tasks;

/// Firmware build time in Unix seconds, stamped by build.rs
const BUILD_UNIX_TIME: &str = env!("PILLBOX_BUILD_UNIX_TIME");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pillbox firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;

    // Status LCD on I2C1
    let lcd_bus = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c_config);
    let mut lcd: Lcd = Hd44780::new(lcd_bus, Delay, PCF8574_DEFAULT_ADDRESS);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed: {:?}", e);
    }
    show(&mut lcd, &renderer::welcome());
    info!("LCD initialized");

    // RTC on I2C0
    let rtc_bus = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c_config);
    let mut rtc: Rtc = ClockGuard::new(Ds1307::new(rtc_bus));
    check_clock(&mut rtc, Duration::from_millis(config.clock.retry_delay_ms as u64));

    // Companion link on UART0
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = COMMAND_BAUD;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (mut tx, rx) = uart.split();

    info!("UART initialized for companion link");

    let mut ready = [0u8; 32];
    if let Some(len) = DeviceMessage::Ready.encode(&mut ready) {
        match tx.write_all(&ready[..len]).await {
            Ok(()) => {
                let _ = tx.flush().await;
                info!("Announced readiness");
            }
            Err(e) => warn!("Failed to send ready message: {:?}", e),
        }
    }

    show(&mut lcd, &renderer::waiting_for_controller());

    // Tray stepper (ULN2003 IN1-IN4) and status LED
    let stepper = match Uln2003::new(
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
    ) {
        Ok(stepper) => stepper,
        Err(e) => match e {},
    };
    let led = Output::new(p.PIN_25, Level::Low);

    info!("Stepper initialized");

    // The self-test cycle holds the motor until it completes
    DISPENSING.store(true, Ordering::Release);

    // Spawn tasks
    spawner.spawn(tasks::tick_task(config.schedule.poll_interval_ms)).unwrap();
    spawner.spawn(tasks::command_rx_task(rx)).unwrap();
    spawner.spawn(tasks::controller_task(rtc, config)).unwrap();
    spawner.spawn(tasks::dispense_task(stepper, led, config)).unwrap();
    spawner.spawn(tasks::display_task(lcd, config.display)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do; holding `tx` keeps the UART TX half alive
    let _tx = tx;
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Check the RTC and seed it from the build time if it is not keeping time
fn check_clock(rtc: &mut Rtc, retry_delay: Duration) {
    let running = matches!(rtc.source_mut().is_running(), Ok(true));
    let reading = rtc.read(|| block_for(retry_delay));

    match (running, reading) {
        (true, Ok(now)) => {
            info!(
                "RTC running: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                now.year, now.month, now.day, now.hour, now.minute, now.second
            );
        }
        _ => {
            warn!("RTC halted or unreadable, seeding with build time");
            seed_clock(rtc);
        }
    }
}

fn seed_clock(rtc: &mut Rtc) {
    let seed = BUILD_UNIX_TIME
        .parse::<u64>()
        .ok()
        .and_then(|secs| CalendarTime::from_unix(secs).ok());

    match seed {
        Some(time) => match rtc.set(&time) {
            Ok(()) => info!(
                "RTC seeded: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                time.year, time.month, time.day, time.hour, time.minute, time.second
            ),
            // SETTIME from the companion recovers later
            Err(e) => warn!("Failed to seed RTC: {:?}", e),
        },
        None => warn!("Build timestamp unusable, RTC left unset"),
    }
}

fn show(lcd: &mut Lcd, screen: &Screen) {
    if let Err(e) = lcd.show(screen) {
        warn!("LCD write failed: {:?}", e);
    }
}
