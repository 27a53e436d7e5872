//! Board wiring
//!
//! | Function | Peripheral | Pins |
//! |---|---|---|
//! | Companion link | UART0, 9600 8N1 | GP0 TX, GP1 RX |
//! | DS1307 RTC | I2C0 | GP8 SDA, GP9 SCL |
//! | ULN2003 IN1-IN4 | GPIO | GP10-GP13 |
//! | HD44780 LCD (PCF8574) | I2C1 | GP14 SDA, GP15 SCL |
//! | Status LED | GPIO | GP25 |

use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_time::Delay;

use pillbox_core::clock::ClockGuard;
use pillbox_drivers::display::Hd44780;
use pillbox_drivers::rtc::Ds1307;
use pillbox_drivers::stepper::Uln2003;

/// Companion link baud rate
pub const COMMAND_BAUD: u32 = 9600;

/// I2C bus clock for both buses
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Guarded battery-backed RTC
pub type Rtc = ClockGuard<Ds1307<I2c<'static, I2C0, Blocking>>>;

/// Status LCD
pub type Lcd = Hd44780<I2c<'static, I2C1, Blocking>, Delay>;

/// Tray stepper
pub type Stepper = Uln2003<Output<'static>>;
