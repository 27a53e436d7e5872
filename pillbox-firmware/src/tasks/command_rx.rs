//! Companion link receive task
//!
//! Assembles newline-terminated command lines from UART bytes and hands
//! parsed commands to the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use pillbox_protocol::{Command, LineAccumulator, ParseError};

use crate::channels::{DisplayEvent, COMMAND_CHANNEL, DISPLAY_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Command RX task - receives and parses lines from the companion controller
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx) {
    info!("Command RX task started");

    let mut lines = LineAccumulator::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if let Some(line) = lines.feed(byte) {
                        if line.is_truncated() {
                            warn!("Command line too long, truncated");
                            if DISPLAY_CHANNEL.try_send(DisplayEvent::CommandTooLong).is_err() {
                                warn!("Display channel full, dropping notice");
                            }
                        }

                        match Command::from_line(&line) {
                            Ok(cmd) => {
                                debug!("Command: {:?}", cmd);
                                COMMAND_CHANNEL.send(cmd).await;
                            }
                            Err(ParseError::Empty) => {}
                            Err(e) => {
                                warn!("Failed to parse command: {:?}", e);
                            }
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
