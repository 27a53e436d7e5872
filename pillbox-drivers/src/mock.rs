//! Mock embedded-hal peripherals for driver tests

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, I2c, Operation, SevenBitAddress};

/// Output pin remembering its level
#[derive(Debug, Default)]
pub struct MockPin {
    pub high: bool,
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Register-file I2C device
///
/// A write sets the register pointer from its first byte and stores the
/// rest sequentially; a read returns bytes from the pointer onwards.
/// Every raw write is also logged for byte-stream devices.
#[derive(Debug)]
pub struct MockI2c {
    pub address: u8,
    pub registers: [u8; 64],
    pub pointer: usize,
    pub writes: std::vec::Vec<u8>,
    pub fail: bool,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 64],
            pointer: 0,
            writes: std::vec::Vec::new(),
            fail: false,
        }
    }
}

impl I2cErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        if self.fail || address != self.address {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.writes.extend_from_slice(bytes);
                    if let Some((&reg, rest)) = bytes.split_first() {
                        self.pointer = reg as usize;
                        for &b in rest {
                            self.registers[self.pointer % 64] = b;
                            self.pointer += 1;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.registers[self.pointer % 64];
                        self.pointer += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
