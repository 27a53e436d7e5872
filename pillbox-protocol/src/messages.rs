//! Messages sent from the dispenser to the companion controller
//!
//! The device side of the link is almost silent: it announces readiness
//! once after boot and otherwise only listens.

/// Readiness announcement payload
pub const READY: &[u8] = b"PILLBOX:READY";

/// Line terminator used for outbound messages
pub const TERMINATOR: &[u8] = b"\r\n";

/// Messages from the dispenser to the companion controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Boot finished, commands are accepted from now on
    Ready,
}

impl DeviceMessage {
    /// Payload without the terminator
    pub fn payload(&self) -> &'static [u8] {
        match self {
            DeviceMessage::Ready => READY,
        }
    }

    /// Encode into `buf`, returning the number of bytes written
    ///
    /// Returns `None` if `buf` is too small.
    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let payload = self.payload();
        let len = payload.len() + TERMINATOR.len();
        if buf.len() < len {
            return None;
        }
        buf[..payload.len()].copy_from_slice(payload);
        buf[payload.len()..len].copy_from_slice(TERMINATOR);
        Some(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_encoding() {
        let mut buf = [0u8; 32];
        let len = DeviceMessage::Ready.encode(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"PILLBOX:READY\r\n");
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(DeviceMessage::Ready.encode(&mut buf), None);
    }
}
