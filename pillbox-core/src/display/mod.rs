//! Status display model
//!
//! Screens are built here as plain text and pushed to any
//! [`TextDisplay`](crate::traits::TextDisplay).

pub mod renderer;
pub mod screen;

pub use renderer::*;
pub use screen::{Row, Screen, COLUMNS, ROWS};

/// Transient notice timing
///
/// While a notice is up the periodic status refresh is suppressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticeTimer {
    until_ms: Option<u64>,
}

impl NoticeTimer {
    pub const fn new() -> Self {
        Self { until_ms: None }
    }

    /// Show a notice for `duration_ms` starting at `now_ms`
    pub fn start(&mut self, now_ms: u64, duration_ms: u32) {
        self.until_ms = Some(now_ms + duration_ms as u64);
    }

    /// Whether a notice is still up; expires it once its time is over
    pub fn is_active(&mut self, now_ms: u64) -> bool {
        match self.until_ms {
            Some(until) if now_ms < until => true,
            Some(_) => {
                self.until_ms = None;
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires() {
        let mut notice = NoticeTimer::new();
        assert!(!notice.is_active(0));
        notice.start(100, 2000);
        assert!(notice.is_active(100));
        assert!(notice.is_active(2099));
        assert!(!notice.is_active(2100));
        assert!(!notice.is_active(2101));
    }
}
