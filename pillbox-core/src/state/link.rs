//! Pairing and connectivity status

use heapless::String;

/// Maximum stored characters of the owner name
pub const MAX_OWNER_LEN: usize = 11;

/// Bounded owner name
pub type OwnerName = String<MAX_OWNER_LEN>;

/// Companion controller link status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkState {
    linked: bool,
    owner: OwnerName,
    wifi: bool,
}

impl LinkState {
    pub const fn new() -> Self {
        Self {
            linked: false,
            owner: String::new(),
            wifi: false,
        }
    }

    /// Paired to `owner` (truncated on a character boundary)
    pub fn link(&mut self, owner: &str) {
        self.linked = true;
        self.owner.clear();
        for c in owner.chars() {
            if self.owner.push(c).is_err() {
                break;
            }
        }
    }

    /// Pairing removed; the owner name is cleared
    pub fn unlink(&mut self) {
        self.linked = false;
        self.owner.clear();
    }

    pub fn set_wifi(&mut self, connected: bool) {
        self.wifi = connected;
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn wifi_connected(&self) -> bool {
        self.wifi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_unlink() {
        let mut link = LinkState::new();
        assert!(!link.is_linked());

        link.link("Maria");
        assert!(link.is_linked());
        assert_eq!(link.owner(), "Maria");

        link.unlink();
        assert!(!link.is_linked());
        assert_eq!(link.owner(), "");
    }

    #[test]
    fn test_owner_truncated() {
        let mut link = LinkState::new();
        link.link("Bartholomew Jones");
        assert_eq!(link.owner(), "Bartholomew");
    }

    #[test]
    fn test_wifi_independent_of_link() {
        let mut link = LinkState::new();
        link.set_wifi(true);
        assert!(link.wifi_connected());
        link.unlink();
        assert!(link.wifi_connected());
    }
}
