//! Directory of known peers, used to name new conversations and to
//! search for people to message.

use serde::{Deserialize, Serialize};

/// Avatar shown for peers with no known initials.
pub const UNKNOWN_AVATAR: &str = "??";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub address: String,
    pub username: String,
    /// Initials rendered in the avatar bubble.
    pub avatar: String,
}

#[derive(Clone, Debug, Default)]
pub struct PeerRegistry {
    peers: Vec<PeerEntry>,
}

impl PeerRegistry {
    pub fn new(peers: Vec<PeerEntry>) -> Self {
        Self { peers }
    }

    /// The peers known to the client out of the box.
    pub fn builtin() -> Self {
        let peers = [
            ("0x1111222233334444555566667777888899990000", "vitalik.eth", "V"),
            ("0x3333444455556666777788889999000011112222", "cryptopunk_99", "CP"),
            ("0x5555666677778888999900001111222233334444", "base_builder", "BB"),
            ("0x7777888899990000111122223333444455556666", "optimism_prime", "OP"),
            ("ef-research", "EF Research Pool", "EF"),
            ("defi-dao", "LendProtocol Core", "LP"),
        ];
        Self::new(
            peers
                .into_iter()
                .map(|(address, username, avatar)| PeerEntry {
                    address: address.to_string(),
                    username: username.to_string(),
                    avatar: avatar.to_string(),
                })
                .collect(),
        )
    }

    pub fn lookup(&self, address: &str) -> Option<&PeerEntry> {
        self.peers.iter().find(|p| p.address == address)
    }

    /// Case-insensitive substring search over username and address.
    pub fn search(&self, query: &str) -> Vec<&PeerEntry> {
        let needle = query.to_lowercase();
        self.peers
            .iter()
            .filter(|p| {
                p.username.to_lowercase().contains(&needle)
                    || p.address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Display name for a new conversation.
    ///
    /// Explicit name, then registry username, then a shortened wallet
    /// address, then the raw identifier.
    pub fn display_name(&self, address: &str, explicit: Option<&str>) -> String {
        if let Some(name) = explicit.filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        if let Some(entry) = self.lookup(address) {
            return entry.username.clone();
        }
        if looks_like_wallet_address(address) {
            return shorten_address(address);
        }
        address.to_string()
    }

    /// Avatar initials for a new conversation.
    pub fn avatar(&self, address: &str, explicit: Option<&str>) -> String {
        if let Some(avatar) = explicit.filter(|a| !a.trim().is_empty()) {
            return avatar.to_string();
        }
        self.lookup(address)
            .map(|entry| entry.avatar.clone())
            .unwrap_or_else(|| UNKNOWN_AVATAR.to_string())
    }
}

/// `0x` followed by hex digits, long enough to be worth shortening.
pub fn looks_like_wallet_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(digits) => address.len() > 10 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// `0x1234...abcd`: first 6 and last 4 characters.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_resolution_order() {
        let registry = PeerRegistry::builtin();
        assert_eq!(registry.display_name("defi-dao", Some("Custom")), "Custom");
        assert_eq!(registry.display_name("defi-dao", None), "LendProtocol Core");
        assert_eq!(
            registry.display_name("0xabcdef0123456789abcdef0123456789abcd1234", None),
            "0xabcd...1234"
        );
        assert_eq!(registry.display_name("some-dao", None), "some-dao");
        assert_eq!(registry.display_name("0x12", None), "0x12");
    }

    #[test]
    fn test_blank_explicit_name_is_ignored() {
        let registry = PeerRegistry::builtin();
        assert_eq!(registry.display_name("ef-research", Some("  ")), "EF Research Pool");
    }

    #[test]
    fn test_avatar_resolution() {
        let registry = PeerRegistry::builtin();
        assert_eq!(registry.avatar("ef-research", None), "EF");
        assert_eq!(registry.avatar("ef-research", Some("X")), "X");
        assert_eq!(registry.avatar("stranger", None), UNKNOWN_AVATAR);
    }

    #[test]
    fn test_wallet_address_detection() {
        assert!(looks_like_wallet_address("0x1111222233334444555566667777888899990000"));
        assert!(!looks_like_wallet_address("0x4c21...8e2f"));
        assert!(!looks_like_wallet_address("ef-research"));
        assert!(!looks_like_wallet_address("0xabc"));
    }

    #[test]
    fn test_search_matches_username_or_address() {
        let registry = PeerRegistry::builtin();
        let hits = registry.search("BUILDER");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "base_builder");

        let hits = registry.search("0x7777");
        assert_eq!(hits[0].username, "optimism_prime");

        assert_eq!(registry.search("").len(), 6);
    }
}
