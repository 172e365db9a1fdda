//! Marketplace listing catalog entries.

use serde::{Deserialize, Serialize};

/// Kind of work a listing offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    Bounty,
    Project,
    Grant,
}

/// Listing category used by the explore filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingCategory {
    Development,
    Design,
    Writing,
    Video,
    Marketing,
    Hackathon,
}

impl ListingCategory {
    /// All categories in display order.
    pub const ALL: [ListingCategory; 6] = [
        ListingCategory::Development,
        ListingCategory::Design,
        ListingCategory::Writing,
        ListingCategory::Video,
        ListingCategory::Marketing,
        ListingCategory::Hackathon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCategory::Development => "DEVELOPMENT",
            ListingCategory::Design => "DESIGN",
            ListingCategory::Writing => "WRITING",
            ListingCategory::Video => "VIDEO",
            ListingCategory::Marketing => "MARKETING",
            ListingCategory::Hackathon => "HACKATHON",
        }
    }

    /// Parse the upper-case wire name. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

/// Settlement network for a listing's reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub enum BlockchainNetwork {
    Ethereum,
    Optimism,
    Base,
}

/// A read-only catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub category: ListingCategory,
    pub status: ListingStatus,
    pub reward_amount: u64,
    pub reward_token: String,
    pub network: BlockchainNetwork,
    pub sponsor_id: String,
    pub sponsor_name: String,
    pub deadline: String,
    pub tags: Vec<String>,
}

impl Listing {
    /// Case-insensitive substring match over the title and every tag.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    pub fn is_bounty(&self) -> bool {
        self.listing_type == ListingType::Bounty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Listing {
        Listing {
            id: "2".to_string(),
            title: "DeFi Dashboard Redesign".to_string(),
            description: String::new(),
            listing_type: ListingType::Bounty,
            category: ListingCategory::Design,
            status: ListingStatus::Open,
            reward_amount: 1500,
            reward_token: "USDC".to_string(),
            network: BlockchainNetwork::Ethereum,
            sponsor_id: "defi-dao".to_string(),
            sponsor_name: "LendProtocol".to_string(),
            deadline: "2024-05-30".to_string(),
            tags: vec!["UI/UX".to_string(), "Figma".to_string()],
        }
    }

    #[test]
    fn test_matches_text_title_and_tags() {
        let listing = sample();
        assert!(listing.matches_text("figma"));
        assert!(listing.matches_text("DASHBOARD"));
        assert!(listing.matches_text(""));
        assert!(!listing.matches_text("solidity"));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["type"], "BOUNTY");
        assert_eq!(json["category"], "DESIGN");
        assert_eq!(json["rewardAmount"], 1500);
        assert_eq!(json["network"], "Ethereum");
        assert_eq!(json["sponsorId"], "defi-dao");
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(ListingCategory::from_name("design"), Some(ListingCategory::Design));
        assert_eq!(ListingCategory::from_name("All"), None);
    }
}
