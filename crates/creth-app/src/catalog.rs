//! Static mock catalogs: listings, submissions and credentials.
//!
//! There is no marketplace backend; every view reads from these tables.

use creth_types::listing::{
    BlockchainNetwork, Listing, ListingCategory, ListingStatus, ListingType,
};
use creth_types::work::{MySubmission, ReceivedSubmission, SubmissionStatus};
use serde::Serialize;

/// A soulbound credential shown in the profile vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: u32,
    pub name: String,
    pub issued: String,
    pub image_url: String,
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    description: &str,
    listing_type: ListingType,
    category: ListingCategory,
    reward_amount: u64,
    reward_token: &str,
    sponsor: (&str, &str),
    deadline: &str,
    tags: &[&str],
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        listing_type,
        category,
        status: ListingStatus::Open,
        reward_amount,
        reward_token: reward_token.to_string(),
        network: BlockchainNetwork::Ethereum,
        sponsor_id: sponsor.0.to_string(),
        sponsor_name: sponsor.1.to_string(),
        deadline: deadline.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Open listings on the board.
pub fn listings() -> Vec<Listing> {
    vec![
        listing(
            "1",
            "Ethereum Protocol Research",
            "Help research and document EIP-4844 impact on blob throughput and fee markets.",
            ListingType::Project,
            ListingCategory::Development,
            3000,
            "USDC",
            ("ef-research", "Ethereum Foundation"),
            "2024-06-15",
            &["Research", "EVM", "Solidity"],
        ),
        listing(
            "2",
            "DeFi Dashboard Redesign",
            "Create a new UI for a prominent Ethereum lending protocol focusing on accessibility.",
            ListingType::Bounty,
            ListingCategory::Design,
            1500,
            "USDC",
            ("defi-dao", "LendProtocol"),
            "2024-05-30",
            &["UI/UX", "Figma", "Web3"],
        ),
        listing(
            "3",
            "Ethereum Security Explainer Video",
            "Produce a 2-minute animation explaining the merge and proof-of-stake security model.",
            ListingType::Bounty,
            ListingCategory::Video,
            2000,
            "ETH",
            ("edu-eth", "EthEducation"),
            "2024-06-20",
            &["Video", "Educational", "PoS"],
        ),
    ]
}

pub fn find_listing(id: &str) -> Option<Listing> {
    listings().into_iter().find(|l| l.id == id)
}

#[allow(clippy::too_many_arguments)]
fn my_submission(
    id: &str,
    title: &str,
    sponsor: &str,
    submitted_at: &str,
    status: SubmissionStatus,
    reward: &str,
    listing_type: ListingType,
    details: &str,
) -> MySubmission {
    MySubmission {
        id: id.to_string(),
        title: title.to_string(),
        sponsor: sponsor.to_string(),
        submitted_at: submitted_at.to_string(),
        status,
        reward: reward.to_string(),
        network: "Ethereum".to_string(),
        listing_type,
        details: Some(details.to_string()),
    }
}

/// Work the talent has submitted.
pub fn my_submissions() -> Vec<MySubmission> {
    vec![
        my_submission(
            "sub-1",
            "Ethereum Protocol Research",
            "Ethereum Foundation",
            "2024-05-10",
            SubmissionStatus::Review,
            "3,000 USDC",
            ListingType::Project,
            "Detailed analysis of blob throughput and potential fee market shifts post-4844.",
        ),
        my_submission(
            "sub-2",
            "DeFi Dashboard Redesign",
            "LendProtocol",
            "2024-04-28",
            SubmissionStatus::Won,
            "1,500 USDC",
            ListingType::Bounty,
            "Full Figma kit for the new V3 dashboard, focused on mobile-first accessibility.",
        ),
        my_submission(
            "sub-3",
            "Gas Optimization Research",
            "Individual Grant",
            "2024-03-15",
            SubmissionStatus::Paid,
            "0.5 ETH",
            ListingType::Grant,
            "Comprehensive report on state-expiry strategies for L2 sequencers.",
        ),
        my_submission(
            "sub-4",
            "Security Audit: Staking Contract",
            "StakeSafe",
            "2024-05-12",
            SubmissionStatus::Pending,
            "5,000 USDC",
            ListingType::Bounty,
            "Preliminary vulnerability assessment focused on reentrancy in the reward withdrawal logic.",
        ),
    ]
}

/// Submissions a sponsor receives on a managed listing.
pub fn received_submissions() -> Vec<ReceivedSubmission> {
    vec![
        ReceivedSubmission {
            id: "sub-1".to_string(),
            author: "EthBuilder_42".to_string(),
            avatar: "EB".to_string(),
            title: "Blob Market Analysis Tool".to_string(),
            submitted_at: "2h ago".to_string(),
            content: "I have developed a specialized CLI tool that tracks blob gas usage in \
                      real-time. It provides visualizations of the EIP-4844 fee market dynamics \
                      and includes a forecasting model for next-block blob prices."
                .to_string(),
            reputation: 850,
        },
        ReceivedSubmission {
            id: "sub-2".to_string(),
            author: "SoliditySage".to_string(),
            avatar: "SS".to_string(),
            title: "Fee Market Research Paper".to_string(),
            submitted_at: "5h ago".to_string(),
            content: "My submission is a comprehensive 20-page technical paper analyzing the \
                      first 30 days of blob throughput post-Dencun. It covers historical data, \
                      cross-L2 comparison, and protocol-level impact on Ethereum storage costs."
                .to_string(),
            reputation: 1200,
        },
    ]
}

pub fn credentials() -> Vec<Credential> {
    [
        (1, "Optimism Governance Guru", "March 2024", "photo-1639762681485-074b7f938ba0"),
        (2, "Arbitrum Security Warden", "Feb 2024", "photo-1642104704074-907c0698cbd9"),
        (3, "Base Bridge Builder", "Jan 2024", "photo-1620641788421-7a1c342ea42e"),
        (4, "Mainnet Mastermind", "Dec 2023", "photo-1622737133809-d95047b9e673"),
    ]
    .into_iter()
    .map(|(id, name, issued, photo)| Credential {
        id,
        name: name.to_string(),
        issued: issued.to_string(),
        image_url: format!("https://images.unsplash.com/{photo}?w=200&h=200&fit=crop"),
    })
    .collect()
}
