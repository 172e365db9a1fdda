//! Submission records for the My Work and Sponsor Portal pages.

use serde::{Deserialize, Serialize};

use crate::listing::ListingType;

/// Review status of a talent's submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Review,
    Won,
    Paid,
    Rejected,
}

impl SubmissionStatus {
    /// Still awaiting a sponsor decision.
    pub fn is_active(self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Review)
    }

    /// Selected as a winner, paid or not.
    pub fn is_won(self) -> bool {
        matches!(self, SubmissionStatus::Won | SubmissionStatus::Paid)
    }
}

/// A submission made by the signed-in talent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MySubmission {
    pub id: String,
    pub title: String,
    pub sponsor: String,
    pub submitted_at: String,
    pub status: SubmissionStatus,
    pub reward: String,
    pub network: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub details: Option<String>,
}

/// A submission received by a sponsor, awaiting review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedSubmission {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub title: String,
    pub submitted_at: String,
    pub content: String,
    pub reputation: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_groups() {
        assert!(SubmissionStatus::Pending.is_active());
        assert!(SubmissionStatus::Review.is_active());
        assert!(!SubmissionStatus::Won.is_active());
        assert!(SubmissionStatus::Paid.is_won());
        assert!(!SubmissionStatus::Rejected.is_won());
        assert!(!SubmissionStatus::Rejected.is_active());
    }
}
