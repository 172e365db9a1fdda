//! Sponsor portal: the create-listing wizard with its staking deposit, and
//! the manage view where submissions are reviewed and paid out.
//!
//! Running escrow flows are owned by the view. Dropping the view drops the
//! handles, which cancels any transition still pending.

use creth_escrow::TransactionHandle;
use creth_types::listing::{Listing, ListingCategory, ListingType};
use creth_types::transaction::{TransactionState, TxKind};
use creth_types::work::ReceivedSubmission;
use tracing::info;

use crate::{catalog, AppContext, AppError, Result};

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortalView {
    Create,
    #[default]
    Manage,
}

/// Fields of the create-listing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub category: ListingCategory,
    pub listing_type: ListingType,
    pub title: String,
    /// As typed; parsed on launch.
    pub reward: String,
    pub description: String,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            category: ListingCategory::Development,
            listing_type: ListingType::Bounty,
            title: String::new(),
            reward: "1000".to_string(),
            description: String::new(),
        }
    }
}

impl ListingDraft {
    /// Reward as a whole number of tokens. Thousands separators are accepted.
    pub fn reward_amount(&self) -> Result<u64> {
        self.reward
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| AppError::InvalidReward(self.reward.clone()))
    }
}

pub struct SponsorPortalView {
    view: PortalView,
    step: u8,
    draft: ListingDraft,
    stake: Option<TransactionHandle>,
    managing: Option<Listing>,
    submissions: Vec<ReceivedSubmission>,
    reviewing: Option<String>,
    release: Option<TransactionHandle>,
}

impl Default for SponsorPortalView {
    fn default() -> Self {
        Self {
            view: PortalView::Manage,
            step: FIRST_STEP,
            draft: ListingDraft::default(),
            stake: None,
            managing: None,
            submissions: catalog::received_submissions(),
            reviewing: None,
            release: None,
        }
    }
}

impl SponsorPortalView {
    pub fn view(&self) -> PortalView {
        self.view
    }

    pub fn show_create(&mut self) {
        self.view = PortalView::Create;
    }

    pub fn show_manage(&mut self) {
        self.view = PortalView::Manage;
    }

    // ---- Create wizard ----

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn next_step(&mut self) -> u8 {
        self.step = (self.step + 1).min(LAST_STEP);
        self.step
    }

    pub fn previous_step(&mut self) -> u8 {
        self.step = self.step.saturating_sub(1).max(FIRST_STEP);
        self.step
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ListingDraft {
        &mut self.draft
    }

    /// Deposit the reward into the staking pool.
    ///
    /// Starts a STAKE flow; any earlier stake flow still running is cancelled.
    /// Must run inside a Tokio runtime, otherwise [`AppError::Escrow`].
    pub fn launch(&mut self, ctx: &AppContext) -> Result<&TransactionHandle> {
        let amount = self.draft.reward_amount()?;
        let handle = ctx.simulator().start(TxKind::Stake)?;
        info!(
            tx = handle.id().0,
            amount,
            category = self.draft.category.as_str(),
            title = %self.draft.title,
            "listing launch staked"
        );
        Ok(self.stake.insert(handle))
    }

    pub fn stake_state(&self) -> Option<TransactionState> {
        self.stake.as_ref().map(TransactionHandle::state)
    }

    pub fn stake(&self) -> Option<&TransactionHandle> {
        self.stake.as_ref()
    }

    /// Back to an empty wizard after a launch.
    pub fn reset_wizard(&mut self) {
        self.stake = None;
        self.step = FIRST_STEP;
        self.draft = ListingDraft::default();
    }

    // ---- Manage ----

    pub fn manage_listing(&mut self, id: &str) -> Result<&Listing> {
        let listing =
            catalog::find_listing(id).ok_or_else(|| AppError::ListingNotFound(id.to_string()))?;
        self.view = PortalView::Manage;
        Ok(self.managing.insert(listing))
    }

    pub fn managed_listing(&self) -> Option<&Listing> {
        self.managing.as_ref()
    }

    pub fn submissions(&self) -> &[ReceivedSubmission] {
        &self.submissions
    }

    pub fn review(&mut self, submission_id: &str) -> Result<&ReceivedSubmission> {
        let submission = self
            .submissions
            .iter()
            .find(|s| s.id == submission_id)
            .ok_or_else(|| AppError::SubmissionNotFound(submission_id.to_string()))?;
        self.reviewing = Some(submission.id.clone());
        Ok(submission)
    }

    pub fn reviewing(&self) -> Option<&ReceivedSubmission> {
        let id = self.reviewing.as_deref()?;
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn close_review(&mut self) {
        self.reviewing = None;
    }

    /// Pay `submission_id` from the staking pool.
    ///
    /// Closes the review panel and starts a RELEASE flow.
    pub fn release_funds(&mut self, ctx: &AppContext, submission_id: &str) -> Result<&TransactionHandle> {
        if !self.submissions.iter().any(|s| s.id == submission_id) {
            return Err(AppError::SubmissionNotFound(submission_id.to_string()));
        }
        let handle = ctx.simulator().start(TxKind::Release)?;
        self.reviewing = None;
        info!(
            tx = handle.id().0,
            submission = submission_id,
            listing = self.managing.as_ref().map(|l| l.id.as_str()),
            "releasing reward"
        );
        Ok(self.release.insert(handle))
    }

    pub fn release_state(&self) -> Option<TransactionState> {
        self.release.as_ref().map(TransactionHandle::state)
    }

    pub fn release(&self) -> Option<&TransactionHandle> {
        self.release.as_ref()
    }

    /// Leave the management panel.
    pub fn finish(&mut self) {
        self.release = None;
        self.reviewing = None;
        self.managing = None;
    }
}
