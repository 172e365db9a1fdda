//! Listing detail page and the submission form.

use creth_router::Route;
use creth_types::listing::Listing;
use tracing::info;

use crate::collaborators::StoredFile;
use crate::{catalog, AppContext, AppError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub description: String,
    pub link: Option<String>,
    pub deliverable: Option<StoredFile>,
}

pub struct ListingDetailView {
    listing: Listing,
    draft: SubmissionDraft,
    submitted: bool,
}

impl ListingDetailView {
    /// Open the listing with `id` from the catalog.
    pub fn open(id: &str) -> Result<Self> {
        let listing =
            catalog::find_listing(id).ok_or_else(|| AppError::ListingNotFound(id.to_string()))?;
        Ok(Self::new(listing))
    }

    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            draft: SubmissionDraft::default(),
            submitted: false,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.draft.description = text.into();
    }

    /// Set the optional external link. Blank input clears it.
    pub fn set_link(&mut self, link: &str) {
        let link = link.trim();
        self.draft.link = (!link.is_empty()).then(|| link.to_string());
    }

    /// Upload a deliverable through the content store, replacing any
    /// previous one.
    pub fn attach_file(&mut self, ctx: &AppContext, name: &str, data: &[u8]) -> Result<&StoredFile> {
        let file = ctx.content().put(name, data)?;
        info!(listing = %self.listing.id, cid = %file.cid, "deliverable attached");
        Ok(self.draft.deliverable.insert(file))
    }

    pub fn remove_file(&mut self) -> Option<StoredFile> {
        self.draft.deliverable.take()
    }

    /// Bounties need a deliverable; every listing needs a description.
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<()> {
        if self.draft.description.trim().is_empty() {
            return Err(AppError::EmptyDescription);
        }
        if self.listing.is_bounty() && self.draft.deliverable.is_none() {
            return Err(AppError::MissingDeliverable);
        }
        Ok(())
    }

    pub fn submit(&mut self) -> Result<()> {
        self.validate()?;
        self.submitted = true;
        info!(
            listing = %self.listing.id,
            cid = self.draft.deliverable.as_ref().map(|f| f.cid.as_str()),
            "submission sent"
        );
        Ok(())
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Reopen the form with the previous draft.
    pub fn edit_submission(&mut self) {
        self.submitted = false;
    }

    pub fn message_sponsor(&self, ctx: &mut AppContext) -> Route {
        ctx.navigate_to(&Route::Messages {
            peer: Some(self.listing.sponsor_id.clone()),
        })
    }

    pub fn back(&self, ctx: &mut AppContext) -> Route {
        ctx.navigate_to(&Route::Explore)
    }
}
