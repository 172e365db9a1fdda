//! Profile page: tabs, the edit modal with image uploads, and sharing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use creth_db::preferences::SaveOutcome;
use creth_types::listing::Listing;
use creth_types::preferences::{UserProfile, UserRole};
use tracing::{debug, info, warn};

use crate::catalog::{self, Credential};
use crate::{AppContext, AppError, Result};

/// Images above this size are accepted but may not survive a reload.
pub const LARGE_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const LARGE_IMAGE_WARNING: &str =
    "Warning: File is very large and might not persist after refresh.";
pub const SLIM_SAVE_WARNING: &str =
    "Images were too large to store and were replaced with hosted defaults.";
pub const MEMORY_ONLY_WARNING: &str =
    "Failed to persist images. Changes will be lost on reload. Try smaller file sizes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    /// Soulbound credential vault.
    Nfts,
    Portfolio,
    /// Sponsor's active gigs.
    Listings,
}

impl ProfileTab {
    pub fn for_role(role: UserRole) -> &'static [ProfileTab] {
        match role {
            UserRole::Talent => &[ProfileTab::Nfts, ProfileTab::Portfolio],
            UserRole::Sponsor => &[ProfileTab::Listings],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ProfileTab::Nfts => "nfts",
            ProfileTab::Portfolio => "portfolio",
            ProfileTab::Listings => "listings",
        }
    }
}

/// Editable subset of the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub username: String,
    pub bio: String,
    pub avatar_url: String,
    pub banner_url: String,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            banner_url: profile.banner_url.clone(),
        }
    }
}

impl ProfileDraft {
    fn apply_to(&self, profile: &UserProfile) -> UserProfile {
        UserProfile {
            username: self.username.trim().to_string(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
            banner_url: self.banner_url.clone(),
            ..profile.clone()
        }
    }
}

/// Encode an uploaded image as a `data:` URI.
pub fn image_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub struct ProfileView {
    role: UserRole,
    tab: ProfileTab,
    draft: Option<ProfileDraft>,
    warning: Option<&'static str>,
}

impl ProfileView {
    pub fn new(ctx: &AppContext) -> Self {
        let role = ctx.role();
        Self {
            role,
            tab: Self::default_tab(role),
            draft: None,
            warning: None,
        }
    }

    fn default_tab(role: UserRole) -> ProfileTab {
        match role {
            UserRole::Talent => ProfileTab::Nfts,
            UserRole::Sponsor => ProfileTab::Listings,
        }
    }

    /// Pick up a role switch made while the page is open.
    ///
    /// The tab falls back to the new role's default. Returns whether the
    /// role changed.
    pub fn sync_role(&mut self, ctx: &AppContext) -> bool {
        let role = ctx.role();
        if role == self.role {
            return false;
        }
        debug!(?role, "profile tabs follow role switch");
        self.role = role;
        self.tab = Self::default_tab(role);
        true
    }

    pub fn tabs(&self) -> &'static [ProfileTab] {
        ProfileTab::for_role(self.role)
    }

    pub fn tab(&self) -> ProfileTab {
        self.tab
    }

    /// Switch tabs. Tabs not offered for the current role are ignored.
    pub fn select_tab(&mut self, tab: ProfileTab) -> bool {
        let offered = self.tabs().contains(&tab);
        if offered {
            self.tab = tab;
        }
        offered
    }

    pub fn credentials(&self) -> Vec<Credential> {
        catalog::credentials()
    }

    pub fn active_gigs(&self) -> Vec<Listing> {
        catalog::listings()
    }

    // ---- Edit modal ----

    pub fn open_editor(&mut self, ctx: &AppContext) -> &mut ProfileDraft {
        self.warning = None;
        self.draft.insert(ProfileDraft::from(ctx.profile()))
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Result<&mut ProfileDraft> {
        self.draft.as_mut().ok_or(AppError::NotEditing)
    }

    /// Storage warning to show in the modal, if any.
    pub fn warning(&self) -> Option<&'static str> {
        self.warning
    }

    pub fn attach_avatar(&mut self, mime: &str, bytes: &[u8]) -> Result<Option<&'static str>> {
        let uri = self.read_image(mime, bytes);
        self.draft_mut()?.avatar_url = uri;
        Ok(self.warning)
    }

    pub fn attach_banner(&mut self, mime: &str, bytes: &[u8]) -> Result<Option<&'static str>> {
        let uri = self.read_image(mime, bytes);
        self.draft_mut()?.banner_url = uri;
        Ok(self.warning)
    }

    fn read_image(&mut self, mime: &str, bytes: &[u8]) -> String {
        self.warning = (bytes.len() > LARGE_IMAGE_BYTES).then_some(LARGE_IMAGE_WARNING);
        image_data_uri(mime, bytes)
    }

    /// Commit the draft to the profile and persist it.
    ///
    /// The editor closes unless the record could only be kept in memory, in
    /// which case it stays open with a warning.
    pub fn save(&mut self, ctx: &mut AppContext) -> Result<SaveOutcome> {
        let draft = self.draft.as_ref().ok_or(AppError::NotEditing)?;
        let profile = draft.apply_to(ctx.profile());
        profile.validate()?;

        let outcome = ctx.update_profile(profile);
        match outcome {
            SaveOutcome::Stored => {
                self.warning = None;
                self.draft = None;
            }
            SaveOutcome::StoredSlim => {
                self.warning = Some(SLIM_SAVE_WARNING);
                self.draft = None;
            }
            SaveOutcome::InMemoryOnly => {
                warn!("profile save not persisted");
                self.warning = Some(MEMORY_ONLY_WARNING);
            }
        }
        info!(?outcome, "profile saved");
        Ok(outcome)
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.warning = None;
    }

    // ---- Public view ----

    pub fn share_url(&self, ctx: &AppContext) -> String {
        format!(
            "https://creth.app/profile/{}",
            ctx.profile().username.to_lowercase()
        )
    }

    /// Reputation as a visitor sees it. Hidden when the owner opted out.
    pub fn visible_reputation(&self, ctx: &AppContext, viewer_is_owner: bool) -> Option<u32> {
        (viewer_is_owner || ctx.privacy().public_rep).then_some(ctx.profile().reputation)
    }
}
