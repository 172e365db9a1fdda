//! User preference records persisted by the preference store.
//!
//! Each record is created with defaults on first load, edited in place by
//! the settings and profile pages, and written back after every change.

use serde::{Deserialize, Serialize};

use crate::{is_data_uri, Result, TypesError};

/// Default banner image used when an embedded banner cannot be stored.
pub const DEFAULT_BANNER_URL: &str =
    "https://images.unsplash.com/photo-1639322537228-f710d846310a?w=1200&h=400&fit=crop";

/// Stable avatar URL derived from a username.
pub fn fallback_avatar_url(username: &str) -> String {
    format!("https://i.pravatar.cc/300?u={username}")
}

/// Which side of the marketplace the user is acting as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Talent,
    Sponsor,
}

impl UserRole {
    pub fn toggled(self) -> Self {
        match self {
            UserRole::Talent => UserRole::Sponsor,
            UserRole::Sponsor => UserRole::Talent,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Notification channels (Settings page).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub xmtp: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            xmtp: true,
        }
    }
}

/// Notification toggles addressable by the settings form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationChannel {
    Email,
    Push,
    Xmtp,
}

impl NotificationSettings {
    pub fn toggle(&mut self, channel: NotificationChannel) {
        let flag = match channel {
            NotificationChannel::Email => &mut self.email,
            NotificationChannel::Push => &mut self.push,
            NotificationChannel::Xmtp => &mut self.xmtp,
        };
        *flag = !*flag;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    /// Show reputation to profile visitors.
    pub public_rep: bool,
    pub hide_earnings: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            public_rep: true,
            hide_earnings: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrivacyFlag {
    PublicRep,
    HideEarnings,
}

impl PrivacySettings {
    pub fn toggle(&mut self, flag: PrivacyFlag) {
        let value = match flag {
            PrivacyFlag::PublicRep => &mut self.public_rep,
            PrivacyFlag::HideEarnings => &mut self.hide_earnings,
        };
        *value = !*value;
    }
}

/// The signed-in user's public profile.
///
/// `avatar_url` and `banner_url` may hold either a remote URL or an inline
/// `data:` URI produced by an image upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub address: String,
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub banner_url: String,
    #[serde(default)]
    pub reputation: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub total_funded: String,
    #[serde(default)]
    pub active_gigs: u32,
    #[serde(default)]
    pub join_date: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        let username = "crETHor_JD".to_string();
        Self {
            address: "0x4c21...8e2f".to_string(),
            avatar_url: fallback_avatar_url(&username),
            username,
            bio: "Senior Full-stack Engineer specializing in Ethereum L2 scaling solutions. \
                  Open for complex smart contract architecture and frontend integrations."
                .to_string(),
            banner_url: DEFAULT_BANNER_URL.to_string(),
            reputation: 740,
            completed_tasks: 12,
            total_funded: "$45k".to_string(),
            active_gigs: 8,
            join_date: "Jan 2024".to_string(),
        }
    }
}

impl UserProfile {
    /// Reject records missing the fields every page relies on.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(TypesError::InvalidProfile("address is empty".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(TypesError::InvalidProfile("username is empty".to_string()));
        }
        Ok(())
    }

    /// True if either image field carries inline image data.
    pub fn has_embedded_images(&self) -> bool {
        is_data_uri(&self.avatar_url) || is_data_uri(&self.banner_url)
    }

    /// Copy of this profile with inline images swapped for remote URLs.
    ///
    /// Every other field is carried over untouched.
    pub fn without_embedded_images(&self) -> Self {
        let mut slim = self.clone();
        if is_data_uri(&slim.avatar_url) {
            slim.avatar_url = fallback_avatar_url(&slim.username);
        }
        if is_data_uri(&slim.banner_url) {
            slim.banner_url = DEFAULT_BANNER_URL.to_string();
        }
        slim
    }
}
