//! Page view models.
//!
//! Each view keeps only its own transient state (tabs, filters, drafts) and
//! receives the [`AppContext`](crate::AppContext) explicitly for anything
//! shared: navigation, persistence, conversations, escrow flows.

pub mod dashboard;
pub mod explore;
pub mod listing_detail;
pub mod messages;
pub mod my_work;
pub mod profile;
pub mod settings;
pub mod sponsor_portal;

pub use dashboard::DashboardView;
pub use explore::{CategoryFilter, ExploreView};
pub use listing_detail::ListingDetailView;
pub use messages::MessagesView;
pub use my_work::{MyWorkView, WorkFilter};
pub use profile::{ProfileTab, ProfileView};
pub use settings::SettingsView;
pub use sponsor_portal::{PortalView, SponsorPortalView};
