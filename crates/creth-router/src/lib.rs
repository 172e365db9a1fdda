//! # creth-router
//!
//! Fragment-driven routing for the crETH client.
//!
//! The URL fragment (everything after `#`) is the only routing signal.
//! [`Route::parse`] turns a fragment into a [`Route`] and never fails:
//! empty, malformed, and unknown fragments all resolve to the dashboard.
//! [`Route::to_fragment`] is its inverse.
//!
//! Fragment grammar: `<page>` or `<page>/<param>`, where only `listing`
//! (required id) and `messages` (optional peer) take a parameter.

pub mod router;

pub use router::HashRouter;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Page the dashboard route falls back to.
pub const DEFAULT_PAGE: &str = "dashboard";

/// A resolved client route.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum Route {
    #[default]
    Dashboard,
    Explore,
    ListingDetail {
        id: String,
    },
    SponsorPortal,
    Profile,
    Messages {
        peer: Option<String>,
    },
    MyWork,
    Settings,
}

impl Route {
    /// Parse a fragment, with or without its leading `#`.
    pub fn parse(fragment: &str) -> Route {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let fragment = if fragment.is_empty() { DEFAULT_PAGE } else { fragment };

        let mut parts = fragment.split('/');
        let page = parts.next().unwrap_or(DEFAULT_PAGE);
        let param = parts.next().filter(|p| !p.is_empty()).map(str::to_string);

        match page {
            "dashboard" => Route::Dashboard,
            "explore" => Route::Explore,
            "listing" => match param {
                Some(id) => Route::ListingDetail { id },
                None => {
                    tracing::debug!(fragment, "listing route without id");
                    Route::Dashboard
                }
            },
            "sponsor-portal" => Route::SponsorPortal,
            "profile" => Route::Profile,
            "messages" => Route::Messages { peer: param },
            "my-work" => Route::MyWork,
            "settings" => Route::Settings,
            _ => {
                tracing::debug!(fragment, "unknown page, falling back to dashboard");
                Route::Dashboard
            }
        }
    }

    /// The fragment that parses back to this route, without the `#`.
    pub fn to_fragment(&self) -> String {
        match self {
            Route::ListingDetail { id } => format!("listing/{id}"),
            Route::Messages { peer: Some(peer) } => format!("messages/{peer}"),
            other => other.page_id().to_string(),
        }
    }

    /// Page identifier as rendered by the presentation layer.
    pub fn page_id(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Explore => "explore",
            Route::ListingDetail { .. } => "listing-detail",
            Route::SponsorPortal => "sponsor-portal",
            Route::Profile => "profile",
            Route::Messages { .. } => "messages",
            Route::MyWork => "my-work",
            Route::Settings => "settings",
        }
    }

    /// Path parameters: `id` for listing detail, `peer` for messages.
    pub fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        match self {
            Route::ListingDetail { id } => {
                params.insert("id".to_string(), id.clone());
            }
            Route::Messages { peer: Some(peer) } => {
                params.insert("peer".to_string(), peer.clone());
            }
            _ => {}
        }
        params
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_fragment())
    }
}
