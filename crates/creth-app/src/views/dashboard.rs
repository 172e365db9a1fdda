//! Role-dependent dashboard: stat cards, activity feed, quick launch.

use creth_router::Route;
use creth_types::preferences::UserRole;
use serde::Serialize;

use crate::AppContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub target: Route,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Launch,
    Submission,
    Award,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub label: &'static str,
    pub time: &'static str,
    pub target: Route,
}

/// Dashboard for whichever role is active.
///
/// Holds no state of its own: role and privacy are read from the context on
/// every call, so a role switch or privacy toggle shows up immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardView;

impl DashboardView {
    pub fn new() -> Self {
        Self
    }

    pub fn role(&self, ctx: &AppContext) -> UserRole {
        ctx.role()
    }

    pub fn stats(&self, ctx: &AppContext) -> Vec<StatCard> {
        let card = |label, value: &str, target| StatCard {
            label,
            value: value.to_string(),
            target,
        };
        match ctx.role() {
            UserRole::Talent => vec![
                card(
                    "Earnings",
                    if ctx.privacy().hide_earnings {
                        "Hidden"
                    } else {
                        "$12,450"
                    },
                    Route::Profile,
                ),
                card("Active", "3", Route::MyWork),
                card("Reputation", "740", Route::Profile),
                card("Proof-of-Work", "12", Route::Profile),
            ],
            UserRole::Sponsor => vec![
                card("Funded", "$45,000", Route::SponsorPortal),
                card("Active Gigs", "8", Route::SponsorPortal),
                card("Submissions", "24", Route::SponsorPortal),
                card("Avg Payout", "$1,200", Route::SponsorPortal),
            ],
        }
    }

    pub fn recent_activity(&self) -> Vec<Activity> {
        vec![
            Activity {
                kind: ActivityKind::Launch,
                label: "Ethereum Foundation: Protocol Research",
                time: "5m ago",
                target: Route::ListingDetail {
                    id: "1".to_string(),
                },
            },
            Activity {
                kind: ActivityKind::Submission,
                label: "Submitted ETH Global Hackathon Entry",
                time: "15m ago",
                target: Route::MyWork,
            },
            Activity {
                kind: ActivityKind::Award,
                label: "1.2 ETH paid for Security Audit",
                time: "1h ago",
                target: Route::Profile,
            },
        ]
    }

    /// Primary call to action: find work, or post it.
    pub fn quick_launch(&self, ctx: &AppContext) -> Route {
        match ctx.role() {
            UserRole::Talent => Route::Explore,
            UserRole::Sponsor => Route::SponsorPortal,
        }
    }

    /// Follow a stat card. Out-of-range indices are ignored.
    pub fn open_stat(&self, ctx: &mut AppContext, index: usize) -> Option<Route> {
        let target = self.stats(ctx).into_iter().nth(index)?.target;
        Some(ctx.navigate_to(&target))
    }

    pub fn open_activity(&self, ctx: &mut AppContext, index: usize) -> Option<Route> {
        let target = self.recent_activity().into_iter().nth(index)?.target;
        Some(ctx.navigate_to(&target))
    }

    pub fn launch(&self, ctx: &mut AppContext) -> Route {
        let target = self.quick_launch(ctx);
        ctx.navigate_to(&target)
    }

    pub fn open_messages(&self, ctx: &mut AppContext) -> Route {
        ctx.navigate_to(&Route::Messages { peer: None })
    }
}
