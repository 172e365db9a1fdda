//! Hash router: owns the current fragment and publishes route changes.

use tokio::sync::watch;
use tracing::info;

use crate::Route;

/// Tracks the URL fragment and notifies subscribers when it changes.
///
/// Navigation is a fragment write: [`HashRouter::navigate`] stores the new
/// fragment and then runs the same change handler an external fragment
/// change would, so subscribers see exactly one update per effective write.
/// Writing the fragment that is already current is a no-op, as in browsers.
pub struct HashRouter {
    fragment: String,
    sender: watch::Sender<Route>,
}

impl HashRouter {
    /// Create a router and resolve the startup fragment.
    pub fn new(initial_fragment: &str) -> Self {
        let fragment = normalize(initial_fragment);
        let route = Route::parse(&fragment);
        info!(fragment = %fragment, page = route.page_id(), "router initialized");
        let (sender, _) = watch::channel(route);
        Self { fragment, sender }
    }

    /// The fragment as last written, without `#`.
    pub fn current_fragment(&self) -> &str {
        &self.fragment
    }

    pub fn current(&self) -> Route {
        self.sender.borrow().clone()
    }

    /// Receive every subsequent route change.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.sender.subscribe()
    }

    /// Handle a fragment change signalled from outside (back button, link).
    ///
    /// Returns the resolved route. Never fails.
    pub fn on_fragment_changed(&mut self, fragment: &str) -> Route {
        let fragment = normalize(fragment);
        if fragment == self.fragment {
            return self.current();
        }
        let route = Route::parse(&fragment);
        info!(fragment = %fragment, page = route.page_id(), "route changed");
        self.fragment = fragment;
        self.sender.send_replace(route.clone());
        route
    }

    /// Navigate by writing a raw fragment such as `listing/3`.
    pub fn navigate(&mut self, fragment: &str) -> Route {
        self.on_fragment_changed(fragment)
    }

    /// Navigate to a typed route.
    pub fn navigate_to(&mut self, route: &Route) -> Route {
        self.on_fragment_changed(&route.to_fragment())
    }
}

fn normalize(fragment: &str) -> String {
    fragment.strip_prefix('#').unwrap_or(fragment).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_parse() {
        let router = HashRouter::new("#listing/3");
        assert_eq!(router.current(), Route::ListingDetail { id: "3".to_string() });
        assert_eq!(router.current_fragment(), "listing/3");

        let router = HashRouter::new("");
        assert_eq!(router.current(), Route::Dashboard);
    }

    #[test]
    fn test_navigate_notifies_subscribers() {
        let mut router = HashRouter::new("");
        let mut rx = router.subscribe();
        assert!(!rx.has_changed().expect("sender alive"));

        router.navigate("explore");
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), Route::Explore);
        assert_eq!(router.current_fragment(), "explore");
    }

    #[test]
    fn test_same_fragment_is_not_a_change() {
        let mut router = HashRouter::new("settings");
        let rx = router.subscribe();
        router.navigate("#settings");
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn test_navigate_round_trip() {
        let mut router = HashRouter::new("");
        for page in ["dashboard", "explore", "sponsor-portal", "profile", "messages", "my-work", "settings"] {
            let route = router.navigate(page);
            assert_eq!(Route::parse(router.current_fragment()), route);
            assert_eq!(route.page_id(), page);
        }
    }

    #[test]
    fn test_navigate_to_typed_route() {
        let mut router = HashRouter::new("dashboard");
        let target = Route::Messages { peer: Some("ef-research".to_string()) };
        router.navigate_to(&target);
        assert_eq!(router.current_fragment(), "messages/ef-research");
        assert_eq!(router.current(), target);
    }

    #[test]
    fn test_external_change_with_unknown_page() {
        let mut router = HashRouter::new("explore");
        let route = router.on_fragment_changed("#does-not-exist");
        assert_eq!(route, Route::Dashboard);
        // The raw fragment is kept; only the resolved route falls back.
        assert_eq!(router.current_fragment(), "does-not-exist");
    }
}
