//! In-process event bus.
//!
//! Session, navigation, escrow and messaging activity is broadcast to any
//! interested subscriber (status bar, activity log, tests). Each subscriber
//! has an independent buffer; slow subscribers observe `Lagged`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use creth_types::preferences::UserRole;
use creth_types::transaction::TxPhase;
use creth_types::{now_millis, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default per-subscriber buffer.
pub const DEFAULT_CAPACITY: usize = 256;

/// Typed application events.
///
/// Serialized as `{"type": "<EventType>", "payload": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum AppEvent {
    SessionStarted { role: UserRole },
    SessionEnded,
    RouteChanged { page: String, fragment: String },
    StakePhaseChanged { tx: u64, phase: TxPhase },
    ReleasePhaseChanged { tx: u64, phase: TxPhase },
    ConversationStarted { peer: String },
    MessageSent { peer: String, message_id: u64 },
    SettingsChanged { key: String },
    ProfileSaved { durable: bool },
}

impl AppEvent {
    /// Event type name used for categorization.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. } => "SessionStarted",
            Self::SessionEnded => "SessionEnded",
            Self::RouteChanged { .. } => "RouteChanged",
            Self::StakePhaseChanged { .. } => "StakePhaseChanged",
            Self::ReleasePhaseChanged { .. } => "ReleasePhaseChanged",
            Self::ConversationStarted { .. } => "ConversationStarted",
            Self::MessageSent { .. } => "MessageSent",
            Self::SettingsChanged { .. } => "SettingsChanged",
            Self::ProfileSaved { .. } => "ProfileSaved",
        }
    }

    /// Peer address the event concerns, if any.
    pub fn peer(&self) -> Option<&str> {
        match self {
            Self::ConversationStarted { peer } | Self::MessageSent { peer, .. } => Some(peer),
            _ => None,
        }
    }
}

/// An event as delivered to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: Timestamp,
    pub event: AppEvent,
}

/// Filter for event subscriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Category filter: "navigation", "escrow", "messaging", "settings", "system".
    pub categories: Option<Vec<String>>,
    /// Restrict messaging events to these peers.
    pub peers: Option<Vec<String>>,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(sequence, event_type = event.event_type(), "event");
        // No subscribers is fine.
        let _ = self.sender.send(Event {
            sequence,
            timestamp: now_millis(),
            event,
        });
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl EventFilter {
    /// Check if an event matches this filter.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref categories) = self.categories {
            let category = categorize_event(event.event.event_type());
            if !categories.iter().any(|c| c == category) {
                return false;
            }
        }

        if let Some(ref peers) = self.peers {
            if let Some(peer) = event.event.peer() {
                if !peers.iter().any(|p| p == peer) {
                    return false;
                }
            }
        }

        true
    }
}

/// Categorize an event type into a category.
fn categorize_event(event_type: &str) -> &'static str {
    match event_type {
        "RouteChanged" => "navigation",
        s if s.starts_with("Stake") || s.starts_with("Release") => "escrow",
        s if s.starts_with("Message") || s.starts_with("Conversation") => "messaging",
        s if s.starts_with("Settings") || s.starts_with("Profile") => "settings",
        _ => "system",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(AppEvent::SessionStarted {
            role: UserRole::Sponsor,
        });

        let event = rx.try_recv().expect("receive event");
        assert_eq!(event.sequence, 1);
        assert_eq!(
            event.event,
            AppEvent::SessionStarted {
                role: UserRole::Sponsor
            }
        );
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::default();
        bus.emit(AppEvent::SessionEnded);
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_event_filter_categories() {
        let filter = EventFilter {
            categories: Some(vec!["escrow".to_string()]),
            peers: None,
        };
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        bus.emit(AppEvent::StakePhaseChanged {
            tx: 1,
            phase: TxPhase::Signing,
        });
        bus.emit(AppEvent::SessionEnded);

        assert!(filter.matches(&rx.try_recv().expect("stake")));
        assert!(!filter.matches(&rx.try_recv().expect("session")));
    }

    #[test]
    fn test_event_filter_peers() {
        let filter = EventFilter {
            categories: None,
            peers: Some(vec!["0xabc".to_string()]),
        };
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        bus.emit(AppEvent::MessageSent {
            peer: "0xdef".to_string(),
            message_id: 1,
        });
        bus.emit(AppEvent::SessionEnded);

        assert!(!filter.matches(&rx.try_recv().expect("message")));
        assert!(filter.matches(&rx.try_recv().expect("session")));
    }

    #[test]
    fn test_categorize_event() {
        assert_eq!(categorize_event("RouteChanged"), "navigation");
        assert_eq!(categorize_event("StakePhaseChanged"), "escrow");
        assert_eq!(categorize_event("ReleasePhaseChanged"), "escrow");
        assert_eq!(categorize_event("MessageSent"), "messaging");
        assert_eq!(categorize_event("ConversationStarted"), "messaging");
        assert_eq!(categorize_event("SettingsChanged"), "settings");
        assert_eq!(categorize_event("ProfileSaved"), "settings");
        assert_eq!(categorize_event("SessionStarted"), "system");
    }
}
