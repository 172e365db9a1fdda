//! Session-wide conversation registry.
//!
//! Conversations keep insertion order: new ones go to the head of the list
//! and nothing is re-sorted when messages arrive. Every mutation is written
//! through to the preference store when one is attached.

use creth_db::preferences::{PreferenceKey, PreferenceStore};
use creth_types::conversation::{Conversation, ConversationSummary, Message};
use creth_types::{now_millis, Timestamp};
use tracing::{debug, info};

use crate::registry::PeerRegistry;
use crate::{MessagingError, Result};

pub struct ConversationStore {
    conversations: Vec<Conversation>,
    registry: PeerRegistry,
    self_address: String,
    prefs: Option<PreferenceStore>,
    last_message_id: u64,
}

impl ConversationStore {
    /// An empty, memory-only store.
    pub fn new(registry: PeerRegistry, self_address: impl Into<String>) -> Self {
        Self {
            conversations: Vec::new(),
            registry,
            self_address: self_address.into(),
            prefs: None,
            last_message_id: 0,
        }
    }

    /// Load persisted conversations, seeding the welcome thread on first run.
    pub fn load(
        prefs: PreferenceStore,
        registry: PeerRegistry,
        self_address: impl Into<String>,
    ) -> Self {
        let self_address = self_address.into();
        let conversations = prefs
            .load::<Vec<Conversation>>(PreferenceKey::Conversations)
            .unwrap_or_else(|| seed_conversations(&self_address, now_millis()));
        let last_message_id = conversations
            .iter()
            .flat_map(|c| c.messages.iter())
            .filter_map(|m| m.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        info!(count = conversations.len(), "conversations loaded");
        Self {
            conversations,
            registry,
            self_address,
            prefs: Some(prefs),
            last_message_id,
        }
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub fn self_address(&self) -> &str {
        &self.self_address
    }

    /// All conversations, head first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, peer_address: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|c| c.peer_address == peer_address)
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }

    /// Return the conversation with `peer_address`, starting one if needed.
    ///
    /// A new conversation is marked `is_new`, has no messages, and is
    /// inserted at the head of the list. Name and avatar are only resolved
    /// on creation.
    pub fn find_or_create(
        &mut self,
        peer_address: &str,
        display_name: Option<&str>,
        avatar: Option<&str>,
    ) -> &Conversation {
        let index = match self.position(peer_address) {
            Some(index) => index,
            None => {
                let conversation = Conversation::started(
                    peer_address.to_string(),
                    self.registry.display_name(peer_address, display_name),
                    self.registry.avatar(peer_address, avatar),
                    now_millis(),
                );
                info!(peer = peer_address, name = %conversation.peer_name, "conversation started");
                self.conversations.insert(0, conversation);
                self.persist();
                0
            }
        };
        &self.conversations[index]
    }

    /// Append a message to an existing conversation.
    ///
    /// Messages from the peer (`is_me == false`) count as unread.
    ///
    /// # Errors
    ///
    /// [`MessagingError::ConversationNotFound`] if no conversation with
    /// `peer_address` exists.
    pub fn append_message(&mut self, peer_address: &str, text: &str, is_me: bool) -> Result<Message> {
        let index = self
            .position(peer_address)
            .ok_or_else(|| MessagingError::ConversationNotFound(peer_address.to_string()))?;

        let sent_at = now_millis();
        let message = Message {
            id: self.next_message_id(sent_at).to_string(),
            sender_address: if is_me {
                self.self_address.clone()
            } else {
                peer_address.to_string()
            },
            text: text.to_string(),
            sent_at,
            is_me,
        };

        let conversation = &mut self.conversations[index];
        conversation.push(message.clone());
        if !is_me {
            conversation.unread_count += 1;
        }
        debug!(peer = peer_address, id = %message.id, is_me, "message appended");

        self.persist();
        Ok(message)
    }

    /// Clear the unread counter for a conversation.
    pub fn mark_read(&mut self, peer_address: &str) -> Result<()> {
        let index = self
            .position(peer_address)
            .ok_or_else(|| MessagingError::ConversationNotFound(peer_address.to_string()))?;
        if self.conversations[index].unread_count > 0 {
            self.conversations[index].unread_count = 0;
            self.persist();
        }
        Ok(())
    }

    /// Case-insensitive substring match on peer name or address, in list order.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let needle = query.to_lowercase();
        self.conversations
            .iter()
            .filter(|c| {
                c.peer_name.to_lowercase().contains(&needle)
                    || c.peer_address.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn position(&self, peer_address: &str) -> Option<usize> {
        self.conversations
            .iter()
            .position(|c| c.peer_address == peer_address)
    }

    /// Millisecond timestamp, bumped when two messages share a millisecond.
    fn next_message_id(&mut self, now: Timestamp) -> u64 {
        let id = now.max(self.last_message_id + 1);
        self.last_message_id = id;
        id
    }

    fn persist(&self) {
        if let Some(prefs) = &self.prefs {
            prefs.save(PreferenceKey::Conversations, &self.conversations);
        }
    }
}

/// Welcome thread shown before any conversation has been stored.
fn seed_conversations(self_address: &str, now: Timestamp) -> Vec<Conversation> {
    const HOUR_MS: u64 = 3_600_000;
    let peer = "0x1234567890abcdef1234567890abcdef12345678";
    let messages = vec![
        Message {
            id: "1".to_string(),
            sender_address: peer.to_string(),
            text: "Hi! We saw your submission for the protocol research bounty.".to_string(),
            sent_at: now.saturating_sub(2 * HOUR_MS),
            is_me: false,
        },
        Message {
            id: "2".to_string(),
            sender_address: self_address.to_string(),
            text: "Great! Let me know if you need any additional documentation.".to_string(),
            sent_at: now.saturating_sub(HOUR_MS),
            is_me: true,
        },
    ];
    vec![Conversation {
        peer_address: peer.to_string(),
        peer_name: "Ethereum Foundation".to_string(),
        peer_avatar: "EF".to_string(),
        messages,
        last_message: Some("Regarding your protocol research submission...".to_string()),
        last_message_date: Some(now.saturating_sub(HOUR_MS)),
        unread_count: 1,
        is_new: false,
    }]
}
