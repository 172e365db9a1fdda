//! Peer conversation records.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A single chat message. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_address: String,
    pub text: String,
    pub sent_at: Timestamp,
    pub is_me: bool,
}

/// A conversation with one peer, keyed by `peer_address`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub peer_address: String,
    pub peer_name: String,
    pub peer_avatar: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_date: Option<Timestamp>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub is_new: bool,
}

impl Conversation {
    /// A freshly started conversation with no history.
    pub fn started(
        peer_address: String,
        peer_name: String,
        peer_avatar: String,
        now: Timestamp,
    ) -> Self {
        Self {
            peer_address,
            peer_name,
            peer_avatar,
            messages: Vec::new(),
            last_message: None,
            last_message_date: Some(now),
            unread_count: 0,
            is_new: true,
        }
    }

    /// Append a message and refresh the last-message summary.
    pub fn push(&mut self, message: Message) {
        self.last_message = Some(message.text.clone());
        self.last_message_date = Some(message.sent_at);
        self.is_new = false;
        self.messages.push(message);
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            peer_address: self.peer_address.clone(),
            peer_name: self.peer_name.clone(),
            peer_avatar: self.peer_avatar.clone(),
            last_message: self.last_message.clone(),
            last_message_date: self.last_message_date,
            unread_count: self.unread_count,
            is_new: self.is_new,
        }
    }
}

/// Sidebar row for a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub peer_address: String,
    pub peer_name: String,
    pub peer_avatar: String,
    pub last_message: Option<String>,
    pub last_message_date: Option<Timestamp>,
    pub unread_count: u32,
    pub is_new: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_updates_summary() {
        let mut conv = Conversation::started(
            "0xabc".to_string(),
            "abc".to_string(),
            "??".to_string(),
            10,
        );
        assert!(conv.is_new);
        conv.push(Message {
            id: "1".to_string(),
            sender_address: "me".to_string(),
            text: "gm".to_string(),
            sent_at: 20,
            is_me: true,
        });
        assert!(!conv.is_new);
        assert_eq!(conv.last_message.as_deref(), Some("gm"));
        assert_eq!(conv.last_message_date, Some(20));
        assert_eq!(conv.summary().last_message.as_deref(), Some("gm"));
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{"peerAddress":"0x1","peerName":"one","peerAvatar":"O"}"#;
        let conv: Conversation = serde_json::from_str(json).expect("parse");
        assert!(conv.messages.is_empty());
        assert_eq!(conv.unread_count, 0);
        assert!(!conv.is_new);
    }
}
