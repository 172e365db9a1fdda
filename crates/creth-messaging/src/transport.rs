//! Message delivery.

use std::sync::{Mutex, PoisonError};

use creth_types::conversation::Message;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// An outgoing message addressed to a peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub peer_address: String,
    pub message: Message,
}

/// Delivers messages to peers, keyed by peer address.
pub trait MessagingTransport: Send + Sync {
    fn send(&self, peer_address: &str, message: &Message) -> Result<()>;
}

/// Transport that keeps every envelope locally instead of delivering it.
#[derive(Default)]
pub struct LoopbackTransport {
    outbox: Mutex<Vec<Envelope>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Envelope> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessagingTransport for LoopbackTransport {
    fn send(&self, peer_address: &str, message: &Message) -> Result<()> {
        debug!(peer = peer_address, id = %message.id, "loopback send");
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Envelope {
                peer_address: peer_address.to_string(),
                message: message.clone(),
            });
        Ok(())
    }
}
