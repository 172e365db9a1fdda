//! # creth-messaging
//!
//! Peer-to-peer conversations for the crETH client.
//!
//! [`store::ConversationStore`] owns every conversation for the session and
//! is the only way to mutate them; callers refer to a conversation by its
//! peer address. Delivery goes through a [`transport::MessagingTransport`],
//! which in this client is a local loopback.

pub mod registry;
pub mod store;
pub mod transport;

pub use registry::{PeerEntry, PeerRegistry};
pub use store::ConversationStore;
pub use transport::{Envelope, LoopbackTransport, MessagingTransport};

/// Messaging error types.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// No conversation exists for the peer; call `find_or_create` first.
    #[error("no conversation with peer '{0}'")]
    ConversationNotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, MessagingError>;
