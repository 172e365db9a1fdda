//! # creth-app
//!
//! Application layer of the crETH talent marketplace client.
//!
//! [`context::AppContext`] is built once at startup and handed explicitly to
//! every page view model in [`views`]. It owns the session-wide state: the
//! hash router, the preference and conversation stores, the escrow
//! simulator, the event bus, and the mocked external collaborators.

pub mod catalog;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod events;
pub mod logging;
pub mod views;

pub use config::ClientConfig;
pub use context::{AppContext, Screen, Session};

use creth_escrow::EscrowError;
use creth_messaging::MessagingError;
use creth_types::TypesError;

/// Errors surfaced by page view models.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("listing '{0}' not found")]
    ListingNotFound(String),

    #[error("submission '{0}' not found")]
    SubmissionNotFound(String),

    #[error("a deliverable must be uploaded before submitting a bounty")]
    MissingDeliverable,

    #[error("submission description is empty")]
    EmptyDescription,

    #[error("file of {size} bytes exceeds the {limit} byte upload limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("reward '{0}' is not a whole number")]
    InvalidReward(String),

    #[error("secure inbox is not initialized")]
    InboxNotInitialized,

    #[error("no conversation is open")]
    NoActiveConversation,

    #[error("no profile edit in progress")]
    NotEditing,

    #[error(transparent)]
    Profile(#[from] TypesError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Escrow(#[from] EscrowError),
}

pub type Result<T> = std::result::Result<T, AppError>;
