//! Secure inbox: conversation list, active thread, composer.

use creth_messaging::PeerEntry;
use creth_router::Route;
use creth_types::conversation::{Conversation, ConversationSummary, Message};
use tracing::{debug, info};

use crate::events::AppEvent;
use crate::{AppContext, AppError, Result};

/// The UI only keeps the active peer's address; the store owns the threads.
#[derive(Default)]
pub struct MessagesView {
    initial_peer: Option<String>,
    initialized: bool,
    active: Option<String>,
    draft: String,
    search: String,
}

impl MessagesView {
    /// Open the inbox, picking up a deep-linked peer from the current route.
    pub fn new(ctx: &AppContext) -> Self {
        let initial_peer = match ctx.route() {
            Route::Messages { peer } => peer,
            _ => None,
        };
        Self {
            initial_peer,
            ..Self::default()
        }
    }

    /// Follow a route change while the page is mounted.
    ///
    /// A `messages/<peer>` deep link opens that peer at once if the inbox
    /// is up, or once [`initialize_inbox`](Self::initialize_inbox) finishes.
    pub fn on_route(&mut self, ctx: &mut AppContext, route: &Route) -> Result<()> {
        let Route::Messages { peer: Some(peer) } = route else {
            return Ok(());
        };
        if self.initialized {
            self.start_chat(ctx, peer, None, None)
        } else {
            self.initial_peer = Some(peer.clone());
            Ok(())
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bring up the secure inbox.
    ///
    /// Takes the configured initialization delay. Afterwards the deep-linked
    /// peer is opened (started if unseen), else the first conversation.
    pub async fn initialize_inbox(&mut self, ctx: &mut AppContext) -> Result<Option<String>> {
        if !self.initialized {
            tokio::time::sleep(ctx.config().messaging.inbox_init_delay()).await;
            self.initialized = true;
            info!(address = ctx.wallet().address(), "inbox initialized");

            match self.initial_peer.clone() {
                Some(peer) => self.start_chat(ctx, &peer, None, None)?,
                None => {
                    self.active = ctx
                        .conversations()
                        .conversations()
                        .first()
                        .map(|c| c.peer_address.clone());
                }
            }
        }
        Ok(self.active.clone())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(AppError::InboxNotInitialized)
        }
    }

    /// Open a chat with `peer`, starting a conversation if there is none.
    pub fn start_chat(
        &mut self,
        ctx: &mut AppContext,
        peer: &str,
        display_name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<()> {
        self.ensure_initialized()?;
        let is_new = ctx.conversations().conversation(peer).is_none();
        ctx.conversations_mut()
            .find_or_create(peer, display_name, avatar);
        if is_new {
            ctx.events().emit(AppEvent::ConversationStarted {
                peer: peer.to_string(),
            });
        }
        self.activate(ctx, peer)
    }

    /// Switch to an existing conversation.
    pub fn open(&mut self, ctx: &mut AppContext, peer: &str) -> Result<()> {
        self.ensure_initialized()?;
        self.activate(ctx, peer)
    }

    fn activate(&mut self, ctx: &mut AppContext, peer: &str) -> Result<()> {
        ctx.conversations_mut().mark_read(peer)?;
        debug!(peer, "conversation opened");
        self.active = Some(peer.to_string());
        self.search.clear();
        Ok(())
    }

    pub fn active_peer(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_conversation<'a>(&self, ctx: &'a AppContext) -> Option<&'a Conversation> {
        ctx.conversations().conversation(self.active.as_deref()?)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Send the draft to the active peer.
    ///
    /// Whitespace-only drafts are ignored and return `Ok(None)`. The draft is
    /// cleared once the message is in the thread, so a delivery failure is
    /// reported without leaving the text to be sent twice.
    pub fn send(&mut self, ctx: &mut AppContext) -> Result<Option<Message>> {
        self.ensure_initialized()?;
        let peer = self.active.clone().ok_or(AppError::NoActiveConversation)?;
        let text = self.draft.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let message = ctx.conversations_mut().append_message(&peer, text, true)?;
        self.draft.clear();
        ctx.transport().send(&peer, &message)?;
        ctx.events().emit(AppEvent::MessageSent {
            peer,
            message_id: message.id.parse().unwrap_or_default(),
        });
        Ok(Some(message))
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Sidebar entries matching the search box, in list order.
    pub fn conversations(&self, ctx: &AppContext) -> Vec<ConversationSummary> {
        ctx.conversations()
            .search(&self.search)
            .into_iter()
            .map(Conversation::summary)
            .collect()
    }

    /// Known users matching the search box, for starting new chats.
    pub fn directory_matches(&self, ctx: &AppContext) -> Vec<PeerEntry> {
        if self.search.trim().is_empty() {
            return Vec::new();
        }
        ctx.conversations()
            .registry()
            .search(&self.search)
            .into_iter()
            .cloned()
            .collect()
    }
}
