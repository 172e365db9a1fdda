//! Session-wide application context.
//!
//! Built once at startup and passed explicitly to every page view model.
//! There is no teardown: the session ends with the process.

use std::sync::Arc;

use creth_db::preferences::{PreferenceKey, PreferenceStore, SaveOutcome};
use creth_db::storage::{SqliteStorage, Storage};
use creth_escrow::{SimulatedEscrow, TransactionSimulator, TxId};
use creth_messaging::{ConversationStore, LoopbackTransport, MessagingTransport, PeerRegistry};
use creth_router::{HashRouter, Route};
use creth_types::preferences::{
    NotificationChannel, NotificationSettings, PrivacyFlag, PrivacySettings, Theme, UserProfile,
    UserRole,
};
use creth_types::transaction::{TransactionState, TxKind};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::collaborators::{ContentStore, LocalContentStore, MockWallet, WalletProvider};
use crate::config::ClientConfig;
use crate::events::{AppEvent, EventBus};

/// Authentication state and active marketplace role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub role: UserRole,
}

/// What the shell should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Signed out: the landing page, whatever the fragment says.
    Landing,
    Page(Route),
}

pub struct AppContext {
    config: ClientConfig,
    prefs: PreferenceStore,
    router: HashRouter,
    conversations: ConversationStore,
    simulator: TransactionSimulator,
    events: EventBus,
    transport: Arc<dyn MessagingTransport>,
    content: Arc<dyn ContentStore>,
    wallet: Arc<dyn WalletProvider>,
    session: Session,
    theme: Theme,
    notifications: NotificationSettings,
    privacy: PrivacySettings,
    profile: UserProfile,
}

impl AppContext {
    /// Open the on-disk preference database under the configured data dir.
    pub fn init(config: ClientConfig) -> anyhow::Result<Self> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)?;
        let storage = SqliteStorage::open(&config.database_path(), config.storage.quota_bytes)?;
        info!(data_dir = %data_dir.display(), "preference database opened");
        Ok(Self::with_storage(config, storage))
    }

    /// Context backed by an in-memory database.
    pub fn in_memory(config: ClientConfig) -> anyhow::Result<Self> {
        let storage = SqliteStorage::open_memory(config.storage.quota_bytes)?;
        Ok(Self::with_storage(config, storage))
    }

    /// Context over an arbitrary storage backend, with mock collaborators.
    pub fn with_storage(config: ClientConfig, storage: impl Storage + 'static) -> Self {
        let prefs = PreferenceStore::new(storage);
        let events = EventBus::default();

        let bus = events.clone();
        let observer = move |id: TxId, state: &TransactionState| {
            let event = match state.kind {
                TxKind::Stake => AppEvent::StakePhaseChanged {
                    tx: id.0,
                    phase: state.phase,
                },
                TxKind::Release => AppEvent::ReleasePhaseChanged {
                    tx: id.0,
                    phase: state.phase,
                },
            };
            bus.emit(event);
        };
        let simulator = TransactionSimulator::new(config.escrow.simulator_config())
            .with_observer(Arc::new(observer));

        let self_address = config.messaging.self_address.clone();
        let conversations =
            ConversationStore::load(prefs.clone(), PeerRegistry::builtin(), self_address.clone());

        let theme = prefs.load_or_default(PreferenceKey::Theme);
        let notifications = prefs.load_or_default(PreferenceKey::Notifications);
        let privacy = prefs.load_or_default(PreferenceKey::Privacy);
        let profile = prefs.load_profile();
        info!(user = %profile.username, ?theme, "preferences loaded");

        Self {
            config,
            prefs,
            router: HashRouter::new(""),
            conversations,
            simulator,
            events,
            transport: Arc::new(LoopbackTransport::new()),
            content: Arc::new(LocalContentStore::new()),
            wallet: Arc::new(MockWallet::new(self_address)),
            session: Session::default(),
            theme,
            notifications,
            privacy,
            profile,
        }
    }

    /// Replace the messaging transport.
    pub fn with_transport(mut self, transport: Arc<dyn MessagingTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the content store.
    pub fn with_content_store(mut self, content: Arc<dyn ContentStore>) -> Self {
        self.content = content;
        self
    }

    /// Replace the wallet provider.
    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = wallet;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn simulator(&self) -> &TransactionSimulator {
        &self.simulator
    }

    /// Escrow contract backed by this context's simulator.
    pub fn escrow(&self) -> SimulatedEscrow {
        SimulatedEscrow::new(self.simulator.clone())
    }

    pub fn transport(&self) -> &Arc<dyn MessagingTransport> {
        &self.transport
    }

    pub fn content(&self) -> &Arc<dyn ContentStore> {
        &self.content
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn conversations_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversations
    }

    // ---- Session ----

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn role(&self) -> UserRole {
        self.session.role
    }

    /// Connect the wallet and enter the app at the dashboard.
    pub fn login(&mut self) {
        self.session.authenticated = true;
        info!(address = self.wallet.address(), role = ?self.session.role, "session started");
        self.events.emit(AppEvent::SessionStarted {
            role: self.session.role,
        });
        self.navigate_to(&Route::Dashboard);
    }

    pub fn logout(&mut self) {
        self.session.authenticated = false;
        info!("session ended");
        self.events.emit(AppEvent::SessionEnded);
        self.navigate_to(&Route::Dashboard);
    }

    /// Flip between talent and sponsor. Returns the new role.
    pub fn switch_role(&mut self) -> UserRole {
        self.session.role = self.session.role.toggled();
        debug!(role = ?self.session.role, "role switched");
        self.session.role
    }

    // ---- Navigation ----

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn current_fragment(&self) -> &str {
        self.router.current_fragment()
    }

    pub fn subscribe_routes(&self) -> watch::Receiver<Route> {
        self.router.subscribe()
    }

    /// The page to render for the current session and route.
    pub fn screen(&self) -> Screen {
        if self.session.authenticated {
            Screen::Page(self.router.current())
        } else {
            Screen::Landing
        }
    }

    /// Write a fragment, as a link click or view action would.
    pub fn navigate(&mut self, fragment: &str) -> Route {
        let before = self.router.current_fragment().to_string();
        let route = self.router.navigate(fragment);
        if self.router.current_fragment() != before {
            self.events.emit(AppEvent::RouteChanged {
                page: route.page_id().to_string(),
                fragment: self.router.current_fragment().to_string(),
            });
        }
        route
    }

    pub fn navigate_to(&mut self, route: &Route) -> Route {
        self.navigate(&route.to_fragment())
    }

    // ---- Preferences ----

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> SaveOutcome {
        self.theme = theme;
        self.persist_setting(PreferenceKey::Theme, &theme)
    }

    pub fn notifications(&self) -> &NotificationSettings {
        &self.notifications
    }

    pub fn toggle_notification(&mut self, channel: NotificationChannel) -> SaveOutcome {
        self.notifications.toggle(channel);
        let value = self.notifications.clone();
        self.persist_setting(PreferenceKey::Notifications, &value)
    }

    pub fn privacy(&self) -> &PrivacySettings {
        &self.privacy
    }

    pub fn toggle_privacy(&mut self, flag: PrivacyFlag) -> SaveOutcome {
        self.privacy.toggle(flag);
        let value = self.privacy.clone();
        self.persist_setting(PreferenceKey::Privacy, &value)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replace the profile and persist it.
    ///
    /// The in-memory profile is updated whatever the outcome.
    pub fn update_profile(&mut self, profile: UserProfile) -> SaveOutcome {
        self.profile = profile;
        let outcome = self.prefs.save(PreferenceKey::UserProfile, &self.profile);
        if !outcome.is_durable() {
            warn!(user = %self.profile.username, "profile kept in memory only");
        }
        self.events.emit(AppEvent::ProfileSaved {
            durable: outcome.is_durable(),
        });
        outcome
    }

    fn persist_setting<T: serde::Serialize>(&self, key: PreferenceKey, value: &T) -> SaveOutcome {
        let outcome = self.prefs.save(key, value);
        self.events.emit(AppEvent::SettingsChanged {
            key: key.as_str().to_string(),
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creth_types::transaction::TxPhase;

    fn ctx() -> AppContext {
        AppContext::in_memory(ClientConfig::default()).expect("in-memory context")
    }

    #[test]
    fn test_landing_until_login() {
        let mut ctx = ctx();
        assert_eq!(ctx.screen(), Screen::Landing);
        ctx.navigate("explore");
        assert_eq!(ctx.screen(), Screen::Landing);

        ctx.login();
        assert_eq!(ctx.screen(), Screen::Page(Route::Dashboard));
        assert_eq!(ctx.current_fragment(), "dashboard");
    }

    #[test]
    fn test_logout_returns_to_landing() {
        let mut ctx = ctx();
        ctx.login();
        ctx.navigate("settings");
        ctx.logout();
        assert_eq!(ctx.screen(), Screen::Landing);
        assert_eq!(ctx.route(), Route::Dashboard);
    }

    #[test]
    fn test_switch_role() {
        let mut ctx = ctx();
        assert_eq!(ctx.role(), UserRole::Talent);
        assert_eq!(ctx.switch_role(), UserRole::Sponsor);
        assert_eq!(ctx.switch_role(), UserRole::Talent);
    }

    #[test]
    fn test_route_events_only_on_change() {
        let mut ctx = ctx();
        let mut rx = ctx.events().subscribe();
        ctx.navigate("explore");
        ctx.navigate("#explore");

        let event = rx.try_recv().expect("route event");
        assert_eq!(
            event.event,
            AppEvent::RouteChanged {
                page: "explore".to_string(),
                fragment: "explore".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_settings_survive_reload() {
        let dir = std::env::temp_dir().join(format!("creth-ctx-{}", std::process::id()));
        let mut config = ClientConfig::default();
        config.storage.data_dir = dir.display().to_string();

        {
            let mut ctx = AppContext::init(config.clone()).expect("init");
            ctx.set_theme(Theme::Light);
            ctx.toggle_notification(NotificationChannel::Push);
            ctx.toggle_privacy(PrivacyFlag::HideEarnings);
        }

        let ctx = AppContext::init(config).expect("reopen");
        assert_eq!(ctx.theme(), Theme::Light);
        assert!(ctx.notifications().push);
        assert!(ctx.privacy().hide_earnings);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_defaults_on_first_run() {
        let ctx = ctx();
        assert_eq!(ctx.theme(), Theme::Dark);
        assert_eq!(ctx.notifications(), &NotificationSettings::default());
        assert_eq!(ctx.profile().username, "crETHor_JD");
        assert_eq!(ctx.conversations().conversations().len(), 1);
    }

    #[test]
    fn test_update_profile_emits_event() {
        let mut ctx = ctx();
        let mut rx = ctx.events().subscribe();
        let mut profile = ctx.profile().clone();
        profile.bio = "Solidity auditor".to_string();

        assert_eq!(ctx.update_profile(profile), SaveOutcome::Stored);
        assert_eq!(ctx.profile().bio, "Solidity auditor");
        let event = rx.try_recv().expect("profile event");
        assert_eq!(event.event, AppEvent::ProfileSaved { durable: true });
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulator_phases_reach_event_bus() {
        let ctx = ctx();
        let mut rx = ctx.events().subscribe();
        let handle = ctx.simulator().start(TxKind::Stake).expect("runtime");
        handle.wait().await.expect("stake");

        let mut phases = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::StakePhaseChanged { phase, .. } = event.event {
                phases.push(phase);
            }
        }
        assert_eq!(
            phases,
            vec![TxPhase::Signing, TxPhase::Confirming, TxPhase::Success]
        );
    }
}
