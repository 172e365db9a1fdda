//! Settings page: theme, notification and privacy toggles, linked accounts.

use creth_db::preferences::SaveOutcome;
use creth_types::preferences::{NotificationChannel, PrivacyFlag, Theme};

use crate::AppContext;

/// Off-chain identity linked to the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub provider: &'static str,
    pub linked: bool,
}

/// Preference toggles go straight through to the context, which persists
/// them. Linked accounts are session-only.
pub struct SettingsView {
    accounts: Vec<LinkedAccount>,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            accounts: vec![
                LinkedAccount {
                    provider: "GitHub",
                    linked: true,
                },
                LinkedAccount {
                    provider: "Discord",
                    linked: false,
                },
            ],
        }
    }
}

impl SettingsView {
    pub fn set_theme(&self, ctx: &mut AppContext, theme: Theme) -> SaveOutcome {
        ctx.set_theme(theme)
    }

    pub fn toggle_theme(&self, ctx: &mut AppContext) -> SaveOutcome {
        let next = match ctx.theme() {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        ctx.set_theme(next)
    }

    pub fn toggle_notification(&self, ctx: &mut AppContext, channel: NotificationChannel) -> SaveOutcome {
        ctx.toggle_notification(channel)
    }

    pub fn toggle_privacy(&self, ctx: &mut AppContext, flag: PrivacyFlag) -> SaveOutcome {
        ctx.toggle_privacy(flag)
    }

    pub fn accounts(&self) -> &[LinkedAccount] {
        &self.accounts
    }

    /// Flip a linked account. Returns the new state, or `None` for an
    /// unknown provider.
    pub fn toggle_account(&mut self, provider: &str) -> Option<bool> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.provider.eq_ignore_ascii_case(provider))?;
        account.linked = !account.linked;
        Some(account.linked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    #[test]
    fn test_toggles_persist_through_context() {
        let mut ctx = AppContext::in_memory(ClientConfig::default()).expect("context");
        let view = SettingsView::default();

        assert_eq!(view.toggle_theme(&mut ctx), SaveOutcome::Stored);
        assert_eq!(ctx.theme(), Theme::Light);

        view.toggle_notification(&mut ctx, NotificationChannel::Email);
        assert!(!ctx.notifications().email);

        view.toggle_privacy(&mut ctx, PrivacyFlag::PublicRep);
        assert!(!ctx.privacy().public_rep);
    }

    #[test]
    fn test_linked_accounts() {
        let mut view = SettingsView::default();
        assert!(view.accounts()[0].linked);
        assert!(!view.accounts()[1].linked);
        assert_eq!(view.toggle_account("discord"), Some(true));
        assert_eq!(view.toggle_account("twitter"), None);
    }
}
