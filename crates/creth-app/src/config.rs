//! Client configuration file management.

use std::path::PathBuf;
use std::time::Duration;

use creth_escrow::{FailurePolicy, PhaseDelays, SimulatorConfig};
use serde::{Deserialize, Serialize};

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Simulated escrow timings.
    #[serde(default)]
    pub escrow: EscrowConfig,
    /// Messaging settings.
    #[serde(default)]
    pub messaging: MessagingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// Byte budget for persisted preferences.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

/// Escrow simulation configuration. All durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowConfig {
    #[serde(default = "default_stake_signing_ms")]
    pub stake_signing_ms: u64,
    #[serde(default = "default_stake_confirming_ms")]
    pub stake_confirming_ms: u64,
    #[serde(default = "default_release_signing_ms")]
    pub release_signing_ms: u64,
    #[serde(default = "default_release_releasing_ms")]
    pub release_releasing_ms: u64,
    /// `"never"`, or `{ at_phase = "CONFIRMING" }` to force failures.
    #[serde(default)]
    pub failure: FailurePolicy,
}

/// Messaging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Wallet address used as the sender of outgoing messages.
    #[serde(default = "default_self_address")]
    pub self_address: String,
    /// Time taken to initialize the secure inbox, in milliseconds.
    #[serde(default = "default_inbox_init_ms")]
    pub inbox_init_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_quota_bytes() -> u64 {
    creth_db::storage::DEFAULT_QUOTA_BYTES
}

fn default_stake_signing_ms() -> u64 {
    2000
}

fn default_stake_confirming_ms() -> u64 {
    3000
}

fn default_release_signing_ms() -> u64 {
    1500
}

fn default_release_releasing_ms() -> u64 {
    3500
}

fn default_self_address() -> String {
    "0x4c21...8e2".to_string()
}

fn default_inbox_init_ms() -> u64 {
    1200
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            stake_signing_ms: default_stake_signing_ms(),
            stake_confirming_ms: default_stake_confirming_ms(),
            release_signing_ms: default_release_signing_ms(),
            release_releasing_ms: default_release_releasing_ms(),
            failure: FailurePolicy::Never,
        }
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            self_address: default_self_address(),
            inbox_init_ms: default_inbox_init_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl EscrowConfig {
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            stake: PhaseDelays {
                signing: Duration::from_millis(self.stake_signing_ms),
                settling: Duration::from_millis(self.stake_confirming_ms),
            },
            release: PhaseDelays {
                signing: Duration::from_millis(self.release_signing_ms),
                settling: Duration::from_millis(self.release_releasing_ms),
            },
            failure: self.failure,
        }
    }
}

impl MessagingConfig {
    pub fn inbox_init_delay(&self) -> Duration {
        Duration::from_millis(self.inbox_init_ms)
    }
}

impl ClientConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.escrow.failure.validate()?;
        Ok(config)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Path of the preference database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("creth.db")
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("CRETH_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/crETH")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("crETH")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs_fallback(".creth")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/creth"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use creth_types::transaction::TxPhase;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.storage.quota_bytes, 5 * 1024 * 1024);
        assert_eq!(config.escrow.stake_signing_ms, 2000);
        assert_eq!(config.escrow.release_releasing_ms, 3500);
        assert_eq!(config.escrow.failure, FailurePolicy::Never);
        assert_eq!(config.messaging.inbox_init_ms, 1200);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = ClientConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: ClientConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [escrow]
            stake_signing_ms = 10
            failure = { at_phase = "CONFIRMING" }
            "#,
        )
        .expect("parse");
        assert_eq!(config.escrow.stake_signing_ms, 10);
        assert_eq!(config.escrow.stake_confirming_ms, 3000);
        assert_eq!(config.escrow.failure, FailurePolicy::AtPhase(TxPhase::Confirming));
        assert_eq!(config.messaging.self_address, "0x4c21...8e2");
    }

    #[test]
    fn test_unreachable_failure_phase_rejected() {
        let err = ClientConfig::parse(
            r#"
            [escrow]
            failure = { at_phase = "IDLE" }
            "#,
        )
        .expect_err("idle is never entered");
        assert!(err.to_string().contains("invalid failure policy"));

        let config = ClientConfig::parse("[escrow]\nfailure = \"never\"\n").expect("never");
        assert_eq!(config.escrow.failure, FailurePolicy::Never);
    }

    #[test]
    fn test_simulator_config_conversion() {
        let sim = EscrowConfig::default().simulator_config();
        assert_eq!(sim, SimulatorConfig::default());
    }

    #[test]
    fn test_explicit_data_dir() {
        let mut config = ClientConfig::default();
        config.storage.data_dir = "/var/lib/creth".to_string();
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/creth/creth.db"));
    }
}
