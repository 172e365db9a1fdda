//! # creth-types
//!
//! Shared domain records for the crETH client: listings, user preferences,
//! conversations, and simulated escrow transactions. Every record here is
//! serialized with the camelCase JSON shape the rendering layer reads, and
//! exports a TypeScript binding through `ts-rs`.

pub mod conversation;
pub mod listing;
pub mod preferences;
pub mod transaction;
pub mod work;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Errors raised while validating records at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

pub type Result<T> = std::result::Result<T, TypesError>;

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Returns true for `data:` URIs, the form browsers use for inlined images.
pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_detection() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(!is_data_uri("https://i.pravatar.cc/300?u=alice"));
        assert!(!is_data_uri(""));
    }

    #[test]
    fn test_now_millis_is_recent() {
        // Anything after 2023-11-14 in milliseconds.
        assert!(now_millis() > 1_700_000_000_000);
    }

    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::listing::Listing::export_all_to(&dir).expect("export listing");
        crate::preferences::UserProfile::export_all_to(&dir).expect("export profile");
        crate::preferences::NotificationSettings::export_all_to(&dir).expect("export notifications");
        crate::preferences::PrivacySettings::export_all_to(&dir).expect("export privacy");
        crate::conversation::Conversation::export_all_to(&dir).expect("export conversation");
        crate::transaction::TransactionState::export_all_to(&dir).expect("export transaction");
        crate::work::MySubmission::export_all_to(&dir).expect("export submission");
    }
}
