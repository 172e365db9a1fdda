//! Integration test: profile persistence under storage quota pressure.
//!
//! An oversized profile write must be retried once with inline images
//! swapped for hosted URLs, keeping every text field intact; if the backend
//! still refuses, the profile lives on in memory.

use creth_app::views::ProfileView;
use creth_app::{AppContext, ClientConfig};
use creth_db::preferences::{PreferenceKey, PreferenceStore, SaveOutcome};
use creth_db::storage::SqliteStorage;
use creth_integration_tests::{writes_for, RecordingStorage};
use creth_types::is_data_uri;
use creth_types::preferences::{UserProfile, DEFAULT_BANNER_URL};

fn profile_with_huge_avatar() -> UserProfile {
    UserProfile {
        username: "blob_hunter".to_string(),
        bio: "EIP-4844 researcher".to_string(),
        avatar_url: format!("data:image/png;base64,{}", "A".repeat(1 << 20)),
        ..UserProfile::default()
    }
}

#[test]
fn quota_failure_retries_with_hosted_avatar() {
    let (storage, log) = RecordingStorage::rejecting_first_write_to("user_profile");
    let prefs = PreferenceStore::new(storage);
    let profile = profile_with_huge_avatar();

    let outcome = prefs.save(PreferenceKey::UserProfile, &profile);
    assert_eq!(outcome, SaveOutcome::StoredSlim);

    let attempts = writes_for(&log, "user_profile");
    assert_eq!(attempts.len(), 2);

    let first: UserProfile = serde_json::from_str(&attempts[0]).expect("first attempt");
    assert!(is_data_uri(&first.avatar_url));

    let second: UserProfile = serde_json::from_str(&attempts[1]).expect("second attempt");
    assert!(!is_data_uri(&second.avatar_url));
    assert_eq!(second.avatar_url, "https://i.pravatar.cc/300?u=blob_hunter");
    assert_eq!(second.username, profile.username);
    assert_eq!(second.bio, profile.bio);
    assert_eq!(second.reputation, profile.reputation);
}

#[test]
fn non_profile_keys_are_not_slimmed() {
    let (storage, log) = RecordingStorage::rejecting_first_write_to("theme");
    let prefs = PreferenceStore::new(storage);

    let outcome = prefs.save(PreferenceKey::Theme, &"light");
    assert_eq!(outcome, SaveOutcome::InMemoryOnly);
    assert_eq!(writes_for(&log, "theme").len(), 1);
}

#[test]
fn sqlite_quota_keeps_previous_profile_and_slims_banner() {
    let storage = SqliteStorage::open_memory(16 * 1024).expect("sqlite");
    let prefs = PreferenceStore::new(storage);
    prefs.save(PreferenceKey::UserProfile, &UserProfile::default());

    let mut profile = profile_with_huge_avatar();
    profile.banner_url = format!("data:image/jpeg;base64,{}", "B".repeat(64 * 1024));
    assert_eq!(
        prefs.save(PreferenceKey::UserProfile, &profile),
        SaveOutcome::StoredSlim
    );

    let stored = prefs.load_profile();
    assert_eq!(stored.username, "blob_hunter");
    assert_eq!(stored.banner_url, DEFAULT_BANNER_URL);
    assert!(!stored.has_embedded_images());
}

#[test]
fn profile_view_reports_slim_save_and_keeps_image_in_memory() {
    let (storage, log) = RecordingStorage::rejecting_first_write_to("user_profile");
    let mut ctx = AppContext::with_storage(ClientConfig::default(), storage);
    let mut view = ProfileView::new(&ctx);

    view.open_editor(&ctx).bio = "new bio".to_string();
    view.attach_avatar("image/png", &[1, 2, 3]).expect("attach");
    let outcome = view.save(&mut ctx).expect("save");

    assert_eq!(outcome, SaveOutcome::StoredSlim);
    assert!(view.warning().is_some());
    assert!(is_data_uri(&ctx.profile().avatar_url));
    assert_eq!(ctx.profile().bio, "new bio");
    assert_eq!(writes_for(&log, "user_profile").len(), 2);
}
