//! Integration test: conversation store over persisted preferences.
//!
//! Find-or-create identity, message append bookkeeping, search order, and
//! survival of threads across a reload of the store.

use creth_db::preferences::{PreferenceKey, PreferenceStore};
use creth_db::storage::{SqliteStorage, DEFAULT_QUOTA_BYTES};
use creth_messaging::{ConversationStore, MessagingError, PeerRegistry};
use creth_types::conversation::Conversation;

const ME: &str = "0x4c21...8e2";
const PEER: &str = "0x9999888877776666555544443333222211110000";

fn prefs() -> PreferenceStore {
    PreferenceStore::new(SqliteStorage::open_memory(DEFAULT_QUOTA_BYTES).expect("sqlite"))
}

fn store() -> ConversationStore {
    ConversationStore::load(prefs(), PeerRegistry::builtin(), ME)
}

#[test]
fn find_or_create_twice_yields_one_conversation() {
    let mut store = store();
    let before = store.conversations().len();

    let first: *const Conversation = store.find_or_create(PEER, None, None);
    let second: *const Conversation = store.find_or_create(PEER, Some("Ignored"), None);

    assert_eq!(first, second);
    assert_eq!(store.conversations().len(), before + 1);
    let conversation = store.conversation(PEER).expect("created");
    assert_eq!(conversation.peer_name, "0x9999...0000");
    assert_eq!(conversation.peer_avatar, "??");
    assert_eq!(store.conversations()[0].peer_address, PEER);
}

#[test]
fn first_message_clears_new_flag() {
    let mut store = store();
    assert!(store.find_or_create(PEER, None, None).is_new);

    let message = store.append_message(PEER, "hi", true).expect("append");
    assert_eq!(message.sender_address, ME);

    let conversation = store.conversation(PEER).expect("conversation");
    assert!(!conversation.is_new);
    assert_eq!(conversation.last_message.as_deref(), Some("hi"));
    assert_eq!(conversation.last_message_date, Some(message.sent_at));
    assert_eq!(conversation.messages.len(), 1);
}

#[test]
fn append_without_conversation_fails_loudly() {
    let mut store = store();
    let err = store.append_message("0xdead", "hello?", true).expect_err("missing");
    assert!(matches!(err, MessagingError::ConversationNotFound(peer) if peer == "0xdead"));
}

#[test]
fn message_ids_are_unique_within_a_burst() {
    let mut store = store();
    store.find_or_create(PEER, None, None);
    let ids: Vec<u64> = (0..20)
        .map(|i| {
            store
                .append_message(PEER, &format!("m{i}"), i % 2 == 0)
                .expect("append")
                .id
                .parse()
                .expect("numeric id")
        })
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn search_is_case_insensitive_and_stable() {
    let mut store = store();
    store.find_or_create("ef-research", None, None);
    store.find_or_create("defi-dao", None, None);

    let names: Vec<&str> = store
        .search("RESEARCH")
        .iter()
        .map(|c| c.peer_name.as_str())
        .collect();
    assert_eq!(names, vec!["EF Research Pool"]);

    let order: Vec<&str> = store
        .search("")
        .iter()
        .map(|c| c.peer_address.as_str())
        .collect();
    let expected: Vec<&str> = store
        .conversations()
        .iter()
        .map(|c| c.peer_address.as_str())
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn threads_survive_reload() {
    let prefs = prefs();
    {
        let mut store = ConversationStore::load(prefs.clone(), PeerRegistry::builtin(), ME);
        store.find_or_create(PEER, Some("Alice"), Some("AL"));
        store.append_message(PEER, "persist me", true).expect("append");
    }

    let stored: Vec<Conversation> = prefs
        .load(PreferenceKey::Conversations)
        .expect("persisted conversations");
    assert_eq!(stored[0].peer_name, "Alice");

    let reloaded = ConversationStore::load(prefs, PeerRegistry::builtin(), ME);
    let conversation = reloaded.conversation(PEER).expect("reloaded");
    assert_eq!(conversation.last_message.as_deref(), Some("persist me"));
    assert_eq!(reloaded.conversations().len(), 2);
}
