//! Integration tests for the chatwrapped analytics pass
//!
//! These tests seed temporary chat.db-shaped stores and verify the adapter,
//! aggregation, and resolver behavior end to end.

use chatwrapped_core::analytics::{compute_global_stats, global_stats, identity_stats};
use chatwrapped_core::store::raw_timestamp;
use chatwrapped_core::types::{AddressBookEntry, MessageScope};
use chatwrapped_core::{normalize, resolve, Error, IdentityKey, MessageStore, StaticAddressBook};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE chat (
    ROWID            INTEGER PRIMARY KEY,
    chat_identifier  TEXT NOT NULL
);

CREATE TABLE message (
    ROWID       INTEGER PRIMARY KEY,
    date        INTEGER NOT NULL,
    text        TEXT,
    is_from_me  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE chat_message_join (
    chat_id     INTEGER NOT NULL REFERENCES chat(ROWID),
    message_id  INTEGER NOT NULL REFERENCES message(ROWID)
);
"#;

/// One seeded row: (chat identifier, body, is_from_me, local time)
type Seed<'a> = (&'a str, Option<&'a str>, bool, NaiveDateTime);

/// Local wall-clock time in the fixture year.
fn ts(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Create a store file with the chat.db schema and the given messages.
fn seed_store(path: &Path, rows: &[Seed]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();

    let mut chat_ids: HashMap<&str, i64> = HashMap::new();
    for (n, &(identifier, text, from_me, at)) in rows.iter().enumerate() {
        let next_chat = chat_ids.len() as i64 + 1;
        let chat_id = *chat_ids.entry(identifier).or_insert(next_chat);
        if chat_id == next_chat {
            conn.execute(
                "INSERT INTO chat (ROWID, chat_identifier) VALUES (?1, ?2)",
                params![chat_id, identifier],
            )
            .unwrap();
        }

        let message_id = n as i64 + 1;
        conn.execute(
            "INSERT INTO message (ROWID, date, text, is_from_me) VALUES (?1, ?2, ?3, ?4)",
            params![message_id, raw_timestamp(at), text, from_me as i64],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chat_message_join (chat_id, message_id) VALUES (?1, ?2)",
            params![chat_id, message_id],
        )
        .unwrap();
    }
}

fn open_seeded(dir: &TempDir, rows: &[Seed]) -> MessageStore {
    let path = dir.path().join("chat.db");
    seed_store(&path, rows);
    MessageStore::open(&path).expect("store should open")
}

// ============================================
// Adapter: counts and scopes
// ============================================

#[test]
fn test_total_count_by_scope() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("one"), true, ts(1, 2, 9)),
            ("5550001", Some("two"), false, ts(1, 2, 10)),
            ("5550002", Some("three"), true, ts(1, 3, 9)),
        ],
    );

    assert_eq!(store.total_count(&MessageScope::All), Some(3));
    assert_eq!(store.total_count(&MessageScope::FromMe), Some(2));
    assert_eq!(store.total_count(&MessageScope::FromOthers), Some(1));
}

#[test]
fn test_by_identity_merges_handle_spellings() {
    let dir = TempDir::new().unwrap();
    // Same partner, two spellings of the handle, two separate chat rows
    let store = open_seeded(
        &dir,
        &[
            ("(555) 123-4567", Some("hey"), false, ts(2, 1, 9)),
            ("+5551234567", Some("hi"), true, ts(2, 1, 10)),
            ("5559999999", Some("other"), false, ts(2, 1, 11)),
        ],
    );

    let scope = MessageScope::ByIdentity(normalize("555-123-4567"));
    assert_eq!(store.total_count(&scope), Some(2));
}

#[test]
fn test_by_identity_matches_email_handles() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("Friend@Example.com", Some("lunch?"), false, ts(3, 1, 12)),
            ("5550001", Some("nope"), true, ts(3, 1, 13)),
        ],
    );

    let scope = MessageScope::ByIdentity(IdentityKey::from_handle("friend@example.com"));
    assert_eq!(store.total_count(&scope), Some(1));
}

// ============================================
// Adapter: daily average
// ============================================

#[test]
fn test_daily_average_over_active_days() {
    let dir = TempDir::new().unwrap();
    // 3 sent messages on one day, 5 on another; received traffic on a third
    // day must not leak into the FromMe average
    let mut rows: Vec<Seed> = Vec::new();
    for hour in 9..12 {
        rows.push(("5550001", Some("a"), true, ts(4, 1, hour)));
    }
    for hour in 9..14 {
        rows.push(("5550001", Some("b"), true, ts(4, 2, hour)));
    }
    rows.push(("5550001", Some("c"), false, ts(4, 3, 9)));

    let store = open_seeded(&dir, &rows);
    assert_eq!(store.daily_average(&MessageScope::FromMe), 4.0);
    assert_eq!(store.daily_average(&MessageScope::FromOthers), 1.0);
    assert_eq!(store.daily_average(&MessageScope::All), 3.0);
}

#[test]
fn test_daily_average_empty_store_is_zero() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(&dir, &[]);
    assert_eq!(store.daily_average(&MessageScope::FromMe), 0.0);
}

// ============================================
// Adapter: frequency scans
// ============================================

#[test]
fn test_word_frequency_counts_tokens() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("hi there"), true, ts(5, 1, 9)),
            ("5550001", Some("hi"), false, ts(5, 1, 10)),
            ("5550001", None, false, ts(5, 1, 11)),
        ],
    );

    let words = store.word_frequency();
    assert_eq!(
        words,
        vec![("hi".to_string(), 2), ("there".to_string(), 1)]
    );
}

#[test]
fn test_word_frequency_collapses_whitespace_runs() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[("5550001", Some("one  two\nthree\t one"), true, ts(5, 2, 9))],
    );

    let words = store.word_frequency();
    assert_eq!(
        words,
        vec![
            ("one".to_string(), 2),
            ("two".to_string(), 1),
            ("three".to_string(), 1),
        ]
    );
}

#[test]
fn test_message_frequency_excludes_empty_and_placeholder() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some(""), false, ts(6, 1, 9)),
            ("5550001", Some("\u{FFFC}"), false, ts(6, 1, 10)),
            ("5550001", Some("see you soon"), true, ts(6, 1, 11)),
        ],
    );

    let messages = store.message_frequency();
    assert_eq!(messages, vec![("see you soon".to_string(), 1)]);
}

#[test]
fn test_message_frequency_counts_whole_bodies() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("hi there"), true, ts(6, 2, 9)),
            ("5550001", Some("hi there"), false, ts(6, 2, 10)),
            ("5550001", Some("hi"), true, ts(6, 2, 11)),
        ],
    );

    let messages = store.message_frequency();
    // Whole bodies, not tokens: "hi there" and "hi" are distinct keys
    assert_eq!(
        messages,
        vec![("hi there".to_string(), 2), ("hi".to_string(), 1)]
    );
}

// ============================================
// Adapter: monthly distribution
// ============================================

#[test]
fn test_monthly_counts_bucket_by_calendar_month() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("jan"), true, ts(1, 15, 9)),
            ("5550001", Some("jan again"), false, ts(1, 20, 9)),
            ("5550001", Some("mar"), true, ts(3, 3, 9)),
            ("5550001", Some("dec"), false, ts(12, 31, 12)),
        ],
    );

    let months = store.monthly_counts();
    let mut expected = [0i64; 12];
    expected[0] = 2;
    expected[2] = 1;
    expected[11] = 1;
    assert_eq!(months, expected);
}

// ============================================
// Aggregation engine
// ============================================

#[test]
fn test_global_stats_totals_and_ranking() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("hi there"), true, ts(7, 1, 9)),
            ("5550001", Some("hi"), false, ts(7, 1, 10)),
            ("5550002", Some("hi"), false, ts(7, 2, 9)),
        ],
    );

    let stats = global_stats(&store);
    assert_eq!(stats.sent_count, 1);
    assert_eq!(stats.received_count, 2);
    assert_eq!(stats.total_count, Some(3));
    // "hi" appears 3 times and ranks first
    assert_eq!(stats.word_frequency[0], ("hi".to_string(), 3));
    assert_eq!(stats.monthly_counts[6], 3);
}

#[test]
fn test_identity_stats_counts_directions() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("a"), true, ts(8, 1, 9)),
            ("5550001", Some("b"), true, ts(8, 1, 10)),
            ("5550001", Some("c"), false, ts(8, 1, 11)),
        ],
    );

    let stats = identity_stats(&store, &normalize("5550001")).expect("identity has messages");
    assert_eq!(stats.total_count, Some(3));
    assert_eq!(stats.sent_count, 2);
    assert_eq!(stats.received_count, 1);
    assert!(stats.word_frequency.is_empty());
}

#[test]
fn test_identity_stats_excludes_zero_count_identities() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(&dir, &[("5550001", Some("a"), true, ts(8, 2, 9))]);

    assert!(identity_stats(&store, &normalize("5559999999")).is_none());
    assert!(identity_stats(&store, &normalize("")).is_none());
}

#[tokio::test]
async fn test_async_metrics_match_sequential_pass() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("hi there"), true, ts(9, 1, 9)),
            ("5550001", Some("hi"), false, ts(9, 2, 10)),
            ("5550002", Some("\u{FFFC}"), false, ts(9, 3, 9)),
        ],
    );

    let sequential = global_stats(&store);
    let parallel = compute_global_stats(std::sync::Arc::new(store)).await;
    assert_eq!(parallel, sequential);
}

// ============================================
// Contact resolution
// ============================================

fn entry(name: &str, handles: &[&str]) -> AddressBookEntry {
    AddressBookEntry {
        display_name: name.to_string(),
        handles: handles.iter().map(|h| h.to_string()).collect(),
    }
}

#[test]
fn test_resolver_joins_names_and_ranks_by_total() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(
        &dir,
        &[
            ("5550001", Some("a"), true, ts(10, 1, 9)),
            ("5550002", Some("b"), true, ts(10, 1, 10)),
            ("5550002", Some("c"), false, ts(10, 1, 11)),
            ("5550002", Some("d"), false, ts(10, 1, 12)),
        ],
    );
    let book = StaticAddressBook::new(&[
        entry("Quiet", &["5550001"]),
        entry("Chatty", &["(555) 0002"]),
    ]);

    let candidates = vec!["5550001".to_string(), "5550002".to_string()];
    let contacts = resolve(&store, &candidates, &book);

    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].display_name, "Chatty");
    assert_eq!(contacts[0].stats.total_count, Some(3));
    assert_eq!(contacts[1].display_name, "Quiet");
}

#[test]
fn test_resolver_falls_back_to_raw_handle() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(&dir, &[("5550001", Some("a"), false, ts(10, 2, 9))]);
    let book = StaticAddressBook::new(&[]);

    let contacts = resolve(&store, &["5550001".to_string()], &book);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].display_name, "5550001");
}

#[test]
fn test_resolver_skips_silent_and_duplicate_candidates() {
    let dir = TempDir::new().unwrap();
    let store = open_seeded(&dir, &[("5550001", Some("a"), false, ts(10, 3, 9))]);
    let book = StaticAddressBook::new(&[entry("Alex", &["5550001"])]);

    let candidates = vec![
        "5550001".to_string(),
        "+5550001".to_string(),     // same identity, different spelling
        "5559999999".to_string(),   // no messages
        "".to_string(),             // no resolvable handle
    ];
    let contacts = resolve(&store, &candidates, &book);
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].display_name, "Alex");
}

// ============================================
// Failure semantics
// ============================================

#[test]
fn test_missing_store_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = MessageStore::open(&dir.path().join("no-such.db"));
    assert!(matches!(result, Err(Error::Store(_))));
}

#[test]
fn test_queries_degrade_on_missing_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.db");
    // A store with no message table at all: every metric query fails
    let conn = Connection::open(&path).unwrap();
    conn.execute("CREATE TABLE chat (ROWID INTEGER PRIMARY KEY, chat_identifier TEXT)", [])
        .unwrap();
    drop(conn);

    let store = MessageStore::open(&path).expect("opening still succeeds");
    assert_eq!(store.total_count(&MessageScope::All), None);
    assert_eq!(store.daily_average(&MessageScope::FromMe), 0.0);
    assert!(store.word_frequency().is_empty());
    assert!(store.message_frequency().is_empty());
    assert_eq!(store.monthly_counts(), [0; 12]);

    // The global total reports unavailable, never a partial sum
    let stats = global_stats(&store);
    assert_eq!(stats.total_count, None);
    assert_eq!(stats.sent_count, 0);
}
