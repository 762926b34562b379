//! Read-only query layer over the message store
//!
//! The store is an iMessage-style `chat.db` SQLite snapshot with three
//! entities: `chat` (one conversation per handle), `message` (timestamp,
//! body, direction flag), and the `chat_message_join` association between
//! them. This module never writes to it and never hands out the raw
//! connection; callers get typed results only.

pub mod adapter;
pub mod sample;

pub use adapter::MessageStore;

use chrono::{NaiveDateTime, TimeZone};

/// Seconds between the Unix epoch and the store epoch (2001-01-01T00:00:00Z).
pub(crate) const STORE_EPOCH_OFFSET_SECS: i64 = 978_307_200;

/// Nanoseconds per second; `message.date` is stored in nanoseconds.
pub(crate) const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Raw `message.date` value for a local wall-clock time.
///
/// The store keeps timestamps as nanoseconds since the 2001 epoch; calendar
/// bucketing converts them back through `'localtime'`, so seeding with local
/// wall-clock times round-trips to the same calendar day in any timezone.
pub fn raw_timestamp(local: NaiveDateTime) -> i64 {
    let unix_secs = match chrono::Local.from_local_datetime(&local) {
        chrono::LocalResult::Single(t) => t.timestamp(),
        chrono::LocalResult::Ambiguous(t, _) => t.timestamp(),
        chrono::LocalResult::None => chrono::Utc.from_utc_datetime(&local).timestamp(),
    };
    (unix_secs - STORE_EPOCH_OFFSET_SECS) * NANOS_PER_SEC
}
