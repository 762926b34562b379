//! Bundled sample store
//!
//! A deterministic stand-in for the live message log, generated on demand
//! into the XDG data dir. Lets the CLI (and anyone without access to their
//! OS message store) exercise the full analytics pass on known data.

use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;

/// Minimal chat.db-shaped schema: one conversation per handle, messages,
/// and the many-to-many association between them.
const SAMPLE_SCHEMA: &str = r#"
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

/// Create the sample store at `path` unless it already exists.
pub fn ensure_sample_store(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.execute_batch(SAMPLE_SCHEMA)?;
    seed(&conn)?;

    tracing::info!(path = %path.display(), "generated sample message store");
    Ok(())
}

/// Seed a fixed conversation history: three partners across several months,
/// with enough texture (repeated phrases, an attachment-only glyph, an
/// empty body) for every metric to produce something.
fn seed(conn: &Connection) -> Result<()> {
    let chats = [
        (1, "+15551230001"),
        (2, "(555) 123-0002"),
        (3, "sam@example.com"),
    ];
    for (rowid, identifier) in chats {
        conn.execute(
            "INSERT INTO chat (ROWID, chat_identifier) VALUES (?1, ?2)",
            params![rowid, identifier],
        )?;
    }

    let messages: &[(i64, u32, u32, u32, &str, bool)] = &[
        // (chat, month, day, hour, text, is_from_me)
        (1, 1, 9, 9, "happy new year!", true),
        (1, 1, 9, 10, "you too!", false),
        (1, 2, 14, 20, "dinner tonight?", true),
        (1, 2, 14, 20, "sounds good", false),
        (1, 2, 14, 21, "sounds good", false),
        (2, 3, 3, 12, "meeting moved to 3", false),
        (2, 3, 3, 12, "ok", true),
        (2, 3, 4, 8, "ok", true),
        (2, 6, 21, 18, "\u{FFFC}", false),
        (2, 6, 21, 18, "nice photo", true),
        (3, 9, 1, 11, "lunch next week?", false),
        (3, 9, 1, 11, "lunch sounds good", true),
        (3, 12, 24, 22, "merry christmas", true),
        (3, 12, 24, 22, "", false),
        (3, 12, 25, 9, "merry christmas", false),
    ];

    for (rowid, (chat_id, month, day, hour, text, is_from_me)) in (1i64..).zip(messages) {
        let local = NaiveDate::from_ymd_opt(2023, *month, *day)
            .and_then(|d| d.and_hms_opt(*hour, 0, 0))
            .ok_or_else(|| crate::error::Error::Config("invalid sample timestamp".into()))?;
        conn.execute(
            "INSERT INTO message (ROWID, date, text, is_from_me) VALUES (?1, ?2, ?3, ?4)",
            params![rowid, super::raw_timestamp(local), text, *is_from_me as i64],
        )?;
        conn.execute(
            "INSERT INTO chat_message_join (chat_id, message_id) VALUES (?1, ?2)",
            params![chat_id, rowid],
        )?;
    }

    Ok(())
}
