//! Message store adapter
//!
//! One `MessageStore` wraps one read-only SQLite connection behind a mutex
//! (SQLite readers are serialized behind this single-access guard). Every
//! accessor catches query failure at this boundary, logs it, and returns an
//! empty or zero result; one broken metric never blocks the others. Only
//! opening the store can fail fatally.

use crate::error::{Error, Result};
use crate::identity::IdentityKey;
use crate::types::MessageScope;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Local calendar day of a message. `message.date` is nanoseconds since the
/// 2001-01-01 store epoch, 978307200 seconds after the Unix epoch.
const LOCAL_DAY: &str =
    "date(message.date / 1000000000 + 978307200, 'unixepoch', 'localtime')";

/// Calendar month (1-12, local time) of a message.
const LOCAL_MONTH: &str =
    "CAST(strftime('%m', message.date / 1000000000 + 978307200, 'unixepoch', 'localtime') AS INTEGER)";

/// Placeholder glyph left in the body of attachment-only messages whose
/// attachment payload was stripped; excluded from message ranking.
const PLACEHOLDER_GLYPH: &str = "\u{FFFC}";

/// Read-only handle to the message store.
pub struct MessageStore {
    conn: Mutex<Connection>,
}

impl MessageStore {
    /// Open the store at the given path.
    ///
    /// The connection is read-only; a store that cannot be opened is fatal
    /// (`Error::Store`), since no metric can be computed without it.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;

        register_normalize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Count messages matching the scope.
    ///
    /// `None` only when the query itself failed; a scope with no matching
    /// messages is `Some(0)`. Callers that sum scoped counts use `None` to
    /// report "unavailable" instead of a wrong partial total.
    pub fn total_count(&self, scope: &MessageScope) -> Option<i64> {
        let conn = self.conn.lock().unwrap();
        let (identity, from_me) = scope_filters(scope);
        match scoped_count(&conn, identity, from_me) {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(metric = "total_count", error = %err, "query failed");
                None
            }
        }
    }

    /// Count messages in conversations with `key`, restricted to one direction.
    pub(crate) fn identity_direction_count(
        &self,
        key: &IdentityKey,
        from_me: bool,
    ) -> Option<i64> {
        let conn = self.conn.lock().unwrap();
        match scoped_count(&conn, Some(key), Some(from_me)) {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(metric = "identity_direction_count", error = %err, "query failed");
                None
            }
        }
    }

    /// Average messages per active day for the scope.
    ///
    /// An active day is a local-time calendar day with at least one matching
    /// message; days with none are excluded from the denominator. 0.0 when
    /// there are no active days or the query failed.
    pub fn daily_average(&self, scope: &MessageScope) -> f64 {
        let conn = self.conn.lock().unwrap();
        let (identity, from_me) = scope_filters(scope);
        degraded(
            "daily_average",
            0.0,
            scoped_daily_average(&conn, identity, from_me),
        )
    }

    /// Word counts across every message body, whitespace-tokenized.
    ///
    /// Traversal is timestamp-ascending, so entries come out in first-seen
    /// order; ranking sorts on top of that without losing tie order.
    pub fn word_frequency(&self) -> Vec<(String, i64)> {
        let conn = self.conn.lock().unwrap();
        degraded("word_frequency", Vec::new(), scan_word_frequency(&conn))
    }

    /// Whole-body counts across every message, timestamp-ascending.
    ///
    /// Empty bodies and the attachment placeholder glyph are filtered out at
    /// the query boundary before counting.
    pub fn message_frequency(&self) -> Vec<(String, i64)> {
        let conn = self.conn.lock().unwrap();
        degraded(
            "message_frequency",
            Vec::new(),
            scan_message_frequency(&conn),
        )
    }

    /// Message counts per calendar month across all history, January first.
    pub fn monthly_counts(&self) -> [i64; 12] {
        let conn = self.conn.lock().unwrap();
        degraded("monthly_counts", [0; 12], scan_monthly_counts(&conn))
    }
}

/// Register the `normalize_handle` SQL scalar so the by-identity join can
/// compare canonical keys inside one parameterized query.
fn register_normalize(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "normalize_handle",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let handle: Option<String> = ctx.get(0)?;
            Ok(handle
                .as_deref()
                .map(IdentityKey::from_handle)
                .map(IdentityKey::into_string))
        },
    )?;
    Ok(())
}

/// Log a failed metric query and fall back to its empty value.
fn degraded<T>(metric: &str, fallback: T, result: rusqlite::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(metric, error = %err, "query failed, degrading to empty result");
            fallback
        }
    }
}

/// Lower a scope to its identity and direction filters.
fn scope_filters(scope: &MessageScope) -> (Option<&IdentityKey>, Option<bool>) {
    match scope {
        MessageScope::All => (None, None),
        MessageScope::FromMe => (None, Some(true)),
        MessageScope::FromOthers => (None, Some(false)),
        MessageScope::ByIdentity(key) => (Some(key), None),
    }
}

/// Build the one chat -> association -> message query every scoped accessor
/// shares. Filters are appended as parameterized predicates; nothing from
/// the caller is ever interpolated into the SQL text.
fn filtered_query(select: &str, identity: Option<&IdentityKey>, from_me: Option<bool>) -> String {
    let mut sql = format!(
        "{select} \
         FROM chat \
         JOIN chat_message_join ON chat.ROWID = chat_message_join.chat_id \
         JOIN message ON chat_message_join.message_id = message.ROWID \
         WHERE 1=1"
    );
    if identity.is_some() {
        sql.push_str(" AND normalize_handle(chat.chat_identifier) = ?1");
    }
    match from_me {
        Some(true) => sql.push_str(" AND message.is_from_me = 1"),
        Some(false) => sql.push_str(" AND message.is_from_me = 0"),
        None => {}
    }
    sql
}

fn scoped_count(
    conn: &Connection,
    identity: Option<&IdentityKey>,
    from_me: Option<bool>,
) -> rusqlite::Result<i64> {
    let sql = filtered_query("SELECT COUNT(*)", identity, from_me);
    match identity {
        Some(key) => conn.query_row(&sql, [key.as_str()], |r| r.get(0)),
        None => conn.query_row(&sql, [], |r| r.get(0)),
    }
}

fn scoped_daily_average(
    conn: &Connection,
    identity: Option<&IdentityKey>,
    from_me: Option<bool>,
) -> rusqlite::Result<f64> {
    let select = format!("SELECT COUNT(*), COUNT(DISTINCT {LOCAL_DAY})");
    let sql = filtered_query(&select, identity, from_me);
    let (messages, active_days): (i64, i64) = match identity {
        Some(key) => conn.query_row(&sql, [key.as_str()], |r| Ok((r.get(0)?, r.get(1)?)))?,
        None => conn.query_row(&sql, [], |r| Ok((r.get(0)?, r.get(1)?)))?,
    };
    if active_days == 0 {
        Ok(0.0)
    } else {
        Ok(messages as f64 / active_days as f64)
    }
}

/// Append one occurrence of `key`, preserving first-seen order.
fn accumulate(counts: &mut Vec<(String, i64)>, index: &mut HashMap<String, usize>, key: &str) {
    match index.get(key) {
        Some(&at) => counts[at].1 += 1,
        None => {
            index.insert(key.to_string(), counts.len());
            counts.push((key.to_string(), 1));
        }
    }
}

fn scan_word_frequency(conn: &Connection) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt =
        conn.prepare("SELECT text FROM message WHERE text IS NOT NULL ORDER BY date ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut counts = Vec::new();
    let mut index = HashMap::new();
    for body in rows {
        let body = body?;
        // split_whitespace collapses whitespace/newline runs and never
        // yields an empty token
        for token in body.split_whitespace() {
            accumulate(&mut counts, &mut index, token);
        }
    }
    Ok(counts)
}

fn scan_message_frequency(conn: &Connection) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT text FROM message \
         WHERE text IS NOT NULL AND text <> '' AND text <> ?1 \
         ORDER BY date ASC",
    )?;
    let rows = stmt.query_map([PLACEHOLDER_GLYPH], |row| row.get::<_, String>(0))?;

    let mut counts = Vec::new();
    let mut index = HashMap::new();
    for body in rows {
        let body = body?;
        accumulate(&mut counts, &mut index, &body);
    }
    Ok(counts)
}

fn scan_monthly_counts(conn: &Connection) -> rusqlite::Result<[i64; 12]> {
    let mut counts = [0i64; 12];

    let mut stmt = conn.prepare(&format!(
        "SELECT {LOCAL_MONTH} AS month, COUNT(*) FROM message GROUP BY month"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;

    for row in rows.flatten() {
        let (month, count) = row;
        if (1..=12).contains(&month) {
            counts[(month - 1) as usize] = count;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::normalize;

    #[test]
    fn test_scope_filters_lowering() {
        assert_eq!(scope_filters(&MessageScope::All), (None, None));
        assert_eq!(scope_filters(&MessageScope::FromMe), (None, Some(true)));
        assert_eq!(scope_filters(&MessageScope::FromOthers), (None, Some(false)));

        let key = normalize("5551234567");
        let scope = MessageScope::ByIdentity(key.clone());
        assert_eq!(scope_filters(&scope), (Some(&key), None));
    }

    #[test]
    fn test_filtered_query_parameterizes_identity() {
        let key = normalize("5551234567");
        let sql = filtered_query("SELECT COUNT(*)", Some(&key), Some(true));
        assert!(sql.contains("normalize_handle(chat.chat_identifier) = ?1"));
        assert!(sql.contains("message.is_from_me = 1"));
        // The key itself must never be spliced into the SQL text
        assert!(!sql.contains(key.as_str()));
    }

    #[test]
    fn test_accumulate_keeps_first_seen_order() {
        let mut counts = Vec::new();
        let mut index = HashMap::new();
        for token in ["hi", "there", "hi"] {
            accumulate(&mut counts, &mut index, token);
        }
        assert_eq!(counts, vec![("hi".to_string(), 2), ("there".to_string(), 1)]);
    }
}
