//! Aggregate statistics
//!
//! Pulls typed results from the store adapter and assembles them into
//! [`AggregateStats`]. Ranking is returned in full; truncating to a "top N"
//! is presentation policy and stays with the caller.

use crate::identity::IdentityKey;
use crate::store::MessageStore;
use crate::types::{AggregateStats, MessageScope};

/// Sort a frequency list descending by count.
///
/// The sort is stable, so entries with equal counts keep the first-seen
/// order the adapter traversal produced.
pub(crate) fn sort_ranking(entries: &mut [(String, i64)]) {
    entries.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Build global stats from independently computed metric values.
///
/// The total is the sum of the two scoped counts, never the `All` scope; if
/// either side was unavailable the total is `None` rather than a wrong
/// partial sum.
pub(crate) fn assemble_global(
    sent: Option<i64>,
    received: Option<i64>,
    daily_average: f64,
    mut word_frequency: Vec<(String, i64)>,
    mut message_frequency: Vec<(String, i64)>,
    monthly_counts: [i64; 12],
) -> AggregateStats {
    sort_ranking(&mut word_frequency);
    sort_ranking(&mut message_frequency);

    let total_count = match (sent, received) {
        (Some(sent), Some(received)) => Some(sent + received),
        _ => None,
    };

    AggregateStats {
        total_count,
        sent_count: sent.unwrap_or(0),
        received_count: received.unwrap_or(0),
        daily_average,
        word_frequency,
        message_frequency,
        monthly_counts,
    }
}

/// Compute store-wide statistics in one sequential pass.
pub fn global_stats(store: &MessageStore) -> AggregateStats {
    assemble_global(
        store.total_count(&MessageScope::FromMe),
        store.total_count(&MessageScope::FromOthers),
        store.daily_average(&MessageScope::All),
        store.word_frequency(),
        store.message_frequency(),
        store.monthly_counts(),
    )
}

/// Compute counters for one identity.
///
/// `None` for the bare sentinel key, for identities with zero matching
/// messages, and when the scoped queries were unavailable; a zero-count
/// record is never emitted. Frequency fields stay empty per the global-only
/// ranking contract.
pub fn identity_stats(store: &MessageStore, key: &IdentityKey) -> Option<AggregateStats> {
    if key.is_bare() {
        return None;
    }

    let total = store.total_count(&MessageScope::ByIdentity(key.clone()))?;
    if total == 0 {
        return None;
    }

    let sent = store.identity_direction_count(key, true).unwrap_or(0);
    let received = store.identity_direction_count(key, false).unwrap_or(0);

    Some(AggregateStats {
        total_count: Some(total),
        sent_count: sent,
        received_count: received,
        ..Default::default()
    })
}
