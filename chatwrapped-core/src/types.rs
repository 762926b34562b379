//! Core domain types for chatwrapped
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Chat** | One conversation thread, keyed by a handle string |
//! | **Identity key** | Canonical normalized form of a phone/email handle |
//! | **Active day** | A local-time calendar day with at least one message in scope |
//! | **Scope** | A filter dimension for message queries: all, sent, received, or by identity |
//!
//! All values here are transient: constructed during one analytics pass and
//! discarded with it. Nothing is written back to the store.

use crate::identity::IdentityKey;
use serde::{Deserialize, Serialize};

/// Filter dimension for message queries.
///
/// Replaces the hand-interpolated SQL filters the store used to grow per
/// accessor; the adapter lowers each variant into one shared, parameterized
/// join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageScope {
    /// Every message in the store
    All,
    /// Messages sent by the store owner
    FromMe,
    /// Messages received from others
    FromOthers,
    /// Messages in conversations with one normalized identity
    ByIdentity(IdentityKey),
}

/// Aggregate counters for one identity or for the whole store.
///
/// Global stats fill every field. Per-identity stats fill the count fields
/// only; frequency rankings are computed once globally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    /// Sent + received, or `None` when either scoped count was unavailable.
    /// Never a partial sum.
    pub total_count: Option<i64>,
    /// Messages sent by the store owner
    pub sent_count: i64,
    /// Messages received from others
    pub received_count: i64,
    /// Messages per active day (days with zero messages excluded)
    pub daily_average: f64,
    /// Token -> count, descending by count, first-seen order on ties
    pub word_frequency: Vec<(String, i64)>,
    /// Full body -> count, descending by count, first-seen order on ties
    pub message_frequency: Vec<(String, i64)>,
    /// Message counts per calendar month, January through December
    pub monthly_counts: [i64; 12],
}

/// One record from the externally supplied address book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressBookEntry {
    /// Human-readable contact name
    pub display_name: String,
    /// Raw phone/email handles for this contact
    pub handles: Vec<String>,
}

/// A contact joined against its aggregate statistics.
///
/// Output of the resolver, ordered by `stats.total_count` descending with
/// ties broken by insertion order.
#[derive(Debug, Clone)]
pub struct ResolvedContact {
    /// Address-book name, or the raw handle when no entry matched
    pub display_name: String,
    /// Normalized identity the stats were gathered for
    pub identity: IdentityKey,
    /// Per-identity counters
    pub stats: AggregateStats,
}
