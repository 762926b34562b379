//! Contact resolution
//!
//! Joins an externally supplied address book against per-identity statistics
//! by normalized key. Candidates resolve one at a time so the external layer
//! can stream them in as they arrive; the result list stays ranked after
//! every insertion.

use crate::analytics::identity_stats;
use crate::error::Result;
use crate::identity::IdentityKey;
use crate::store::MessageStore;
use crate::types::{AddressBookEntry, ResolvedContact};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The external address book collaborator.
pub trait AddressBook {
    /// Display name for a normalized identity, if the book knows one.
    fn lookup(&self, key: &IdentityKey) -> Option<String>;
}

/// Address book backed by a fixed list of entries.
///
/// Every handle of every entry is indexed by its normalized key, so any
/// spelling of a contact's number or email resolves to the same name. The
/// first entry claiming a key wins.
pub struct StaticAddressBook {
    names: HashMap<IdentityKey, String>,
}

impl StaticAddressBook {
    pub fn new(entries: &[AddressBookEntry]) -> Self {
        let mut names = HashMap::new();
        for entry in entries {
            for handle in &entry.handles {
                let key = IdentityKey::from_handle(handle);
                if key.is_bare() {
                    continue;
                }
                names
                    .entry(key)
                    .or_insert_with(|| entry.display_name.clone());
            }
        }
        Self { names }
    }

    /// Load address-book entries from a JSON file.
    ///
    /// Expected shape: `[{"display_name": "...", "handles": ["..."]}]`.
    pub fn load_entries(path: &Path) -> Result<Vec<AddressBookEntry>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl AddressBook for StaticAddressBook {
    fn lookup(&self, key: &IdentityKey) -> Option<String> {
        self.names.get(key).cloned()
    }
}

/// Incrementally resolves candidate handles into ranked contact records.
pub struct ContactResolver<'a, B: AddressBook> {
    store: &'a MessageStore,
    book: &'a B,
    seen: HashSet<IdentityKey>,
    contacts: Vec<ResolvedContact>,
}

impl<'a, B: AddressBook> ContactResolver<'a, B> {
    pub fn new(store: &'a MessageStore, book: &'a B) -> Self {
        Self {
            store,
            book,
            seen: HashSet::new(),
            contacts: Vec::new(),
        }
    }

    /// Resolve one candidate handle; returns whether a record was added.
    ///
    /// Candidates with no resolvable key, a key already resolved, or zero
    /// matching messages are skipped. A candidate missing from the address
    /// book is still included under the raw handle as its display name; a
    /// record is never dropped just for lacking a human name.
    pub fn push_candidate(&mut self, handle: &str) -> bool {
        let key = IdentityKey::from_handle(handle);
        if key.is_bare() {
            tracing::debug!(handle, "candidate has no resolvable handle, skipping");
            return false;
        }
        if !self.seen.insert(key.clone()) {
            return false;
        }

        let Some(stats) = identity_stats(self.store, &key) else {
            return false;
        };

        let display_name = self
            .book
            .lookup(&key)
            .unwrap_or_else(|| handle.to_string());

        self.contacts.push(ResolvedContact {
            display_name,
            identity: key,
            stats,
        });
        // Re-rank after every insertion so partial results are always in
        // display order; the stable sort keeps insertion order on ties.
        self.contacts.sort_by(|a, b| {
            b.stats
                .total_count
                .unwrap_or(0)
                .cmp(&a.stats.total_count.unwrap_or(0))
        });
        true
    }

    /// The records resolved so far, ranked by total count descending.
    pub fn ranked(&self) -> &[ResolvedContact] {
        &self.contacts
    }

    /// Consume the resolver, yielding the ranked records.
    pub fn into_ranked(self) -> Vec<ResolvedContact> {
        self.contacts
    }
}

/// Resolve a batch of candidate handles against the store and address book.
pub fn resolve<B: AddressBook>(
    store: &MessageStore,
    candidates: &[String],
    book: &B,
) -> Vec<ResolvedContact> {
    let mut resolver = ContactResolver::new(store, book);
    for handle in candidates {
        resolver.push_candidate(handle);
    }
    resolver.into_ranked()
}
