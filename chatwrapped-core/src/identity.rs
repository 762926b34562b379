//! Identity normalization
//!
//! A chat handle shows up in many spellings: `+1 (555) 123-4567`,
//! `555-123-4567`, `15551234567`, `friend@example.com`. Conversations are
//! merged per partner by reducing every handle to a canonical [`IdentityKey`]
//! before comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical form of a phone or email handle.
///
/// Two handles that produce the same key are treated as the same
/// conversational partner. The bare key `"+"` means "no resolvable phone
/// handle"; callers must fall back to an email-based key when one is
/// available (see [`IdentityKey::from_handle`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Derive a key from any raw handle.
    ///
    /// Handles containing `@` are treated as email addresses and keyed by
    /// their trimmed, ASCII-lowercased form. Everything else goes through
    /// phone [`normalize`].
    pub fn from_handle(handle: &str) -> Self {
        if handle.contains('@') {
            IdentityKey(handle.trim().to_ascii_lowercase())
        } else {
            normalize(handle)
        }
    }

    /// True for the `"+"` sentinel: the handle had no digits to normalize.
    ///
    /// Not an error; callers special-case it when choosing an email fallback.
    pub fn is_bare(&self) -> bool {
        self.0 == "+"
    }

    /// The canonical key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, yielding the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a raw phone handle.
///
/// Strips every character except ASCII digits and a leading `+`, then
/// prepends `+` when the result lacks one. No country code is ever added;
/// the `+` only marks the prefix position. `""` normalizes to the bare
/// sentinel `"+"`. Pure and deterministic; `normalize` is idempotent.
pub fn normalize(handle: &str) -> IdentityKey {
    let mut key = String::with_capacity(handle.len() + 1);
    for c in handle.chars() {
        if c.is_ascii_digit() || (c == '+' && key.is_empty()) {
            key.push(c);
        }
    }
    if !key.starts_with('+') {
        key.insert(0, '+');
    }
    IdentityKey(key)
}
