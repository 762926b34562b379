//! # chatwrapped-core
//!
//! Core library for chatwrapped - a message history analytics engine.
//!
//! This library provides:
//! - Identity normalization for phone/email handles
//! - A read-only query adapter over an iMessage-style SQLite message store
//! - Aggregation of global and per-identity statistics
//! - Contact resolution against an external address book
//! - Configuration and logging infrastructure
//!
//! ## Architecture
//!
//! Everything runs as one offline batch pass over a static store snapshot:
//! the adapter exposes typed, scope-parameterized queries; the analytics
//! layer aggregates them; the resolver joins the results with contact names.
//! Only opening the store can fail the pass - every individual metric
//! degrades to an empty result on failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatwrapped_core::{Config, MessageStore};
//! use chatwrapped_core::analytics::global_stats;
//!
//! let config = Config::load().expect("failed to load config");
//! let store = MessageStore::open(&config.store.resolve_path()).expect("failed to open store");
//! let stats = global_stats(&store);
//! println!("{:?} messages", stats.total_count);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use contacts::{resolve, AddressBook, ContactResolver, StaticAddressBook};
pub use error::{Error, Result};
pub use identity::{normalize, IdentityKey};
pub use store::MessageStore;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod contacts;
pub mod error;
pub mod identity;
pub mod logging;
pub mod store;
pub mod types;
