//! Per-metric task fan-out
//!
//! Each independent metric runs as its own blocking task against the shared
//! store handle and the caller joins them; no ordering is guaranteed between
//! metrics. The full-history scans (word and message frequency) are the slow
//! ones, and this keeps them off the caller's thread. Dropping the returned
//! future abandons the tasks; partial results are discarded with them, never
//! surfaced as a completed value.

use super::stats::assemble_global;
use crate::store::MessageStore;
use crate::types::{AggregateStats, MessageScope};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Compute store-wide statistics with one blocking task per metric.
///
/// Equivalent to [`super::global_stats`], parallelized. Queries serialize
/// behind the store's connection guard, so this is safe on any SQLite build;
/// a metric whose task dies degrades to its empty value like any other
/// failed query.
pub async fn compute_global_stats(store: Arc<MessageStore>) -> AggregateStats {
    let sent = spawn_metric(&store, |s| s.total_count(&MessageScope::FromMe));
    let received = spawn_metric(&store, |s| s.total_count(&MessageScope::FromOthers));
    let daily = spawn_metric(&store, |s| s.daily_average(&MessageScope::All));
    let words = spawn_metric(&store, MessageStore::word_frequency);
    let messages = spawn_metric(&store, MessageStore::message_frequency);
    let monthly = spawn_metric(&store, MessageStore::monthly_counts);

    let (sent, received, daily, words, messages, monthly) = tokio::join!(
        join_metric("sent_count", sent),
        join_metric("received_count", received),
        join_metric("daily_average", daily),
        join_metric("word_frequency", words),
        join_metric("message_frequency", messages),
        join_metric("monthly_counts", monthly),
    );

    assemble_global(sent, received, daily, words, messages, monthly)
}

fn spawn_metric<T, F>(store: &Arc<MessageStore>, metric: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&MessageStore) -> T + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || metric(&store))
}

async fn join_metric<T: Default>(name: &'static str, handle: JoinHandle<T>) -> T {
    match handle.await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(metric = name, error = %err, "metric task failed, using empty result");
            T::default()
        }
    }
}
