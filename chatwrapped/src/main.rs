//! chatwrapped - Message Wrapped CLI
//!
//! Generate Wrapped-style summaries of a chat history store: message counts,
//! daily averages, word and message rankings, monthly activity, and top
//! contacts.

use anyhow::{Context, Result};
use chatwrapped_core::analytics::compute_global_stats;
use chatwrapped_core::store::sample::ensure_sample_store;
use chatwrapped_core::{
    resolve, AggregateStats, Config, MessageStore, ResolvedContact, StaticAddressBook,
};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "chatwrapped")]
#[command(about = "Message Wrapped - your chat history in review")]
#[command(version)]
struct Args {
    /// Path to the message store (overrides config and the OS default)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Use the bundled sample store instead of a live one
    #[arg(long)]
    sample: bool,

    /// JSON address book: [{"display_name": "...", "handles": ["..."]}]
    #[arg(long)]
    contacts: Option<PathBuf>,

    /// Extra candidate handles to resolve (repeatable)
    #[arg(long = "handle")]
    handles: Vec<String>,

    /// Entries to show per ranking
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration and open the store
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = chatwrapped_core::logging::init(&config.logging).ok();

    let store_path = if args.sample {
        let path = Config::sample_store_path();
        ensure_sample_store(&path).context("failed to generate sample store")?;
        path
    } else if let Some(path) = args.db.clone() {
        path
    } else {
        let path = config.store.resolve_path();
        if config.store.use_sample {
            ensure_sample_store(&path).context("failed to generate sample store")?;
        }
        path
    };

    let store = MessageStore::open(&store_path)
        .with_context(|| format!("failed to open message store at {}", store_path.display()))?;
    let store = Arc::new(store);

    // Global metrics run as independent tasks; contacts resolve afterwards
    // against the same store handle.
    let stats = compute_global_stats(store.clone()).await;

    let entries = match &args.contacts {
        Some(path) => StaticAddressBook::load_entries(path)
            .with_context(|| format!("failed to load address book {}", path.display()))?,
        None => Vec::new(),
    };
    let book = StaticAddressBook::new(&entries);

    let mut candidates: Vec<String> = entries
        .iter()
        .flat_map(|e| e.handles.iter().cloned())
        .collect();
    candidates.extend(args.handles.iter().cloned());
    let contacts = resolve(&store, &candidates, &book);

    match args.export.as_deref() {
        Some("json") => print_json(&stats, &contacts)?,
        Some("md") => print_markdown(&stats, &contacts, args.top),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&stats, &contacts, args.top),
    }

    Ok(())
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn total_display(stats: &AggregateStats) -> String {
    match stats.total_count {
        Some(total) => total.to_string(),
        None => "unavailable".to_string(),
    }
}

fn print_terminal(stats: &AggregateStats, contacts: &[ResolvedContact], top: usize) {
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "YOUR MESSAGES, WRAPPED");
    println!("╰{}╯", "─".repeat(60));
    println!();

    println!("SUMMARY");
    println!(
        "   Total:    {:<12} Sent: {:<10} Received: {}",
        total_display(stats),
        stats.sent_count,
        stats.received_count
    );
    println!("   Daily average: {:.1} messages per active day", stats.daily_average);
    println!();

    if !stats.word_frequency.is_empty() {
        println!("TOP WORDS");
        for (i, (word, count)) in stats.word_frequency.iter().take(top).enumerate() {
            println!("   {}. {:<20} {:>6}", i + 1, word, count);
        }
        println!();
    }

    if !stats.message_frequency.is_empty() {
        println!("TOP MESSAGES");
        for (i, (body, count)) in stats.message_frequency.iter().take(top).enumerate() {
            println!("   {}. {:<40} {:>6}", i + 1, body, count);
        }
        println!();
    }

    println!("BY MONTH");
    for (name, count) in MONTH_NAMES.iter().zip(stats.monthly_counts.iter()) {
        println!("   {} {:>8}", name, count);
    }
    println!();

    if !contacts.is_empty() {
        println!("TOP CONTACTS");
        for (i, contact) in contacts.iter().take(top).enumerate() {
            println!(
                "   {}. {:<24} {:>6}  (sent {}, received {})",
                i + 1,
                contact.display_name,
                total_display(&contact.stats),
                contact.stats.sent_count,
                contact.stats.received_count
            );
        }
        println!();
    }
}

fn print_markdown(stats: &AggregateStats, contacts: &[ResolvedContact], top: usize) {
    println!("# Message Wrapped");
    println!();

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Total | {} |", total_display(stats));
    println!("| Sent | {} |", stats.sent_count);
    println!("| Received | {} |", stats.received_count);
    println!("| Daily average | {:.1} |", stats.daily_average);
    println!();

    if !stats.word_frequency.is_empty() {
        println!("## Top Words");
        println!();
        for (i, (word, count)) in stats.word_frequency.iter().take(top).enumerate() {
            println!("{}. **{}** - {}", i + 1, word, count);
        }
        println!();
    }

    if !stats.message_frequency.is_empty() {
        println!("## Top Messages");
        println!();
        for (i, (body, count)) in stats.message_frequency.iter().take(top).enumerate() {
            println!("{}. \"{}\" - {}", i + 1, body, count);
        }
        println!();
    }

    println!("## By Month");
    println!();
    println!("| Month | Messages |");
    println!("|-------|----------|");
    for (name, count) in MONTH_NAMES.iter().zip(stats.monthly_counts.iter()) {
        println!("| {} | {} |", name, count);
    }
    println!();

    if !contacts.is_empty() {
        println!("## Top Contacts");
        println!();
        for (i, contact) in contacts.iter().take(top).enumerate() {
            println!(
                "{}. **{}** - {} messages (sent {}, received {})",
                i + 1,
                contact.display_name,
                total_display(&contact.stats),
                contact.stats.sent_count,
                contact.stats.received_count
            );
        }
        println!();
    }

    println!("---");
    println!(
        "*Generated by chatwrapped on {}*",
        Local::now().format("%b %d, %Y")
    );
}

fn print_json(stats: &AggregateStats, contacts: &[ResolvedContact]) -> Result<()> {
    // Full rankings; consumers apply their own cutoffs
    let json = serde_json::json!({
        "totals": {
            "total": stats.total_count,
            "sent": stats.sent_count,
            "received": stats.received_count,
            "daily_average": stats.daily_average,
        },
        "word_frequency": stats.word_frequency.iter().map(|(word, count)| {
            serde_json::json!({"word": word, "count": count})
        }).collect::<Vec<_>>(),
        "message_frequency": stats.message_frequency.iter().map(|(body, count)| {
            serde_json::json!({"message": body, "count": count})
        }).collect::<Vec<_>>(),
        "monthly_counts": stats.monthly_counts,
        "contacts": contacts.iter().map(|c| serde_json::json!({
            "display_name": c.display_name,
            "identity": c.identity.as_str(),
            "total": c.stats.total_count,
            "sent": c.stats.sent_count,
            "received": c.stats.received_count,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
