//! `episteme-curate` - snapshot retention from the command line
//!
//! ```text
//! episteme-curate curate <DIR> [--dry-run] [--json] [--recent N] [--window-hours H]
//! episteme-curate restore <DIR> [--json]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use episteme_curator::{CurationEngine, CurationPolicy, CurationReport, FsSnapshotStore};

/// Keep the snapshots worth resuming from, archive the rest
#[derive(Parser)]
#[command(name = "episteme-curate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, env = "EPISTEME_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate snapshots and archive the ones no rule keeps
    Curate {
        /// Snapshot directory
        dir: PathBuf,

        /// Report decisions without moving any file
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Always keep this many of the most recent snapshots
        #[arg(long, value_name = "N")]
        recent: Option<usize>,

        /// Width of the best-of-window scan in hours
        #[arg(long, value_name = "H")]
        window_hours: Option<f64>,
    },

    /// Move every archived snapshot back into the directory
    Restore {
        /// Snapshot directory
        dir: PathBuf,

        /// Print restored ids as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Curate {
            dir,
            dry_run,
            json,
            recent,
            window_hours,
        } => {
            let mut policy = CurationPolicy::from_env();
            if let Some(n) = recent {
                policy = policy.with_recent_count(n);
            }
            if let Some(h) = window_hours {
                policy = policy.with_window_hours(h);
            }

            let store = FsSnapshotStore::with_policy(&dir, &policy);
            let report = CurationEngine::new(policy)
                .curate(&store, dry_run)
                .await
                .with_context(|| format!("Failed to curate {}", dir.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Restore { dir, json } => {
            let policy = CurationPolicy::from_env();
            let store = FsSnapshotStore::with_policy(&dir, &policy);
            let restored = store
                .restore_all()
                .await
                .with_context(|| format!("Failed to restore into {}", dir.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&restored)?);
            } else {
                for id in &restored {
                    println!("restored {}", id);
                }
                println!("{} snapshot(s) restored", restored.len());
            }
        }
    }

    Ok(())
}

fn print_report(report: &CurationReport) {
    for d in &report.decisions {
        println!(
            "{:<8} {:<13} impact={:.2} completion={:.2}  {}  {}",
            if d.is_kept() { "keep" } else { "archive" },
            d.reason,
            d.impact,
            d.completion,
            d.timestamp,
            d.id,
        );
    }
    for s in &report.skipped {
        println!("{:<8} {:<13} {}", "skip", s.reason, s.id);
    }

    let verb = if report.dry_run { "would archive" } else { "archived" };
    println!(
        "\n{} snapshot(s): kept {}, {} {} (retention {:.1}%)",
        report.total,
        report.kept,
        verb,
        report.archived,
        report.retention_rate * 100.0
    );
    if !report.skipped.is_empty() {
        println!("{} unreadable file(s) skipped", report.skipped.len());
    }
}
