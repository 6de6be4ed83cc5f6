//! Guichet Daemon - conversational intake service
//!
//! Receives chat messages, walks users through a short slot-filling
//! dialogue, and materializes the results as support tickets behind a
//! dashboard-facing read API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use guichet_common::{GuichetConfig, SessionRegistry, TicketStore};
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use guichetd::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(name = "guichetd", version, about = "Conversational intake daemon")]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = GuichetConfig::load(args.config.as_deref())?;

    info!("guichetd v{} starting", env!("CARGO_PKG_VERSION"));
    std::fs::create_dir_all(&config.data_dir)?;

    let tickets = TicketStore::open(config.tickets_file())?;
    info!("ticket ledger loaded: {} ticket(s)", tickets.list().len());

    let state = AppState::new(config, tickets);
    spawn_session_sweeper(
        state.sessions.clone(),
        state.config.session_ttl(),
        state.config.sweep_interval(),
    );

    server::run(state).await
}

/// Abandoned conversations must not pile up forever: drop sessions idle
/// past the TTL on a fixed interval. Expired users silently fall back to
/// Idle; their next message starts a fresh classification.
fn spawn_session_sweeper(
    sessions: Arc<RwLock<SessionRegistry>>,
    ttl: Duration,
    every: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = sessions.write().await.sweep_expired(ttl);
            if removed > 0 {
                info!("swept {} idle session(s)", removed);
            }
        }
    });
}
