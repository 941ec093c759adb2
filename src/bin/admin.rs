//! CLI administration tool for url-redirector.
//!
//! Inspects the store namespaces and manages client quotas without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check that every namespace is reachable
//! cargo run --bin admin -- ping
//!
//! # Show a link and its remaining lifetime
//! cargo run --bin admin -- link 1a2b3c4d
//!
//! # Show a token's click count
//! cargo run --bin admin -- clicks 1a2b3c4d
//!
//! # Inspect or reset a client's quota
//! cargo run --bin admin -- quota show 203.0.113.7
//! cargo run --bin admin -- quota reset 203.0.113.7 --yes
//! ```
//!
//! # Environment Variables
//!
//! Uses the same store settings as the server (`REDIS_ADDR`, `REDIS_PASSWORD`,
//! `LINK_DB`, `QUOTA_DB`, `CLICK_DB`, ...). `STORE_BACKEND=memory` is rejected
//! since an in-memory store is private to the server process.

use url_redirector::config::{self, Config, StoreBackend};
use url_redirector::domain::repositories::{ClickRepository, LinkRepository, QuotaRepository};
use url_redirector::infrastructure::persistence::{
    KvClickRepository, KvLinkRepository, KvQuotaRepository,
};
use url_redirector::infrastructure::store::{KeyValueStore, RedisStore};
use url_redirector::utils::time::whole_minutes;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::net::IpAddr;
use std::sync::Arc;

/// CLI tool for managing url-redirector.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Check connectivity of every store namespace
    Ping,

    /// Show the target and remaining lifetime of a link
    Link {
        /// Short token
        token: String,
    },

    /// Show the click count of a token
    Clicks {
        /// Short token
        token: String,
    },

    /// Inspect or reset client quotas
    Quota {
        #[command(subcommand)]
        action: QuotaAction,
    },
}

/// Quota management subcommands.
#[derive(Subcommand)]
enum QuotaAction {
    /// Show a client's remaining requests
    Show {
        /// Client IP address
        ip: IpAddr,
    },

    /// Drop a client's counter so its next request starts a fresh window
    Reset {
        /// Client IP address
        ip: IpAddr,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store_backend == StoreBackend::Memory {
        anyhow::bail!("The admin tool needs STORE_BACKEND=redis");
    }

    match cli.command {
        Commands::Ping => handle_ping(&config).await?,
        Commands::Link { token } => show_link(&config, &token).await?,
        Commands::Clicks { token } => show_clicks(&config, &token).await?,
        Commands::Quota { action } => handle_quota_action(&config, action).await?,
    }

    Ok(())
}

/// Connects to one namespace.
async fn connect(config: &Config, db: u8) -> Result<Arc<dyn KeyValueStore>> {
    let store = RedisStore::connect(
        &config.redis_url(db),
        db,
        config.store_connect_timeout(),
        config.store_op_timeout(),
    )
    .await
    .with_context(|| format!("Failed to connect to Redis db {}", db))?;

    Ok(Arc::new(store))
}

/// Pings the link, quota and click namespaces in turn.
///
/// # Output Format
///
/// ```text
/// 🔍 Checking store namespaces...
///
///   links   db 0   OK
///   quotas  db 1   OK
///   clicks  db 2   FAILED (connection refused)
/// ```
async fn handle_ping(config: &Config) -> Result<()> {
    println!("{}", "🔍 Checking store namespaces...".bright_blue());
    println!();

    let namespaces = [
        ("links", config.link_db),
        ("quotas", config.quota_db),
        ("clicks", config.click_db),
    ];

    let mut failures = 0;
    for (name, db) in namespaces {
        let result = match connect(config, db).await {
            Ok(store) => store.ping().await.map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        let status = match result {
            Ok(()) => "OK".green().bold(),
            Err(e) => {
                failures += 1;
                format!("FAILED ({:#})", e).red().bold()
            }
        };

        println!(
            "  {:<7} {:<5} {}",
            name.cyan(),
            format!("db {}", db).bright_black(),
            status
        );
    }
    println!();

    if failures > 0 {
        anyhow::bail!("{} namespace(s) unreachable", failures);
    }

    println!("{}", "✅ All namespaces reachable".green().bold());
    Ok(())
}

/// Prints a link's target and remaining lifetime.
async fn show_link(config: &Config, token: &str) -> Result<()> {
    let repo = KvLinkRepository::new(connect(config, config.link_db).await?);

    let link = repo
        .find(token)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    match link {
        Some(link) => {
            println!("{}", "🔗 Link".bright_blue().bold());
            println!();
            println!("  Token:  {}", link.token.cyan());
            println!("  Target: {}", link.target.bright_white());
            match link.expires_in {
                Some(ttl) => println!(
                    "  Expires in: {}",
                    format!("{} min", whole_minutes(ttl)).bright_yellow()
                ),
                None => println!("  Expires in: {}", "never".bright_black()),
            }
            println!();
        }
        None => println!("{}", "⚠️  Link not found or expired".yellow()),
    }

    Ok(())
}

/// Prints a token's click count.
async fn show_clicks(config: &Config, token: &str) -> Result<()> {
    let repo = KvClickRepository::new(connect(config, config.click_db).await?);

    let clicks = repo
        .count(token)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    println!(
        "  {} {}",
        token.cyan(),
        format!("{} clicks", clicks).bright_green().bold()
    );

    Ok(())
}

/// Dispatches quota management commands.
async fn handle_quota_action(config: &Config, action: QuotaAction) -> Result<()> {
    let settings = config.settings();
    let repo = KvQuotaRepository::new(
        connect(config, config.quota_db).await?,
        settings.quota_ceiling,
        settings.quota_window,
    );

    match action {
        QuotaAction::Show { ip } => show_quota(&repo, config, ip).await?,
        QuotaAction::Reset { ip, yes } => reset_quota(&repo, ip, yes).await?,
    }

    Ok(())
}

async fn show_quota(repo: &KvQuotaRepository, config: &Config, ip: IpAddr) -> Result<()> {
    println!("{}", "📊 Quota".bright_blue().bold());
    println!();
    println!("  Client: {}", ip.to_string().cyan());

    let status = repo
        .status(&ip.to_string())
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    match status {
        Some(status) => {
            let remaining = if status.remaining > 0 {
                status.remaining.to_string().green().bold()
            } else {
                status.remaining.to_string().red().bold()
            };
            println!("  Remaining: {} / {}", remaining, config.api_quota);
            if let Some(ttl) = status.resets_in {
                println!(
                    "  Resets in: {}",
                    format!("{} min", whole_minutes(ttl)).bright_yellow()
                );
            }
        }
        None => println!(
            "  Remaining: {} (no requests in the current window)",
            config.api_quota.to_string().green().bold()
        ),
    }
    println!();

    Ok(())
}

/// Resets a client's quota after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
async fn reset_quota(repo: &KvQuotaRepository, ip: IpAddr, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔓 Reset Quota".bright_blue().bold());
    println!();
    println!("  Client: {}", ip.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Reset this client's quota?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let existed = repo
        .reset(&ip.to_string())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to reset quota: {}", e))?;

    if existed {
        println!("{}", "✅ Quota reset".green().bold());
    } else {
        println!("{}", "⚠️  Client had no active counter".yellow());
    }
    println!();

    Ok(())
}
