//! CLI administration tool for link-shortener.
//!
//! Talks to the configured link store directly, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the alias a URL would get (no store needed)
//! cargo run --bin linkctl -- encode https://www.ozon.ru
//!
//! # Create a link
//! cargo run --bin linkctl -- create https://www.ozon.ru
//!
//! # Look up an alias (extends its lifetime)
//! cargo run --bin linkctl -- resolve bGKXWuqfNR
//!
//! # Remove expired links now
//! cargo run --bin linkctl -- sweep
//!
//! # Check store connection
//! cargo run --bin linkctl -- --backend redis check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `link_shortener::config`.

use link_shortener::application::services::{LinkError, LinkService};
use link_shortener::config::Config;
use link_shortener::domain::expiry_sweeper::sweep_once;
use link_shortener::domain::repositories::LinkStore;
use link_shortener::infrastructure::persistence::{StoreBackend, connect_store};
use link_shortener::utils::alias_encoder::{AliasEncoder, Alphabet, DEFAULT_ALPHABET};
use link_shortener::utils::url_validator::validate_absolute_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "linkctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend; overrides STORE_BACKEND
    #[arg(short, long, value_enum, global = true)]
    backend: Option<StoreBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the alias derived for a URL without touching the store
    Encode {
        url: String,

        /// Alphabet to encode with (defaults to ALIAS_ALPHABET or a-zA-Z0-9)
        #[arg(short, long)]
        alphabet: Option<String>,

        /// Maximum alias length (defaults to ALIAS_MAX_LENGTH or 10)
        #[arg(short, long)]
        max_len: Option<usize>,
    },

    /// Create the short link for a URL
    Create { url: String },

    /// Resolve an alias to its original URL
    Resolve { alias: String },

    /// Remove expired links now
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Encode {
        url,
        alphabet,
        max_len,
    } = &cli.command
    {
        return encode(url, alphabet.clone(), *max_len);
    }

    let config = Config::from_env_with_backend(cli.backend)?;
    config.validate()?;

    let store = connect_store(&config.store_config()?)
        .await
        .context("Failed to connect link store")?;

    let result = match cli.command {
        Commands::Create { url } => create(&config, store.clone(), &url).await,
        Commands::Resolve { alias } => resolve(&config, store.clone(), &alias).await,
        Commands::Sweep { yes } => sweep(store.as_ref(), yes).await,
        Commands::Check => check(store.as_ref()).await,
        Commands::Encode { .. } => Ok(()),
    };

    store.close().await?;
    result
}

/// Prints the alias for `url` using the configured (or given) alphabet.
fn encode(url: &str, alphabet: Option<String>, max_len: Option<usize>) -> Result<()> {
    let symbols = alphabet
        .or_else(|| std::env::var("ALIAS_ALPHABET").ok())
        .unwrap_or_else(|| DEFAULT_ALPHABET.to_string());
    let max_len = max_len
        .or_else(|| {
            std::env::var("ALIAS_MAX_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(link_shortener::utils::alias_encoder::MAX_ALIAS_LENGTH);

    let encoder = AliasEncoder::new(Alphabet::new(&symbols)?, max_len)?;

    println!("{}", encoder.encode(url).bright_yellow().bold());

    Ok(())
}

fn link_service(config: &Config, store: Arc<dyn LinkStore>) -> Result<LinkService> {
    Ok(LinkService::new(
        store,
        config.alias_encoder()?,
        config.link_ttl()?,
    ))
}

async fn create(config: &Config, store: Arc<dyn LinkStore>, url: &str) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let original = validate_absolute_url(url)?;
    let service = link_service(config, store)?;

    match service.create_link(original).await {
        Ok(alias) => {
            let base = config.public_base_url.trim_end_matches('/');
            println!("  Original: {}", original.cyan());
            println!("  Alias:    {}", alias.bright_yellow().bold());
            println!("  Link:     {}/{}", base, alias);
            println!();
            println!("{}", "✅ Done".green().bold());
            Ok(())
        }
        Err(LinkError::AliasCollision { alias }) => {
            println!(
                "{}",
                format!("❌ Alias {alias} already belongs to a different URL").red()
            );
            anyhow::bail!("alias collision")
        }
        Err(e) => Err(e.into()),
    }
}

async fn resolve(config: &Config, store: Arc<dyn LinkStore>, alias: &str) -> Result<()> {
    let service = link_service(config, store)?;

    match service.resolve(alias).await {
        Ok(original) => {
            println!("  {} → {}", alias.bright_yellow(), original.cyan());
            Ok(())
        }
        Err(LinkError::NotFound { .. }) => {
            println!(
                "{}",
                "⚠️  Such link does not exist or it has expired".yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn sweep(store: &dyn LinkStore, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Sweep Expired Links".bright_blue().bold());
    println!();

    if !store.expiry_policy().needs_sweep() {
        println!(
            "  {} expires links natively, nothing to sweep",
            store.backend_name().cyan()
        );
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete all expired links now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = sweep_once(store).await?;

    println!(
        "{}",
        format!("✅ Removed {removed} expired link(s)").green().bold()
    );

    Ok(())
}

async fn check(store: &dyn LinkStore) -> Result<()> {
    println!("{}", "🔍 Checking link store...".bright_blue().bold());

    if store.health_check().await {
        println!("{}", "✅ Store is reachable".green().bold());
        println!("  Backend:       {}", store.backend_name().cyan());
        println!("  Expiry policy: {}", store.expiry_policy().to_string().cyan());
        Ok(())
    } else {
        println!("{}", "❌ Store is unreachable".red().bold());
        anyhow::bail!("store health check failed")
    }
}
