//! CLI administration tool for geo-redirect.
//!
//! Read-only inspection of stored links and routing decisions without going
//! through the HTTP service or its cache.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show a stored link and its destinations
//! cargo run --bin admin -- link show abc
//!
//! # Show which destination a country is routed to
//! cargo run --bin admin -- link route abc --country US
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`

use geo_redirect::config::Config;
use geo_redirect::domain::entities::{CountryCode, LinkRecord};
use geo_redirect::domain::repositories::LinkRepository;
use geo_redirect::domain::routing::select_destination;
use geo_redirect::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting geo-redirect links.
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
    /// Inspect stored links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link inspection subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a link record and its destinations
    Show {
        /// Link identifier
        link_id: String,
    },

    /// Show the destination selected for a country
    Route {
        /// Link identifier
        link_id: String,

        /// Two-letter country code (e.g. US); omit for the default destination
        #[arg(short, long)]
        country: Option<String>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and count links
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = PgLinkRepository::new(Arc::new(pool));

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &repo).await?,
        Commands::Db { action } => handle_db_action(action, &repo).await?,
    }

    Ok(())
}

/// Dispatches link inspection commands.
async fn handle_link_action(action: LinkAction, repo: &PgLinkRepository) -> Result<()> {
    match action {
        LinkAction::Show { link_id } => {
            let record = fetch_link(repo, &link_id).await?;
            print_link(&record);
        }
        LinkAction::Route { link_id, country } => {
            let country = country
                .as_deref()
                .map(CountryCode::parse)
                .transpose()
                .context("Invalid country code")?;

            let record = fetch_link(repo, &link_id).await?;
            let destination =
                select_destination(&record, country.as_ref().map(CountryCode::as_str));

            let label = country
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "(none)".to_string());
            let matched = country
                .as_ref()
                .is_some_and(|c| record.destinations.get(c.as_str()).is_some());

            println!("{}", "Route".bright_blue().bold());
            println!();
            println!("  Link:        {}", record.link_id.cyan());
            println!("  Country:     {}", label.cyan());
            println!("  Destination: {}", destination.bright_yellow());
            if matched {
                println!("  Rule:        {}", "country match".green());
            } else {
                println!("  Rule:        {}", "default fallback".yellow());
            }
            println!();
        }
    }

    Ok(())
}

async fn fetch_link(repo: &PgLinkRepository, link_id: &str) -> Result<LinkRecord> {
    repo.find_by_id(link_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load link: {}", e))?
        .with_context(|| format!("Link '{}' not found", link_id))
}

/// Prints a link record.
///
/// # Output Format
///
/// ```text
/// Link abc
///
///   Name:     Spring launch
///   Account:  acct-1
///   Created:  2024-01-15 10:30
///   Updated:  2024-01-16 14:20
///
///   Country   Destination
///   ---------------------------------------------------------------
///   default   https://x.com
///   US        https://x.com/us
/// ```
fn print_link(record: &LinkRecord) {
    let format_time = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!(
        "{} {}",
        "Link".bright_blue().bold(),
        record.link_id.bright_white().bold()
    );
    println!();
    println!("  Name:     {}", record.name.cyan());
    println!("  Account:  {}", record.account_id.cyan());
    println!("  Created:  {}", format_time(record.created()).bright_black());
    println!("  Updated:  {}", format_time(record.updated()).bright_black());
    println!();
    println!(
        "  {:<9} {}",
        "Country".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "-".repeat(63).bright_black());
    println!(
        "  {:<9} {}",
        "default".yellow(),
        record.destinations.default_url()
    );
    for (country, url) in record.destinations.countries() {
        println!("  {:<9} {}", country.as_str().green(), url);
    }
    println!();
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, repo: &PgLinkRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            let count = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

            println!("{}", "Database connection OK".green().bold());
            println!("  Links: {}", count.to_string().bright_white().bold());
        }
    }

    Ok(())
}
