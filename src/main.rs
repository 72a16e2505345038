//! # News Browser
//!
//! A terminal news reader that fetches headlines from a GNews-compatible API,
//! or falls back to generated sample articles when no API key is configured
//! or the API cannot be reached.
//!
//! ## Features
//!
//! - Top headlines for seven fixed categories, or free-text search
//! - "Load more" paging with appended results
//! - Silent sample-data mode when no key is set; visible notice when a live
//!   fetch fails
//! - Light/dark color themes
//! - Batch mode that prints text or JSON and exits
//!
//! ## Usage
//!
//! ```sh
//! news_browser --category technology
//! GNEWS_API_KEY=... news_browser --search "fusion energy" --pages 2 --json
//! ```
//!
//! ## Architecture
//!
//! 1. **State**: user actions are reduced into a [`state::Store`], which hands
//!    back fetch tickets stamped with a generation number
//! 2. **Fetching**: [`fetcher::Fetcher`] turns a ticket into live articles or
//!    sample data
//! 3. **Applying**: results are merged back unless a newer ticket superseded them
//! 4. **Rendering**: text or JSON output of the current store

use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod placeholder;
mod render;
mod session;
mod state;
mod utils;

use api::HttpTransport;
use cli::Cli;
use config::Settings;
use fetcher::Fetcher;
use models::Theme;
use state::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.config, ?args.category, ?args.search, ?args.pages, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())
        .await?
        .with_overrides(args.api_key.clone(), args.base_url.clone());

    let transport = HttpTransport::new(reqwest::Client::builder().build()?);
    let fetcher = Fetcher::from_settings(transport, &settings)?;
    info!(live = fetcher.is_live(), base_url = %settings.base_url, "news_browser starting up");

    let theme = if args.dark { Theme::Dark } else { Theme::Light };
    let mut store = Store::with_theme(theme);
    let initial = args.initial_actions();

    let mut stdout = io::stdout().lock();
    if args.is_batch() {
        session::browse_pages(&fetcher, &mut store, initial, args.pages.unwrap_or(1)).await;
        if args.json {
            writeln!(stdout, "{}", render::render_json(&store)?)?;
        } else {
            write!(stdout, "{}", render::render_page(&store, chrono::Utc::now()))?;
        }
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        session::run_interactive(&fetcher, &mut store, initial, stdin, &mut stdout).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = store.articles().len(),
        pages = store.query().page,
        "Session complete"
    );
    Ok(())
}
