//! Command-line interface definitions for News Browser.
//!
//! All connection options can also be provided through environment variables.

use crate::models::Category;
use crate::state::Action;
use clap::Parser;
use std::path::PathBuf;

/// Browse news headlines from the terminal.
///
/// Without an API key the browser serves generated sample articles.
///
/// # Examples
///
/// ```sh
/// # Interactive session on sample data
/// news_browser
///
/// # Live technology headlines, first two pages, as JSON
/// GNEWS_API_KEY=... news_browser --category technology --pages 2 --json
///
/// # Settings from a file
/// news_browser --config ~/.config/news_browser.yaml --search "solar power"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// News API key; sample data is used when absent
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// News API root URL
    #[arg(long, env = "GNEWS_BASE_URL")]
    pub base_url: Option<String>,

    /// Start with a search instead of top headlines
    #[arg(short, long)]
    pub search: Option<String>,

    /// Headline category to start with
    #[arg(short = 'k', long)]
    pub category: Option<Category>,

    /// Load this many pages, print them and exit
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Print articles as JSON (implies non-interactive)
    #[arg(short, long)]
    pub json: bool,

    /// Start in dark mode
    #[arg(long)]
    pub dark: bool,
}

impl Cli {
    /// Whether to print results and exit instead of reading commands.
    pub fn is_batch(&self) -> bool {
        self.json || self.pages.is_some()
    }

    /// Actions that establish the starting query.
    ///
    /// A search given together with a category keeps the category selected
    /// while the search drives the fetch.
    pub fn initial_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(category) = self.category {
            actions.push(Action::SelectCategory(category));
        }
        if let Some(search) = &self.search {
            actions.push(Action::SubmitSearch(search.clone()));
        }
        if actions.is_empty() {
            actions.push(Action::Mount);
        }
        actions
    }
}
