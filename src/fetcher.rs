//! Runs fetch tickets: live articles when a key is configured, sample data otherwise.
//!
//! Failures never propagate out of [`Fetcher::run`]. Every ticket resolves to a
//! [`CompletedFetch`] with something to show; failed live fetches carry
//! sample articles plus a user-facing message (unless the failure was a
//! cross-origin block, which falls back silently).

use crate::api::{NewsApi, NewsTransport, PAGE_SIZE};
use crate::config::Settings;
use crate::models::DataOrigin;
use crate::placeholder;
use crate::state::{CompletedFetch, FetchTicket};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Shown whenever live data could not be loaded.
pub const LIVE_FETCH_FAILED: &str = "Failed to load live news; showing sample data.";

#[derive(Debug)]
pub struct Fetcher<T> {
    api: Option<NewsApi<T>>,
    placeholder_delay: Duration,
}

impl<T> Fetcher<T>
where
    T: NewsTransport,
{
    /// A fetcher that only ever serves sample data.
    pub fn offline(placeholder_delay: Duration) -> Self {
        Self {
            api: None,
            placeholder_delay,
        }
    }

    /// A fetcher that talks to the live API through `api`.
    pub fn live(api: NewsApi<T>) -> Self {
        Self {
            api: Some(api),
            placeholder_delay: Duration::ZERO,
        }
    }

    /// Pick live or offline mode from settings.
    pub fn from_settings(transport: T, settings: &Settings) -> Result<Self, url::ParseError> {
        match settings.api_key() {
            Some(key) => Ok(Self::live(NewsApi::new(transport, &settings.base_url, key)?)),
            None => {
                info!("No API key configured; serving sample articles");
                Ok(Self::offline(settings.placeholder_delay()))
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.api().is_some()
    }

    pub fn api(&self) -> Option<&NewsApi<T>> {
        self.api.as_ref()
    }

    /// Resolve a ticket to something displayable.
    ///
    /// # Arguments
    ///
    /// * `ticket` - The fetch issued by [`crate::state::Store::dispatch`]
    ///
    /// # Returns
    ///
    /// A [`CompletedFetch`] stamped with the ticket's generation. Live failures
    /// are folded into sample articles plus [`LIVE_FETCH_FAILED`], or no
    /// message at all for cross-origin blocks.
    #[instrument(level = "info", skip_all, fields(generation = ticket.generation, page = ticket.intent.page()))]
    pub async fn run(&self, ticket: FetchTicket) -> CompletedFetch {
        let t0 = Instant::now();
        let page = ticket.intent.page();

        let Some(api) = &self.api else {
            if !self.placeholder_delay.is_zero() {
                sleep(self.placeholder_delay).await;
            }
            return placeholder_page(&ticket, None);
        };

        match api.fetch(&ticket.intent).await {
            Ok(articles) => {
                let has_more = articles.len() == PAGE_SIZE;
                info!(
                    received = articles.len(),
                    has_more,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Loaded live articles"
                );
                CompletedFetch {
                    generation: ticket.generation,
                    page,
                    articles,
                    has_more,
                    error: None,
                    origin: DataOrigin::Live,
                }
            }
            Err(e) if e.is_silent() => {
                warn!(error = %e, "Live news blocked by cross-origin policy; using sample data");
                placeholder_page(&ticket, None)
            }
            Err(e) => {
                error!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Live fetch failed; using sample data"
                );
                placeholder_page(&ticket, Some(LIVE_FETCH_FAILED.to_string()))
            }
        }
    }
}

fn placeholder_page(ticket: &FetchTicket, error: Option<String>) -> CompletedFetch {
    let page = ticket.intent.page();
    CompletedFetch {
        generation: ticket.generation,
        page,
        articles: placeholder::generate(page, ticket.intent.search_text(), ticket.category),
        has_more: placeholder::has_more(page),
        error,
        origin: DataOrigin::Placeholder,
    }
}
