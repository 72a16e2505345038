//! Locally generated sample articles.
//!
//! Used whenever live data is unavailable: no API key configured, the request
//! failed, or upstream returned nothing. Titles and images are numbered by a
//! global index so that page 2 continues where page 1 stopped; publication
//! times are jittered randomly within the past week.

use crate::models::{Article, Category, Source};
use crate::utils::upcase;
use chrono::{Duration, Utc};
use rand::{Rng, rng};

/// Number of sample articles produced per page. Matches the live page size.
pub const PLACEHOLDER_PAGE_SIZE: usize = 10;

/// Sample data is capped at this many pages since nothing bounds it upstream.
pub const PLACEHOLDER_PAGE_LIMIT: u32 = 3;

/// Source label attached to every sample article.
pub const PLACEHOLDER_SOURCE: &str = "Sample News";

/// Link target of sample articles; they lead nowhere.
pub const PLACEHOLDER_URL: &str = "#";

const MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Build one page of sample articles.
///
/// The topic is the search text when non-empty, otherwise the category name,
/// capitalized either way.
///
/// # Arguments
///
/// * `page` - 1-based page number; article `n` on page `p` is numbered `(p - 1) * 10 + n`
/// * `search_text` - Current search, may be empty
/// * `category` - Category used as the topic when there is no search
pub fn generate(page: u32, search_text: &str, category: Category) -> Vec<Article> {
    let search_text = search_text.trim();
    let topic = if search_text.is_empty() {
        upcase(category.as_str())
    } else {
        upcase(search_text)
    };

    let now = Utc::now();
    let mut rng = rng();
    let first = (page.max(1) as usize - 1) * PLACEHOLDER_PAGE_SIZE;

    (0..PLACEHOLDER_PAGE_SIZE)
        .map(|i| {
            let n = first + i + 1;
            let age = Duration::seconds(rng.random_range(0..MAX_AGE_SECS));
            Article {
                title: format!("{} News Article {}", topic, n),
                description: format!(
                    "This is a sample article about {}. Configure a news API key to see live headlines.",
                    topic
                ),
                image: Some(format!("https://picsum.photos/seed/{}/800/400", n)),
                url: PLACEHOLDER_URL.to_string(),
                published_at: now - age,
                source: Source {
                    name: PLACEHOLDER_SOURCE.to_string(),
                    url: None,
                },
            }
        })
        .collect()
}

/// Whether another sample page may follow `page`.
pub fn has_more(page: u32) -> bool {
    page < PLACEHOLDER_PAGE_LIMIT
}
