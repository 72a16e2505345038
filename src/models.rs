//! Data models for news articles, categories and display preferences.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One news item, either decoded from the news API or synthesized locally
//! - [`ArticlesResponse`]: The JSON envelope returned by the news API
//! - [`Category`]: The fixed set of headline topics
//! - [`Theme`]: Light/dark display mode
//!
//! Field names on the wire follow the API's camelCase (`publishedAt`), so the
//! structs rename them with serde attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single news item as displayed.
///
/// No identity is enforced: the same headline may appear on several pages.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The headline.
    pub title: String,
    /// Short teaser text. The API occasionally sends `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Lead image URL, when the publisher provides one.
    #[serde(default)]
    pub image: Option<String>,
    /// Link to the full story.
    pub url: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// The publishing outlet.
    pub source: Source,
}

/// The outlet an [`Article`] came from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Source {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Body of a successful `search` or `top-headlines` response.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
pub struct ArticlesResponse {
    /// Upstream's estimate of the total hit count. Not used for paging.
    #[serde(default)]
    pub totalArticles: Option<u64>,
    pub articles: Vec<Article>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One of the seven headline topics offered by the category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Technology,
    Business,
    Sports,
    Health,
    Entertainment,
    Science,
}

impl Category {
    /// Every category, in selector order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Health,
        Category::Entertainment,
        Category::Science,
    ];

    /// The lowercase name used in API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Science => "science",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category name is not one of [`Category::ALL`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category `{0}` (expected one of: general, technology, business, sports, health, entertainment, science)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Display mode. Cosmetic only; it never influences what is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Where the currently displayed articles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    Placeholder,
}
