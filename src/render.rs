//! Terminal and JSON presentation of the store.
//!
//! Rendering is read-only: nothing here touches query state. The theme only
//! picks ANSI colors.

use crate::models::{Article, DataOrigin, Theme};
use crate::placeholder::PLACEHOLDER_URL;
use crate::state::Store;
use crate::utils::{ellipsize, format_published};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const DESCRIPTION_WIDTH: usize = 160;

struct Palette {
    heading: &'static str,
    title: &'static str,
    meta: &'static str,
    error: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            heading: "\x1b[1;34m",
            title: "\x1b[1;30m",
            meta: "\x1b[90m",
            error: "\x1b[31m",
        },
        Theme::Dark => Palette {
            heading: "\x1b[1;96m",
            title: "\x1b[1;97m",
            meta: "\x1b[37m",
            error: "\x1b[91m",
        },
    }
}

/// Heading describing what is being browsed.
pub fn heading(store: &Store) -> String {
    let query = store.query();
    if query.search_text.is_empty() {
        format!("Top {} headlines", query.category)
    } else {
        format!("Results for \"{}\"", query.search_text)
    }
}

/// Render the current article list for the terminal.
pub fn render_page(store: &Store, now: DateTime<Utc>) -> String {
    let colors = palette(store.theme());
    let mut out = String::new();

    let origin = match store.origin() {
        Some(DataOrigin::Placeholder) => " (sample data)",
        _ => "",
    };
    writeln!(out, "{}{}{}{}", colors.heading, heading(store), origin, RESET).unwrap();

    if let Some(error) = store.error() {
        writeln!(out, "{}! {}{}", colors.error, error, RESET).unwrap();
    }
    writeln!(out).unwrap();

    if store.articles().is_empty() && !store.is_loading() {
        writeln!(out, "No articles to show.").unwrap();
    }

    for (i, article) in store.articles().iter().enumerate() {
        render_article(&mut out, i + 1, article, now, &colors);
    }

    if store.is_loading() {
        writeln!(out, "{}Loading…{}", colors.meta, RESET).unwrap();
    } else if store.query().has_more {
        writeln!(
            out,
            "{}Page {}. Type `more` to load more.{}",
            colors.meta,
            store.query().page,
            RESET
        )
        .unwrap();
    } else {
        writeln!(out, "{}End of results.{}", colors.meta, RESET).unwrap();
    }
    out
}

fn render_article(out: &mut String, n: usize, article: &Article, now: DateTime<Utc>, colors: &Palette) {
    writeln!(out, "{:>3}. {}{}{}", n, colors.title, article.title, RESET).unwrap();
    writeln!(
        out,
        "     {}{} · {}{}",
        colors.meta,
        article.source.name,
        format_published(article.published_at, now),
        RESET
    )
    .unwrap();
    if !article.description.is_empty() {
        writeln!(out, "     {}", ellipsize(&article.description, DESCRIPTION_WIDTH)).unwrap();
    }
    if article.url != PLACEHOLDER_URL {
        writeln!(out, "     {}{}{}", colors.meta, article.url, RESET).unwrap();
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    heading: String,
    search_text: &'a str,
    category: String,
    page: u32,
    has_more: bool,
    origin: Option<DataOrigin>,
    error: Option<&'a str>,
    articles: &'a [Article],
}

/// Serialize the current query and articles as pretty JSON.
pub fn render_json(store: &Store) -> Result<String, serde_json::Error> {
    let query = store.query();
    serde_json::to_string_pretty(&Snapshot {
        heading: heading(store),
        search_text: &query.search_text,
        category: query.category.to_string(),
        page: query.page,
        has_more: query.has_more,
        origin: store.origin(),
        error: store.error(),
        articles: store.articles(),
    })
}

/// Help text for the interactive session.
pub fn help() -> String {
    let categories = crate::models::Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Commands:\n  search <text>     search all news\n  category <name>   top headlines for {}\n  more              load the next page\n  theme             toggle light/dark\n  help              show this help\n  quit              exit\n",
        categories
    )
}

/// One-line status used after commands that change nothing visible.
pub fn status_line(store: &Store) -> String {
    let theme = match store.theme() {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    format!(
        "{} · page {} · {} articles · {} theme",
        heading(store),
        store.query().page,
        store.articles().len(),
        theme
    )
}
