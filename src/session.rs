//! Interactive and batch browsing sessions.
//!
//! Both drivers sit on one task. In the interactive loop, in-flight fetches
//! live in a [`FuturesUnordered`] polled alongside stdin, so the user can
//! change the query before an earlier fetch resolves; the store discards the
//! older result when it eventually arrives.

use crate::api::NewsTransport;
use crate::fetcher::Fetcher;
use crate::models::{Category, UnknownCategory};
use crate::render::{help, render_page, status_line};
use crate::state::{Action, FetchTicket, Store};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::io::{self, Write};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank text clears the search and returns to category headlines.
    Search(String),
    Category(Category),
    More,
    Theme,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: category <name>")]
    MissingCategory,

    #[error(transparent)]
    Category(#[from] UnknownCategory),

    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "s" | "/" => Command::Search(rest.to_string()),
        "category" | "c" => {
            if rest.is_empty() {
                return Err(CommandError::MissingCategory);
            }
            Command::Category(rest.parse()?)
        }
        "more" | "m" | "next" => Command::More,
        "theme" | "t" => Command::Theme,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    fn into_action(self) -> Option<Action> {
        match self {
            Command::Search(text) => Some(Action::SubmitSearch(text)),
            Command::Category(category) => Some(Action::SelectCategory(category)),
            Command::More => Some(Action::NextPage),
            Command::Theme => Some(Action::ToggleTheme),
            Command::Help | Command::Quit => None,
        }
    }
}

/// Dispatch several actions and keep only the newest ticket; the older ones
/// are already superseded.
pub fn dispatch_all(store: &mut Store, actions: impl IntoIterator<Item = Action>) -> Option<FetchTicket> {
    actions
        .into_iter()
        .filter_map(|action| store.dispatch(action))
        .last()
}

/// Fetch up to `pages` pages sequentially, stopping early when nothing more
/// is available.
///
/// # Arguments
///
/// * `initial` - Actions applied before the first fetch; only the newest resulting ticket runs
/// * `pages` - Upper bound on pages fetched, including the first
#[instrument(level = "info", skip(fetcher, store, initial))]
pub async fn browse_pages<T>(fetcher: &Fetcher<T>, store: &mut Store, initial: Vec<Action>, pages: u32)
where
    T: NewsTransport,
{
    let mut ticket = dispatch_all(store, initial);
    let mut loaded = 0;
    while let Some(current) = ticket.take() {
        store.apply(fetcher.run(current).await);
        loaded += 1;
        if loaded < pages {
            ticket = store.dispatch(Action::NextPage);
        }
    }
    info!(loaded, articles = store.articles().len(), "Batch browse finished");
}

/// Run the interactive loop until `quit` or end of input.
///
/// After input ends, fetches still in flight are awaited so their results are
/// shown before returning.
pub async fn run_interactive<T, R, W>(
    fetcher: &Fetcher<T>,
    store: &mut Store,
    initial: Vec<Action>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    T: NewsTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;
    let mut in_flight = FuturesUnordered::new();

    if let Some(ticket) = dispatch_all(store, initial) {
        in_flight.push(fetcher.run(ticket));
    }
    write!(out, "{}", help())?;

    loop {
        tokio::select! {
            biased;

            Some(completed) = in_flight.next(), if !in_flight.is_empty() => {
                if store.apply(completed) {
                    write!(out, "{}", render_page(store, Utc::now()))?;
                    out.flush()?;
                }
            }

            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    debug!("input closed");
                    input_open = false;
                    continue;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        writeln!(out, "{}", e)?;
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Help => write!(out, "{}", help())?,
                    Command::Theme => {
                        store.dispatch(Action::ToggleTheme);
                        write!(out, "{}", render_page(store, Utc::now()))?;
                    }
                    Command::More if !store.can_load_more() => {
                        let reason = if store.is_loading() {
                            "Still loading; try again in a moment."
                        } else {
                            "No more articles."
                        };
                        writeln!(out, "{}", reason)?;
                    }
                    command => {
                        if let Some(ticket) = command.into_action().and_then(|action| store.dispatch(action)) {
                            in_flight.push(fetcher.run(ticket));
                            writeln!(out, "{}", status_line(store))?;
                        }
                    }
                }
                out.flush()?;
            }

            else => break,
        }
    }
    Ok(())
}
