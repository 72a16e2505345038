//! Query and result state, updated through a reducer.
//!
//! Every user action goes through [`Store::dispatch`]. Actions that change what
//! should be fetched hand back a [`FetchTicket`] stamped with a new generation;
//! the caller runs it and feeds the result into [`Store::apply`], which drops
//! any completion whose generation has since been superseded.
//!
//! ```text
//! Action ─► dispatch() ─► Option<FetchTicket> ─► fetcher ─► CompletedFetch ─► apply()
//! ```

use crate::models::{Article, Category, DataOrigin, Theme};
use tracing::{debug, info};

/// What the user is currently asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub category: Category,
    /// 1-based page number.
    pub page: u32,
    pub has_more: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: Category::default(),
            page: 1,
            has_more: true,
        }
    }
}

impl QueryState {
    pub fn intent(&self) -> FetchIntent {
        fetch_intent(&self.search_text, self.category, self.page)
    }
}

/// The request a query state resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIntent {
    Search { query: String, page: u32 },
    Headlines { category: Category, page: u32 },
}

impl FetchIntent {
    pub fn page(&self) -> u32 {
        match self {
            FetchIntent::Search { page, .. } | FetchIntent::Headlines { page, .. } => *page,
        }
    }

    /// The search text this intent carries, or `""` for headlines.
    pub fn search_text(&self) -> &str {
        match self {
            FetchIntent::Search { query, .. } => query,
            FetchIntent::Headlines { .. } => "",
        }
    }
}

/// Non-empty search text wins over the category.
pub fn fetch_intent(search_text: &str, category: Category, page: u32) -> FetchIntent {
    let query = search_text.trim();
    if query.is_empty() {
        FetchIntent::Headlines { category, page }
    } else {
        FetchIntent::Search {
            query: query.to_string(),
            page,
        }
    }
}

/// A fetch the store wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub intent: FetchIntent,
    /// Category in effect when the ticket was issued; labels placeholder
    /// output for search intents too.
    pub category: Category,
}

/// The outcome of running a [`FetchTicket`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedFetch {
    pub generation: u64,
    pub page: u32,
    pub articles: Vec<Article>,
    pub has_more: bool,
    /// User-visible message, `None` when the fetch succeeded or failed silently.
    pub error: Option<String>,
    pub origin: DataOrigin,
}

/// Everything the user can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Initial load.
    Mount,
    SubmitSearch(String),
    SelectCategory(Category),
    NextPage,
    ToggleTheme,
}

/// The single in-memory holder of query and result state.
#[derive(Debug, Default)]
pub struct Store {
    query: QueryState,
    articles: Vec<Article>,
    loading: bool,
    error: Option<String>,
    origin: Option<DataOrigin>,
    theme: Theme,
    generation: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::new()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        self.origin
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the "load more" control should be offered at all.
    pub fn can_load_more(&self) -> bool {
        self.query.has_more && !self.loading
    }

    /// Apply a user action. Returns a ticket when the action requires a fetch.
    pub fn dispatch(&mut self, action: Action) -> Option<FetchTicket> {
        debug!(?action, "dispatch");
        match action {
            Action::Mount => Some(self.begin_fetch()),
            Action::SubmitSearch(text) => {
                self.query.search_text = text.trim().to_string();
                self.query.page = 1;
                self.articles.clear();
                Some(self.begin_fetch())
            }
            Action::SelectCategory(category) => {
                self.query.category = category;
                self.query.search_text.clear();
                self.query.page = 1;
                self.articles.clear();
                Some(self.begin_fetch())
            }
            Action::NextPage => {
                if !self.can_load_more() {
                    debug!(
                        has_more = self.query.has_more,
                        loading = self.loading,
                        "next page ignored"
                    );
                    return None;
                }
                self.query.page += 1;
                Some(self.begin_fetch())
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                None
            }
        }
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
            intent: self.query.intent(),
            category: self.query.category,
        }
    }

    /// Merge a finished fetch. Returns `false` when it was stale and ignored.
    pub fn apply(&mut self, completed: CompletedFetch) -> bool {
        if completed.generation != self.generation {
            debug!(
                stale = completed.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        let received = completed.articles.len();
        if completed.page <= 1 {
            self.articles = completed.articles;
        } else {
            self.articles.extend(completed.articles);
        }
        self.query.has_more = completed.has_more;
        self.error = completed.error;
        self.origin = Some(completed.origin);
        self.loading = false;

        info!(
            page = completed.page,
            received,
            total = self.articles.len(),
            has_more = self.query.has_more,
            origin = ?completed.origin,
            "applied fetch result"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder;

    fn completion(ticket: &FetchTicket, count: usize, has_more: bool) -> CompletedFetch {
        let page = ticket.intent.page();
        let mut articles = placeholder::generate(page, ticket.intent.search_text(), ticket.category);
        articles.truncate(count);
        CompletedFetch {
            generation: ticket.generation,
            page,
            articles,
            has_more,
            error: None,
            origin: DataOrigin::Live,
        }
    }

    fn loaded_store() -> Store {
        let mut store = Store::new();
        let ticket = store.dispatch(Action::Mount).unwrap();
        assert!(store.apply(completion(&ticket, 10, true)));
        store
    }

    #[test]
    fn test_fetch_intent_prefers_search() {
        assert_eq!(
            fetch_intent("ai", Category::Sports, 2),
            FetchIntent::Search {
                query: "ai".to_string(),
                page: 2
            }
        );
        assert_eq!(
            fetch_intent("   ", Category::Sports, 1),
            FetchIntent::Headlines {
                category: Category::Sports,
                page: 1
            }
        );
    }

    #[test]
    fn test_mount_issues_headlines_fetch() {
        let mut store = Store::new();
        let ticket = store.dispatch(Action::Mount).unwrap();
        assert_eq!(ticket.generation, 1);
        assert_eq!(
            ticket.intent,
            FetchIntent::Headlines {
                category: Category::General,
                page: 1
            }
        );
        assert!(store.is_loading());
    }

    #[test]
    fn test_select_category_resets_query_for_every_category() {
        for category in Category::ALL {
            let mut store = loaded_store();
            store.dispatch(Action::SubmitSearch("elections".to_string()));
            store.query.page = 2;

            let ticket = store.dispatch(Action::SelectCategory(category)).unwrap();
            assert_eq!(store.query().category, category);
            assert_eq!(store.query().search_text, "");
            assert_eq!(store.query().page, 1);
            assert!(store.articles().is_empty());
            assert_eq!(ticket.intent, FetchIntent::Headlines { category, page: 1 });
        }
    }

    #[test]
    fn test_submit_search_resets_page_and_results() {
        let mut store = loaded_store();
        let next = store.dispatch(Action::NextPage).unwrap();
        store.apply(completion(&next, 10, true));
        assert_eq!(store.query().page, 2);
        assert_eq!(store.articles().len(), 20);

        let ticket = store.dispatch(Action::SubmitSearch("  climate ".to_string())).unwrap();
        assert_eq!(store.query().search_text, "climate");
        assert_eq!(store.query().page, 1);
        assert_eq!(store.query().category, Category::General);
        assert!(store.articles().is_empty());
        assert_eq!(
            ticket.intent,
            FetchIntent::Search {
                query: "climate".to_string(),
                page: 1
            }
        );
    }

    #[test]
    fn test_begin_fetch_clears_previous_error() {
        let mut store = Store::new();
        let ticket = store.dispatch(Action::Mount).unwrap();
        let mut failed = completion(&ticket, 10, true);
        failed.error = Some("boom".to_string());
        store.apply(failed);
        assert_eq!(store.error(), Some("boom"));

        store.dispatch(Action::SelectCategory(Category::Health));
        assert_eq!(store.error(), None);
        assert!(store.is_loading());
    }

    #[test]
    fn test_next_page_appends_in_order() {
        let mut store = loaded_store();
        let first_titles: Vec<String> = store.articles().iter().map(|a| a.title.clone()).collect();

        let ticket = store.dispatch(Action::NextPage).unwrap();
        assert_eq!(ticket.intent.page(), 2);
        assert!(store.apply(completion(&ticket, 10, true)));

        let titles: Vec<&str> = store.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles.len(), 20);
        assert_eq!(&titles[..10], first_titles.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(titles[10], "General News Article 11");
    }

    #[test]
    fn test_next_page_ignored_while_loading() {
        let mut store = Store::new();
        store.dispatch(Action::Mount).unwrap();
        assert_eq!(store.dispatch(Action::NextPage), None);
        assert_eq!(store.query().page, 1);
    }

    #[test]
    fn test_next_page_ignored_without_more() {
        let mut store = Store::new();
        let ticket = store.dispatch(Action::Mount).unwrap();
        store.apply(completion(&ticket, 4, false));
        assert!(!store.can_load_more());
        assert_eq!(store.dispatch(Action::NextPage), None);
        assert_eq!(store.query().page, 1);
    }

    #[test]
    fn test_stale_result_does_not_overwrite_newer_state() {
        let mut store = loaded_store();

        let old = store.dispatch(Action::SelectCategory(Category::Science)).unwrap();
        let newer = store.dispatch(Action::SubmitSearch("mars".to_string())).unwrap();
        assert!(store.apply(completion(&newer, 10, true)));
        let next = store.dispatch(Action::NextPage).unwrap();
        assert!(store.apply(completion(&next, 10, false)));

        let mut stale = completion(&old, 10, true);
        stale.error = Some("late failure".to_string());
        assert!(!store.apply(stale));

        assert_eq!(store.articles().len(), 20);
        assert_eq!(store.articles()[0].title, "Mars News Article 1");
        assert_eq!(store.articles()[19].title, "Mars News Article 20");
        assert_eq!(store.error(), None);
        assert!(!store.query().has_more);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_stale_result_keeps_loading_flag_of_pending_request() {
        let mut store = Store::new();
        let first = store.dispatch(Action::Mount).unwrap();
        let _second = store.dispatch(Action::SelectCategory(Category::Sports)).unwrap();

        assert!(!store.apply(completion(&first, 10, true)));
        assert!(store.is_loading());
        assert!(store.articles().is_empty());
    }

    #[test]
    fn test_toggle_theme_does_not_fetch() {
        let mut store = loaded_store();
        assert_eq!(store.dispatch(Action::ToggleTheme), None);
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.articles().len(), 10);
        assert!(!store.is_loading());
    }
}
