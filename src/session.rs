//! Event dispatch between a view layer and the engine.
//!
//! A [`Session`] owns the [`QueryEngine`], the search-input [`Debouncer`],
//! and the current location. The view layer holds the session and feeds it
//! [`Event`]s from its listeners; each dispatch answers with the [`View`] to
//! render, or `None` when nothing visible changed yet.
//!
//! ```text
//! keystroke ──► SearchInput ──► debouncer ──(quiet window)──► Tick ──► search
//! Escape    ──► SearchCleared ─────────────────────────────────────► search("")
//! button    ──► CategorySelected ─────────────────────────────────► filter
//! link/back ──► Navigated ─────────────────────────────────────────► route
//! ```
//!
//! Time is passed into [`Session::dispatch`] so the session never reads a
//! clock. Hosts with timers arm one for [`Session::next_deadline`] and send a
//! [`Event::Tick`] when it fires.

use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::query::{Listing, LoadStatus, Outcome, QueryEngine, SearchSettings};
use crate::router::{self, Resolved, Route};
use crate::source::PostSource;
use crate::types::{ALL_CATEGORIES, Post, PostId};
use std::time::{Duration, Instant};
use tracing::debug;

const SITE_TITLE: &str = "Personal Blog";

/// Input from the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Current value of the search box after a keystroke. Debounced.
    SearchInput(String),
    /// The search box was cleared (Escape). Applied immediately.
    SearchCleared,
    /// A category filter control was activated.
    CategorySelected(String),
    /// The location changed: link follow, back, or forward.
    Navigated(String),
    /// Time passed; delivers a debounced search whose window has elapsed.
    Tick,
}

/// Everything the list page needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView<'a> {
    /// `"all"` first, then categories in first-seen order.
    pub categories: Vec<&'a str>,
    pub active_category: &'a str,
    /// Value for the search box.
    pub search_term: &'a str,
    pub listing: Listing<'a>,
}

/// What the view layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Loading,
    /// The load failed. Recoverable via [`Session::load`].
    LoadFailed { message: String },
    Home(HomeView<'a>),
    Single(&'a Post),
    NotFound { id: PostId },
}

impl View<'_> {
    /// Document title for this view.
    pub fn title(&self) -> String {
        match self {
            View::Home(_) => format!("{SITE_TITLE} - Home"),
            View::Single(post) => format!("{} - {SITE_TITLE}", post.title),
            View::NotFound { .. } => format!("Post not found - {SITE_TITLE}"),
            View::Loading | View::LoadFailed { .. } => SITE_TITLE.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    engine: QueryEngine,
    search_input: Debouncer<String>,
    location: String,
}

impl Session {
    /// New session at `location`, waiting for its first load.
    pub fn new(
        settings: SearchSettings,
        debounce: Duration,
        location: impl Into<String>,
    ) -> Self {
        Self {
            engine: QueryEngine::new(settings),
            search_input: Debouncer::new(debounce),
            location: location.into(),
        }
    }

    pub fn from_config(config: &AppConfig, location: impl Into<String>) -> Self {
        Self::new(
            config.search.settings(),
            config.search.debounce_window(),
            location,
        )
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn route(&self) -> Route {
        router::resolve(&self.location)
    }

    /// Fetch posts and render. Also serves as retry after a failed load.
    pub fn load(&mut self, source: &dyn PostSource) -> View<'_> {
        self.engine.load_from(source);
        self.view()
    }

    /// When the pending debounced search becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search_input.deadline()
    }

    /// Apply one event. Returns the view to render, or `None` if the event
    /// only scheduled work for later.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> Option<View<'_>> {
        debug!(?event, "dispatch");
        match event {
            Event::SearchInput(value) => {
                self.search_input.schedule(value, now);
                return None;
            }
            Event::Tick => {
                let term = self.search_input.poll(now)?;
                self.engine.search(&term);
            }
            Event::SearchCleared => {
                self.search_input.cancel();
                self.engine.clear_search();
            }
            Event::CategorySelected(category) => {
                self.search_input.cancel();
                self.engine.select_category(&category);
            }
            Event::Navigated(location) => {
                // Query state is not carried across navigation.
                self.search_input.cancel();
                self.engine.select_category(ALL_CATEGORIES);
                self.location = location;
            }
        }
        Some(self.view())
    }

    /// The view for the current location and query state.
    pub fn view(&self) -> View<'_> {
        let store = match self.engine.status() {
            LoadStatus::Loading => return View::Loading,
            LoadStatus::Failed(err) => {
                return View::LoadFailed {
                    message: err.to_string(),
                };
            }
            LoadStatus::Ready(store) => store,
        };

        match router::resolve_or_fail(self.route(), store) {
            Ok(Resolved::Single(post)) => View::Single(post),
            Err(err) => View::NotFound { id: err.id },
            Ok(Resolved::Home) => {
                let listing = match self.engine.outcome() {
                    Outcome::Ready(listing) => listing,
                    Outcome::Loading | Outcome::Failed(_) => Listing::NoResults,
                };
                let state = self.engine.state();
                View::Home(HomeView {
                    categories: self.engine.categories(),
                    active_category: state.active_category(),
                    search_term: state.search_term(),
                    listing,
                })
            }
        }
    }
}
