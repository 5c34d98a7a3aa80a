//! Category filtering, text search, and the engine that owns query state.
//!
//! ## Derivations
//!
//! Two independent derivations run over the loaded posts:
//!
//! - **Category filter** ([`filter_by_category`]): exact match on `category`,
//!   or every post for the synthetic `"all"` category. Load order is kept.
//! - **Search** ([`search_simple`], [`search_scored`]): case-insensitive,
//!   trimmed substring match against title, excerpt, content, category and
//!   tags.
//!
//! ## Scoring
//!
//! In scored mode every field that contains the term adds its weight once:
//!
//! | Field    | Default weight |
//! |----------|----------------|
//! | title    | 10             |
//! | excerpt  | 5              |
//! | tags     | 4 (any tag)    |
//! | category | 3              |
//! | content  | 2              |
//!
//! Posts scoring 0 are dropped. The rest are stable-sorted by descending
//! score, so equal scores keep load order. Simple mode keeps every matching
//! post in load order. Both modes return all posts untouched for an empty or
//! whitespace-only term.
//!
//! ## Combination
//!
//! The category filter and search are mutually exclusive. Selecting a
//! category clears the search term; searching ignores the selected category.
//! Whichever happened last drives the result list.
//!
//! ## Load Lifecycle
//!
//! The engine starts in [`LoadStatus::Loading`]. Queries issued while loading
//! (or after a failed load) update the query state but compute nothing; the
//! active derivation runs as soon as a load completes successfully.

use crate::source::PostSource;
use crate::store::{LoadError, PostStore};
use crate::types::{ALL_CATEGORIES, Post, PostId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which search algorithm the engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Any-field match, load order.
    Simple,
    /// Weighted relevance, descending score.
    #[default]
    Scored,
}

/// Per-field weights for scored search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchWeights {
    pub title: u32,
    pub excerpt: u32,
    pub tags: u32,
    pub category: u32,
    pub content: u32,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            title: 10,
            excerpt: 5,
            tags: 4,
            category: 3,
            content: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSettings {
    pub mode: SearchMode,
    pub weights: SearchWeights,
}

/// A post paired with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPost<'a> {
    pub post: &'a Post,
    pub score: u32,
}

// ============================================================================
// Pure derivations
// ============================================================================

/// Posts whose category equals `category`, or all posts for `"all"`.
///
/// An unknown category yields an empty list, not an error.
pub fn filter_by_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    if category == ALL_CATEGORIES {
        return posts.iter().collect();
    }
    posts.iter().filter(|p| p.category == category).collect()
}

/// Lowercased, trimmed search term. `None` when nothing is left to match.
fn normalize_term(term: &str) -> Option<String> {
    let term = term.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Relevance of `post` for an already-normalized `term`.
fn score_normalized(post: &Post, term: &str, weights: &SearchWeights) -> u32 {
    let mut score = 0;
    if contains(&post.title, term) {
        score += weights.title;
    }
    if contains(&post.excerpt, term) {
        score += weights.excerpt;
    }
    if contains(&post.content, term) {
        score += weights.content;
    }
    if contains(&post.category, term) {
        score += weights.category;
    }
    if post.tags.iter().any(|tag| contains(tag, term)) {
        score += weights.tags;
    }
    score
}

/// Relevance score of `post` for `term`. Zero means no field matched.
pub fn score(post: &Post, term: &str, weights: &SearchWeights) -> u32 {
    normalize_term(term)
        .map(|t| score_normalized(post, &t, weights))
        .unwrap_or(0)
}

fn matches_any_field(post: &Post, term: &str) -> bool {
    contains(&post.title, term)
        || contains(&post.excerpt, term)
        || contains(&post.content, term)
        || contains(&post.category, term)
        || post.tags.iter().any(|tag| contains(tag, term))
}

/// Matching posts in load order, without scoring.
pub fn search_simple<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    match normalize_term(term) {
        None => posts.iter().collect(),
        Some(term) => posts.iter().filter(|p| matches_any_field(p, &term)).collect(),
    }
}

/// Matching posts with scores, highest first.
///
/// For an empty term every post is returned in load order with score 0;
/// no scoring pass runs.
pub fn search_scored<'a>(
    posts: &'a [Post],
    term: &str,
    weights: &SearchWeights,
) -> Vec<ScoredPost<'a>> {
    let Some(term) = normalize_term(term) else {
        return posts
            .iter()
            .map(|post| ScoredPost { post, score: 0 })
            .collect();
    };

    let mut results: Vec<ScoredPost<'a>> = posts
        .iter()
        .map(|post| ScoredPost {
            post,
            score: score_normalized(post, &term, weights),
        })
        .filter(|r| r.score > 0)
        .collect();
    // `sort_by` is stable: equal scores keep load order.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Search with the given settings, discarding scores.
pub fn search<'a>(posts: &'a [Post], term: &str, settings: &SearchSettings) -> Vec<&'a Post> {
    match settings.mode {
        SearchMode::Simple => search_simple(posts, term),
        SearchMode::Scored => search_scored(posts, term, &settings.weights)
            .into_iter()
            .map(|r| r.post)
            .collect(),
    }
}

// ============================================================================
// Engine
// ============================================================================

/// The derivation that produced the current result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Category,
    Search,
}

/// Engine-owned query state.
///
/// Mutated only through [`QueryEngine`] methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    active_category: String,
    search_term: String,
    driver: Driver,
    result_order: Vec<PostId>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_term: String::new(),
            driver: Driver::Category,
            result_order: Vec::new(),
        }
    }
}

impl QueryState {
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    /// The term as typed, untrimmed.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Ids of the current result list, in display order.
    pub fn result_order(&self) -> &[PostId] {
        &self.result_order
    }
}

#[derive(Debug)]
pub enum LoadStatus {
    Loading,
    Ready(PostStore),
    Failed(LoadError),
}

/// A computed result list. An empty result is its own variant so the view
/// can show a "no results" message instead of a blank list.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<'a> {
    Posts(Vec<&'a Post>),
    NoResults,
}

impl<'a> Listing<'a> {
    fn from_posts(posts: Vec<&'a Post>) -> Self {
        if posts.is_empty() {
            Listing::NoResults
        } else {
            Listing::Posts(posts)
        }
    }

    pub fn posts(&self) -> &[&'a Post] {
        match self {
            Listing::Posts(posts) => posts,
            Listing::NoResults => &[],
        }
    }
}

/// What a query produced, given the engine's load status.
#[derive(Debug)]
pub enum Outcome<'a> {
    Loading,
    Failed(&'a LoadError),
    Ready(Listing<'a>),
}

impl<'a> Outcome<'a> {
    /// Posts of a ready listing; empty while loading or after a failure.
    pub fn posts(&self) -> &[&'a Post] {
        match self {
            Outcome::Ready(listing) => listing.posts(),
            Outcome::Loading | Outcome::Failed(_) => &[],
        }
    }
}

/// Single authority for filter and search over the loaded posts.
#[derive(Debug)]
pub struct QueryEngine {
    status: LoadStatus,
    state: QueryState,
    settings: SearchSettings,
}

impl QueryEngine {
    /// New engine waiting for its first load.
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            status: LoadStatus::Loading,
            state: QueryState::default(),
            settings,
        }
    }

    /// Engine over an already-loaded store.
    pub fn with_store(store: PostStore, settings: SearchSettings) -> Self {
        let mut engine = Self::new(settings);
        engine.complete_load(Ok(store));
        engine
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn store(&self) -> Option<&PostStore> {
        match &self.status {
            LoadStatus::Ready(store) => Some(store),
            LoadStatus::Loading | LoadStatus::Failed(_) => None,
        }
    }

    /// Enter the loading state, e.g. before a retry.
    pub fn start_loading(&mut self) {
        self.status = LoadStatus::Loading;
        self.state.result_order.clear();
    }

    /// Finish a load attempt. On success the active derivation runs against
    /// the new posts, picking up any query issued while loading.
    pub fn complete_load(&mut self, result: Result<PostStore, LoadError>) {
        match result {
            Ok(store) => {
                self.status = LoadStatus::Ready(store);
                self.recompute();
            }
            Err(err) => {
                warn!(error = %err, "post load failed");
                self.status = LoadStatus::Failed(err);
                self.state.result_order.clear();
            }
        }
    }

    /// Fetch from `source` and complete the load in one step.
    pub fn load_from(&mut self, source: &dyn PostSource) {
        self.start_loading();
        self.complete_load(PostStore::load(source));
    }

    /// Select a category. Clears the search term.
    pub fn select_category(&mut self, category: &str) -> Outcome<'_> {
        self.state.active_category = category.to_string();
        self.state.search_term.clear();
        self.state.driver = Driver::Category;
        self.recompute();
        self.outcome()
    }

    /// Search all posts. The selected category is left as-is but not applied.
    pub fn search(&mut self, term: &str) -> Outcome<'_> {
        self.state.search_term = term.to_string();
        self.state.driver = Driver::Search;
        self.recompute();
        self.outcome()
    }

    /// Empty the search term; every post is shown again.
    pub fn clear_search(&mut self) -> Outcome<'_> {
        self.search("")
    }

    /// The current result, without recomputing.
    pub fn outcome(&self) -> Outcome<'_> {
        match &self.status {
            LoadStatus::Loading => Outcome::Loading,
            LoadStatus::Failed(err) => Outcome::Failed(err),
            LoadStatus::Ready(store) => Outcome::Ready(Listing::from_posts(
                self.state
                    .result_order
                    .iter()
                    .filter_map(|&id| store.get(id))
                    .collect(),
            )),
        }
    }

    /// Filter options: `"all"` followed by each category in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        if let Some(store) = self.store() {
            categories.extend(store.categories());
        }
        categories
    }

    /// Scored results for the current term, for callers that display scores.
    /// Empty unless loaded.
    pub fn scored(&self, term: &str) -> Vec<ScoredPost<'_>> {
        match self.store() {
            Some(store) => search_scored(store.posts(), term, &self.settings.weights),
            None => Vec::new(),
        }
    }

    fn recompute(&mut self) {
        let LoadStatus::Ready(store) = &self.status else {
            debug!(driver = ?self.state.driver, "query deferred until posts load");
            return;
        };
        let results = match self.state.driver {
            Driver::Category => filter_by_category(store.posts(), &self.state.active_category),
            Driver::Search => search(store.posts(), &self.state.search_term, &self.settings),
        };
        self.state.result_order = results.iter().map(|p| p.id).collect();
        debug!(
            driver = ?self.state.driver,
            category = %self.state.active_category,
            term = %self.state.search_term,
            results = self.state.result_order.len(),
            "results recomputed"
        );
    }
}
