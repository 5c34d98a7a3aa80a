//! # Post Index
//!
//! Index and query engine for a small static blog. A JSON array of posts is
//! loaded once; readers then narrow it by category, search it by keyword, and
//! move between the list and single-post pages through a query-string route.
//!
//! # Architecture: Load, Derive, Route
//!
//! ```text
//! 1. Load     PostSource  →  PostStore     (JSON → validated, immutable posts)
//! 2. Derive   PostStore   →  result list   (category filter XOR weighted search)
//! 3. Route    location    →  View          (?post=N → single post, else list)
//! ```
//!
//! The store never changes after a load. Every result list is recomputed from
//! it in full, so there is no incremental state to get out of sync.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The `Post` record and its id type |
//! | [`source`] | `PostSource` trait: where the JSON array comes from |
//! | [`store`] | Parsing and validation into an id-indexed `PostStore` |
//! | [`query`] | Category filter, keyword search, and the stateful `QueryEngine` |
//! | [`debounce`] | Quiet-window debouncer for the search input |
//! | [`router`] | `?post=N` parsing and encoding, not-found resolution |
//! | [`session`] | Event dispatch tying engine, debouncer and route into a `View` |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting of views and scored results |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Filter XOR Search
//!
//! The displayed list is derived from exactly one of the active category or
//! the search term, whichever the reader touched last. Choosing a category
//! clears the search; typing a search leaves the category selected but does
//! not apply it. [`query::Driver`] records which one is in charge.
//!
//! ## Weighted Scoring With Stable Ties
//!
//! Scored search adds a per-field weight for each field containing the term
//! (title 10, excerpt 5, tags 4, category 3, content 2). Results sort by score
//! descending; equal scores keep load order because the sort is stable. The
//! weights live in config so a site can retune them without a rebuild.
//!
//! ## No Clock Inside
//!
//! Neither the debouncer nor the session reads the system clock. Callers pass
//! `Instant`s in, which keeps every timing path deterministic under test.
//!
//! ## Routes Carry Only the Post
//!
//! The URL encodes which post is open and nothing else. Search and category
//! reset on navigation; a stale `?post=` id renders a not-found page instead
//! of an error.

pub mod config;
pub mod debounce;
pub mod logging;
pub mod output;
pub mod query;
pub mod router;
pub mod session;
pub mod source;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
