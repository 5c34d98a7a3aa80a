//! Shared types used across the store, the query engine, and the router.
//!
//! A [`Post`] is immutable once loaded. Everything downstream borrows posts
//! from the [`PostStore`](crate::store::PostStore) snapshot rather than
//! cloning them.

use chrono::NaiveDate;
use serde::Serialize;

/// Stable identity key of a post, carried in `?post=<id>` links.
pub type PostId = i64;

/// Synthetic category meaning "no filter".
///
/// Never appears as a `category` value in data; it is always listed first
/// in front of the categories derived from the loaded posts.
pub const ALL_CATEGORIES: &str = "all";

/// A single blog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Short plain-text summary shown on list cards.
    pub excerpt: String,
    /// Full body. May contain markup; the engine treats it as opaque text.
    pub content: String,
    /// Single classification label. Compared exactly by the category filter.
    pub category: String,
    pub author: String,
    pub date: NaiveDate,
    /// Display order only. Duplicates are kept as-is.
    pub tags: Vec<String>,
}

impl Post {
    /// Link target for this post's detail view.
    pub fn href(&self) -> String {
        crate::router::Route::Single(self.id).encode()
    }
}
