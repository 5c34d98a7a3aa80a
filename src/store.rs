//! Post loading, validation, and the immutable post snapshot.
//!
//! ## Input Format
//!
//! The source yields a JSON array of post objects:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "title": "Intro to CSS",
//!     "excerpt": "Selectors, the cascade, and specificity.",
//!     "content": "<p>...</p>",
//!     "category": "Web Development",
//!     "author": "Jane Doe",
//!     "date": "2024-01-15",
//!     "tags": ["css", "basics"]
//!   }
//! ]
//! ```
//!
//! ## Validation
//!
//! Loading is all-or-nothing. The loader rejects the whole array when:
//! - the top-level value is not an array
//! - an element is not an object, or a field has the wrong JSON type
//! - `id`, `title`, `category` or `date` is missing (or `category` is blank)
//! - `date` is not an ISO-8601 date or date-time
//! - two posts share an `id`
//!
//! `excerpt`, `content` and `author` default to empty text and `tags` to an
//! empty list when absent.
//!
//! After a successful load the [`PostStore`] exposes read-only access only.

use crate::source::PostSource;
use crate::types::{Post, PostId};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array of posts")]
    NotAnArray,
    #[error("Malformed post at index {index}: {source}")]
    Malformed {
        index: usize,
        source: serde_json::Error,
    },
    #[error("Post at index {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("Duplicate post id {0}")]
    DuplicateId(PostId),
    #[error("Post {id} has an invalid date: {value:?}")]
    InvalidDate { id: PostId, value: String },
}

/// Wire shape of a post before validation. Every field is optional here so
/// that a missing field is reported by name rather than as a serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    id: Option<PostId>,
    title: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    category: Option<String>,
    author: Option<String>,
    date: Option<String>,
    tags: Option<Vec<String>>,
}

impl RawPost {
    fn validate(self, index: usize) -> Result<Post, LoadError> {
        let missing = |field| LoadError::MissingField { index, field };

        let id = self.id.ok_or_else(|| missing("id"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| missing("category"))?;
        let raw_date = self.date.ok_or_else(|| missing("date"))?;
        let date = parse_date(&raw_date).ok_or(LoadError::InvalidDate {
            id,
            value: raw_date,
        })?;

        Ok(Post {
            id,
            title,
            excerpt: self.excerpt.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            category,
            author: self.author.unwrap_or_default(),
            date,
            tags: self.tags.unwrap_or_default(),
        })
    }
}

/// Parse an ISO-8601 calendar date (`2024-01-15`), an RFC 3339 date-time
/// (`2024-01-15T09:30:00Z`), or a local date-time without offset
/// (`2024-01-15T09:30:00`), keeping only the date part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Immutable snapshot of the loaded posts, in load order.
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    by_id: HashMap<PostId, usize>,
}

impl PostStore {
    /// Fetch from `source` and validate the result.
    pub fn load(source: &dyn PostSource) -> Result<Self, LoadError> {
        let location = source.describe();
        debug!(source = %location, "fetching posts");
        let body = source.fetch()?;
        let store = Self::from_json(&body)?;
        info!(source = %location, posts = store.len(), "posts loaded");
        Ok(store)
    }

    /// Parse and validate a JSON post array.
    pub fn from_json(body: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let serde_json::Value::Array(items) = value else {
            return Err(LoadError::NotAnArray);
        };

        let posts = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let raw: RawPost = serde_json::from_value(item)
                    .map_err(|source| LoadError::Malformed { index, source })?;
                raw.validate(index)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_posts(posts)
    }

    /// Build a store from already-typed posts. Still rejects duplicate ids.
    pub fn from_posts(posts: Vec<Post>) -> Result<Self, LoadError> {
        let mut by_id = HashMap::with_capacity(posts.len());
        for (idx, post) in posts.iter().enumerate() {
            if by_id.insert(post.id, idx).is_some() {
                return Err(LoadError::DuplicateId(post.id));
            }
        }
        Ok(Self { posts, by_id })
    }

    /// All posts in load order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.by_id.get(&id).map(|&idx| &self.posts[idx])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Distinct categories in order of first occurrence.
    ///
    /// Does not include the synthetic "all" entry; see
    /// [`QueryEngine::categories`](crate::query::QueryEngine::categories).
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for post in &self.posts {
            if !seen.contains(&post.category.as_str()) {
                seen.push(&post.category);
            }
        }
        seen
    }
}
