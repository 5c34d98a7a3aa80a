//! Shared test utilities for the post-index test suite.
//!
//! Provides a small fixed post set, a terse [`Post`] builder, and id
//! extractors so assertions can compare plain id lists.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = sample_store();
//! let engine = QueryEngine::with_store(store, SearchSettings::default());
//! assert_eq!(ids(&engine.search("css").posts()), vec![1, 4, 5]);
//! ```

use chrono::NaiveDate;

use crate::store::PostStore;
use crate::types::{Post, PostId};

/// Five posts across three categories, in load order 1..=5.
///
/// Scores against the default weights for a few terms used throughout
/// the tests:
///
/// ```text
/// "css"        1 → 16 (title, content, tags)   4 → 5 (excerpt)   5 → 4 (tags)
/// "layout"     1 → 11 (excerpt, content, tags)  4 → 5 (excerpt)   5 → 2 (content)
/// "lifestyle"  2 → 3  (category)                5 → 3 (category)
/// ```
pub const SAMPLE_POSTS_JSON: &str = r#"[
  {
    "id": 1,
    "title": "Getting Started with CSS Grid",
    "excerpt": "Learn how to build two-dimensional layouts.",
    "content": "<p>CSS Grid is a layout system for the web.</p>",
    "category": "Web Development",
    "author": "Jane Doe",
    "date": "2024-01-15",
    "tags": ["css", "layout"]
  },
  {
    "id": 2,
    "title": "Morning Routines That Stick",
    "excerpt": "Small habits that compound over time.",
    "content": "<p>Start with a glass of water.</p>",
    "category": "Lifestyle",
    "author": "John Smith",
    "date": "2024-02-03",
    "tags": ["habits", "productivity"]
  },
  {
    "id": 3,
    "title": "Rust Ownership Explained",
    "excerpt": "Borrowing, moves, and lifetimes without the pain.",
    "content": "<p>Every value in Rust has a single owner.</p>",
    "category": "Programming",
    "author": "Jane Doe",
    "date": "2024-02-20",
    "tags": ["rust", "memory"]
  },
  {
    "id": 4,
    "title": "Responsive Design Tips",
    "excerpt": "Make layouts work on every screen with CSS.",
    "content": "<p>Media queries and fluid units.</p>",
    "category": "Web Development",
    "author": "Alex Kim",
    "date": "2024-03-05",
    "tags": ["responsive", "mobile"]
  },
  {
    "id": 5,
    "title": "Cooking for Busy Developers",
    "excerpt": "Quick meals between deploys.",
    "content": "<p>Batch cooking saves hours. Even the layout of your kitchen matters.</p>",
    "category": "Lifestyle",
    "author": "John Smith",
    "date": "2024-03-18",
    "tags": ["food", "css"]
  }
]"#;

pub fn sample_store() -> PostStore {
    PostStore::from_json(SAMPLE_POSTS_JSON).unwrap()
}

/// Minimal post with empty text fields and no tags.
pub fn post(id: PostId, title: &str, category: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        excerpt: String::new(),
        content: String::new(),
        category: category.to_string(),
        author: "A".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        tags: Vec::new(),
    }
}

pub fn ids(posts: &[&Post]) -> Vec<PostId> {
    posts.iter().map(|p| p.id).collect()
}
