//! Terminal rendering of engine views.
//!
//! # Information-First Display
//!
//! Every post is shown by its positional index and title first, with date,
//! category, excerpt and link as indented context lines:
//!
//! ```text
//! Categories
//!     * All Posts
//!       Web Development
//!       Lifestyle
//!
//! Posts
//! 001 Getting Started with CSS Grid
//!     January 15, 2024 · Web Development
//!     Learn how to build two-dimensional layouts.
//!     Link: ?post=1
//! ```
//!
//! A single post renders its header, body text and tags:
//!
//! ```text
//! Rust Ownership Explained
//!     February 20, 2024 · Programming · By Jane Doe
//!
//!     Every value in Rust has a single owner.
//!
//! Tags: rust, memory
//! Back to Home: ?
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O, so tests
//! assert on lines directly. `print_*` wrappers write to stdout.

use crate::query::{Listing, ScoredPost};
use crate::router::Route;
use crate::session::{HomeView, View};
use crate::types::{ALL_CATEGORIES, Post};
use chrono::NaiveDate;

const EXCERPT_MAX: usize = 80;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Long US date, e.g. "January 15, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Display label for a category filter control.
pub fn category_label(category: &str) -> &str {
    if category == ALL_CATEGORIES {
        "All Posts"
    } else {
        category
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

// ============================================================================
// Lists
// ============================================================================

/// Header line plus context lines for one post card.
fn post_card(index: usize, post: &Post, score: Option<u32>) -> Vec<String> {
    let header = match score {
        Some(s) => format!("{} {} (score {})", format_index(index), post.title, s),
        None => format!("{} {}", format_index(index), post.title),
    };
    let mut lines = vec![
        header,
        format!("    {} · {}", format_date(post.date), post.category),
    ];
    let excerpt = truncate(post.excerpt.trim(), EXCERPT_MAX);
    if !excerpt.is_empty() {
        lines.push(format!("    {}", excerpt));
    }
    lines.push(format!("    Link: {}", post.href()));
    lines
}

/// Format a result list, or the "no results" message for an empty one.
pub fn format_listing(listing: &Listing<'_>) -> Vec<String> {
    match listing {
        Listing::NoResults => vec![
            "No posts found".to_string(),
            "    Try adjusting your search terms or browse all posts.".to_string(),
        ],
        Listing::Posts(posts) => posts
            .iter()
            .enumerate()
            .flat_map(|(i, post)| post_card(i + 1, post, None))
            .collect(),
    }
}

/// Format scored search results, showing each post's score.
pub fn format_scored(results: &[ScoredPost<'_>]) -> Vec<String> {
    if results.is_empty() {
        return format_listing(&Listing::NoResults);
    }
    results
        .iter()
        .enumerate()
        .flat_map(|(i, r)| post_card(i + 1, r.post, Some(r.score)))
        .collect()
}

/// Format filter controls, marking the active one with `*`.
pub fn format_categories(categories: &[&str], active: &str) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for category in categories {
        let marker = if *category == active { "*" } else { " " };
        lines.push(format!("    {} {}", marker, category_label(category)));
    }
    lines
}

// ============================================================================
// Views
// ============================================================================

fn format_home(home: &HomeView<'_>) -> Vec<String> {
    let mut lines = format_categories(&home.categories, home.active_category);
    lines.push(String::new());
    if home.search_term.trim().is_empty() {
        lines.push("Posts".to_string());
    } else {
        lines.push(format!("Posts matching \"{}\"", home.search_term.trim()));
    }
    lines.extend(format_listing(&home.listing));
    lines
}

/// Format a single post's detail page.
pub fn format_post(post: &Post) -> Vec<String> {
    let mut lines = vec![post.title.clone()];
    let mut info = format!("    {} · {}", format_date(post.date), post.category);
    if !post.author.is_empty() {
        info.push_str(&format!(" · By {}", post.author));
    }
    lines.push(info);

    let body = strip_html_tags(&post.content);
    let paragraphs: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !paragraphs.is_empty() {
        lines.push(String::new());
        lines.extend(paragraphs.iter().map(|p| format!("    {}", p)));
    }

    lines.push(String::new());
    if !post.tags.is_empty() {
        lines.push(format!("Tags: {}", post.tags.join(", ")));
    }
    lines.push(format!("Back to Home: {}", Route::Home.encode()));
    lines
}

/// Format any view, led by its document title.
pub fn format_view(view: &View<'_>) -> Vec<String> {
    let mut lines = vec![format!("== {}", view.title())];
    match view {
        View::Loading => {
            lines.push("Loading...".to_string());
            lines.push("    Please wait while we fetch the latest posts.".to_string());
        }
        View::LoadFailed { message } => {
            lines.push("Oops! Something went wrong".to_string());
            lines.push("    Failed to load blog posts. Please try again later.".to_string());
            lines.push(format!("    {}", message));
        }
        View::NotFound { id } => {
            lines.push(format!("Post not found: {}", id));
            lines.push(format!("Back to Home: {}", Route::Home.encode()));
        }
        View::Single(post) => lines.extend(format_post(post)),
        View::Home(home) => lines.extend(format_home(home)),
    }
    lines
}

/// Print a view to stdout.
pub fn print_view(view: &View<'_>) {
    for line in format_view(view) {
        println!("{}", line);
    }
}

/// Print scored results to stdout.
pub fn print_scored(results: &[ScoredPost<'_>]) {
    for line in format_scored(results) {
        println!("{}", line);
    }
}
