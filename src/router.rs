//! URL query-string routing.
//!
//! The whole route lives in one optional query parameter:
//!
//! ```text
//! ?            → home (post list)
//! ?post=2      → single post with id 2
//! ?post=%32    → single post with id 2 (percent-decoded)
//! ?post=2abc   → single post with id 2 (leading integer)
//! ?post=abc    → home (no leading integer)
//! ```
//!
//! Search term and active category are never encoded in the URL. The router
//! keeps no state of its own: every navigation, including history back and
//! forward, is resolved again from the current location.

use crate::store::PostStore;
use crate::types::{Post, PostId};
use thiserror::Error;
use tracing::debug;

/// Query parameter carrying the post id.
pub const POST_PARAM: &str = "post";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Post not found: {id}")]
pub struct NotFoundError {
    pub id: PostId,
}

/// The view intent encoded in a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Single(PostId),
}

impl Route {
    /// Query string for this route, including the leading `?`.
    pub fn encode(&self) -> String {
        match self {
            Route::Home => "?".to_string(),
            Route::Single(id) => format!("?{POST_PARAM}={id}"),
        }
    }
}

/// A route matched against the loaded posts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Home,
    Single(&'a Post),
}

/// Parse a location into a route.
///
/// Accepts a bare query (`post=2`), a query with its `?` (`?post=2`), or a
/// full URL or path (`/blog/?post=2#top`). Keys and values are
/// form-urlencoded (`%32` is `2`, `+` is a space). The first `post` parameter
/// wins, and its leading integer is the id; a value without one routes home.
pub fn resolve(location: &str) -> Route {
    let query = match location.split_once('?') {
        Some((_, query)) => query,
        None if location.contains('=') => location,
        None => "",
    };
    let query = query.split('#').next().unwrap_or_default();

    let route = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| *key == POST_PARAM)
        .and_then(|(_, value)| leading_integer(&value))
        .map_or(Route::Home, Route::Single);

    debug!(location, ?route, "route resolved");
    route
}

/// Integer prefix of `value` after leading whitespace, with an optional sign.
/// `"2abc"` and `"1.5"` give 2 and 1. Out-of-range ids give `None`.
fn leading_integer(value: &str) -> Option<PostId> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let digits = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let end = trimmed.len() - unsigned.len() + digits;
    trimmed[..end].parse().ok()
}

/// Look up the post a route points at.
///
/// A single-post route whose id is not in the store is a [`NotFoundError`];
/// the caller shows a "not found" view rather than failing.
pub fn resolve_or_fail<'a>(
    route: Route,
    store: &'a PostStore,
) -> Result<Resolved<'a>, NotFoundError> {
    match route {
        Route::Home => Ok(Resolved::Home),
        Route::Single(id) => store
            .get(id)
            .map(Resolved::Single)
            .ok_or(NotFoundError { id }),
    }
}
