//! Post source trait and its implementations.
//!
//! The [`PostSource`] trait is the transport boundary: it yields the raw JSON
//! text of the post array and nothing else. The store depends only on the
//! shape of that text, never on where it came from.
//!
//! - [`FileSource`] reads a `posts.json` from disk (the CLI default).
//! - [`StaticSource`] holds the text in memory, for embedding and tests.

use crate::store::LoadError;
use std::fs;
use std::path::{Path, PathBuf};

/// Something that can produce the raw post array.
pub trait PostSource {
    /// Human-readable location, used in log lines and failure messages.
    fn describe(&self) -> String;

    /// Fetch the full JSON body. Called once per load attempt.
    fn fetch(&self) -> Result<String, LoadError>;
}

/// Reads posts from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PostSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

/// In-memory post array.
#[derive(Debug, Clone)]
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl PostSource for StaticSource {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.body.clone())
    }
}
