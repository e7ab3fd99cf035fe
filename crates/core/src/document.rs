//! Documents and the chunks derived from them.
//!
//! A [`Document`] is produced once per requested URL by the content fetcher
//! (or from raw user text) and never mutated afterwards. A [`Chunk`] is a
//! bounded slice of a document's text; all chunks of one document share the
//! same `source` allocation.

use std::sync::Arc;

use crate::error::Error;

/// A unit of source text fed to the retrieval index.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Cleaned plain text, or a diagnostic placeholder when `is_error` is set.
    pub content: String,

    /// The URL it was fetched from, or a synthetic id such as `user_input`.
    pub source: String,

    /// Page title reported by the search provider, if any.
    pub title: Option<String>,

    /// Set when fetching failed and `content` is only a placeholder.
    pub is_error: bool,
}

impl Document {
    /// A successfully fetched page.
    pub fn fetched(source: impl Into<String>, title: Option<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            title,
            is_error: false,
        }
    }

    /// Placeholder for a page that could not be fetched.
    pub fn failed(source: impl Into<String>, title: Option<String>, reason: &str) -> Self {
        let source = source.into();
        Self {
            content: format!("Content unavailable for {source}: {reason}"),
            source,
            title,
            is_error: true,
        }
    }

    /// Placeholder for a page whose fetch ended in `error`.
    ///
    /// A [`Error::Fetch`] contributes only its reason; the source is already
    /// part of the placeholder text.
    pub fn from_error(source: impl Into<String>, title: Option<String>, error: &Error) -> Self {
        match error {
            Error::Fetch { reason, .. } => Self::failed(source, title, reason),
            other => Self::failed(source, title, &other.to_string()),
        }
    }

    /// Raw text supplied directly by the caller.
    pub fn from_text(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            title: None,
            is_error: false,
        }
    }

    /// Title to show in citations.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.trim().is_empty()).unwrap_or("Untitled")
    }
}

/// A slice of a document's text, the unit that gets embedded and retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk text.
    pub content: String,

    /// Back-reference to the owning document's `source`.
    pub source: Arc<str>,

    /// Position of this chunk within its document.
    pub chunk_index: usize,

    /// Position of this chunk across the whole index (insertion order).
    pub ordinal: usize,
}
