#![forbid(unsafe_code)]

//! Application store and fragment parsing.
//!
//! The store is the widget's input data: a content header and the ordered
//! option labels. Dynamic labels can come from a page-style hash fragment
//! (`#Red|Green|Blue`); a fragment with fewer than three tokens falls back
//! to the fixed defaults. The fixed "All" option is always prepended.
//!
//! The store is plain data handed to [`App::new`](crate::App::new) — one
//! instance per app, no process-wide state.

use togglekit_core::selection::DEFAULT_ALL_LABEL;

use crate::content::DEFAULT_HEADER;

/// Fallback option labels when no valid fragment is supplied.
pub const DEFAULT_OPTIONS: [&str; 3] = ["Opt1", "Opt2", "Opt3"];

/// Separator between labels in a fragment.
pub const FRAGMENT_SEPARATOR: char = '|';

/// Minimum token count for a fragment to be considered valid.
const MIN_FRAGMENT_TOKENS: usize = 3;

/// Input data for one app instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Content header line.
    pub header: String,
    /// Ordered option labels, including the leading all label.
    pub options: Vec<String>,
}

impl Default for Store {
    fn default() -> Self {
        Self::from_fragment("")
    }
}

impl Store {
    /// Build a store from an optional hash fragment.
    ///
    /// Invalid or empty fragments yield the [`DEFAULT_OPTIONS`].
    pub fn from_fragment(fragment: &str) -> Self {
        let dynamic = dynamic_labels(fragment).unwrap_or_else(|| {
            DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
        });
        let mut options = vec![DEFAULT_ALL_LABEL.to_string()];
        options.extend(dynamic);
        Self {
            header: DEFAULT_HEADER.to_string(),
            options,
        }
    }

    /// Build a store from explicit option labels (all label not included).
    pub fn with_options(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut options = vec![DEFAULT_ALL_LABEL.to_string()];
        options.extend(labels.into_iter().map(Into::into));
        Self {
            header: DEFAULT_HEADER.to_string(),
            options,
        }
    }

    /// Replace the header (builder).
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

/// Parse dynamic option labels from a hash fragment.
///
/// Accepts the fragment with or without its leading `#`. Returns `None`
/// when the fragment is empty or splits into fewer than three tokens.
pub fn dynamic_labels(fragment: &str) -> Option<Vec<String>> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    if raw.is_empty() {
        return None;
    }
    let tokens: Vec<&str> = raw.split(FRAGMENT_SEPARATOR).collect();
    if tokens.len() < MIN_FRAGMENT_TOKENS {
        return None;
    }
    Some(tokens.iter().map(|s| s.to_string()).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
