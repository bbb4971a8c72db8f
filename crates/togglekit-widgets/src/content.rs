#![forbid(unsafe_code)]

//! Content view.
//!
//! Displays a fixed header and the comma-joined labels of the current
//! selection. The app refreshes the body when a transition completes, not
//! when the selection changes — the delay is the point of the widget.

use togglekit_core::selection::SelectionController;

use crate::View;

/// Default header line.
pub const DEFAULT_HEADER: &str = "Currently selected:";

/// Header plus selection summary.
#[derive(Debug, Clone)]
pub struct ContentView {
    header: String,
    body: String,
}

impl Default for ContentView {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER)
    }
}

impl ContentView {
    /// Create a content view with the given header and an empty body.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: String::new(),
        }
    }

    /// Header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Current body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the body text.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Set the body to the comma-joined selected labels of `sel`.
    pub fn update_from(&mut self, sel: &SelectionController) {
        self.body = sel.selected().join(", ");
    }
}

impl View for ContentView {
    fn render(&self, out: &mut Vec<String>) {
        out.push(format!("{} {}", self.header, self.body));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
