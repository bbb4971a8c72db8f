#![forbid(unsafe_code)]

//! Progress bar view.
//!
//! Textual counterpart of the widget's animated progress indicator.
//! Hidden by default; the app shows it when a transition starts, drives
//! the ratio from the timed loop's `step` callback, and hides it again on
//! `complete`.

use unicode_width::UnicodeWidthStr;

use crate::View;

/// Default bar width in cells.
pub const DEFAULT_BAR_WIDTH: usize = 40;

const FILLED: char = '█';
const EMPTY: char = '░';

/// A show/hide progress bar rendering to a fixed-width line.
#[derive(Debug, Clone)]
pub struct ProgressBarView {
    ratio: f64,
    visible: bool,
    width: usize,
    label: Option<String>,
}

impl Default for ProgressBarView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBarView {
    /// Create a hidden bar of [`DEFAULT_BAR_WIDTH`] cells at ratio zero.
    pub fn new() -> Self {
        Self::with_width(DEFAULT_BAR_WIDTH)
    }

    /// Create a hidden bar of `width` cells (minimum one).
    pub fn with_width(width: usize) -> Self {
        Self {
            ratio: 0.0,
            visible: false,
            width: width.max(1),
            label: None,
        }
    }

    /// Set a label rendered centered over the bar (builder).
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the progress ratio (clamped to 0.0..=1.0).
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio.clamp(0.0, 1.0);
    }

    /// Current ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Make the bar visible.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the bar and reset the ratio for the next run.
    pub fn hide(&mut self) {
        self.visible = false;
        self.ratio = 0.0;
    }

    /// Whether the bar currently renders.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Bar width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    fn bar_cell(&self, index: usize, filled: usize) -> char {
        if index < filled { FILLED } else { EMPTY }
    }

    fn render_line(&self) -> String {
        let filled = (self.ratio * self.width as f64).round() as usize;
        let filled = filled.min(self.width);

        let mut line = String::with_capacity(self.width * FILLED.len_utf8());
        match &self.label {
            Some(label) if label.width() <= self.width => {
                // Overlay the label centered over the bar cells.
                let label_width = label.width();
                let pad = (self.width - label_width) / 2;
                for i in 0..pad {
                    line.push(self.bar_cell(i, filled));
                }
                line.push_str(label);
                for i in (pad + label_width)..self.width {
                    line.push(self.bar_cell(i, filled));
                }
            }
            _ => {
                for i in 0..self.width {
                    line.push(self.bar_cell(i, filled));
                }
            }
        }
        line
    }
}

impl View for ProgressBarView {
    fn render(&self, out: &mut Vec<String>) {
        if self.visible {
            out.push(self.render_line());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
