#![forbid(unsafe_code)]

//! Headless views and app composition for ToggleKit.
//!
//! The views here are string-rendering counterparts of the widget's
//! display surfaces: a toggle panel, a progress bar, and a content line.
//! They hold display state only; selection rules and timing live in
//! `togglekit-core`. [`app::App`] wires everything together.

pub mod app;
pub mod content;
pub mod progress;
pub mod store;
pub mod toggle;

pub use app::{App, AppConfig, RunError};
pub use content::ContentView;
pub use progress::ProgressBarView;
pub use store::Store;
pub use toggle::TogglePanel;

/// A `View` renders itself as display lines.
///
/// Views append zero or more lines to the frame being assembled; a hidden
/// view appends nothing.
pub trait View {
    /// Append this view's display lines to `out`.
    fn render(&self, out: &mut Vec<String>);
}
