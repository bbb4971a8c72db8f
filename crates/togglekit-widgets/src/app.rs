#![forbid(unsafe_code)]

//! App composition.
//!
//! [`App`] is the bridge between the selection core and the views. It owns
//! one [`SelectionController`], the three views, and one [`TimedLoop`],
//! and wires the widget's control flow: a click toggles the selection, an
//! applied change shows the progress bar and (re)starts the transition,
//! `step` drives the bar, and `complete` hides it and refreshes the
//! content line. A click landing mid-transition restarts the loop; the
//! stale tick chain is cancelled by the loop itself.
//!
//! # Failure Modes
//!
//! - [`App::new`] without a store is a caller bug and fails fast with
//!   [`RunError::MissingStore`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use togglekit_core::sched::Scheduler;
use togglekit_core::selection::SelectionController;
use togglekit_core::timed_loop::{ConfigError, TimedLoop, TimedLoopConfig};

use crate::progress::ProgressBarView;
use crate::store::Store;
use crate::toggle::TogglePanel;
use crate::{ContentView, View};

/// Reference delay between a selection change and the content update.
pub const CONTENT_UPDATE_DELAY: Duration = Duration::from_millis(3000);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// App construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// No store was supplied to the config.
    MissingStore,
    /// The transition config was rejected.
    Transition(ConfigError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStore => write!(f, "app config has no store"),
            Self::Transition(err) => write!(f, "transition config rejected: {err}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        Self::Transition(err)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Builder for [`App`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    store: Option<Store>,
    delay: Duration,
    bar_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Start a config with the reference delay and default bar width.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            delay: CONTENT_UPDATE_DELAY,
            bar_width: crate::progress::DEFAULT_BAR_WIDTH,
        }
    }

    /// Set the store (required).
    #[must_use]
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the transition delay.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Override the progress bar width.
    #[must_use]
    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The assembled widget: selection core, views, and the update transition.
pub struct App {
    panel: TogglePanel,
    progress: Rc<RefCell<ProgressBarView>>,
    content: Rc<RefCell<ContentView>>,
    transition: TimedLoop,
    changed: Rc<Cell<bool>>,
}

impl App {
    /// Build and wire the app from `config`.
    ///
    /// Fails fast when the store is missing — silently rendering an empty
    /// widget would hide the integration bug.
    pub fn new(config: AppConfig) -> Result<Self, RunError> {
        let store = config.store.ok_or(RunError::MissingStore)?;

        let sel = Rc::new(RefCell::new(SelectionController::new(store.options)));
        let panel = TogglePanel::new(Rc::clone(&sel));
        let progress = Rc::new(RefCell::new(ProgressBarView::with_width(config.bar_width)));
        let content = Rc::new(RefCell::new(ContentView::new(store.header)));

        // The content line shows the initial selection right away.
        content.borrow_mut().update_from(&sel.borrow());

        // Selection changes only raise a flag here; the transition is
        // started by `click` once the mutating borrow has ended.
        let changed = Rc::new(Cell::new(false));
        {
            let changed = Rc::clone(&changed);
            sel.borrow().on_change(move || changed.set(true));
        }

        let transition = TimedLoopConfig::new()
            .duration(config.delay)
            .step({
                let progress = Rc::clone(&progress);
                move |ratio| progress.borrow_mut().set_ratio(ratio)
            })
            .complete({
                let progress = Rc::clone(&progress);
                let content = Rc::clone(&content);
                let sel = Rc::clone(&sel);
                move || {
                    progress.borrow_mut().hide();
                    content.borrow_mut().update_from(&sel.borrow());
                }
            })
            .build()?;

        Ok(Self {
            panel,
            progress,
            content,
            transition,
            changed,
        })
    }

    /// Handle a click on `label`.
    ///
    /// When the toggle is applied (not rejected, not unknown), the
    /// progress bar shows and the content-update transition starts — or
    /// restarts, if one is already in flight.
    pub fn click(&mut self, label: &str, sched: &mut dyn Scheduler) {
        self.panel.click(label);
        if self.changed.replace(false) {
            #[cfg(feature = "tracing")]
            tracing::debug!(label, "selection changed, starting transition");
            self.progress.borrow_mut().show();
            self.transition.start(sched);
        }
    }

    /// Whether the content-update transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_running()
    }

    /// Labels of the currently selected items.
    pub fn selected_labels(&self) -> Vec<String> {
        self.panel.selected_labels()
    }

    /// Body text currently displayed by the content view.
    pub fn content_body(&self) -> String {
        self.content.borrow().body().to_string()
    }

    /// Current progress ratio of the bar.
    pub fn progress_ratio(&self) -> f64 {
        self.progress.borrow().ratio()
    }

    /// Render the full widget frame: option row, progress bar (when
    /// visible), content line.
    pub fn render(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.panel.render(&mut out);
        self.progress.borrow().render(&mut out);
        self.content.borrow().render(&mut out);
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
