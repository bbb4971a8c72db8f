#![forbid(unsafe_code)]

//! Selection state for a labeled toggle set.
//!
//! [`SelectionController`] owns an ordered set of labeled items and the
//! rules that keep the set usable: at least one item stays selected, and a
//! reserved "all" item is mutually exclusive with every other item. State
//! changes are republished as [`EVENT_CHANGE`] on an internal [`EventBus`];
//! subscribers re-read the selection via [`selected`](SelectionController::selected).
//!
//! # Invariants
//!
//! 1. After every public compound operation ([`toggle`], [`select_only`]),
//!    at least one item is selected.
//! 2. The all item selected implies every other item unselected, and vice
//!    versa.
//! 3. `change` is emitted only when item state actually changed.
//!
//! [`toggle`]: SelectionController::toggle
//! [`select_only`]: SelectionController::select_only

use crate::events::{EventBus, ListenerId};

/// Event name published after an applied selection change.
pub const EVENT_CHANGE: &str = "change";

/// Reserved label giving an item select-everything semantics.
pub const DEFAULT_ALL_LABEL: &str = "All";

/// One selectable entry, identified by its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    label: String,
    selected: bool,
}

impl Item {
    /// Display label (unique within a controller).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current selection state.
    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Ordered selection set with an optional mutually-exclusive "all" item.
///
/// ```
/// use togglekit_core::selection::SelectionController;
///
/// let mut sel = SelectionController::new(["All", "Opt1", "Opt2"]);
/// assert_eq!(sel.selected(), ["All"]);
/// sel.toggle("Opt1");
/// assert_eq!(sel.selected(), ["Opt1"]);
/// ```
pub struct SelectionController {
    items: Vec<Item>,
    all_label: String,
    bus: EventBus<String>,
}

impl SelectionController {
    /// Build a controller from ordered labels, using [`DEFAULT_ALL_LABEL`]
    /// as the reserved all label.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_all_label(labels, DEFAULT_ALL_LABEL)
    }

    /// Build a controller with a custom reserved all label.
    ///
    /// Duplicate labels are dropped (first occurrence wins). Initial state:
    /// the all item is selected when present, otherwise the first item.
    pub fn with_all_label(
        labels: impl IntoIterator<Item = impl Into<String>>,
        all_label: impl Into<String>,
    ) -> Self {
        let all_label = all_label.into();
        let mut items: Vec<Item> = Vec::new();
        for label in labels {
            let label = label.into();
            if items.iter().any(|item| item.label == label) {
                continue;
            }
            items.push(Item {
                label,
                selected: false,
            });
        }

        let initial = items
            .iter()
            .position(|item| item.label == all_label)
            .unwrap_or(0);
        if let Some(item) = items.get_mut(initial) {
            item.selected = true;
        }

        Self {
            items,
            all_label,
            bus: EventBus::new(),
        }
    }

    /// All labels in controller order.
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    /// Labels of the currently selected items, in controller order.
    pub fn selected(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.label.as_str())
            .collect()
    }

    /// Items in controller order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether `label` exists and is selected.
    pub fn is_selected(&self, label: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.label == label && item.selected)
    }

    /// The reserved all label for this controller.
    pub fn all_label(&self) -> &str {
        &self.all_label
    }

    /// Bus on which `change` events are published.
    pub fn bus(&self) -> &EventBus<String> {
        &self.bus
    }

    /// Subscribe to applied selection changes.
    pub fn on_change(&self, mut listener: impl FnMut() + 'static) -> ListenerId {
        self.bus.subscribe(EVENT_CHANGE, move |_| listener())
    }

    /// Toggle `label`.
    ///
    /// The all label selects itself and unselects everything else. Any
    /// other label unselects the all item and flips, unless it is the sole
    /// selected item — that request is rejected so the set never goes
    /// empty. Unknown labels are ignored.
    pub fn toggle(&mut self, label: &str) {
        let Some(index) = self.index_of(label) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(label, "toggle for unknown label ignored");
            return;
        };

        let changed = if self.items[index].label == self.all_label {
            self.apply_only(index)
        } else {
            let target = &self.items[index];
            if target.selected && self.selected_count() == 1 {
                // Last selected item; rejecting keeps the set non-empty.
                #[cfg(feature = "tracing")]
                tracing::debug!(label, "toggle rejected: last selected item");
                return;
            }
            let all_label = self.all_label.clone();
            self.set_selected_by_label_internal(&all_label, false);
            self.items[index].selected = !self.items[index].selected;
            true
        };

        if changed {
            self.bus.emit(EVENT_CHANGE, None);
        }
    }

    /// Make `label` the only selected item. Unknown labels are ignored.
    pub fn select_only(&mut self, label: &str) {
        let Some(index) = self.index_of(label) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(label, "select_only for unknown label ignored");
            return;
        };
        if self.apply_only(index) {
            self.bus.emit(EVENT_CHANGE, None);
        }
    }

    /// Unselect every item.
    ///
    /// Building block for compound transitions (the caller is expected to
    /// select something next); does not emit `change` by itself.
    pub fn unselect_all(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
    }

    /// Unselect one item by label. Unknown labels are ignored.
    ///
    /// Like [`unselect_all`](Self::unselect_all), a silent building block.
    pub fn unselect_by_label(&mut self, label: &str) {
        self.set_selected_by_label_internal(label, false);
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.items.iter().position(|item| item.label == label)
    }

    fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }

    /// Select exactly `index`; returns whether any state changed.
    fn apply_only(&mut self, index: usize) -> bool {
        let mut changed = false;
        for (i, item) in self.items.iter_mut().enumerate() {
            let want = i == index;
            if item.selected != want {
                item.selected = want;
                changed = true;
            }
        }
        changed
    }

    fn set_selected_by_label_internal(&mut self, label: &str, selected: bool) -> bool {
        match self.items.iter_mut().find(|item| item.label == label) {
            Some(item) if item.selected != selected => {
                item.selected = selected;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
