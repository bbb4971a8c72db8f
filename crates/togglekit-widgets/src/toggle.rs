#![forbid(unsafe_code)]

//! Toggle panel view.
//!
//! Renders the option row from a shared [`SelectionController`], wrapping
//! selected labels in markers, and forwards clicks to the controller by
//! label.

use std::cell::RefCell;
use std::rc::Rc;

use togglekit_core::selection::SelectionController;

use crate::View;

/// Marker pair wrapped around selected labels.
const SELECTED_MARKERS: (char, char) = ('[', ']');

/// Option row over a shared selection controller.
pub struct TogglePanel {
    sel: Rc<RefCell<SelectionController>>,
}

impl TogglePanel {
    /// Create a panel rendering (and mutating) `sel`.
    pub fn new(sel: Rc<RefCell<SelectionController>>) -> Self {
        Self { sel }
    }

    /// Forward a click on `label` to the controller.
    ///
    /// Unknown labels are ignored by the controller; a rejected toggle
    /// (last selected item) leaves the selection untouched.
    pub fn click(&self, label: &str) {
        self.sel.borrow_mut().toggle(label);
    }

    /// Labels of the currently selected items.
    pub fn selected_labels(&self) -> Vec<String> {
        self.sel
            .borrow()
            .selected()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl View for TogglePanel {
    fn render(&self, out: &mut Vec<String>) {
        let sel = self.sel.borrow();
        let row = sel
            .items()
            .iter()
            .map(|item| {
                if item.is_selected() {
                    format!("{}{}{}", SELECTED_MARKERS.0, item.label(), SELECTED_MARKERS.1)
                } else {
                    format!(" {} ", item.label())
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push(row);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> TogglePanel {
        TogglePanel::new(Rc::new(RefCell::new(SelectionController::new([
            "All", "Opt1", "Opt2",
        ]))))
    }

    fn line(panel: &TogglePanel) -> String {
        let mut out = Vec::new();
        panel.render(&mut out);
        out.remove(0)
    }

    #[test]
    fn marks_initial_selection() {
        let panel = panel();
        assert_eq!(line(&panel), "[All]  Opt1   Opt2 ");
    }

    #[test]
    fn click_moves_the_marker() {
        let panel = panel();
        panel.click("Opt2");
        assert_eq!(line(&panel), " All   Opt1  [Opt2]");
    }

    #[test]
    fn click_on_unknown_label_changes_nothing() {
        let panel = panel();
        panel.click("Nope");
        assert_eq!(line(&panel), "[All]  Opt1   Opt2 ");
    }

    #[test]
    fn selected_labels_follow_clicks() {
        let panel = panel();
        panel.click("Opt1");
        panel.click("Opt2");
        assert_eq!(panel.selected_labels(), vec!["Opt1", "Opt2"]);
    }
}
