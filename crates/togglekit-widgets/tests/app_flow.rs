//! End-to-end flow: fragment → store → clicks → transition → content.

use std::time::Duration;

use togglekit_core::sched::ManualScheduler;
use togglekit_widgets::{App, AppConfig, Store};

const MS_16: Duration = Duration::from_millis(16);

fn settle(sched: &mut ManualScheduler) {
    let mut guard = 0;
    while sched.pending() > 0 {
        sched.step(MS_16);
        guard += 1;
        assert!(guard < 10_000, "transition never settled");
    }
}

#[test]
fn default_widget_full_scenario() {
    let mut app = App::new(
        AppConfig::new()
            .store(Store::default())
            .delay(Duration::from_millis(96)),
    )
    .unwrap();
    let mut sched = ManualScheduler::new();

    assert_eq!(app.selected_labels(), vec!["All"]);
    assert_eq!(app.content_body(), "All");

    app.click("Opt1", &mut sched);
    settle(&mut sched);
    assert_eq!(app.selected_labels(), vec!["Opt1"]);
    assert_eq!(app.content_body(), "Opt1");

    // Sole selected item: the unselect is rejected, nothing animates.
    app.click("Opt1", &mut sched);
    assert_eq!(sched.pending(), 0);
    assert_eq!(app.selected_labels(), vec!["Opt1"]);

    app.click("All", &mut sched);
    settle(&mut sched);
    assert_eq!(app.selected_labels(), vec!["All"]);
    assert_eq!(app.content_body(), "All");
}

#[test]
fn fragment_labels_drive_the_widget() {
    let store = Store::from_fragment("#Red|Green|Blue");
    let mut app = App::new(
        AppConfig::new()
            .store(store)
            .delay(Duration::from_millis(48)),
    )
    .unwrap();
    let mut sched = ManualScheduler::new();

    app.click("Red", &mut sched);
    app.click("Blue", &mut sched);
    settle(&mut sched);
    assert_eq!(app.content_body(), "Red, Blue");
}

#[test]
fn invalid_fragment_falls_back_to_defaults() {
    let app = App::new(AppConfig::new().store(Store::from_fragment("#Red"))).unwrap();
    let frame = app.render();
    assert!(frame[0].contains("Opt1"));
    assert!(frame[0].contains("Opt3"));
    assert!(!frame[0].contains("Red"));
}

#[test]
fn progress_bar_appears_only_during_transition() {
    let mut app = App::new(
        AppConfig::new()
            .store(Store::default())
            .delay(Duration::from_millis(64))
            .bar_width(8),
    )
    .unwrap();
    let mut sched = ManualScheduler::new();

    assert_eq!(app.render().len(), 2);
    app.click("Opt2", &mut sched);
    assert_eq!(app.render().len(), 3);
    settle(&mut sched);
    assert_eq!(app.render().len(), 2);
}
