#![forbid(unsafe_code)]

//! ToggleKit demo binary.
//!
//! Runs the widget on stdin/stdout: each line typed is treated as a click
//! on that label, the transition pumps on the real-time frame scheduler,
//! and the frame is reprinted after it settles. An optional first argument
//! supplies the hash fragment (`'#Red|Green|Blue'`).

use std::io::{self, BufRead, Write};
use std::time::Duration;

use togglekit_core::sched::FrameScheduler;
use togglekit_widgets::{App, AppConfig, Store};

/// Demo transition delay; shorter than the reference 3000 ms so the bar
/// settles quickly at the keyboard.
const DEMO_DELAY: Duration = Duration::from_millis(800);

fn print_frame(app: &App) {
    println!();
    for line in app.render() {
        println!("  {line}");
    }
    print!("> ");
    let _ = io::stdout().flush();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let fragment = std::env::args().nth(1).unwrap_or_default();
    let store = Store::from_fragment(&fragment);
    tracing::info!(options = ?store.options, "store ready");

    let mut app = match App::new(AppConfig::new().store(store).delay(DEMO_DELAY)) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Runtime error: {e}");
            std::process::exit(1);
        }
    };
    let mut sched = FrameScheduler::new();

    println!("Type a label to toggle it; empty line quits.");
    print_frame(&app);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let label = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if label.is_empty() {
            break;
        }
        app.click(&label, &mut sched);
        // Pump the frame chain until the transition settles.
        sched.run_until_idle();
        print_frame(&app);
    }
}
