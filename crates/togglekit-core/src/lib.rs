#![forbid(unsafe_code)]

//! Core mechanisms for ToggleKit: a timed progress loop, a synchronous
//! event bus, and selection state for a labeled toggle set.
//!
//! Everything here runs on one logical thread. The only deferred work is
//! the [`TimedLoop`] tick chain, which is paced by an injected
//! [`Scheduler`] — an animation-frame stand-in that is substitutable in
//! tests ([`ManualScheduler`]) and in environments without a frame source
//! ([`FrameScheduler`]).
//!
//! Control flow for the widget built on top of this crate:
//! user interaction → [`SelectionController`] mutates state and publishes
//! `change` on its [`EventBus`] → a subscriber starts a [`TimedLoop`] →
//! `step` drives a progress indicator → `complete` re-reads the selection.

pub mod events;
pub mod logging;
pub mod sched;
pub mod selection;
pub mod timed_loop;

pub use events::{EventBus, ListenerId};
pub use sched::{FrameScheduler, ManualScheduler, Scheduler, TickHandle};
pub use selection::{DEFAULT_ALL_LABEL, EVENT_CHANGE, Item, SelectionController};
pub use timed_loop::{ConfigError, TimedLoop, TimedLoopConfig, transition};
