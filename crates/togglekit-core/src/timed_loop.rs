#![forbid(unsafe_code)]

//! Timed progress loop.
//!
//! [`TimedLoop`] drives a `step` callback with a progress fraction in
//! [0.0, 1.0] over a fixed wall-clock duration, then fires a `complete`
//! callback. Ticks are paced by an injected [`Scheduler`]; the loop never
//! owns a clock or a timer of its own.
//!
//! # Invariants
//!
//! 1. Within one run, `step` sees monotonically non-decreasing progress,
//!    ending with exactly one `step(1.0)`.
//! 2. `complete` fires exactly once per run, always after `step(1.0)`.
//! 3. `start` on a loop with a pending tick cancels that tick first; the
//!    stale chain never races the new one.
//! 4. A zero duration finishes on the first tick.
//!
//! # Failure Modes
//!
//! - A config without `step` or `complete` is a caller bug;
//!   [`TimedLoopConfig::build`] fails fast with [`ConfigError`] instead of
//!   silently animating nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::sched::{Scheduler, TickHandle};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Timed-loop configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No `step` callback was supplied.
    MissingStep,
    /// No `complete` callback was supplied.
    MissingComplete,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStep => write!(f, "timed loop config has no step callback"),
            Self::MissingComplete => write!(f, "timed loop config has no complete callback"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Builder for [`TimedLoop`].
///
/// `duration` defaults to zero (finish on the first tick); `step` and
/// `complete` are required.
#[derive(Default)]
pub struct TimedLoopConfig {
    duration: Duration,
    step: Option<Box<dyn FnMut(f64)>>,
    complete: Option<Box<dyn FnMut()>>,
}

impl TimedLoopConfig {
    /// Start an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total run duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the per-tick progress callback (required).
    #[must_use]
    pub fn step(mut self, step: impl FnMut(f64) + 'static) -> Self {
        self.step = Some(Box::new(step));
        self
    }

    /// Set the completion callback (required).
    #[must_use]
    pub fn complete(mut self, complete: impl FnMut() + 'static) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    /// Validate the config and produce a loop.
    pub fn build(self) -> Result<TimedLoop, ConfigError> {
        let step = self.step.ok_or(ConfigError::MissingStep)?;
        let complete = self.complete.ok_or(ConfigError::MissingComplete)?;
        Ok(TimedLoop {
            inner: Rc::new(Inner {
                duration: self.duration,
                step: RefCell::new(step),
                complete: RefCell::new(complete),
                state: RefCell::new(RunState::default()),
            }),
        })
    }
}

// ---------------------------------------------------------------------------
// TimedLoop
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RunState {
    started_at: Option<Instant>,
    pending: Option<TickHandle>,
    done: bool,
}

struct Inner {
    duration: Duration,
    step: RefCell<Box<dyn FnMut(f64)>>,
    complete: RefCell<Box<dyn FnMut()>>,
    state: RefCell<RunState>,
}

/// One-shot progress driver. Cheap to clone; clones share the same run.
///
/// ```
/// use std::time::Duration;
/// use togglekit_core::sched::ManualScheduler;
/// use togglekit_core::timed_loop::TimedLoopConfig;
///
/// let tl = TimedLoopConfig::new()
///     .duration(Duration::from_millis(32))
///     .step(|p| println!("{p:.2}"))
///     .complete(|| println!("done"))
///     .build()
///     .unwrap();
///
/// let mut sched = ManualScheduler::new();
/// tl.start(&mut sched);
/// while sched.pending() > 0 {
///     sched.step(Duration::from_millis(16));
/// }
/// ```
#[derive(Clone)]
pub struct TimedLoop {
    inner: Rc<Inner>,
}

impl TimedLoop {
    /// Begin (or restart) a run. Any pending tick from a previous run is
    /// cancelled before the new chain is scheduled.
    pub fn start(&self, sched: &mut dyn Scheduler) {
        self.reset(sched);
        {
            let mut state = self.inner.state.borrow_mut();
            state.started_at = Some(sched.now());
            state.done = false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(duration_ms = self.inner.duration.as_millis() as u64, "loop start");
        self.schedule_tick(sched);
    }

    /// Finalize the run early: cancel the pending tick, then run the same
    /// completion path a natural finish uses (`step(1.0)`, `complete`).
    pub fn stop(&self, sched: &mut dyn Scheduler) {
        self.reset(sched);
        self.finalize();
    }

    /// Whether a run is in flight (started and not yet completed).
    pub fn is_running(&self) -> bool {
        let state = self.inner.state.borrow();
        state.started_at.is_some() && !state.done
    }

    /// Total run duration.
    pub fn duration(&self) -> Duration {
        self.inner.duration
    }

    /// Cancel any pending tick without invoking callbacks.
    fn reset(&self, sched: &mut dyn Scheduler) {
        let pending = self.inner.state.borrow_mut().pending.take();
        if let Some(handle) = pending {
            sched.cancel(handle);
        }
    }

    fn schedule_tick(&self, sched: &mut dyn Scheduler) {
        let tl = self.clone();
        let handle = sched.schedule(Box::new(move |sched| tl.tick(sched)));
        self.inner.state.borrow_mut().pending = Some(handle);
    }

    fn tick(&self, sched: &mut dyn Scheduler) {
        let progress = {
            let mut state = self.inner.state.borrow_mut();
            state.pending = None;
            if state.done {
                return;
            }
            let Some(started_at) = state.started_at else {
                return;
            };
            let elapsed = sched.now().saturating_duration_since(started_at);
            if elapsed >= self.inner.duration {
                None
            } else {
                // duration > elapsed >= 0, so the divisor is nonzero.
                Some(elapsed.as_secs_f64() / self.inner.duration.as_secs_f64())
            }
        };
        match progress {
            Some(p) => {
                (self.inner.step.borrow_mut())(p.clamp(0.0, 1.0));
                self.schedule_tick(sched);
            }
            None => self.finalize(),
        }
    }

    /// Shared completion path. `step(1.0)` then `complete`, at most once
    /// per run.
    fn finalize(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.done {
                return;
            }
            state.done = true;
            state.started_at = None;
        }
        (self.inner.step.borrow_mut())(1.0);
        (self.inner.complete.borrow_mut())();
        #[cfg(feature = "tracing")]
        tracing::trace!("loop complete");
    }
}

/// Build a loop from `config` and start it immediately.
pub fn transition(
    sched: &mut dyn Scheduler,
    config: TimedLoopConfig,
) -> Result<TimedLoop, ConfigError> {
    let tl = config.build()?;
    tl.start(sched);
    Ok(tl)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_16: Duration = Duration::from_millis(16);

    /// Records every step value and completion for later inspection.
    #[derive(Default)]
    struct Trace {
        steps: RefCell<Vec<f64>>,
        completions: RefCell<usize>,
    }

    fn traced_loop(duration: Duration) -> (TimedLoop, Rc<Trace>) {
        let trace = Rc::new(Trace::default());
        let (t1, t2) = (trace.clone(), trace.clone());
        let tl = TimedLoopConfig::new()
            .duration(duration)
            .step(move |p| t1.steps.borrow_mut().push(p))
            .complete(move || *t2.completions.borrow_mut() += 1)
            .build()
            .unwrap();
        (tl, trace)
    }

    fn drain(sched: &mut ManualScheduler, dt: Duration) {
        let mut guard = 0;
        while sched.pending() > 0 {
            sched.step(dt);
            guard += 1;
            assert!(guard < 10_000, "loop never terminated");
        }
    }

    // ---- Build validation ----

    #[test]
    fn build_without_step_fails() {
        let err = TimedLoopConfig::new().complete(|| {}).build().err().unwrap();
        assert_eq!(err, ConfigError::MissingStep);
    }

    #[test]
    fn build_without_complete_fails() {
        let err = TimedLoopConfig::new().step(|_| {}).build().err().unwrap();
        assert_eq!(err, ConfigError::MissingComplete);
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::MissingStep.to_string(),
            "timed loop config has no step callback"
        );
    }

    // ---- Run semantics ----

    #[test]
    fn full_run_ends_with_one_step_one_and_one_complete() {
        let (tl, trace) = traced_loop(Duration::from_millis(100));
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        drain(&mut sched, MS_16);

        let steps = trace.steps.borrow();
        assert_eq!(steps.iter().filter(|p| **p == 1.0).count(), 1);
        assert_eq!(*steps.last().unwrap(), 1.0);
        assert_eq!(*trace.completions.borrow(), 1);
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let (tl, trace) = traced_loop(Duration::from_millis(200));
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        drain(&mut sched, Duration::from_millis(7));

        let steps = trace.steps.borrow();
        for pair in steps.windows(2) {
            assert!(pair[0] <= pair[1], "progress regressed: {pair:?}");
        }
        assert!(steps.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let (tl, trace) = traced_loop(Duration::ZERO);
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);

        sched.run_frame();
        assert_eq!(*trace.steps.borrow(), vec![1.0]);
        assert_eq!(*trace.completions.borrow(), 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn restart_cancels_stale_chain() {
        let (tl, trace) = traced_loop(Duration::from_millis(100));
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        sched.step(MS_16);
        // Restart mid-flight: the old pending tick must not fire.
        tl.start(&mut sched);
        assert_eq!(sched.pending(), 1);
        drain(&mut sched, MS_16);

        assert_eq!(*trace.completions.borrow(), 1);
        let steps = trace.steps.borrow();
        assert_eq!(steps.iter().filter(|p| **p == 1.0).count(), 1);
    }

    #[test]
    fn stop_finalizes_early_exactly_once() {
        let (tl, trace) = traced_loop(Duration::from_secs(10));
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        sched.step(MS_16);

        tl.stop(&mut sched);
        assert_eq!(*trace.completions.borrow(), 1);
        assert_eq!(*trace.steps.borrow().last().unwrap(), 1.0);
        assert_eq!(sched.pending(), 0);

        // A second stop must not re-fire the completion path.
        tl.stop(&mut sched);
        assert_eq!(*trace.completions.borrow(), 1);
    }

    #[test]
    fn complete_never_precedes_final_step() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (o1, o2) = (order.clone(), order.clone());
        let tl = TimedLoopConfig::new()
            .duration(Duration::from_millis(50))
            .step(move |p| o1.borrow_mut().push(format!("step {p:.1}")))
            .complete(move || o2.borrow_mut().push("complete".into()))
            .build()
            .unwrap();

        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        drain(&mut sched, MS_16);

        let order = order.borrow();
        let step_one = order.iter().position(|s| s == "step 1.0").unwrap();
        let complete = order.iter().position(|s| s == "complete").unwrap();
        assert!(step_one < complete);
        assert_eq!(complete, order.len() - 1);
    }

    #[test]
    fn loop_is_restartable_after_completion() {
        let (tl, trace) = traced_loop(Duration::from_millis(30));
        let mut sched = ManualScheduler::new();
        tl.start(&mut sched);
        drain(&mut sched, MS_16);
        assert_eq!(*trace.completions.borrow(), 1);

        tl.start(&mut sched);
        drain(&mut sched, MS_16);
        assert_eq!(*trace.completions.borrow(), 2);
    }

    #[test]
    fn is_running_tracks_lifecycle() {
        let (tl, _trace) = traced_loop(Duration::from_millis(100));
        let mut sched = ManualScheduler::new();
        assert!(!tl.is_running());
        tl.start(&mut sched);
        assert!(tl.is_running());
        drain(&mut sched, MS_16);
        assert!(!tl.is_running());
    }

    #[test]
    fn transition_builds_and_starts() {
        let mut sched = ManualScheduler::new();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let tl = transition(
            &mut sched,
            TimedLoopConfig::new()
                .duration(Duration::from_millis(16))
                .step(|_| {})
                .complete(move || *h.borrow_mut() += 1),
        )
        .unwrap();
        assert!(tl.is_running());
        drain(&mut sched, MS_16);
        assert_eq!(*hits.borrow(), 1);
    }

    // ---- Property tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_duration_yields_monotonic_run(
                duration_ms in 0u64..500,
                frame_ms in 1u64..40,
            ) {
                let (tl, trace) = traced_loop(Duration::from_millis(duration_ms));
                let mut sched = ManualScheduler::new();
                tl.start(&mut sched);
                let mut guard = 0;
                while sched.pending() > 0 {
                    sched.step(Duration::from_millis(frame_ms));
                    guard += 1;
                    prop_assert!(guard < 5_000);
                }

                let steps = trace.steps.borrow();
                prop_assert!(!steps.is_empty());
                for pair in steps.windows(2) {
                    prop_assert!(pair[0] <= pair[1]);
                }
                prop_assert_eq!(*steps.last().unwrap(), 1.0);
                prop_assert_eq!(steps.iter().filter(|p| **p == 1.0).count(), 1);
                prop_assert_eq!(*trace.completions.borrow(), 1);
            }

            #[test]
            fn restarts_never_double_complete(restarts in 1usize..5) {
                let (tl, trace) = traced_loop(Duration::from_millis(64));
                let mut sched = ManualScheduler::new();
                for _ in 0..restarts {
                    tl.start(&mut sched);
                    sched.step(MS_16);
                }
                let mut guard = 0;
                while sched.pending() > 0 {
                    sched.step(MS_16);
                    guard += 1;
                    prop_assert!(guard < 5_000);
                }
                prop_assert_eq!(*trace.completions.borrow(), 1);
            }
        }
    }
}
