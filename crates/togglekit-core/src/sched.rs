#![forbid(unsafe_code)]

//! Frame scheduling abstraction.
//!
//! The timed loop never talks to a clock or timer directly. It is handed a
//! [`Scheduler`], which plays the role of the animation-frame API: queue a
//! callback for the next frame, cancel a queued callback, read the current
//! time. Everything in this crate runs on one logical thread; a scheduled
//! callback receives the scheduler again so it can queue its successor.
//!
//! Two implementations are provided:
//!
//! - [`ManualScheduler`] — deterministic test double with a virtual clock.
//!   Frames run only when the caller asks for them.
//! - [`FrameScheduler`] — real-time pump that sleeps a fixed interval
//!   between frames (default 16 ms, roughly one display frame).
//!
//! # Invariants
//!
//! 1. Callbacks queued during a frame run in the *next* frame, never the
//!    current one (the frame batch is snapshotted before dispatch).
//! 2. A cancelled handle never fires, even when the cancellation happens
//!    mid-frame from another callback in the same batch.
//! 3. `now()` is monotonically non-decreasing.

use std::collections::HashSet;
use std::mem;
use std::thread;
use std::time::{Duration, Instant};

/// Callback queued for the next frame.
///
/// The callback is handed the scheduler so it can queue follow-up work.
pub type TickCallback = Box<dyn FnOnce(&mut dyn Scheduler)>;

/// Identifies one queued callback so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Frame-paced callback scheduler.
///
/// Object-safe so callbacks can be given `&mut dyn Scheduler` re-entrantly.
pub trait Scheduler {
    /// Queue `cb` to run on the next frame. Returns a handle for [`cancel`].
    ///
    /// [`cancel`]: Scheduler::cancel
    fn schedule(&mut self, cb: TickCallback) -> TickHandle;

    /// Cancel a queued callback. Cancelling a handle that already fired
    /// (or never existed) is a no-op.
    fn cancel(&mut self, handle: TickHandle);

    /// Current time according to this scheduler's clock.
    fn now(&self) -> Instant;
}

/// Shared queue bookkeeping for both scheduler implementations.
#[derive(Default)]
struct FrameQueue {
    queue: Vec<(TickHandle, TickCallback)>,
    /// Handles cancelled after being drained into the current frame batch.
    cancelled: HashSet<TickHandle>,
    next_id: u64,
}

impl FrameQueue {
    fn schedule(&mut self, cb: TickCallback) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.queue.push((handle, cb));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(pos) = self.queue.iter().position(|(h, _)| *h == handle) {
            self.queue.remove(pos);
        } else {
            // Possibly drained into an in-flight frame batch; remember it.
            self.cancelled.insert(handle);
        }
    }

    fn take_batch(&mut self) -> Vec<(TickHandle, TickCallback)> {
        mem::take(&mut self.queue)
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// Deterministic scheduler for tests: frames and time advance only on demand.
///
/// ```
/// use std::time::Duration;
/// use togglekit_core::sched::{ManualScheduler, Scheduler};
///
/// let mut sched = ManualScheduler::new();
/// sched.schedule(Box::new(|_| {}));
/// assert_eq!(sched.pending(), 1);
/// sched.advance(Duration::from_millis(16));
/// sched.run_frame();
/// assert_eq!(sched.pending(), 0);
/// ```
pub struct ManualScheduler {
    frames: FrameQueue,
    origin: Instant,
    elapsed: Duration,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Create a scheduler with an empty queue and a virtual clock at zero.
    pub fn new() -> Self {
        Self {
            frames: FrameQueue::default(),
            origin: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the virtual clock by `dt` without running anything.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Run every callback queued at the start of this frame.
    ///
    /// Callbacks queued while the frame runs wait for the next frame.
    /// Returns the number of callbacks that ran.
    pub fn run_frame(&mut self) -> usize {
        let batch = self.frames.take_batch();
        let mut ran = 0;
        for (handle, cb) in batch {
            if self.frames.cancelled.remove(&handle) {
                continue;
            }
            cb(self);
            ran += 1;
        }
        // Any surviving entries targeted callbacks that already ran.
        self.frames.cancelled.clear();
        ran
    }

    /// Advance the clock by `dt`, then run one frame.
    pub fn step(&mut self, dt: Duration) -> usize {
        self.advance(dt);
        self.run_frame()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.frames.queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, cb: TickCallback) -> TickHandle {
        self.frames.schedule(cb)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.frames.cancel(handle);
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}

// ---------------------------------------------------------------------------
// FrameScheduler
// ---------------------------------------------------------------------------

/// Default frame interval for [`FrameScheduler`] (~60 frames per second).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Real-time scheduler that sleeps a fixed interval between frames.
///
/// Stands in for the browser animation-frame API in environments without
/// one. [`run_until_idle`](Self::run_until_idle) pumps frames on the
/// calling thread until the queue drains.
pub struct FrameScheduler {
    frames: FrameQueue,
    interval: Duration,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Create a scheduler with the default frame interval.
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_FRAME_INTERVAL)
    }

    /// Create a scheduler with a custom frame interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frames: FrameQueue::default(),
            interval,
        }
    }

    /// Frame interval in use.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.frames.queue.len()
    }

    /// Pump frames until no callbacks remain queued.
    ///
    /// Each frame sleeps the configured interval and then dispatches the
    /// callbacks queued at frame start. Returns the number of frames run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while !self.frames.queue.is_empty() {
            thread::sleep(self.interval);
            let batch = self.frames.take_batch();
            for (handle, cb) in batch {
                if self.frames.cancelled.remove(&handle) {
                    continue;
                }
                cb(self);
            }
            self.frames.cancelled.clear();
            frames += 1;
        }
        frames
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&mut self, cb: TickCallback) -> TickHandle {
        self.frames.schedule(cb)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.frames.cancel(handle);
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
