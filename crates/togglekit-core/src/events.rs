#![forbid(unsafe_code)]

//! Name-keyed publish/subscribe bus.
//!
//! [`EventBus`] maps event names to ordered listener lists and dispatches
//! synchronously on the calling thread. It is a cheap `Clone` handle over
//! shared registry state, so publishers and subscribers can hold their own
//! copies; composition, not inheritance, is the intended use — a component
//! that publishes notifications owns a bus and exposes it.
//!
//! # Invariants
//!
//! 1. Within one event name, dispatch order equals registration order.
//! 2. Emitting with zero listeners is a no-op.
//! 3. The listener list is snapshotted at emit time: a listener registered
//!    during dispatch is not invoked by that same dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Stable identifier for one registered listener.
pub type ListenerId = u64;

type Listener<P> = Rc<RefCell<dyn FnMut(Option<&P>)>>;

struct Registry<P> {
    listeners: HashMap<String, Vec<(ListenerId, Listener<P>)>>,
    next_id: ListenerId,
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
}

/// Synchronous publish/subscribe registry keyed by event name.
///
/// ```
/// use togglekit_core::events::EventBus;
///
/// let bus: EventBus<String> = EventBus::new();
/// bus.on("change", |payload| {
///     println!("changed: {payload:?}");
/// });
/// bus.emit("change", None);
/// ```
pub struct EventBus<P = ()> {
    inner: Rc<RefCell<Registry<P>>>,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EventBus<P> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Register `listener` for `name`. Chainable.
    pub fn on(&self, name: impl Into<String>, listener: impl FnMut(Option<&P>) + 'static) -> &Self {
        self.subscribe(name, listener);
        self
    }

    /// Register `listener` for `name`, returning an id usable with
    /// [`off`](Self::off).
    pub fn subscribe(
        &self,
        name: impl Into<String>,
        listener: impl FnMut(Option<&P>) + 'static,
    ) -> ListenerId {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let entry: Listener<P> = Rc::new(RefCell::new(listener));
        registry.listeners.entry(name.into()).or_default().push((id, entry));
        id
    }

    /// Remove the listener registered under `id` for `name`.
    ///
    /// Returns whether a listener was removed.
    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let Some(entries) = registry.listeners.get_mut(name) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every listener registered for `name`, in registration order.
    ///
    /// The listener list is snapshotted before the first invocation, so
    /// listeners added during dispatch wait for the next emit. Zero
    /// listeners is a no-op.
    pub fn emit(&self, name: &str, payload: Option<&P>) {
        let snapshot: Vec<Listener<P>> = {
            let registry = self.inner.borrow();
            match registry.listeners.get(name) {
                Some(entries) => entries.iter().map(|(_, l)| Rc::clone(l)).collect(),
                None => return,
            }
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(event = name, listeners = snapshot.len(), "dispatch");
        for listener in snapshot {
            (listener.borrow_mut())(payload);
        }
    }

    /// Number of listeners currently registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(name)
            .map_or(0, Vec::len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
