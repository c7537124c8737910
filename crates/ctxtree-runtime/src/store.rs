#![forbid(unsafe_code)]

//! Boolean provider state with a stable toggle action.
//!
//! # Design
//!
//! [`ToggleStateStore`] owns an [`Observable<bool>`] and a
//! [`Computed<Rc<ToggleValue>>`] derived from it. The exposed value object is
//! rebuilt only when `on` changes; between changes every
//! [`value()`](ToggleStateStore::value) call returns the same `Rc`. The
//! `toggle` action inside it is created once per store and is identical
//! across every value the store ever exposes.
//!
//! # Ordering
//!
//! Toggle requests go through a FIFO drain. Each request flips the
//! *committed* state (never a captured snapshot), commits it, notifies
//! subscribers, then calls `on_toggle` with the new value. A request issued
//! while another is being applied (for instance from inside `on_toggle`) is
//! queued and applied afterwards, so no flip is lost and every committed
//! flip produces exactly one callback.
//!
//! # Teardown
//!
//! The action holds a weak reference to the store. Once the store is
//! dropped, invoking a leftover action is a logged no-op.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use ctxtree_core::Callback;

use crate::reactive::{Computed, Observable, Subscription};

/// The broadcast value: current state plus the action that flips it.
#[derive(Debug, Clone)]
pub struct ToggleValue {
    on: bool,
    toggle: Callback,
}

impl ToggleValue {
    #[inline]
    #[must_use]
    pub fn on(&self) -> bool {
        self.on
    }

    /// The flip action; identical for every value of one store.
    #[inline]
    #[must_use]
    pub fn toggle(&self) -> &Callback {
        &self.toggle
    }

    /// Request a flip.
    pub fn flip(&self) {
        self.toggle.call();
    }
}

struct StoreInner {
    on: Observable<bool>,
    value: Computed<Rc<ToggleValue>>,
    action: Callback,
    on_toggle: Box<dyn Fn(bool)>,
    pending: Cell<u32>,
    draining: Cell<bool>,
    transitions: Cell<u64>,
}

/// Resets the drain flag on every exit path, dropping queued requests if a
/// callback unwinds.
struct DrainGuard<'a> {
    inner: &'a StoreInner,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.inner.draining.set(false);
        self.inner.pending.set(0);
    }
}

impl StoreInner {
    fn request_toggle(&self) {
        self.pending.set(self.pending.get() + 1);
        if self.draining.get() {
            tracing::debug!(pending = self.pending.get(), "toggle.queued");
            return;
        }

        self.draining.set(true);
        let _drain = DrainGuard { inner: self };
        while self.pending.get() > 0 {
            self.pending.set(self.pending.get() - 1);
            self.on.update(|on| *on = !*on);
            let on = self.on.get();
            let transition = self.transitions.get() + 1;
            self.transitions.set(transition);
            tracing::debug!(on, transition, "toggle.transition");
            (self.on_toggle)(on);
        }
    }
}

/// Provider-side boolean state machine.
///
/// Cloning a store creates a new handle to the **same** state.
#[derive(Clone)]
pub struct ToggleStateStore {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for ToggleStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleStateStore")
            .field("on", &self.inner.on.get())
            .field("transitions", &self.inner.transitions.get())
            .field("pending", &self.inner.pending.get())
            .finish()
    }
}

impl ToggleStateStore {
    /// Create a store; `on_toggle` runs once per committed flip with the new
    /// state.
    pub fn new(initial_on: bool, on_toggle: impl Fn(bool) + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<StoreInner>| {
            let weak = weak.clone();
            let action = Callback::new(move || match weak.upgrade() {
                Some(inner) => inner.request_toggle(),
                None => tracing::warn!("toggle.store_dropped"),
            });

            let on = Observable::new(initial_on);
            let toggle = action.clone();
            let value = Computed::from_observable(&on, move |on| {
                Rc::new(ToggleValue {
                    on: *on,
                    toggle: toggle.clone(),
                })
            });

            StoreInner {
                on,
                value,
                action,
                on_toggle: Box::new(on_toggle),
                pending: Cell::new(0),
                draining: Cell::new(false),
                transitions: Cell::new(0),
            }
        });
        Self { inner }
    }

    /// Current value object; the same `Rc` until `on` changes.
    #[must_use]
    pub fn value(&self) -> Rc<ToggleValue> {
        self.inner.value.get()
    }

    /// Committed state.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.inner.on.get()
    }

    /// Flip the committed state and fire `on_toggle`.
    pub fn toggle(&self) {
        self.inner.request_toggle();
    }

    /// The store's flip action.
    #[must_use]
    pub fn action(&self) -> Callback {
        self.inner.action.clone()
    }

    /// Number of committed flips.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.inner.transitions.get()
    }

    /// Number of times the exposed value object has been (re)built.
    #[must_use]
    pub fn value_version(&self) -> u64 {
        self.inner.value.version()
    }

    /// Observe committed state changes (before `on_toggle` runs).
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> Subscription {
        self.inner.on.subscribe(move |on| f(*on))
    }
}
