#![forbid(unsafe_code)]

//! Memoized values derived from [`Observable`] dependencies.
//!
//! # Design
//!
//! [`Computed<T>`] holds a derive function over one [`Observable`] and its
//! last result in shared, reference-counted storage. A dependency change only
//! marks the cache dirty; the next [`get()`](Computed::get) re-derives. Until then every `get()`
//! hands back a clone of the *same* cached `T`, so with `T = Rc<_>` callers
//! observe reference-equal results between changes.
//!
//! # Invariants
//!
//! 1. `get()` never returns a value older than the last committed change of
//!    any dependency.
//! 2. The derive function runs at most once per dependency change.
//! 3. `version` increments by exactly 1 per re-derivation.
//!
//! # Failure Modes
//!
//! - **Derive function panics**: the cache is left empty, so the next `get()`
//!   retries.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::observable::{Observable, Subscription};

struct ComputedInner<T> {
    derive: Box<dyn Fn() -> T>,
    cached: Option<T>,
    dirty: Cell<bool>,
    version: u64,
    /// Keeps the dependency callback alive; never read.
    _subscription: Subscription,
}

/// A lazily derived, memoized value.
///
/// Cloning a `Computed` creates a new handle to the **same** cache.
pub struct Computed<T> {
    inner: Rc<RefCell<ComputedInner<T>>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Computed")
            .field("cached", &inner.cached)
            .field("dirty", &inner.dirty.get())
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// Derive from a single observable.
    pub fn from_observable<S: Clone + PartialEq + 'static>(
        source: &Observable<S>,
        map: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let src = source.clone();
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<ComputedInner<T>>>| {
            let weak = weak.clone();
            let subscription = source.subscribe(move |_| {
                if let Some(strong) = weak.upgrade() {
                    strong.borrow().dirty.set(true);
                }
            });
            RefCell::new(ComputedInner {
                derive: Box::new(move || src.with(&map)),
                cached: None,
                dirty: Cell::new(true),
                version: 0,
                _subscription: subscription,
            })
        });
        Self { inner }
    }

    /// Current value, re-deriving first if a dependency changed.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` re-enters this same `Computed`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if inner.dirty.replace(false) {
            inner.cached = None;
        }
        let derive = &inner.derive;
        let version = &mut inner.version;
        let value = inner.cached.get_or_insert_with(|| {
            *version += 1;
            derive()
        });
        f(value)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.borrow().dirty.get()
    }

    /// Number of derivations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }
}
