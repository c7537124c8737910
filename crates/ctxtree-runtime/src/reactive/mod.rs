#![forbid(unsafe_code)]

//! Change-tracking primitives backing provider state.
//!
//! - [`Observable`]: a shared, version-tracked value with subscriber
//!   callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Computed`]: a lazily derived, memoized value.
//!
//! Everything here is single-threaded (`Rc<RefCell<..>>`); evaluation and
//! mutation happen on one logical thread.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order, after the commit.
//! 3. Writing a value equal to the current one is a no-op.
//! 4. `Computed::get()` never returns a stale value, and returns the same
//!    cached value until a dependency changes.

pub mod computed;
pub mod observable;

pub use computed::Computed;
pub use observable::{Observable, Subscription};
