#![forbid(unsafe_code)]

//! Runtime for ctxtree: context channels, provider state, validated
//! consumers, and the render host.
//!
//! # Layers
//!
//! - [`context`]: `ContextChannel` with its `Provider`/`Consumer` pair.
//! - [`store`]: the toggle state machine that providers broadcast.
//! - [`guard`]: consumers that refuse to render outside their provider.
//! - [`compound`]: exposing the checked consumer through its component.
//! - [`children`]: static vs render-function provider children.
//! - [`root`]: evaluation passes and dirty tracking.
//! - [`reactive`]: `Observable`/`Computed` backing the store.

pub mod children;
pub mod compound;
pub mod context;
pub mod guard;
pub mod reactive;
pub mod root;
pub mod store;

pub use children::{Children, MemoChildren};
pub use compound::Compound;
pub use context::{Consumer, ConsumerView, ContextChannel, Provider, Slot};
pub use guard::ConsumerGuard;
pub use reactive::{Computed, Observable, Subscription};
pub use root::Root;
pub use store::{ToggleStateStore, ToggleValue};
