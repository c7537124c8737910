#![forbid(unsafe_code)]

//! ctxtree public facade crate.
//!
//! Re-exports the provider/consumer runtime and the stock widgets. Most users
//! want `use ctxtree::prelude::*;`.

pub use ctxtree_core::logging;
pub use ctxtree_core::{
    Attributes, Callback, Component, Element, Node, Result, Scope, UsageError, View,
};
pub use ctxtree_runtime::{
    Children, Compound, ConsumerGuard, ConsumerView, ContextChannel, Root, Slot, ToggleStateStore,
    ToggleValue,
};
pub use ctxtree_widgets::{Switch, Toggle, ToggleConfig};

pub mod prelude {
    pub use ctxtree_core as core;
    pub use ctxtree_runtime as runtime;
    pub use ctxtree_widgets as widgets;

    pub use ctxtree_core::{Component, Element, Node, Scope, View};
    pub use ctxtree_runtime::{Children, Compound, Root};
    pub use ctxtree_widgets::{Switch, Toggle, ToggleConfig};
}
