#![forbid(unsafe_code)]

//! Core: view descriptions, evaluated nodes, the provider scope stack, and
//! the composition error type.

pub mod error;
pub mod logging;
pub mod scope;
pub mod view;

pub use error::{Result, UsageError};
pub use scope::{ChannelId, Scope, ScopeGuard};
pub use view::{Attributes, Callback, Component, Element, ElementNode, Node, Provide, View};
