#![forbid(unsafe_code)]

//! Provider components for ctxtree.
//!
//! - [`Toggle`]: owns boolean state and broadcasts `{on, toggle}` to every
//!   nested `Toggle::consumer(..)`.
//! - [`Switch`]: a presentational on/off control driven by a click action.

pub mod switch;
pub mod toggle;

pub use switch::Switch;
pub use toggle::{Toggle, ToggleConfig};
