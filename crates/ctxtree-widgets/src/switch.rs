#![forbid(unsafe_code)]

//! Switch widget.
//!
//! Presentational only: shows `on` and forwards clicks to the supplied
//! action. It holds no state of its own.

use ctxtree_core::{Callback, Element, View};

/// An on/off control.
#[derive(Debug, Clone)]
pub struct Switch {
    on: bool,
    on_click: Callback,
}

impl Switch {
    #[must_use]
    pub fn new(on: bool, on_click: Callback) -> Self {
        Self { on, on_click }
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// Render as a `<switch>` element carrying the click action.
    #[must_use]
    pub fn view(&self) -> View {
        Element::new("switch")
            .attr("on", self.on.to_string())
            .attr("aria-pressed", self.on.to_string())
            .on_click(self.on_click.clone())
            .into()
    }
}

impl From<Switch> for View {
    fn from(switch: Switch) -> Self {
        switch.view()
    }
}
