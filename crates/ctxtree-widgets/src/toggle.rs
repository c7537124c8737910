#![forbid(unsafe_code)]

//! Toggle provider.
//!
//! [`Toggle`] owns a [`ToggleStateStore`] and broadcasts its
//! [`ToggleValue`] to everything rendered inside it. Descendants at any depth
//! read the value with [`Toggle::consumer`](Compound::consumer) instead of
//! having `on`/`toggle` threaded through every intermediate component.
//!
//! ```
//! use ctxtree_core::View;
//! use ctxtree_runtime::{Compound, Root};
//! use ctxtree_widgets::{Switch, Toggle, ToggleConfig};
//!
//! let leaf = Toggle::consumer(|v| Switch::new(v.on(), v.toggle().clone()).view());
//! let toggle = Toggle::new(ToggleConfig::default().on_toggle(|_| {}), leaf);
//! let root = Root::new(toggle.view());
//!
//! let frame = root.render().unwrap();
//! assert_eq!(frame.find("switch").unwrap().attr("on"), Some("false"));
//! frame.click("switch");
//! assert_eq!(root.render().unwrap().find("switch").unwrap().attr("on"), Some("true"));
//! ```

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use ctxtree_core::{Attributes, Component, Result, Scope, View};
use ctxtree_runtime::{Children, Compound, ContextChannel, MemoChildren, ToggleStateStore, ToggleValue};

static TOGGLE_CONTEXT: LazyLock<ContextChannel<ToggleValue>> =
    LazyLock::new(|| ContextChannel::new("Toggle"));

/// Default `on_toggle`: a diagnostic log line.
fn log_on_toggle(on: bool) {
    tracing::info!(on, "onToggle");
}

/// Toggle construction options.
pub struct ToggleConfig {
    initial_on: bool,
    on_toggle: Box<dyn Fn(bool)>,
    attrs: Attributes,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            initial_on: false,
            on_toggle: Box::new(log_on_toggle),
            attrs: Attributes::new(),
        }
    }
}

impl fmt::Debug for ToggleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleConfig")
            .field("initial_on", &self.initial_on)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

impl ToggleConfig {
    /// Called with the new state after every committed flip.
    #[must_use]
    pub fn on_toggle(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_toggle = Box::new(f);
        self
    }

    /// Starting state (default `false`).
    #[must_use]
    pub fn initial_on(mut self, on: bool) -> Self {
        self.initial_on = on;
        self
    }

    /// Extra attribute forwarded verbatim onto the provider's output.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key, value);
        self
    }

    /// Replace all pass-through attributes.
    #[must_use]
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

/// Stateful provider broadcasting `{on, toggle}`.
///
/// Construct once and keep the `Rc`: the instance owns the state, and every
/// re-render of the same instance reuses it.
pub struct Toggle {
    store: ToggleStateStore,
    children: MemoChildren<ToggleValue>,
    attrs: Attributes,
}

impl fmt::Debug for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggle")
            .field("store", &self.store)
            .field("children", &self.children)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl Toggle {
    /// `children` is either a static view or `Children::dynamic(|value| ..)`.
    #[must_use]
    pub fn new(config: ToggleConfig, children: impl Into<Children<ToggleValue>>) -> Rc<Self> {
        let ToggleConfig {
            initial_on,
            on_toggle,
            attrs,
        } = config;
        Rc::new(Self {
            store: ToggleStateStore::new(initial_on, on_toggle),
            children: MemoChildren::new(children.into()),
            attrs,
        })
    }

    /// This instance as a view.
    #[must_use]
    pub fn view(self: &Rc<Self>) -> View {
        View::component(Rc::clone(self))
    }

    #[must_use]
    pub fn store(&self) -> &ToggleStateStore {
        &self.store
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.store.is_on()
    }

    /// Flip the state, as a consumer's `toggle` would.
    pub fn toggle(&self) {
        self.store.toggle();
    }

    /// How many times render-function children have been invoked.
    #[must_use]
    pub fn children_invocations(&self) -> u64 {
        self.children.invocations()
    }
}

impl Component for Toggle {
    fn render(&self, _scope: &Scope) -> Result<View> {
        let value = self.store.value();
        let ui = self.children.resolve(&value);
        tracing::trace!(on = value.on(), "toggle.render");
        Ok(Self::channel()
            .provider()
            .render_with(value, self.attrs.clone(), ui))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

impl Compound for Toggle {
    type Value = ToggleValue;
    const NAME: &'static str = "Toggle";
    const CONSUMER_NAME: &'static str = "Toggle.Consumer";

    fn channel() -> &'static ContextChannel<ToggleValue> {
        &TOGGLE_CONTEXT
    }
}
