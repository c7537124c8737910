#![forbid(unsafe_code)]

//! Context channels: a Provider/Consumer pair sharing one slot.
//!
//! A [`ContextChannel<T>`] is created once and names a slot that is unset by
//! default. [`Provider::render`] broadcasts a value to every consumer nested
//! in its children for the duration of one evaluation pass; a [`Consumer`]
//! resolves the nearest broadcast, or [`Slot::Unset`] when no provider
//! encloses it.
//!
//! # Re-render minimization
//!
//! A consumer instance ([`ConsumerView`]) remembers the value reference it
//! last rendered with. While the provider keeps broadcasting the *same* `Rc`,
//! the render function is skipped and the previous view is reused; only a new
//! reference triggers downstream work.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use ctxtree_core::{Scope, View};
//! use ctxtree_runtime::context::{ContextChannel, Slot};
//!
//! let (provider, consumer) = ContextChannel::<u32>::create("Count");
//! let leaf = consumer.render(|slot| {
//!     Ok(match slot {
//!         Slot::Set(n) => View::text(format!("count={n}")),
//!         Slot::Unset => View::text("no count"),
//!     })
//! });
//!
//! let mut scope = Scope::new();
//! let inside = scope.evaluate(&provider.render(Rc::new(3), leaf.clone())).unwrap();
//! assert_eq!(inside.text_content(), "count=3");
//! assert_eq!(scope.evaluate(&leaf).unwrap().text_content(), "no count");
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use ctxtree_core::{Attributes, ChannelId, Component, Provide, Result, Scope, View};

// ─── Slot ────────────────────────────────────────────────────────────────────

/// What a consumer resolves to: the nearest broadcast value, or the unset
/// sentinel when no provider is active.
pub enum Slot<T> {
    Unset,
    Set(Rc<T>),
}

impl<T> Slot<T> {
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Rc<T>> {
        match self {
            Self::Set(v) => Some(v),
            Self::Unset => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<Rc<T>> {
        match self {
            Self::Set(v) => Some(v),
            Self::Unset => None,
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Set(v) => Self::Set(Rc::clone(v)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Set(v) => f.debug_tuple("Set").field(v).finish(),
        }
    }
}

// ─── ContextChannel ──────────────────────────────────────────────────────────

/// A create-once context channel.
///
/// Holds no value itself; values live in provider frames on the evaluation
/// [`Scope`]. `ContextChannel` is `Send + Sync` so it can sit in a `static`.
pub struct ContextChannel<T> {
    id: ChannelId,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for ContextChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextChannel")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<T: 'static> ContextChannel<T> {
    /// Allocate a new channel. `name` labels the provider's rendered output.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            id: ChannelId::next(),
            name,
            _marker: PhantomData,
        }
    }

    /// Allocate a channel and return its Provider/Consumer pair.
    #[must_use]
    pub fn create(name: &'static str) -> (Provider<T>, Consumer<T>) {
        let channel = Self::new(name);
        (channel.provider(), channel.consumer())
    }

    #[must_use]
    pub fn provider(&self) -> Provider<T> {
        Provider {
            id: self.id,
            name: self.name,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn consumer(&self) -> Consumer<T> {
        Consumer {
            id: self.id,
            name: self.name,
            _marker: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Broadcasting side of a channel.
pub struct Provider<T> {
    id: ChannelId,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Provider<T> {}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<T: 'static> Provider<T> {
    /// Make `value` visible to every consumer nested in `children`.
    #[must_use]
    pub fn render(&self, value: Rc<T>, children: impl Into<View>) -> View {
        self.render_with(value, Attributes::new(), children)
    }

    /// Like [`render`](Self::render), forwarding `attrs` verbatim onto the
    /// provider's rendered element.
    #[must_use]
    pub fn render_with(&self, value: Rc<T>, attrs: Attributes, children: impl Into<View>) -> View {
        let value: Rc<dyn Any> = value;
        View::Provide(Provide {
            channel: self.id,
            label: self.name,
            value,
            attrs,
            children: Box::new(children.into()),
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

// ─── Consumer ────────────────────────────────────────────────────────────────

/// Subscribing side of a channel. Resolves without validation; see
/// [`ConsumerGuard`](crate::guard::ConsumerGuard) for the checked form.
pub struct Consumer<T> {
    id: ChannelId,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Consumer<T> {}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<T: 'static> Consumer<T> {
    /// Nearest broadcast value, or [`Slot::Unset`].
    #[must_use]
    pub fn resolve(&self, scope: &Scope) -> Slot<T> {
        match scope.lookup(self.id).map(|any| any.downcast::<T>()) {
            Some(Ok(value)) => Slot::Set(value),
            // Channel ids are never shared between value types.
            Some(Err(_)) | None => Slot::Unset,
        }
    }

    /// Build a consumer instance around `render`.
    #[must_use]
    pub fn view(&self, render: impl Fn(Slot<T>) -> Result<View> + 'static) -> ConsumerView<T> {
        ConsumerView {
            consumer: *self,
            render: Box::new(render),
            memo: RefCell::new(None),
            invocations: Cell::new(0),
        }
    }

    /// Build a consumer instance and wrap it as a view.
    #[must_use]
    pub fn render(&self, render: impl Fn(Slot<T>) -> Result<View> + 'static) -> View {
        View::component(Rc::new(self.view(render)))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

// ─── ConsumerView ────────────────────────────────────────────────────────────

/// A mounted consumer: the render function plus its reference memo.
pub struct ConsumerView<T> {
    consumer: Consumer<T>,
    render: Box<dyn Fn(Slot<T>) -> Result<View>>,
    memo: RefCell<Option<(Rc<T>, View)>>,
    invocations: Cell<u64>,
}

impl<T> ConsumerView<T> {
    /// How many times the render function has run.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.get()
    }
}

impl<T> fmt::Debug for ConsumerView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerView")
            .field("consumer", &self.consumer)
            .field("memoized", &self.memo.borrow().is_some())
            .field("invocations", &self.invocations.get())
            .finish()
    }
}

impl<T: 'static> Component for ConsumerView<T> {
    fn render(&self, scope: &Scope) -> Result<View> {
        let slot = self.consumer.resolve(scope);
        match &slot {
            Slot::Set(value) => {
                if let Some((prev, view)) = self.memo.borrow().as_ref()
                    && Rc::ptr_eq(prev, value)
                {
                    tracing::trace!(channel = self.consumer.id.get(), "consumer.memo_hit");
                    return Ok(view.clone());
                }
            }
            Slot::Unset => {
                self.memo.borrow_mut().take();
            }
        }

        self.invocations.set(self.invocations.get() + 1);
        let view = (self.render)(slot.clone())?;
        if let Slot::Set(value) = slot {
            *self.memo.borrow_mut() = Some((value, view.clone()));
        }
        Ok(view)
    }

    fn name(&self) -> &'static str {
        self.consumer.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxtree_core::Element;

    fn describe(slot: Slot<String>) -> Result<View> {
        Ok(match slot {
            Slot::Set(s) => View::text(s.as_str()),
            Slot::Unset => View::text("<unset>"),
        })
    }

    #[test]
    fn unset_without_provider() {
        let (_, consumer) = ContextChannel::<String>::create("Name");
        let scope = Scope::new();
        assert!(!consumer.resolve(&scope).is_set());
    }

    #[test]
    fn nearest_provider_wins() {
        let (provider, consumer) = ContextChannel::<String>::create("Name");
        let leaf = consumer.render(describe);
        let view = provider.render(
            Rc::new("outer".into()),
            Element::new("div")
                .child(leaf.clone())
                .child(provider.render(Rc::new("inner".into()), consumer.render(describe)))
                .child(leaf),
        );
        let node = Scope::new().evaluate(&view).unwrap();
        assert_eq!(node.text_content(), "outerinnerouter");
    }

    #[test]
    fn channels_are_independent() {
        let (p1, c1) = ContextChannel::<String>::create("A");
        let (_, c2) = ContextChannel::<String>::create("B");
        let view = p1.render(
            Rc::new("a".into()),
            View::fragment([c1.render(describe), c2.render(describe)]),
        );
        let node = Scope::new().evaluate(&view).unwrap();
        assert_eq!(node.text_content(), "a<unset>");
    }

    #[test]
    fn provider_forwards_attributes() {
        let (provider, _) = ContextChannel::<u8>::create("Theme");
        let view = provider.render_with(
            Rc::new(1),
            Attributes::new().with("data-testid", "theme-root"),
            "body",
        );
        let node = Scope::new().evaluate(&view).unwrap();
        let el = node.find("Theme").unwrap();
        assert_eq!(el.attr("data-testid"), Some("theme-root"));
        assert_eq!(el.text_content(), "body");
    }

    #[test]
    fn memo_skips_render_while_reference_is_stable() {
        let (provider, consumer) = ContextChannel::<String>::create("Name");
        let leaf = Rc::new(consumer.view(describe));
        let shared = Rc::new(String::from("same"));

        let mut scope = Scope::new();
        for _ in 0..3 {
            let view = provider.render(Rc::clone(&shared), View::component(Rc::clone(&leaf)));
            assert_eq!(scope.evaluate(&view).unwrap().text_content(), "same");
        }
        assert_eq!(leaf.invocations(), 1);

        // Equal contents, new reference: downstream work is redone.
        let view = provider.render(Rc::new("same".into()), View::component(Rc::clone(&leaf)));
        scope.evaluate(&view).unwrap();
        assert_eq!(leaf.invocations(), 2);
    }

    #[test]
    fn unset_is_never_memoized() {
        let (_, consumer) = ContextChannel::<String>::create("Name");
        let leaf = Rc::new(consumer.view(describe));
        let view = View::component(Rc::clone(&leaf));
        let mut scope = Scope::new();
        scope.evaluate(&view).unwrap();
        scope.evaluate(&view).unwrap();
        assert_eq!(leaf.invocations(), 2);
    }

    #[test]
    fn channel_is_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<ContextChannel<Rc<String>>>();
    }
}
