#![forbid(unsafe_code)]

//! Validated consumers.
//!
//! [`ConsumerGuard`] wraps a raw [`Consumer`] and fails fast with a
//! [`UsageError`] when no provider encloses it. On success the resolved value
//! reaches the caller's render function untouched and its output is returned
//! unmodified.

use std::fmt;
use std::rc::Rc;

use ctxtree_core::{Result, Scope, UsageError, View};

use crate::context::{Consumer, ConsumerView, Slot};

/// A consumer that must be evaluated inside its provider.
pub struct ConsumerGuard<T> {
    consumer: Consumer<T>,
    consumer_label: &'static str,
    provider_label: &'static str,
}

impl<T> Clone for ConsumerGuard<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ConsumerGuard<T> {}

impl<T> fmt::Debug for ConsumerGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerGuard")
            .field("consumer", &self.consumer_label)
            .field("provider", &self.provider_label)
            .finish()
    }
}

fn outside_provider(consumer: &'static str, provider: &'static str) -> UsageError {
    tracing::warn!(consumer, provider, "consumer.outside_provider");
    UsageError::new(consumer, provider)
}

impl<T: 'static> ConsumerGuard<T> {
    /// `consumer_label` and `provider_label` name both sides in the error.
    #[must_use]
    pub fn new(
        consumer: Consumer<T>,
        consumer_label: &'static str,
        provider_label: &'static str,
    ) -> Self {
        Self {
            consumer,
            consumer_label,
            provider_label,
        }
    }

    /// Resolve the enclosing value or fail.
    pub fn read(&self, scope: &Scope) -> Result<Rc<T>> {
        match self.consumer.resolve(scope) {
            Slot::Set(value) => Ok(value),
            Slot::Unset => Err(outside_provider(self.consumer_label, self.provider_label)),
        }
    }

    /// Build a checked consumer instance around `render`.
    #[must_use]
    pub fn view(&self, render: impl Fn(&Rc<T>) -> View + 'static) -> ConsumerView<T> {
        let (consumer, provider) = (self.consumer_label, self.provider_label);
        self.consumer.view(move |slot| match slot {
            Slot::Set(value) => Ok(render(&value)),
            Slot::Unset => Err(outside_provider(consumer, provider)),
        })
    }

    /// Build a checked consumer instance and wrap it as a view.
    #[must_use]
    pub fn render(&self, render: impl Fn(&Rc<T>) -> View + 'static) -> View {
        View::component(Rc::new(self.view(render)))
    }

    #[must_use]
    pub fn consumer(&self) -> Consumer<T> {
        self.consumer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextChannel;
    use tracing_test::traced_test;

    fn guard() -> (ContextChannel<u32>, ConsumerGuard<u32>) {
        let channel = ContextChannel::new("Counter");
        let guard = ConsumerGuard::new(channel.consumer(), "Counter.Consumer", "Counter");
        (channel, guard)
    }

    #[test]
    #[traced_test]
    fn fails_outside_provider() {
        let (_, guard) = guard();
        let err = Scope::new()
            .evaluate(&guard.render(|n| View::text(n.to_string())))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Counter.Consumer cannot be rendered outside the Counter component"
        );
        assert!(logs_contain("consumer.outside_provider"));
    }

    #[test]
    fn read_fails_outside_provider() {
        let (_, guard) = guard();
        let err = guard.read(&Scope::new()).unwrap_err();
        assert_eq!(err, UsageError::new("Counter.Consumer", "Counter"));
    }

    #[test]
    fn passes_value_through_unchanged() {
        let (channel, guard) = guard();
        let value = Rc::new(41);
        let seen = Rc::new(std::cell::RefCell::new(None));
        let s = Rc::clone(&seen);
        let leaf = guard.render(move |n| {
            *s.borrow_mut() = Some(Rc::clone(n));
            View::text(format!("n={n}"))
        });

        let node = Scope::new()
            .evaluate(&channel.provider().render(Rc::clone(&value), leaf))
            .unwrap();
        assert_eq!(node.text_content(), "n=41");
        let seen = seen.borrow();
        assert!(Rc::ptr_eq(seen.as_ref().unwrap(), &value));
    }

    #[test]
    fn read_inside_provider() {
        let (channel, guard) = guard();
        let mut scope = Scope::new();
        let frame = scope.enter(channel.id(), Rc::new(5u32));
        assert_eq!(*guard.read(&frame).unwrap(), 5);
    }
}
