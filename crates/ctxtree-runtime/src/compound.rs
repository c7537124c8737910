#![forbid(unsafe_code)]

//! Compound components: the checked consumer reached through the owning
//! component.
//!
//! Implementing [`Compound`] for a provider component makes
//! `MyProvider::consumer(..)` the way to read its state, so callers never
//! import the channel or the guard separately. Subscription and validation
//! behave exactly as with a hand-built [`ConsumerGuard`].

use std::rc::Rc;

use ctxtree_core::View;

use crate::context::{ConsumerView, ContextChannel};
use crate::guard::ConsumerGuard;

/// A provider component that exposes its consumer as a member.
pub trait Compound {
    /// The broadcast value.
    type Value: 'static;

    /// Provider label, used for the rendered element and in errors.
    const NAME: &'static str;

    /// Consumer label used in errors.
    const CONSUMER_NAME: &'static str;

    /// The component's create-once channel.
    fn channel() -> &'static ContextChannel<Self::Value>;

    /// Checked consumer bound to [`channel`](Self::channel).
    #[must_use]
    fn guard() -> ConsumerGuard<Self::Value> {
        ConsumerGuard::new(Self::channel().consumer(), Self::CONSUMER_NAME, Self::NAME)
    }

    /// A checked consumer instance, kept by callers that want to inspect it.
    #[must_use]
    fn consumer_view(render: impl Fn(&Rc<Self::Value>) -> View + 'static) -> ConsumerView<Self::Value> {
        Self::guard().view(render)
    }

    /// A checked consumer as a view.
    #[must_use]
    fn consumer(render: impl Fn(&Rc<Self::Value>) -> View + 'static) -> View {
        Self::guard().render(render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxtree_core::Scope;
    use std::sync::LazyLock;

    struct Greeting;

    static GREETING: LazyLock<ContextChannel<String>> = LazyLock::new(|| ContextChannel::new("Greeting"));

    impl Compound for Greeting {
        type Value = String;
        const NAME: &'static str = "Greeting";
        const CONSUMER_NAME: &'static str = "Greeting.Consumer";

        fn channel() -> &'static ContextChannel<String> {
            &GREETING
        }
    }

    #[test]
    fn consumer_is_reached_through_the_component() {
        let view = Greeting::channel()
            .provider()
            .render(Rc::new("hello".into()), Greeting::consumer(|s| View::text(s.as_str())));
        let node = Scope::new().evaluate(&view).unwrap();
        assert_eq!(node.text_content(), "hello");
    }

    #[test]
    fn member_consumer_is_still_guarded() {
        let err = Scope::new()
            .evaluate(&Greeting::consumer(|s| View::text(s.as_str())))
            .unwrap_err();
        assert_eq!(err.consumer(), "Greeting.Consumer");
        assert_eq!(err.provider(), "Greeting");
    }

    #[test]
    fn channel_is_created_once() {
        assert_eq!(Greeting::channel().id(), Greeting::channel().id());
    }
}
