#![forbid(unsafe_code)]

//! Property tests for provider nesting.
//!
//! For any stack of providers over two channels, a leaf consumer resolves the
//! innermost value of each channel, and a guarded consumer fails exactly when
//! its channel never appears on the path.

use std::rc::Rc;

use ctxtree_core::{Scope, View};
use ctxtree_runtime::{ConsumerGuard, ContextChannel, Slot};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

/// Provider path from the root down: `(channel index, value)`.
fn path_strategy() -> impl Strategy<Value = Vec<(usize, u32)>> {
    proptest::collection::vec((0usize..2, 0u32..1_000), 0..24)
}

fn show(slot: Slot<u32>) -> String {
    slot.into_value().map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn wrap(channels: &[ContextChannel<u32>; 2], path: &[(usize, u32)], leaf: View) -> View {
    path.iter().rev().fold(leaf, |inner, &(ch, value)| {
        channels[ch].provider().render(Rc::new(value), inner)
    })
}

proptest! {
    #[test]
    fn innermost_provider_wins(path in path_strategy()) {
        let channels = [ContextChannel::<u32>::new("A"), ContextChannel::<u32>::new("B")];
        let (a, b) = (channels[0].consumer(), channels[1].consumer());
        let leaf = a.render(move |sa| {
            Ok(View::fragment([
                View::text(format!("{}|", show(sa))),
                b.render(|sb| Ok(View::text(show(sb)))),
            ]))
        });

        let expected = |ch: usize| {
            path.iter()
                .rev()
                .find(|(c, _)| *c == ch)
                .map_or_else(|| "-".to_string(), |(_, v)| v.to_string())
        };

        let mut scope = Scope::new();
        let node = scope.evaluate(&wrap(&channels, &path, leaf)).unwrap();
        prop_assert_eq!(node.text_content(), format!("{}|{}", expected(0), expected(1)));
        prop_assert_eq!(scope.depth(), 0);
        prop_assert_eq!(scope.max_depth(), path.len());
    }

    #[test]
    fn guard_fails_iff_channel_absent(path in path_strategy()) {
        let channels = [ContextChannel::<u32>::new("A"), ContextChannel::<u32>::new("B")];
        let guard = ConsumerGuard::new(channels[1].consumer(), "B.Consumer", "B");
        let leaf = guard.render(|v| View::text(v.to_string()));

        let result = Scope::new().evaluate(&wrap(&channels, &path, leaf));
        let has_b = path.iter().any(|(c, _)| *c == 1);
        prop_assert_eq!(result.is_ok(), has_b);
        if let Err(err) = result {
            prop_assert_eq!(err.provider(), "B");
        }
    }
}
