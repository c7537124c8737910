#![forbid(unsafe_code)]

//! Property-based invariant tests for toggle state and its broadcast value.
//!
//! 1. After n toggles from `off`, `on == (n % 2 == 1)`.
//! 2. Two toggles restore the starting state.
//! 3. `on_toggle` fires exactly once per toggle with the post-toggle state,
//!    and that state is already observable when it fires.
//! 4. With no toggle in between, two reads of the value are reference-equal;
//!    the `toggle` action is identical across every read.
//! 5. A consumer four levels deep always renders the committed state.

use std::cell::RefCell;
use std::rc::Rc;

use ctxtree::prelude::*;
use ctxtree::{ToggleStateStore, ToggleValue};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

/// Interleaving of toggles and reads: `true` = toggle, `false` = read.
fn op_strategy() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(proptest::bool::ANY, 0..64)
}

fn recording_store(initial_on: bool) -> (ToggleStateStore, Rc<RefCell<Vec<(bool, bool)>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let holder: Rc<RefCell<Option<ToggleStateStore>>> = Rc::new(RefCell::new(None));
    let c = Rc::clone(&calls);
    let h = Rc::clone(&holder);
    let store = ToggleStateStore::new(initial_on, move |on| {
        let observed = h.borrow().as_ref().map_or(!on, ToggleStateStore::is_on);
        c.borrow_mut().push((on, observed));
    });
    *holder.borrow_mut() = Some(store.clone());
    (store, calls)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Parity, idempotence, callback contract
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parity_after_n_toggles(n in 0usize..200) {
        let store = ToggleStateStore::new(false, |_| {});
        for _ in 0..n {
            store.toggle();
        }
        prop_assert_eq!(store.is_on(), n % 2 == 1);
        prop_assert_eq!(store.transitions(), n as u64);
    }

    #[test]
    fn double_toggle_is_identity(initial in proptest::bool::ANY, pairs in 0usize..20) {
        let store = ToggleStateStore::new(initial, |_| {});
        for _ in 0..pairs {
            store.toggle();
            store.toggle();
            prop_assert_eq!(store.is_on(), initial);
        }
    }

    #[test]
    fn one_callback_per_toggle_after_commit(n in 0usize..100) {
        let (store, calls) = recording_store(false);
        for _ in 0..n {
            store.toggle();
        }
        let calls = calls.borrow();
        prop_assert_eq!(calls.len(), n);
        for (i, (on, observed)) in calls.iter().enumerate() {
            // i-th toggle (0-based) lands on `true` when i is even.
            prop_assert_eq!(*on, i % 2 == 0);
            prop_assert_eq!(on, observed, "callback fired before commit");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reference stability
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn value_identity_follows_state_changes(ops in op_strategy()) {
        let store = ToggleStateStore::new(false, |_| {});
        let first = store.value();
        let mut last: Rc<ToggleValue> = Rc::clone(&first);
        let mut toggled_since_last_read = false;

        for toggle in ops {
            if toggle {
                store.toggle();
                toggled_since_last_read = true;
                continue;
            }
            let now = store.value();
            prop_assert_eq!(now.on(), store.is_on());
            prop_assert!(now.toggle().ptr_eq(first.toggle()));
            if toggled_since_last_read {
                prop_assert!(!Rc::ptr_eq(&now, &last));
            } else {
                prop_assert!(Rc::ptr_eq(&now, &last));
            }
            last = now;
            toggled_since_last_read = false;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Deep consumer observes the committed state
// ═════════════════════════════════════════════════════════════════════════

fn nest(depth: usize, leaf: View) -> View {
    (0..depth).fold(leaf, |inner, i| {
        Element::new("layer")
            .attr("depth", i.to_string())
            .child(inner)
            .into()
    })
}

proptest! {
    #[test]
    fn deep_consumer_tracks_state(depth in 0usize..12, clicks in 0usize..10) {
        let leaf = Toggle::consumer(|v| {
            View::fragment([
                View::text(if v.on() { "on" } else { "off" }),
                Switch::new(v.on(), v.toggle().clone()).view(),
            ])
        });
        let toggle = Toggle::new(ToggleConfig::default().on_toggle(|_| {}), nest(depth, leaf));
        let root = Root::new(toggle.view());

        for i in 0..clicks {
            let frame = root.render().unwrap();
            let expected = if i % 2 == 1 { "on" } else { "off" };
            prop_assert_eq!(frame.text_content(), expected);
            prop_assert!(frame.click("switch"));
        }
        let expected = if clicks % 2 == 1 { "on" } else { "off" };
        prop_assert_eq!(root.render().unwrap().text_content(), expected);
    }
}
