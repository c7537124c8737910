#![forbid(unsafe_code)]

//! Render host: owns a root view and re-evaluates it on demand.
//!
//! Each [`Root::render`] runs one evaluation pass against a fresh
//! [`Scope`], so consumers always observe what providers have committed by
//! the time the pass starts. State changes only mark the root dirty (via
//! [`Root::invalidator`]); the host decides when to render again.

use std::cell::Cell;
use std::rc::Rc;

use ctxtree_core::{Callback, Node, Result, Scope, View};
use web_time::Instant;

#[derive(Debug)]
pub struct Root {
    view: View,
    frames: Cell<u64>,
    dirty: Rc<Cell<bool>>,
}

impl Root {
    #[must_use]
    pub fn new(view: impl Into<View>) -> Self {
        Self {
            view: view.into(),
            frames: Cell::new(0),
            dirty: Rc::new(Cell::new(true)),
        }
    }

    /// Evaluate the whole tree once.
    pub fn render(&self) -> Result<Node> {
        let frame = self.frames.get() + 1;
        self.frames.set(frame);
        self.dirty.set(false);

        let render_span = tracing::debug_span!(
            "ctxtree.render",
            frame,
            max_depth = tracing::field::Empty,
            render_duration_us = tracing::field::Empty
        );
        let _render_guard = render_span.enter();
        let start = Instant::now();

        let mut scope = Scope::new();
        let result = scope.evaluate(&self.view);

        render_span.record("max_depth", scope.max_depth() as u64);
        render_span.record(
            "render_duration_us",
            start.elapsed().as_micros().min(u64::MAX as u128) as u64,
        );
        if let Err(err) = &result {
            tracing::warn!(frame, error = %err, "render.failed");
        }
        result
    }

    /// Render only if something invalidated the root since the last pass.
    pub fn render_if_dirty(&self) -> Result<Option<Node>> {
        if !self.dirty.get() {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// An action that marks this root dirty; hand it to state subscribers.
    #[must_use]
    pub fn invalidator(&self) -> Callback {
        let dirty = Rc::clone(&self.dirty);
        Callback::new(move || dirty.set(true))
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }
}
