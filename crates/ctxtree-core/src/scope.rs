#![forbid(unsafe_code)]

//! Scope-local provider stack.
//!
//! Every evaluation pass owns one [`Scope`]. A provider pushes its value when
//! evaluation enters its subtree and pops it when evaluation leaves; consumers
//! read the nearest frame for their channel. Broadcast is therefore
//! synchronous within a pass: whatever the provider committed before the pass
//! started is what every nested consumer sees.
//!
//! # Invariants
//!
//! 1. [`Scope::lookup`] returns the top-most frame for a channel (nearest
//!    enclosing provider wins).
//! 2. A [`ScopeGuard`] restores the stack to its depth at entry when dropped,
//!    on success, on `Err`, and during panic unwinding.
//! 3. Frames of unrelated channels never shadow each other.

use std::any::Any;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::view::{ElementNode, Node, View};

// Import tracing macros (no-op when tracing feature is disabled).
#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

// ─── Channel IDs ─────────────────────────────────────────────────────────────

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a context channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

// ─── Scope ───────────────────────────────────────────────────────────────────

struct Frame {
    channel: ChannelId,
    value: Rc<dyn Any>,
}

/// Provider stack for one evaluation pass.
#[derive(Default)]
pub struct Scope {
    frames: Vec<Frame>,
    max_depth: usize,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field(
                "frames",
                &self.frames.iter().map(|fr| fr.channel).collect::<Vec<_>>(),
            )
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active provider frames.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Deepest nesting reached during this pass.
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Nearest value broadcast on `channel`, if any provider is active.
    #[must_use]
    pub fn lookup(&self, channel: ChannelId) -> Option<Rc<dyn Any>> {
        self.frames
            .iter()
            .rev()
            .find(|fr| fr.channel == channel)
            .map(|fr| Rc::clone(&fr.value))
    }

    /// Push a frame; it is popped when the returned guard drops.
    pub fn enter(&mut self, channel: ChannelId, value: Rc<dyn Any>) -> ScopeGuard<'_> {
        let entry_depth = self.frames.len();
        self.frames.push(Frame { channel, value });
        self.max_depth = self.max_depth.max(self.frames.len());
        trace!(channel = channel.get(), depth = entry_depth + 1, "scope.enter");
        ScopeGuard {
            scope: self,
            entry_depth,
        }
    }

    /// Evaluate `view` depth-first into a node tree.
    ///
    /// The first error aborts the pass and is returned unmodified.
    pub fn evaluate(&mut self, view: &View) -> Result<Node> {
        match view {
            View::Empty => Ok(Node::Fragment(Vec::new())),
            View::Text(t) => Ok(Node::Text(t.clone())),
            View::Fragment(children) => Ok(Node::Fragment(self.evaluate_all(children)?)),
            View::Element(el) => Ok(Node::Element(ElementNode {
                tag: el.tag.clone(),
                attrs: el.attrs.clone(),
                on_click: el.on_click.clone(),
                children: self.evaluate_all(&el.children)?,
            })),
            View::Component(c) => {
                let rendered = c.render(self)?;
                self.evaluate(&rendered)
            }
            View::Provide(p) => {
                let mut inner = self.enter(p.channel, Rc::clone(&p.value));
                let child = inner.evaluate(&p.children)?;
                Ok(Node::Element(ElementNode {
                    tag: p.label.to_owned(),
                    attrs: p.attrs.clone(),
                    on_click: None,
                    children: vec![child],
                }))
            }
        }
    }

    fn evaluate_all(&mut self, views: &[View]) -> Result<Vec<Node>> {
        views.iter().map(|v| self.evaluate(v)).collect()
    }
}

// ─── ScopeGuard ──────────────────────────────────────────────────────────────

/// Active provider frame. Derefs to the [`Scope`] so nested evaluation
/// continues through it.
pub struct ScopeGuard<'a> {
    scope: &'a mut Scope,
    entry_depth: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        self.scope
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Scope {
        self.scope
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.scope.frames.truncate(self.entry_depth);
        trace!(depth = self.entry_depth, "scope.exit");
    }
}
