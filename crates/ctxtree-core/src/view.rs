#![forbid(unsafe_code)]

//! View descriptions and evaluated nodes.
//!
//! A [`View`] is an unevaluated description of a subtree. Evaluating it
//! against a [`Scope`](crate::Scope) produces a [`Node`] tree: components are
//! rendered, provider frames are entered and left, and what remains is plain
//! text and elements.
//!
//! # Instances
//!
//! Components are held as `Rc<dyn Component>`. Building a component once and
//! re-evaluating the same view keeps its per-instance state (stores, memo
//! caches) alive across frames. Dropping the last handle tears the instance
//! down; there is no separate unmount step.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::scope::{ChannelId, Scope};

// ─── Callback ────────────────────────────────────────────────────────────────

/// A shared, zero-argument action.
///
/// Equality is reference identity: two callbacks are equal only if they are
/// clones of the same handle.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    #[must_use]
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the action.
    pub fn call(&self) {
        (self.0)();
    }

    /// Whether both handles point at the same action.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Ordered string attributes carried verbatim onto rendered elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every attribute of `other` over this set.
    pub fn extend(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ─── Component ───────────────────────────────────────────────────────────────

/// A renderable unit.
///
/// `render` may read provider values from `scope` but never mutates it; frames
/// are entered only by [`View::Provide`] during evaluation.
pub trait Component {
    fn render(&self, scope: &Scope) -> Result<View>;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// An element description.
#[derive(Clone, Debug, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub on_click: Option<Callback>,
    pub children: Vec<View>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key, value);
        self
    }

    #[must_use]
    pub fn on_click(mut self, callback: Callback) -> Self {
        self.on_click = Some(callback);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// A provider frame: `value` is visible to consumers of `channel` while
/// `children` are evaluated.
#[derive(Clone)]
pub struct Provide {
    pub channel: ChannelId,
    pub label: &'static str,
    pub value: Rc<dyn Any>,
    pub attrs: Attributes,
    pub children: Box<View>,
}

impl fmt::Debug for Provide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provide")
            .field("channel", &self.channel)
            .field("label", &self.label)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Unevaluated subtree.
#[derive(Clone, Default)]
pub enum View {
    #[default]
    Empty,
    Text(String),
    Fragment(Vec<View>),
    Element(Element),
    Component(Rc<dyn Component>),
    Provide(Provide),
}

impl View {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn fragment(children: impl IntoIterator<Item = View>) -> Self {
        Self::Fragment(children.into_iter().collect())
    }

    /// Wrap a component instance. The same instance may appear in many views.
    #[must_use]
    pub fn component<C: Component + 'static>(component: Rc<C>) -> Self {
        Self::Component(component)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            Self::Element(el) => f.debug_tuple("Element").field(el).finish(),
            Self::Component(c) => f.debug_tuple("Component").field(&c.name()).finish(),
            Self::Provide(p) => f.debug_tuple("Provide").field(p).finish(),
        }
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Element> for View {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<Vec<View>> for View {
    fn from(children: Vec<View>) -> Self {
        Self::Fragment(children)
    }
}

// ─── Node ────────────────────────────────────────────────────────────────────

/// An evaluated element.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementNode {
    pub tag: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Attributes::is_empty"))]
    pub attrs: Attributes,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_click: Option<Callback>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
}

/// Evaluated output of a [`View`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Node {
    Text(String),
    Element(ElementNode),
    Fragment(Vec<Node>),
}

impl Node {
    /// All text in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Self::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    fn children(&self) -> &[Node] {
        match self {
            Self::Text(_) => &[],
            Self::Element(el) => &el.children,
            Self::Fragment(children) => children,
        }
    }

    /// First element with `tag`, depth-first pre-order.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&ElementNode> {
        if let Self::Element(el) = self
            && el.tag == tag
        {
            return Some(el);
        }
        self.children().iter().find_map(|c| c.find(tag))
    }

    /// Every element with `tag`, depth-first pre-order.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<&ElementNode> {
        let mut out = Vec::new();
        self.collect_tag(tag, &mut out);
        out
    }

    fn collect_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a ElementNode>) {
        if let Self::Element(el) = self
            && el.tag == tag
        {
            out.push(el);
        }
        for c in self.children() {
            c.collect_tag(tag, out);
        }
    }

    /// Click the first element with `tag`. Returns whether a handler fired.
    pub fn click(&self, tag: &str) -> bool {
        self.find(tag).is_some_and(ElementNode::click)
    }
}

impl ElementNode {
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Invoke the click handler, if any.
    pub fn click(&self) -> bool {
        match &self.on_click {
            Some(cb) => {
                cb.call();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            c.collect_text(&mut out);
        }
        out
    }
}
