#![forbid(unsafe_code)]

//! Provider children: a static subtree or a render function of the live
//! value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use ctxtree_core::{Element, View};

/// What a provider renders inside its frame.
pub enum Children<T> {
    /// Rendered unchanged regardless of state.
    Static(View),
    /// Called with the live value to produce the subtree.
    Dynamic(Rc<dyn Fn(&Rc<T>) -> View>),
}

impl<T> Children<T> {
    /// Render-prop children.
    #[must_use]
    pub fn dynamic(render: impl Fn(&Rc<T>) -> View + 'static) -> Self {
        Self::Dynamic(Rc::new(render))
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    /// Produce the subtree for `value`.
    #[must_use]
    pub fn resolve(&self, value: &Rc<T>) -> View {
        match self {
            Self::Static(view) => view.clone(),
            Self::Dynamic(render) => render(value),
        }
    }
}

impl<T> Clone for Children<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(view) => Self::Static(view.clone()),
            Self::Dynamic(render) => Self::Dynamic(Rc::clone(render)),
        }
    }
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self::Static(View::Empty)
    }
}

impl<T> fmt::Debug for Children<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(view) => f.debug_tuple("Static").field(view).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl<T> From<View> for Children<T> {
    fn from(view: View) -> Self {
        Self::Static(view)
    }
}

impl<T> From<Element> for Children<T> {
    fn from(el: Element) -> Self {
        Self::Static(el.into())
    }
}

impl<T> From<&str> for Children<T> {
    fn from(text: &str) -> Self {
        Self::Static(text.into())
    }
}

/// Children plus a memo keyed on the value reference, so a render function
/// only re-runs when the provider broadcasts a new value.
pub struct MemoChildren<T> {
    children: Children<T>,
    memo: RefCell<Option<(Rc<T>, View)>>,
    invocations: Cell<u64>,
}

impl<T> MemoChildren<T> {
    #[must_use]
    pub fn new(children: Children<T>) -> Self {
        Self {
            children,
            memo: RefCell::new(None),
            invocations: Cell::new(0),
        }
    }

    /// Subtree for `value`; static children are returned as-is.
    pub fn resolve(&self, value: &Rc<T>) -> View {
        let render = match &self.children {
            Children::Static(view) => return view.clone(),
            Children::Dynamic(render) => render,
        };
        if let Some((prev, view)) = self.memo.borrow().as_ref()
            && Rc::ptr_eq(prev, value)
        {
            return view.clone();
        }
        self.invocations.set(self.invocations.get() + 1);
        let view = render(value);
        *self.memo.borrow_mut() = Some((Rc::clone(value), view.clone()));
        view
    }

    /// How many times a dynamic render function has run.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.get()
    }

    #[must_use]
    pub fn children(&self) -> &Children<T> {
        &self.children
    }
}

impl<T> fmt::Debug for MemoChildren<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoChildren")
            .field("children", &self.children)
            .field("invocations", &self.invocations.get())
            .finish()
    }
}
