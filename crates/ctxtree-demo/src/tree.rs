#![forbid(unsafe_code)]

//! The walkthrough tree.
//!
//! Layer1 and Layer3 only pass their child through; neither sees `on` or
//! `toggle`. Layer2 and Layer4 read the Toggle directly.

use std::rc::Rc;

use ctxtree::prelude::*;

/// A component that renders its child unchanged.
struct Layer {
    name: &'static str,
    child: View,
}

impl Component for Layer {
    fn render(&self, _scope: &Scope) -> ctxtree::Result<View> {
        Ok(self.child.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

fn layer(name: &'static str, child: View) -> View {
    View::component(Rc::new(Layer { name, child }))
}

/// Layer1 through Layer4, without the enclosing provider.
pub fn layers() -> View {
    let layer4 = Toggle::consumer(|v| Switch::new(v.on(), v.toggle().clone()).view());
    let layer3 = layer("Layer3", layer4);
    let layer2 = Toggle::consumer(move |v| {
        View::fragment([
            View::text(if v.on() {
                "The button is on"
            } else {
                "The button is off"
            }),
            layer3.clone(),
        ])
    });
    layer("Layer1", layer2)
}

/// The full usage: a Toggle wrapping [`layers`].
pub fn usage(config: ToggleConfig) -> Rc<Toggle> {
    Toggle::new(config.attr("id", "usage"), layers())
}
