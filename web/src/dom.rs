use crate::utils::document_error;
use dimmer_core::{Result, Surface};
use gloo::events::EventListener;
use std::cell::RefCell;
use web_sys::{Element, HtmlElement};

/// The toggle button plus the element whose class list carries the mode.
pub(crate) struct DomSurface {
    toggle: HtmlElement,
    target: Element,
    listeners: RefCell<Vec<EventListener>>,
}

impl DomSurface {
    pub const MARKER_ATTR: &'static str = "data-dark-mode";

    pub(crate) fn new(toggle: HtmlElement, target: Element) -> Self {
        Self {
            toggle,
            target,
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl Surface for DomSurface {
    fn set_class(&self, class_name: &str, present: bool) -> Result<()> {
        let class_list = self.target.class_list();
        let result = if present {
            class_list.add_1(class_name)
        } else {
            class_list.remove_1(class_name)
        };
        result.map_err(document_error)
    }

    fn set_marker(&self, marker: &str) -> Result<()> {
        self.toggle
            .set_attribute(Self::MARKER_ATTR, marker)
            .map_err(document_error)
    }

    fn set_glyph(&self, glyph: &str) -> Result<()> {
        self.toggle.set_text_content(Some(glyph));
        Ok(())
    }

    fn prepare(&self, label: &str) -> Result<()> {
        let style = self.toggle.style();
        style
            .set_property("cursor", "pointer")
            .map_err(document_error)?;
        style
            .set_property("user-select", "none")
            .map_err(document_error)?;
        self.toggle.set_title(label);
        Ok(())
    }

    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<()> {
        let listener = EventListener::new(&self.toggle, "click", move |_| handler());
        self.listeners.borrow_mut().push(listener);
        Ok(())
    }
}
