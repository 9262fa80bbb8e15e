//! Browser implementation of the startup document host.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::core::bootstrap::{DocumentHost, StartupError, Stylesheet};

const STYLE_ATTR: &str = "data-ratedeck-style";
const MOUNT_ATTR: &str = "data-ratedeck-app";

pub(crate) struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub(crate) fn current() -> Result<Self, StartupError> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(|document| Self { document })
            .ok_or(StartupError::DocumentUnavailable)
    }
}

impl DocumentHost for WebDocument {
    type Element = Element;

    fn inject_stylesheet(&mut self, sheet: &Stylesheet) -> Result<(), String> {
        let existing = format!("link[{STYLE_ATTR}=\"{}\"]", sheet.id);
        if matches!(self.document.query_selector(&existing), Ok(Some(_))) {
            return Ok(());
        }
        let head = self
            .document
            .head()
            .ok_or_else(|| "document has no <head>".to_string())?;
        let link = self.document.create_element("link").map_err(js_reason)?;
        link.set_attribute("rel", "stylesheet").map_err(js_reason)?;
        link.set_attribute("href", sheet.href).map_err(js_reason)?;
        link.set_attribute(STYLE_ATTR, sheet.id).map_err(js_reason)?;
        head.append_child(&link).map_err(js_reason)?;
        Ok(())
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn is_mounted(&self, element: &Element) -> bool {
        element.has_attribute(MOUNT_ATTR)
    }

    fn mark_mounted(&mut self, element: &Element) -> Result<(), String> {
        element.set_attribute(MOUNT_ATTR, "").map_err(js_reason)
    }
}

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
