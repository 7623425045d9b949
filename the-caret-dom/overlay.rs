use the_caret::{
  Overlay,
  OverlayGeometry,
};
use wasm_bindgen::{
  JsCast,
  JsValue,
};
use web_sys::{
  Document,
  Element,
  HtmlElement,
};

use crate::DomError;

fn px(value: f64) -> String {
  format!("{value}px")
}

fn warn_on_err<T>(result: Result<T, JsValue>, what: &str) {
  if let Err(err) = result {
    log::warn!("caret overlay: failed to set {what}: {err:?}");
  }
}

/// The overlay as a plain `div` under the scroll container.
#[derive(Debug, Clone)]
pub struct DomOverlay {
  element: HtmlElement,
}

impl DomOverlay {
  pub fn mount(document: &Document, parent: &Element, class: &str) -> Result<Self, DomError> {
    let element = document
      .create_element("div")?
      .dyn_into::<HtmlElement>()
      .map_err(|_| DomError::NotHtml)?;
    element.set_class_name(class);

    let style = element.style();
    style.set_property("position", "absolute")?;
    style.set_property("display", "none")?;
    style.set_property("pointer-events", "none")?;
    parent.append_child(&element)?;

    Ok(Self { element })
  }

  pub fn element(&self) -> &HtmlElement {
    &self.element
  }
}

impl Overlay for DomOverlay {
  fn set_displayed(&self, displayed: bool) {
    let value = if displayed { "block" } else { "none" };
    warn_on_err(self.element.style().set_property("display", value), "display");
  }

  fn place(&self, geometry: OverlayGeometry) {
    let style = self.element.style();
    for (property, value) in [
      ("top", geometry.top),
      ("left", geometry.left),
      ("height", geometry.height),
    ] {
      warn_on_err(style.set_property(property, &px(value)), property);
    }
  }

  fn toggle_class(&self, class: &str, enabled: bool) {
    warn_on_err(
      self.element.class_list().toggle_with_force(class, enabled),
      "class",
    );
  }

  fn remove(&self) {
    self.element.remove();
  }
}

/// Stand-in used when the real overlay could not be mounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedOverlay;

impl Overlay for DetachedOverlay {
  fn set_displayed(&self, _displayed: bool) {}

  fn place(&self, _geometry: OverlayGeometry) {}

  fn toggle_class(&self, _class: &str, _enabled: bool) {}

  fn remove(&self) {}
}
