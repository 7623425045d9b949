//! Browser binding for `the-caret`.
//!
//! An editor rendered into the DOM implements [`the_caret::Surface`] by
//! pairing its own position mapping, selection and measure queue with a
//! [`DomBinding`], which covers the overlay node, the root class, the scroller
//! box and every event subscription the controller asks for. [`WindowTimer`]
//! drives the blink phase off `setTimeout`.

mod events;
mod overlay;
mod timer;

use the_caret::{
  Callback,
  EventSource,
  ListenError,
  Overlay,
  Rect,
  Subscription,
};
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{
  Document,
  Element,
  HtmlElement,
  Node,
  Window,
};

pub use crate::{
  events::{
    dom_event,
    listen,
    observe_resize,
  },
  overlay::{
    DetachedOverlay,
    DomOverlay,
  },
  timer::WindowTimer,
};

#[derive(Debug, Error)]
pub enum DomError {
  #[error("no global window")]
  NoWindow,
  #[error("window has no document")]
  NoDocument,
  #[error("created element is not an HTML element")]
  NotHtml,
  #[error("DOM call failed: {0}")]
  Js(String),
}

impl From<JsValue> for DomError {
  fn from(value: JsValue) -> Self {
    DomError::Js(format!("{value:?}"))
  }
}

/// Route `log` output to the browser console. Safe to call more than once.
pub fn init_logging(level: log::Level) {
  console_log::init_with_level(level).ok();
}

/// Viewport box of `element`.
pub fn client_rect(element: &Element) -> Rect {
  let rect = element.get_bounding_client_rect();
  Rect::new(rect.top(), rect.bottom(), rect.left(), rect.right())
}

/// DOM half of a caret surface.
///
/// `root` is the focusable editing element, `scroller` the element that
/// scrolls the content and hosts the overlay.
#[derive(Debug, Clone)]
pub struct DomBinding {
  window:   Window,
  document: Document,
  root:     HtmlElement,
  scroller: HtmlElement,
}

impl DomBinding {
  pub fn new(root: HtmlElement, scroller: HtmlElement) -> Result<Self, DomError> {
    let window = web_sys::window().ok_or(DomError::NoWindow)?;
    let document = window.document().ok_or(DomError::NoDocument)?;
    Ok(Self {
      window,
      document,
      root,
      scroller,
    })
  }

  pub fn root(&self) -> &HtmlElement {
    &self.root
  }

  pub fn scroller(&self) -> &HtmlElement {
    &self.scroller
  }

  /// `true` when the focused element is the root or inside it. Matches the
  /// `focusin`/`focusout` listeners [`DomBinding::listen`] puts on the root.
  pub fn root_has_focus(&self) -> bool {
    self.document.active_element().is_some_and(|active| {
      let node: &Node = active.as_ref();
      self.root.contains(Some(node))
    })
  }

  pub fn scroller_rect(&self) -> Rect {
    client_rect(&self.scroller)
  }

  /// Mount the overlay under the scroller. A failed mount yields an overlay
  /// that draws nothing.
  pub fn mount_overlay(&self, class: &str) -> Box<dyn Overlay> {
    match DomOverlay::mount(&self.document, &self.scroller, class) {
      Ok(overlay) => Box::new(overlay),
      Err(err) => {
        log::warn!("failed to mount caret overlay: {err}");
        Box::new(DetachedOverlay)
      },
    }
  }

  pub fn toggle_root_class(&self, class: &str, enabled: bool) {
    if let Err(err) = self.root.class_list().toggle_with_force(class, enabled) {
      log::warn!("failed to toggle root class {class}: {err:?}");
    }
  }

  pub fn listen(&self, source: EventSource, callback: Callback) -> Result<Subscription, ListenError> {
    match source {
      EventSource::SelectionChange => listen(&self.document, source, callback),
      EventSource::Scroll => listen(&self.scroller, source, callback),
      EventSource::Resize => observe_resize(&self.window, &self.scroller, callback),
      EventSource::WindowResize => listen(&self.window, source, callback),
      EventSource::Blur | EventSource::Focus => listen(&self.root, source, callback),
    }
  }
}
