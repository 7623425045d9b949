//! Seams between the caret controller and the editor hosting it.
//!
//! The host owns layout, focus and the selection. It lends the controller
//! queries, one overlay node, event subscriptions and a flush-aligned
//! measurement queue. Everything here is single-threaded.

use std::{
  fmt,
  rc::Rc,
  time::Duration,
};

use thiserror::Error;

use crate::{
  controller::MeasureRequest,
  geometry::{
    Assoc,
    OverlayGeometry,
    Rect,
  },
  selection::Range,
};

/// Shared handler invoked when a subscribed event fires.
pub type Callback = Rc<dyn Fn()>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordsError {
  #[error("position {pos} is outside the document (length {len})")]
  OutOfRange { pos: usize, len: usize },
  #[error("position {pos} is not laid out")]
  NotRendered { pos: usize },
  #[error("{0}")]
  Host(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenError {
  #[error("{0} events are not available on this platform")]
  Unsupported(EventSource),
  #[error("failed to subscribe to {event}: {message}")]
  Host { event: EventSource, message: String },
}

/// Events the controller subscribes to at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventSource {
  /// Document-wide selection change.
  SelectionChange,
  /// Scroll of the host's scroll container.
  Scroll,
  /// Size change of the scroll container itself, needs an observer.
  Resize,
  /// Size change of the whole window.
  WindowResize,
  Blur,
  Focus,
}

impl EventSource {
  pub const ALL: [EventSource; 6] = [
    EventSource::SelectionChange,
    EventSource::Scroll,
    EventSource::Resize,
    EventSource::WindowResize,
    EventSource::Blur,
    EventSource::Focus,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::SelectionChange => "selectionchange",
      Self::Scroll => "scroll",
      Self::Resize => "resize-observer",
      Self::WindowResize => "resize",
      Self::Blur => "blur",
      Self::Focus => "focus",
    }
  }
}

impl fmt::Display for EventSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Handle to a registered listener.
///
/// The inverse registration runs exactly once: on `unsubscribe` or on drop,
/// whichever comes first.
pub struct Subscription {
  unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
  pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
    Self {
      unsubscribe: Some(Box::new(unsubscribe)),
    }
  }

  pub fn unsubscribe(self) {
    drop(self);
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(unsubscribe) = self.unsubscribe.take() {
      unsubscribe();
    }
  }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("active", &self.unsubscribe.is_some())
      .finish()
  }
}

/// The overlay node mounted by the host.
pub trait Overlay {
  fn set_displayed(&self, displayed: bool);
  /// Apply offsets, in pixels, relative to the scroll container.
  fn place(&self, geometry: OverlayGeometry);
  fn toggle_class(&self, class: &str, enabled: bool);
  /// Detach the node. Nothing is called on the overlay afterwards.
  fn remove(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Single-shot deferred callbacks on the host's event loop.
pub trait Timer {
  fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
  /// A canceled callback never runs. Canceling a fired or unknown id is a
  /// no-op.
  fn cancel(&self, id: TimerId);
}

/// The text surface the caret is drawn over.
pub trait Surface {
  fn has_focus(&self) -> bool;

  /// The main selection range.
  fn selection(&self) -> Range;

  /// Screen box for `pos`. `Ok(None)` and `Err` both mean the position has
  /// no box right now.
  fn coords_at_pos(&self, pos: usize, assoc: Assoc) -> Result<Option<Rect>, CoordsError>;

  /// Bounding box of the scroll container.
  fn scroller_rect(&self) -> Rect;

  /// Queue a measurement for the next layout flush.
  ///
  /// The host must call [`MeasureRequest::read`] during its read pass and
  /// the returned [`PendingWrite::write`](crate::PendingWrite::write) during
  /// the write pass that follows it.
  fn request_measure(&self, request: MeasureRequest);

  /// Create the overlay as a hidden, absolutely positioned child of the
  /// scroll container.
  fn mount_overlay(&self, class: &str) -> Box<dyn Overlay>;

  fn toggle_root_class(&self, class: &str, enabled: bool);

  fn listen(&self, source: EventSource, callback: Callback) -> Result<Subscription, ListenError>;
}
