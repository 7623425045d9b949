//! The caret overlay state machine.
//!
//! Triggers (host updates and subscribed events) funnel into
//! [`CaretController::schedule`]. A trigger either hides the overlay on the
//! spot, when no caret can exist, or folds its [`Intent`] into the pending
//! one and makes sure exactly one [`MeasureRequest`] is queued with the host.
//! The host runs the request in two halves on its next layout flush: `read`
//! takes a [`Measurement`] without touching the overlay, `write` applies it.

use std::{
  cell::RefCell,
  rc::{
    Rc,
    Weak,
  },
};

use smallvec::SmallVec;

use crate::{
  blink::BlinkTimer,
  config::Config,
  geometry::{
    Assoc,
    CaretLayout,
  },
  intent::Intent,
  surface::{
    Callback,
    EventSource,
    ListenError,
    Overlay,
    Subscription,
    Surface,
    Timer,
  },
  update::ViewUpdate,
};

type Shared = Rc<RefCell<Inner>>;

/// Snapshot taken by the read half of a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
  head:   usize,
  intent: Intent,
  layout: Option<CaretLayout>,
}

impl Measurement {
  pub fn head(&self) -> usize {
    self.head
  }

  /// Intent consumed by the read, merged from every trigger since the last.
  pub fn intent(&self) -> Intent {
    self.intent
  }

  pub fn layout(&self) -> Option<&CaretLayout> {
    self.layout.as_ref()
  }

  pub fn is_visible(&self) -> bool {
    self.layout.is_some()
  }
}

/// A queued measurement, handed to [`Surface::request_measure`].
///
/// `read` consumes the request and `write` consumes what `read` returns, so a
/// request is read once and written once, in that order. Dropping a request
/// without reading it lets the next trigger queue a fresh one.
#[must_use = "a measure request does nothing until the host reads it"]
pub struct MeasureRequest {
  target: Weak<RefCell<Inner>>,
}

impl MeasureRequest {
  /// Layout-read pass. Queries the host, mutates nothing on screen.
  pub fn read(mut self) -> PendingWrite {
    let target = std::mem::take(&mut self.target);
    let measurement = target.upgrade().and_then(|shared| {
      let mut inner = shared.borrow_mut();
      if inner.destroyed {
        return None;
      }
      Some(inner.measure())
    });

    PendingWrite {
      target,
      measurement,
    }
  }

  /// Read and write back to back, for hosts without split passes.
  pub fn run(self) {
    self.read().write();
  }
}

impl Drop for MeasureRequest {
  fn drop(&mut self) {
    // Taken by `read`, so only unread requests get here.
    let Some(shared) = self.target.upgrade() else {
      return;
    };
    if let Ok(mut inner) = shared.try_borrow_mut() {
      if !inner.destroyed {
        log::trace!("caret measure dropped unread");
        inner.measuring = false;
      }
    }
  }
}

/// Second half of a [`MeasureRequest`].
#[must_use = "the overlay is not updated until the host writes"]
pub struct PendingWrite {
  target:      Weak<RefCell<Inner>>,
  measurement: Option<Measurement>,
}

impl PendingWrite {
  /// `None` when the controller was gone by the time of the read.
  pub fn measurement(&self) -> Option<&Measurement> {
    self.measurement.as_ref()
  }

  /// Layout-write pass. Applies the snapshot to the overlay.
  pub fn write(self) {
    let Some(measurement) = self.measurement else {
      return;
    };
    let Some(shared) = self.target.upgrade() else {
      return;
    };

    let mut inner = shared.borrow_mut();
    if inner.destroyed {
      return;
    }
    inner.apply(measurement, &self.target);
  }
}

struct Inner {
  surface:   Rc<dyn Surface>,
  overlay:   Box<dyn Overlay>,
  blink:     BlinkTimer,
  config:    Config,
  pending:   Intent,
  measuring: bool,
  last_head: Option<usize>,
  displayed: bool,
  dimmed:    bool,
  destroyed: bool,
}

impl Inner {
  /// A caret is drawn only for a focused surface with an insertion point.
  fn caret_possible(&self) -> bool {
    self.surface.has_focus() && self.surface.selection().is_empty()
  }

  fn measure(&mut self) -> Measurement {
    let intent = std::mem::take(&mut self.pending);
    self.measuring = false;

    let selection = self.surface.selection();
    let head = selection.head;
    let layout = if self.surface.has_focus() && selection.is_empty() {
      self.locate(head)
    } else {
      None
    };

    Measurement {
      head,
      intent,
      layout,
    }
  }

  fn locate(&self, head: usize) -> Option<CaretLayout> {
    let caret = match self.surface.coords_at_pos(head, Assoc::Before) {
      Ok(Some(rect)) => rect,
      Ok(None) => {
        log::trace!("no caret box for position {head}");
        return None;
      },
      Err(err) => {
        log::trace!("caret box lookup failed: {err}");
        return None;
      },
    };

    Some(CaretLayout {
      caret,
      scroller: self.surface.scroller_rect(),
    })
  }

  fn apply(&mut self, measurement: Measurement, this: &Weak<RefCell<Inner>>) {
    let Some(layout) = measurement.layout else {
      self.conceal();
      return;
    };

    let moved = self.last_head != Some(measurement.head);
    if !measurement.intent.force_position && !moved {
      return;
    }

    self.last_head = Some(measurement.head);
    self.overlay.place(layout.overlay_geometry());
    self.overlay.set_displayed(true);
    self.displayed = true;

    if measurement.intent.restart_blink || moved {
      self.restart_blink(this.clone());
    }
  }

  fn restart_blink(&mut self, this: Weak<RefCell<Inner>>) {
    self.set_dimmed(false);
    self.blink.restart(Box::new(move || {
      let Some(shared) = this.upgrade() else {
        return;
      };
      let mut inner = shared.borrow_mut();
      if !inner.destroyed && inner.displayed {
        inner.set_dimmed(true);
      }
    }));
  }

  fn set_dimmed(&mut self, dimmed: bool) {
    self.overlay.toggle_class(&self.config.dimmed_class, dimmed);
    self.dimmed = dimmed;
  }

  fn hide(&mut self) {
    self.overlay.set_displayed(false);
    self.displayed = false;
    self.set_dimmed(false);
    self.blink.cancel();
  }

  /// Hide and forget the painted head, so the next measurement repaints.
  fn conceal(&mut self) {
    self.hide();
    self.last_head = None;
  }
}

fn schedule_measure(shared: &Shared, intent: Intent) {
  let surface = {
    let mut inner = shared.borrow_mut();
    if inner.destroyed {
      return;
    }
    if !inner.caret_possible() {
      inner.conceal();
      return;
    }

    inner.pending |= intent;
    if inner.measuring {
      log::trace!("caret measure already queued, merged {intent:?}");
      return;
    }
    inner.measuring = true;
    inner.surface.clone()
  };

  surface.request_measure(MeasureRequest {
    target: Rc::downgrade(shared),
  });
}

fn listener(this: Weak<RefCell<Inner>>, source: EventSource) -> Callback {
  Rc::new(move || {
    let Some(shared) = this.upgrade() else {
      return;
    };
    match source {
      EventSource::Blur => {
        let mut inner = shared.borrow_mut();
        if !inner.destroyed {
          inner.conceal();
        }
      },
      EventSource::Focus => schedule_measure(&shared, Intent::RESTART),
      // A moved head restarts the blink on its own.
      EventSource::SelectionChange => schedule_measure(&shared, Intent::NONE),
      EventSource::Scroll | EventSource::Resize | EventSource::WindowResize => {
        schedule_measure(&shared, Intent::REPOSITION)
      },
    }
  })
}

/// Draws a blinking overlay caret over one editor surface.
///
/// Dropping the controller tears it down.
pub struct CaretController {
  shared:        Shared,
  subscriptions: SmallVec<[Subscription; 6]>,
}

impl CaretController {
  /// An invalid `config` is replaced by the default one.
  pub fn new(surface: Rc<dyn Surface>, timer: Rc<dyn Timer>, config: Config) -> Self {
    let config = match config.validate() {
      Ok(()) => config,
      Err(err) => {
        log::warn!("invalid caret config, using defaults: {err}");
        Config::default()
      },
    };

    let overlay = surface.mount_overlay(&config.overlay_class);
    surface.toggle_root_class(&config.enabled_class, true);

    let shared = Rc::new(RefCell::new(Inner {
      surface: surface.clone(),
      overlay,
      blink: BlinkTimer::new(timer, config.blink_delay()),
      config,
      pending: Intent::NONE,
      measuring: false,
      last_head: None,
      displayed: false,
      dimmed: false,
      destroyed: false,
    }));

    let mut subscriptions = SmallVec::new();
    for source in EventSource::ALL {
      match surface.listen(source, listener(Rc::downgrade(&shared), source)) {
        Ok(subscription) => subscriptions.push(subscription),
        Err(ListenError::Unsupported(_)) => {
          log::debug!("caret overlay will not follow {source} events on this platform");
        },
        Err(err) => log::warn!("caret overlay listener skipped: {err}"),
      }
    }

    let controller = Self {
      shared,
      subscriptions,
    };
    schedule_measure(&controller.shared, Intent::RESTART);
    controller
  }

  /// Feed a host transaction summary.
  pub fn update(&self, update: &ViewUpdate) {
    if let Some(intent) = update.intent() {
      schedule_measure(&self.shared, intent);
    }
  }

  /// Ask for a measurement. Coalesces with any measurement already queued.
  pub fn schedule(&self, intent: Intent) {
    schedule_measure(&self.shared, intent);
  }

  /// Hide the overlay and stop the blink cycle. The next measurement paints
  /// again even if the head did not move. Safe to repeat.
  pub fn hide(&self) {
    let mut inner = self.shared.borrow_mut();
    if !inner.destroyed {
      inner.conceal();
    }
  }

  /// Undo everything `new` did. Safe to repeat.
  pub fn destroy(&mut self) {
    if self.shared.borrow().destroyed {
      return;
    }

    self.subscriptions.clear();

    let mut inner = self.shared.borrow_mut();
    inner.destroyed = true;
    inner.measuring = false;
    inner.pending = Intent::NONE;
    inner.blink.cancel();
    inner.overlay.remove();
    inner
      .surface
      .toggle_root_class(&inner.config.enabled_class, false);
    log::debug!("caret overlay torn down");
  }

  pub fn is_visible(&self) -> bool {
    self.shared.borrow().displayed
  }

  pub fn is_dimmed(&self) -> bool {
    self.shared.borrow().dimmed
  }

  /// Position the overlay was last painted at, if it is showing one.
  pub fn last_head(&self) -> Option<usize> {
    self.shared.borrow().last_head
  }

  pub fn is_destroyed(&self) -> bool {
    self.shared.borrow().destroyed
  }

  pub fn config(&self) -> Config {
    self.shared.borrow().config.clone()
  }
}

impl Drop for CaretController {
  fn drop(&mut self) {
    self.destroy();
  }
}
