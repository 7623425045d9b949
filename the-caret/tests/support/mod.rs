//! In-memory host for driving the caret controller in tests.

#![allow(dead_code)]

use std::{
  cell::{
    Cell,
    RefCell,
  },
  collections::{
    BTreeMap,
    BTreeSet,
  },
  rc::Rc,
  time::Duration,
};

use the_caret::{
  Assoc,
  CaretController,
  Callback,
  Config,
  CoordsError,
  EventSource,
  ListenError,
  MeasureRequest,
  Overlay,
  OverlayGeometry,
  PendingWrite,
  Range,
  Rect,
  Subscription,
  Surface,
  Timer,
  TimerId,
};

pub const SCROLLER: Rect = Rect::new(100.0, 700.0, 50.0, 850.0);
pub const LINE_HEIGHT: f64 = 18.0;
pub const CHAR_WIDTH: f64 = 8.0;

/// What the overlay node looks like right now.
#[derive(Debug, Default)]
pub struct OverlayState {
  pub mounted:   bool,
  pub removed:   bool,
  pub displayed: bool,
  pub geometry:  Option<OverlayGeometry>,
  pub classes:   BTreeSet<String>,
  pub places:    usize,
}

#[derive(Clone, Default)]
pub struct FakeOverlay(pub Rc<RefCell<OverlayState>>);

impl Overlay for FakeOverlay {
  fn set_displayed(&self, displayed: bool) {
    self.0.borrow_mut().displayed = displayed;
  }

  fn place(&self, geometry: OverlayGeometry) {
    let mut state = self.0.borrow_mut();
    state.geometry = Some(geometry);
    state.places += 1;
  }

  fn toggle_class(&self, class: &str, enabled: bool) {
    let mut state = self.0.borrow_mut();
    if enabled {
      state.classes.insert(class.to_string());
    } else {
      state.classes.remove(class);
    }
  }

  fn remove(&self) {
    let mut state = self.0.borrow_mut();
    state.removed = true;
    state.displayed = false;
  }
}

type Listeners = Rc<RefCell<Vec<(u64, EventSource, Callback)>>>;

pub struct FakeSurface {
  pub focused:       Cell<bool>,
  pub selection:     Cell<Range>,
  /// Scroll offset subtracted from every caret box.
  pub scroll_top:    Cell<f64>,
  pub fail_coords:   Cell<bool>,
  pub unlaid:        RefCell<BTreeSet<usize>>,
  pub unsupported:   RefCell<BTreeSet<EventSource>>,
  pub coords_calls:  RefCell<Vec<(usize, Assoc)>>,
  pub root_classes:  RefCell<BTreeSet<String>>,
  pub overlay:       FakeOverlay,
  queue:             RefCell<Vec<MeasureRequest>>,
  listeners:         Listeners,
  next_listener:     Cell<u64>,
  pub requests_made: Cell<usize>,
}

impl FakeSurface {
  pub fn new() -> Rc<Self> {
    Rc::new(Self {
      focused:       Cell::new(true),
      selection:     Cell::new(Range::point(0)),
      scroll_top:    Cell::new(0.0),
      fail_coords:   Cell::new(false),
      unlaid:        RefCell::new(BTreeSet::new()),
      unsupported:   RefCell::new(BTreeSet::new()),
      coords_calls:  RefCell::new(Vec::new()),
      root_classes:  RefCell::new(BTreeSet::new()),
      overlay:       FakeOverlay::default(),
      queue:         RefCell::new(Vec::new()),
      listeners:     Rc::new(RefCell::new(Vec::new())),
      next_listener: Cell::new(0),
      requests_made: Cell::new(0),
    })
  }

  /// Caret box the fake layout produces for `pos` on a single line.
  pub fn caret_rect(&self, pos: usize) -> Rect {
    let top = SCROLLER.top + 4.0 - self.scroll_top.get();
    let left = SCROLLER.left + 6.0 + pos as f64 * CHAR_WIDTH;
    Rect::new(top, top + LINE_HEIGHT, left, left)
  }

  /// Geometry the overlay should end up with for `pos`.
  pub fn expected_geometry(&self, pos: usize) -> OverlayGeometry {
    let rect = self.caret_rect(pos);
    OverlayGeometry {
      top:    rect.top - SCROLLER.top,
      left:   rect.left - SCROLLER.left,
      height: LINE_HEIGHT,
    }
  }

  pub fn pending_measures(&self) -> usize {
    self.queue.borrow().len()
  }

  /// Run every queued read, then every write, like a layout flush.
  pub fn flush(&self) -> usize {
    let requests: Vec<MeasureRequest> = self.queue.borrow_mut().drain(..).collect();
    let count = requests.len();
    let writes: Vec<PendingWrite> = requests.into_iter().map(MeasureRequest::read).collect();
    for write in writes {
      write.write();
    }
    count
  }

  /// Throw away every queued request unread, like a host tearing down its
  /// flush queue.
  pub fn drop_queue(&self) -> usize {
    let requests: Vec<MeasureRequest> = self.queue.borrow_mut().drain(..).collect();
    requests.len()
  }

  /// Run the read pass only and hand the writes back.
  pub fn read_pass(&self) -> Vec<PendingWrite> {
    let requests: Vec<MeasureRequest> = self.queue.borrow_mut().drain(..).collect();
    requests.into_iter().map(MeasureRequest::read).collect()
  }

  pub fn emit(&self, source: EventSource) {
    let callbacks: Vec<Callback> = self
      .listeners
      .borrow()
      .iter()
      .filter(|(_, s, _)| *s == source)
      .map(|(_, _, callback)| callback.clone())
      .collect();
    for callback in callbacks {
      callback();
    }
  }

  pub fn listener_count(&self) -> usize {
    self.listeners.borrow().len()
  }

  pub fn listens_to(&self, source: EventSource) -> bool {
    self.listeners.borrow().iter().any(|(_, s, _)| *s == source)
  }

  pub fn overlay(&self) -> std::cell::Ref<'_, OverlayState> {
    self.overlay.0.borrow()
  }

  pub fn set_focus(&self, focused: bool) {
    self.focused.set(focused);
    self.emit(if focused {
      EventSource::Focus
    } else {
      EventSource::Blur
    });
  }

  pub fn select(&self, range: Range) {
    self.selection.set(range);
    self.emit(EventSource::SelectionChange);
  }

  pub fn scroll_to(&self, top: f64) {
    self.scroll_top.set(top);
    self.emit(EventSource::Scroll);
  }
}

impl Surface for FakeSurface {
  fn has_focus(&self) -> bool {
    self.focused.get()
  }

  fn selection(&self) -> Range {
    self.selection.get()
  }

  fn coords_at_pos(&self, pos: usize, assoc: Assoc) -> Result<Option<Rect>, CoordsError> {
    self.coords_calls.borrow_mut().push((pos, assoc));
    if self.fail_coords.get() {
      return Err(CoordsError::OutOfRange { pos, len: 0 });
    }
    if self.unlaid.borrow().contains(&pos) {
      return Ok(None);
    }
    Ok(Some(self.caret_rect(pos)))
  }

  fn scroller_rect(&self) -> Rect {
    SCROLLER
  }

  fn request_measure(&self, request: MeasureRequest) {
    self.requests_made.set(self.requests_made.get() + 1);
    self.queue.borrow_mut().push(request);
  }

  fn mount_overlay(&self, class: &str) -> Box<dyn Overlay> {
    {
      let mut state = self.overlay.0.borrow_mut();
      state.mounted = true;
      state.classes.insert(class.to_string());
    }
    Box::new(self.overlay.clone())
  }

  fn toggle_root_class(&self, class: &str, enabled: bool) {
    let mut classes = self.root_classes.borrow_mut();
    if enabled {
      classes.insert(class.to_string());
    } else {
      classes.remove(class);
    }
  }

  fn listen(&self, source: EventSource, callback: Callback) -> Result<Subscription, ListenError> {
    if self.unsupported.borrow().contains(&source) {
      return Err(ListenError::Unsupported(source));
    }

    let id = self.next_listener.get();
    self.next_listener.set(id + 1);
    self.listeners.borrow_mut().push((id, source, callback));

    let listeners = Rc::downgrade(&self.listeners);
    Ok(Subscription::new(move || {
      if let Some(listeners) = listeners.upgrade() {
        listeners.borrow_mut().retain(|(other, ..)| *other != id);
      }
    }))
  }
}

/// Virtual-clock timer. Nothing fires until `advance`.
#[derive(Default)]
pub struct FakeTimer {
  now:       Cell<Duration>,
  next_id:   Cell<u64>,
  pending:   RefCell<BTreeMap<u64, (Duration, Box<dyn FnOnce()>)>>,
  pub armed: Cell<usize>,
  pub calls: RefCell<Vec<String>>,
}

impl FakeTimer {
  pub fn new() -> Rc<Self> {
    Rc::new(Self::default())
  }

  pub fn pending(&self) -> usize {
    self.pending.borrow().len()
  }

  /// Move the clock forward, firing due callbacks in deadline order.
  pub fn advance(&self, by: Duration) {
    let target = self.now.get() + by;
    loop {
      let due = {
        let pending = self.pending.borrow();
        pending
          .iter()
          .filter(|(_, (deadline, _))| *deadline <= target)
          .min_by_key(|(id, (deadline, _))| (*deadline, **id))
          .map(|(id, (deadline, _))| (*id, *deadline))
      };
      let Some((id, deadline)) = due else {
        break;
      };
      let Some((_, callback)) = self.pending.borrow_mut().remove(&id) else {
        break;
      };
      self.now.set(deadline);
      callback();
    }
    self.now.set(target);
  }
}

impl Timer for FakeTimer {
  fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
    let id = self.next_id.get() + 1;
    self.next_id.set(id);
    self
      .pending
      .borrow_mut()
      .insert(id, (self.now.get() + delay, callback));
    self.armed.set(self.armed.get() + 1);
    self.calls.borrow_mut().push(format!("schedule {id}"));
    TimerId(id)
  }

  fn cancel(&self, id: TimerId) {
    self.pending.borrow_mut().remove(&id.0);
    self.calls.borrow_mut().push(format!("cancel {}", id.0));
  }
}

pub struct Harness {
  pub surface:    Rc<FakeSurface>,
  pub timer:      Rc<FakeTimer>,
  pub controller: CaretController,
}

impl Harness {
  pub fn new() -> Self {
    Self::with_surface(FakeSurface::new())
  }

  pub fn with_surface(surface: Rc<FakeSurface>) -> Self {
    let timer = FakeTimer::new();
    let controller = CaretController::new(surface.clone(), timer.clone(), Config::default());
    Self {
      surface,
      timer,
      controller,
    }
  }

  pub fn dimmed_class(&self) -> String {
    Config::default().dimmed_class
  }

  pub fn is_dimmed(&self) -> bool {
    self
      .surface
      .overlay()
      .classes
      .contains(&Config::default().dimmed_class)
  }
}

pub fn ms(millis: u64) -> Duration {
  Duration::from_millis(millis)
}
