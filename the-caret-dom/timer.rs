use std::{
  cell::{
    Cell,
    RefCell,
  },
  collections::HashMap,
  time::Duration,
};

use the_caret::{
  Timer,
  TimerId,
};
use wasm_bindgen::{
  JsCast,
  closure::Closure,
};
use web_sys::Window;

/// [`Timer`] over `window.setTimeout`.
///
/// Each scheduled closure stays alive until its id is canceled or the timer
/// is dropped, so a fired callback is never freed while it runs.
pub struct WindowTimer {
  window: Window,
  next:   Cell<u64>,
  slots:  RefCell<HashMap<u64, (i32, Closure<dyn FnMut()>)>>,
}

impl WindowTimer {
  pub fn new(window: Window) -> Self {
    Self {
      window,
      next: Cell::new(0),
      slots: RefCell::new(HashMap::new()),
    }
  }
}

impl Timer for WindowTimer {
  fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
    let id = self.next.get() + 1;
    self.next.set(id);

    let mut callback = Some(callback);
    let closure = Closure::<dyn FnMut()>::new(move || {
      if let Some(callback) = callback.take() {
        callback();
      }
    });
    let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

    match self
      .window
      .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), timeout)
    {
      Ok(handle) => {
        self.slots.borrow_mut().insert(id, (handle, closure));
      },
      Err(err) => log::warn!("setTimeout failed: {err:?}"),
    }

    TimerId(id)
  }

  fn cancel(&self, id: TimerId) {
    let slot = self.slots.borrow_mut().remove(&id.0);
    if let Some((handle, closure)) = slot {
      self.window.clear_timeout_with_handle(handle);
      drop(closure);
    }
  }
}

impl Drop for WindowTimer {
  fn drop(&mut self) {
    for (_, (handle, _closure)) in self.slots.get_mut().drain() {
      self.window.clear_timeout_with_handle(handle);
    }
  }
}
