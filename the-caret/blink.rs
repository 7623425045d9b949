use std::{
  rc::Rc,
  time::Duration,
};

use crate::surface::{
  Timer,
  TimerId,
};

/// The single deferred "dim" callback of the blink cycle.
///
/// The id of a fired callback is kept until the next `cancel` so the host
/// timer can release whatever it holds for it.
pub(crate) struct BlinkTimer {
  timer:   Rc<dyn Timer>,
  delay:   Duration,
  pending: Option<TimerId>,
}

impl BlinkTimer {
  pub fn new(timer: Rc<dyn Timer>, delay: Duration) -> Self {
    Self {
      timer,
      delay,
      pending: None,
    }
  }

  pub fn restart(&mut self, on_elapsed: Box<dyn FnOnce()>) {
    self.cancel();
    self.pending = Some(self.timer.schedule(self.delay, on_elapsed));
  }

  pub fn cancel(&mut self) {
    if let Some(id) = self.pending.take() {
      self.timer.cancel(id);
    }
  }

  pub fn is_armed(&self) -> bool {
    self.pending.is_some()
  }
}
