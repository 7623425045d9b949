use std::ops::{
  BitOr,
  BitOrAssign,
};

/// What a trigger wants from the next measurement.
///
/// Triggers that land before the pending read runs are merged with `|`, so a
/// single read carries everything asked of it since the previous one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Intent {
  /// Repaint the overlay even if the head did not move.
  pub force_position: bool,
  /// Start a fresh blink phase even if the head did not move.
  pub restart_blink:  bool,
}

impl Intent {
  pub const NONE: Self = Self::new(false, false);
  pub const REPOSITION: Self = Self::new(true, false);
  pub const RESTART: Self = Self::new(true, true);

  pub const fn new(force_position: bool, restart_blink: bool) -> Self {
    Self {
      force_position,
      restart_blink,
    }
  }

  #[must_use]
  pub const fn is_none(self) -> bool {
    !self.force_position && !self.restart_blink
  }
}

impl BitOr for Intent {
  type Output = Intent;

  fn bitor(mut self, rhs: Self) -> Self::Output {
    self |= rhs;
    self
  }
}

impl BitOrAssign for Intent {
  fn bitor_assign(&mut self, rhs: Self) {
    self.force_position |= rhs.force_position;
    self.restart_blink |= rhs.restart_blink;
  }
}
