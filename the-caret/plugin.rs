//! Lifecycle protocol for behavior attached to an editor surface.
//!
//! Construction is type specific (it needs the surface handle), so the trait
//! only covers what the host drives afterwards.

use crate::{
  controller::CaretController,
  update::ViewUpdate,
};

pub trait SurfacePlugin {
  /// Called after every transaction on the surface.
  fn update(&mut self, update: &ViewUpdate);

  /// Called once when the surface goes away.
  fn destroy(&mut self);
}

impl SurfacePlugin for CaretController {
  fn update(&mut self, update: &ViewUpdate) {
    CaretController::update(self, update);
  }

  fn destroy(&mut self) {
    CaretController::destroy(self);
  }
}
