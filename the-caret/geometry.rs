/// Which side of a position to measure when it sits between two glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
  /// Measure against the character preceding the position.
  Before,
  /// Measure against the character following the position.
  After,
}

/// Axis-aligned box in viewport pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
  pub top:    f64,
  pub bottom: f64,
  pub left:   f64,
  pub right:  f64,
}

impl Rect {
  pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
    Self {
      top,
      bottom,
      left,
      right,
    }
  }

  #[inline]
  pub fn width(&self) -> f64 {
    self.right - self.left
  }

  #[inline]
  pub fn height(&self) -> f64 {
    self.bottom - self.top
  }
}

/// Where the overlay goes, relative to the scroll container.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
  pub top:    f64,
  pub left:   f64,
  pub height: f64,
}

/// The two rectangles a successful read captures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretLayout {
  /// Caret box for the head, viewport coordinates.
  pub caret:    Rect,
  /// Bounding box of the scroll container, viewport coordinates.
  pub scroller: Rect,
}

impl CaretLayout {
  /// Translate the caret box into the scroller's local coordinate space.
  pub fn overlay_geometry(&self) -> OverlayGeometry {
    OverlayGeometry {
      top:    self.caret.top - self.scroller.top,
      left:   self.caret.left - self.scroller.left,
      height: self.caret.height(),
    }
  }
}
