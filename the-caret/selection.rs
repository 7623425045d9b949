//! The slice of the host selection the caret cares about.
//!
//! Only the main range is ever consulted. Multiple cursors are the host's
//! business; the overlay follows whichever range the host calls primary.

/// A single selection range in char offsets.
///
/// `anchor` stays put while `head` moves with the cursor. When both are equal
/// the range is collapsed into an insertion point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
  pub anchor: usize,
  pub head:   usize,
}

impl Range {
  pub fn new(anchor: usize, head: usize) -> Self {
    Self { anchor, head }
  }

  #[inline]
  pub fn point(head: usize) -> Self {
    Self::new(head, head)
  }

  /// Start of the range
  #[inline]
  #[must_use]
  pub fn from(&self) -> usize {
    std::cmp::min(self.anchor, self.head)
  }

  /// End of the range
  #[inline]
  #[must_use]
  pub fn to(&self) -> usize {
    std::cmp::max(self.anchor, self.head)
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.to() - self.from()
  }

  /// `true` when the range is a bare insertion point.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.anchor == self.head
  }
}
