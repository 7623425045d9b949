use crate::intent::Intent;

/// Change summary the host hands over after every transaction.
///
/// The flags are independent; any combination may be set at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewUpdate {
  pub doc_changed:      bool,
  pub selection_set:    bool,
  pub viewport_changed: bool,
  pub geometry_changed: bool,
  pub focus_changed:    bool,
}

impl ViewUpdate {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    !(self.doc_changed
      || self.selection_set
      || self.viewport_changed
      || self.geometry_changed
      || self.focus_changed)
  }

  /// Measurement intent for this update, `None` if nothing relevant changed.
  ///
  /// Any change may have shifted the caret on screen, so every non-empty
  /// update repositions. Only edits and selection moves start a new blink
  /// phase.
  pub fn intent(&self) -> Option<Intent> {
    if self.is_empty() {
      return None;
    }

    Some(Intent::new(true, self.doc_changed || self.selection_set))
  }
}
