//! # the-caret
//!
//! A supplementary caret drawn as an overlay node on top of a text surface,
//! to make the insertion point easier to spot.
//!
//! The controller keeps one overlay aligned with the main selection head and
//! dims it after a short idle delay. It stays in sync across edits, selection
//! moves, scrolling, resizing and focus changes. Everything that needs a
//! rendering engine is borrowed from the host through the [`Surface`] and
//! [`Timer`] traits:
//!
//! - focus and selection queries, plus mapping a position to a screen box
//! - a measure queue that runs a read pass before a write pass on each layout
//!   flush
//! - the overlay node, a root class toggle and event subscriptions
//!
//! ## Flow
//!
//! ```text
//! trigger ──► schedule(intent) ──► (no caret possible) hide now
//!                 │
//!                 └─► pending |= intent, queue one MeasureRequest
//!
//! flush: MeasureRequest::read ──► Measurement ──► PendingWrite::write
//! ```
//!
//! Any number of triggers between two flushes produce one read and one write.
//!
//! ## Styling
//!
//! The overlay carries [`Config::overlay_class`], gains
//! [`Config::dimmed_class`] during the idle phase, and the surface root gets
//! [`Config::enabled_class`] while a controller is attached. Appearance is left
//! entirely to the stylesheet.

mod blink;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod intent;
pub mod plugin;
pub mod selection;
pub mod surface;
pub mod update;

pub use config::{
  Config,
  ConfigError,
};
pub use controller::{
  CaretController,
  MeasureRequest,
  Measurement,
  PendingWrite,
};
pub use geometry::{
  Assoc,
  CaretLayout,
  OverlayGeometry,
  Rect,
};
pub use intent::Intent;
pub use plugin::SurfacePlugin;
pub use selection::Range;
pub use surface::{
  Callback,
  CoordsError,
  EventSource,
  ListenError,
  Overlay,
  Subscription,
  Surface,
  Timer,
  TimerId,
};
pub use update::ViewUpdate;
