//! Widget definitions for the page canvas.
//!
//! This module provides:
//! - The fixed catalog of widget kinds and the drag payload each declares
//! - The record stored on the canvas for every placed widget
//! - The text editing state machine (focus / blur)
//!
//! Records are pure data. The canvas owns them; the editor tracks focus.

mod kind;
mod record;
mod state;
mod tracker;

pub use kind::{PaletteEntry, WidgetKind, palette};
pub use record::{BoundImage, WidgetContent, WidgetId, WidgetRecord};
pub use state::EditState;
pub use tracker::EditTracker;
