//! Drag and drop protocol between the palette and the canvas.
//!
//! A palette item writes its marker into a drag-transfer channel when the
//! drag starts; the canvas reads the channels back on drop and decides which
//! widget, if any, to create. Markers are compared by exact value: a channel
//! that exists but holds an empty or stale value never counts as a match.

use crate::widget::WidgetKind;
use std::collections::HashMap;
use thiserror::Error;

/// Reasons a drop does not produce a widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("Drop payload is empty")]
    Empty,
    #[error("Drop payload not recognized")]
    Unrecognized,
}

/// String channels carried by a drag gesture.
///
/// Mirrors the browser `DataTransfer` contract: reading a channel that was
/// never written yields an empty string.
pub trait DragTransfer {
    /// Write a value to a channel.
    fn set_data(&mut self, channel: &str, value: &str);

    /// Read a channel, empty if unset.
    fn get_data(&self, channel: &str) -> String;
}

/// In-memory drag payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragPayload {
    channels: HashMap<String, String>,
}

impl DragPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no channel holds a non-empty value.
    pub fn is_empty(&self) -> bool {
        self.channels.values().all(|v| v.is_empty())
    }
}

impl DragTransfer for DragPayload {
    fn set_data(&mut self, channel: &str, value: &str) {
        self.channels.insert(channel.to_string(), value.to_string());
    }

    fn get_data(&self, channel: &str) -> String {
        self.channels.get(channel).cloned().unwrap_or_default()
    }
}

/// The drag currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDrag {
    pub kind: WidgetKind,
}

/// Tracks the in-flight drag and classifies drops.
#[derive(Debug, Clone, Default)]
pub struct DropSession {
    pending: Option<PendingDrag>,
}

impl DropSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging a palette item: tag the transfer with the kind's marker.
    pub fn begin_drag(&mut self, kind: WidgetKind, transfer: &mut dyn DragTransfer) -> PendingDrag {
        transfer.set_data(kind.drag_channel(), kind.drag_marker());
        let pending = PendingDrag { kind };
        self.pending = Some(pending);
        pending
    }

    /// The drag in flight, if any.
    pub fn pending(&self) -> Option<PendingDrag> {
        self.pending
    }

    /// Forget a drag that ended without a drop on the canvas.
    pub fn cancel_drag(&mut self) -> Option<PendingDrag> {
        self.pending.take()
    }

    /// Classify the payload of a drop on the canvas.
    ///
    /// The text marker is checked first, then the image marker.
    pub fn classify_drop(transfer: &dyn DragTransfer) -> Result<WidgetKind, ClassificationError> {
        let mut seen_any = false;
        for kind in WidgetKind::ALL {
            let value = transfer.get_data(kind.drag_channel());
            if value == kind.drag_marker() {
                return Ok(kind);
            }
            seen_any |= !value.is_empty();
        }

        if seen_any {
            Err(ClassificationError::Unrecognized)
        } else {
            Err(ClassificationError::Empty)
        }
    }

    /// Consume the pending drag and classify the drop.
    ///
    /// The pending drag is cleared whatever the outcome.
    pub fn complete_drop(&mut self, transfer: &dyn DragTransfer) -> Result<WidgetKind, ClassificationError> {
        let pending = self.pending.take();
        let result = Self::classify_drop(transfer);
        if let (Some(pending), Ok(kind)) = (pending, &result) {
            if pending.kind != *kind {
                log::debug!("Drop classified as {} while dragging {}", kind, pending.kind);
            }
        }
        result
    }
}
