//! Canvas model: the ordered sequence of placed widgets.

use crate::widget::{BoundImage, WidgetContent, WidgetId, WidgetKind, WidgetRecord};
use thiserror::Error;

/// Errors from canvas mutations.
///
/// Both variants indicate a caller bug: indices come from the rendered view
/// of an append-only sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Widget index {index} out of range (canvas has {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("Widget {index} is {found:?}, expected {expected:?}")]
    KindMismatch {
        index: usize,
        expected: WidgetKind,
        found: WidgetKind,
    },
}

/// A successful mutation, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasChange {
    Appended { index: usize, id: WidgetId },
    TextChanged { index: usize, id: WidgetId },
    ImageBound { index: usize, id: WidgetId },
}

impl CanvasChange {
    pub fn index(&self) -> usize {
        match *self {
            CanvasChange::Appended { index, .. }
            | CanvasChange::TextChanged { index, .. }
            | CanvasChange::ImageBound { index, .. } => index,
        }
    }

    pub fn id(&self) -> WidgetId {
        match *self {
            CanvasChange::Appended { id, .. }
            | CanvasChange::TextChanged { id, .. }
            | CanvasChange::ImageBound { id, .. } => id,
        }
    }
}

/// Handle returned by [`CanvasModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&CanvasChange, &[WidgetRecord])>;

/// The placed widgets, in insertion (top to bottom) order.
///
/// Records are never removed or reordered, so an index stays valid for the
/// life of the canvas. Observers are called after a mutation has been fully
/// applied and see the updated records.
#[derive(Default)]
pub struct CanvasModel {
    records: Vec<WidgetRecord>,
    /// Most recently edited text widget.
    last_edited: Option<WidgetId>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for CanvasModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasModel")
            .field("records", &self.records)
            .field("last_edited", &self.last_edited)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CanvasModel {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new widget at the end of the canvas.
    pub fn append(&mut self, kind: WidgetKind) -> WidgetId {
        let record = WidgetRecord::new(kind);
        let id = record.id();
        let index = self.records.len();
        self.records.push(record);

        self.notify(CanvasChange::Appended { index, id });
        id
    }

    /// Replace the text of a text widget.
    pub fn set_text(&mut self, index: usize, value: impl Into<String>) -> Result<(), CanvasError> {
        let record = self.record_mut(index, WidgetKind::Text)?;
        let id = record.id();
        if let WidgetContent::Text { text } = &mut record.content {
            *text = value.into();
        }
        self.last_edited = Some(id);

        self.notify(CanvasChange::TextChanged { index, id });
        Ok(())
    }

    /// Bind an image to an image widget.
    ///
    /// Returns the binding that was replaced, if any.
    pub fn bind_image(&mut self, index: usize, bound: BoundImage) -> Result<Option<BoundImage>, CanvasError> {
        let record = self.record_mut(index, WidgetKind::Image)?;
        let id = record.id();
        let previous = match &mut record.content {
            WidgetContent::Image { image } => image.replace(bound),
            WidgetContent::Text { .. } => None,
        };

        self.notify(CanvasChange::ImageBound { index, id });
        Ok(previous)
    }

    /// Check that `index` names a widget of `kind` without mutating anything.
    pub fn check(&self, index: usize, kind: WidgetKind) -> Result<&WidgetRecord, CanvasError> {
        let len = self.records.len();
        let record = self
            .records
            .get(index)
            .ok_or(CanvasError::OutOfRange { index, len })?;
        if record.kind() != kind {
            return Err(CanvasError::KindMismatch {
                index,
                expected: kind,
                found: record.kind(),
            });
        }
        Ok(record)
    }

    fn record_mut(&mut self, index: usize, kind: WidgetKind) -> Result<&mut WidgetRecord, CanvasError> {
        self.check(index, kind)?;
        Ok(&mut self.records[index])
    }

    /// Get the widget at an index.
    pub fn get(&self, index: usize) -> Option<&WidgetRecord> {
        self.records.get(index)
    }

    /// Get a widget by ID.
    pub fn get_by_id(&self, id: WidgetId) -> Option<&WidgetRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Current render position of a widget.
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Read-only view of all widgets, top to bottom.
    pub fn records(&self) -> &[WidgetRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The text widget edited most recently, if any.
    pub fn last_edited(&self) -> Option<&WidgetRecord> {
        self.last_edited.and_then(|id| self.get_by_id(id))
    }

    /// Register a callback run after every successful mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&CanvasChange, &[WidgetRecord]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: CanvasChange) {
        let records = &self.records;
        for (_, observer) in self.observers.iter_mut() {
            observer(&change, records);
        }
    }
}
