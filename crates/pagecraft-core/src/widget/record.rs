//! Placed widget records.

use super::WidgetKind;
use crate::image::ResourceLocator;
use uuid::Uuid;

/// Unique identifier for a placed widget.
pub type WidgetId = Uuid;

/// An image bound to an image widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundImage {
    /// Name of the selected file. This is what gets persisted.
    pub file_name: String,
    /// Session-scoped locator used to display the image.
    pub locator: ResourceLocator,
}

/// Editable content of a widget. The variant always matches the record's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetContent {
    Text { text: String },
    Image { image: Option<BoundImage> },
}

impl WidgetContent {
    /// Initial content for a freshly dropped widget.
    pub fn empty(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Text => WidgetContent::Text {
                text: String::new(),
            },
            WidgetKind::Image => WidgetContent::Image { image: None },
        }
    }
}

/// A widget placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRecord {
    id: WidgetId,
    kind: WidgetKind,
    pub(crate) content: WidgetContent,
}

impl WidgetRecord {
    pub(crate) fn new(kind: WidgetKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content: WidgetContent::empty(kind),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn content(&self) -> &WidgetContent {
        &self.content
    }

    /// Text content, for text widgets.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            WidgetContent::Text { text } => Some(text),
            WidgetContent::Image { .. } => None,
        }
    }

    /// Bound image, for image widgets that have one.
    pub fn image(&self) -> Option<&BoundImage> {
        match &self.content {
            WidgetContent::Image { image } => image.as_ref(),
            WidgetContent::Text { .. } => None,
        }
    }
}
