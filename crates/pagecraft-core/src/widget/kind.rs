//! Widget kinds and the palette they are dragged from.

use serde::{Deserialize, Serialize};

/// The kinds of widget that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Editable block of text.
    Text,
    /// Image placeholder, filled by selecting a file.
    Image,
}

impl WidgetKind {
    /// All kinds, in palette order.
    pub const ALL: [WidgetKind; 2] = [WidgetKind::Text, WidgetKind::Image];

    /// Label shown on the palette item.
    pub fn label(&self) -> &'static str {
        match self {
            WidgetKind::Text => "Textbox",
            WidgetKind::Image => "Image",
        }
    }

    /// Drag-transfer channel this kind writes its marker to.
    pub fn drag_channel(&self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Image => "imgType",
        }
    }

    /// Exact marker value written on drag-start.
    pub fn drag_marker(&self) -> &'static str {
        match self {
            WidgetKind::Text => "Text",
            WidgetKind::Image => "Image",
        }
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.drag_marker())
    }
}

/// A draggable item in the widget palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: WidgetKind,
    pub label: &'static str,
    pub channel: &'static str,
    pub marker: &'static str,
}

/// The palette shown to the user, top to bottom.
pub fn palette() -> Vec<PaletteEntry> {
    WidgetKind::ALL
        .iter()
        .map(|&kind| PaletteEntry {
            kind,
            label: kind.label(),
            channel: kind.drag_channel(),
            marker: kind.drag_marker(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_order() {
        let entries = palette();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, WidgetKind::Text);
        assert_eq!(entries[1].kind, WidgetKind::Image);
    }

    #[test]
    fn test_drag_payload_declarations() {
        assert_eq!(WidgetKind::Text.drag_channel(), "text");
        assert_eq!(WidgetKind::Text.drag_marker(), "Text");
        assert_eq!(WidgetKind::Image.drag_channel(), "imgType");
        assert_eq!(WidgetKind::Image.drag_marker(), "Image");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WidgetKind::Text).unwrap(), "\"text\"");
        assert_eq!(serde_json::to_string(&WidgetKind::Image).unwrap(), "\"image\"");
    }
}
