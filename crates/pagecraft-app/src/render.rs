//! Plain-text rendering of the canvas for the native shell.

use pagecraft_core::{WidgetContent, WidgetRecord};
use std::fmt::Write;

/// Placeholder shown for an image widget with nothing bound.
const UPLOAD_PLACEHOLDER: &str = "[ click to upload ]";

/// Render widgets top to bottom, one line each.
///
/// The focused text widget is marked with `*`.
pub fn render_canvas(records: &[WidgetRecord], focused: Option<usize>) -> String {
    if records.is_empty() {
        return "(empty canvas: drag a widget here)\n".to_string();
    }

    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        let marker = if focused == Some(index) { '*' } else { ' ' };
        let _ = match record.content() {
            WidgetContent::Text { text } => writeln!(out, "{marker}[{index}] text   {text:?}"),
            WidgetContent::Image { image: Some(image) } => {
                writeln!(out, "{marker}[{index}] image  {}", image.file_name)
            }
            WidgetContent::Image { image: None } => {
                writeln!(out, "{marker}[{index}] image  {UPLOAD_PLACEHOLDER}")
            }
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::{CanvasModel, WidgetKind};

    #[test]
    fn test_render_empty() {
        assert!(render_canvas(&[], None).starts_with("(empty canvas"));
    }

    #[test]
    fn test_render_widgets() {
        let mut canvas = CanvasModel::new();
        canvas.append(WidgetKind::Text);
        canvas.append(WidgetKind::Image);
        canvas.set_text(0, "Hello").unwrap();

        let out = render_canvas(canvas.records(), Some(0));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec!["*[0] text   \"Hello\"", " [1] image  [ click to upload ]"]);
    }
}
