//! Focus tracking for text widgets.

use super::record::WidgetId;
use super::state::EditState;

/// Tracks which text widget, if any, is being edited.
///
/// At most one widget is in [`EditState::Editing`] at a time; focusing a
/// widget blurs the previous one. The tracker only knows about ids, kind
/// checks happen before a widget is focused.
#[derive(Debug, Clone, Default)]
pub struct EditTracker {
    /// Widget that has keyboard focus.
    focused: Option<WidgetId>,
}

impl EditTracker {
    /// Create a tracker with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Editing state of a widget.
    pub fn state(&self, id: WidgetId) -> EditState {
        if self.focused == Some(id) {
            EditState::Editing
        } else {
            EditState::Idle
        }
    }

    /// Enter editing mode for a widget.
    ///
    /// Returns the widget that lost focus, if it was a different one.
    pub fn focus(&mut self, id: WidgetId) -> Option<WidgetId> {
        let previous = self.focused.replace(id);
        previous.filter(|&old| old != id)
    }

    /// Exit editing mode. Returns the widget that was being edited.
    pub fn blur(&mut self) -> Option<WidgetId> {
        self.focused.take()
    }

    /// The focused widget, if any.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Check if a specific widget is being edited.
    pub fn is_editing(&self, id: WidgetId) -> bool {
        self.focused == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_focus_and_blur() {
        let mut tracker = EditTracker::new();
        let id = Uuid::new_v4();

        assert_eq!(tracker.state(id), EditState::Idle);
        assert_eq!(tracker.focus(id), None);
        assert!(tracker.is_editing(id));
        assert!(tracker.state(id).is_editing());

        assert_eq!(tracker.blur(), Some(id));
        assert_eq!(tracker.state(id), EditState::Idle);
        assert_eq!(tracker.focused(), None);
    }

    #[test]
    fn test_focus_moves_between_widgets() {
        let mut tracker = EditTracker::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        tracker.focus(a);
        assert_eq!(tracker.focus(b), Some(a));
        assert!(!tracker.is_editing(a));
        assert!(tracker.is_editing(b));
    }

    #[test]
    fn test_refocus_same_widget() {
        let mut tracker = EditTracker::new();
        let a = Uuid::new_v4();

        tracker.focus(a);
        assert_eq!(tracker.focus(a), None);
        assert!(tracker.is_editing(a));
    }

    #[test]
    fn test_blur_with_nothing_focused() {
        let mut tracker = EditTracker::new();
        assert_eq!(tracker.blur(), None);
    }
}
