//! Editing state definitions.

/// The editing state of a text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    /// Displayed, not receiving keyboard input.
    #[default]
    Idle,
    /// Focused text surface receiving input.
    Editing,
}

impl EditState {
    /// Check if the widget is in editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }
}
