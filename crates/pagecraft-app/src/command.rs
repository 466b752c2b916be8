//! Line commands understood by the native shell.

use pagecraft_core::WidgetKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Not a widget index: {0}")]
    InvalidIndex(String),
    #[error("Unknown widget kind: {0} (expected text or image)")]
    UnknownKind(String),
}

/// A user intent typed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the widget palette.
    Palette,
    /// Pick up a palette item.
    Drag(WidgetKind),
    /// Drop whatever is being dragged on the canvas.
    Drop,
    /// Let go of the dragged item outside the canvas.
    Release,
    /// Focus a text widget.
    Focus(usize),
    Blur,
    /// Replace the text of a text widget.
    Type { index: usize, text: String },
    /// Choose a file for an image widget. Without a path a dialog is shown.
    Pick { index: usize, path: Option<PathBuf> },
    Save,
    /// Print the canvas.
    Show,
    /// Print the stored snapshot.
    Saved,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "palette" => Ok(Command::Palette),
            "drag" => {
                let kind = required(rest, "drag", "widget kind")?;
                parse_kind(kind).map(Command::Drag)
            }
            "drop" => Ok(Command::Drop),
            "release" => Ok(Command::Release),
            "focus" => parse_index(required(rest, "focus", "widget index")?).map(Command::Focus),
            "blur" => Ok(Command::Blur),
            "type" => {
                let args = required(rest, "type", "widget index")?;
                let (index, text) = args.split_once(' ').unwrap_or((args, ""));
                Ok(Command::Type {
                    index: parse_index(index)?,
                    text: text.to_string(),
                })
            }
            "pick" => {
                let args = required(rest, "pick", "widget index")?;
                let (index, path) = match args.split_once(' ') {
                    Some((index, path)) => (index, Some(PathBuf::from(path.trim()))),
                    None => (args, None),
                };
                Ok(Command::Pick {
                    index: parse_index(index)?,
                    path,
                })
            }
            "save" => Ok(Command::Save),
            "show" => Ok(Command::Show),
            "saved" => Ok(Command::Saved),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Usage lines for `help`.
    pub fn usage() -> &'static [&'static str] {
        &[
            "palette              list draggable widgets",
            "drag <text|image>    pick up a palette item",
            "drop                 drop it on the canvas",
            "release              let go outside the canvas",
            "focus <n> / blur     start or stop editing a text widget",
            "type <n> <text>      set the text of widget n",
            "pick <n> [path]      choose an image for widget n",
            "show                 print the canvas",
            "save / saved         write the snapshot / print the stored one",
            "quit",
        ]
    }
}

fn required<'a>(rest: &'a str, command: &'static str, argument: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn parse_index(s: &str) -> Result<usize, CommandError> {
    s.trim()
        .parse()
        .map_err(|_| CommandError::InvalidIndex(s.to_string()))
}

fn parse_kind(s: &str) -> Result<WidgetKind, CommandError> {
    WidgetKind::ALL
        .into_iter()
        .find(|kind| kind.drag_marker().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| CommandError::UnknownKind(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("drop"), Ok(Command::Drop));
        assert_eq!(Command::parse("  SAVE  "), Ok(Command::Save));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
    }

    #[test]
    fn test_parse_drag() {
        assert_eq!(Command::parse("drag text"), Ok(Command::Drag(WidgetKind::Text)));
        assert_eq!(Command::parse("drag Image"), Ok(Command::Drag(WidgetKind::Image)));
        assert_eq!(
            Command::parse("drag video"),
            Err(CommandError::UnknownKind("video".to_string()))
        );
        assert!(matches!(
            Command::parse("drag"),
            Err(CommandError::MissingArgument { command: "drag", .. })
        ));
    }

    #[test]
    fn test_parse_type_keeps_spaces() {
        assert_eq!(
            Command::parse("type 0 Hello  world"),
            Ok(Command::Type {
                index: 0,
                text: "Hello  world".to_string()
            })
        );
        assert_eq!(
            Command::parse("type 2"),
            Ok(Command::Type {
                index: 2,
                text: String::new()
            })
        );
        assert_eq!(
            Command::parse("type x hi"),
            Err(CommandError::InvalidIndex("x".to_string()))
        );
    }

    #[test]
    fn test_parse_pick() {
        assert_eq!(
            Command::parse("pick 1 /tmp/photo.png"),
            Ok(Command::Pick {
                index: 1,
                path: Some(PathBuf::from("/tmp/photo.png"))
            })
        );
        assert_eq!(Command::parse("pick 1"), Ok(Command::Pick { index: 1, path: None }));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("resize 0"),
            Err(CommandError::Unknown("resize".to_string()))
        );
    }
}
