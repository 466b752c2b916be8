//! Line-driven native shell.
//!
//! Reads one command per line, forwards it to the [`Composer`] and prints
//! the canvas again whenever the engine reports a change.

use crate::command::{Command, CommandError};
use crate::config::AppConfig;
use crate::render::render_canvas;
use pagecraft_core::storage::{FileStorage, create_default_storage};
use pagecraft_core::{
    Composer, DataUrlResolver, DragPayload, KeyValueStore, RawFile, StorageResult, palette,
};
use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

pub struct Shell<S: KeyValueStore> {
    title: String,
    composer: Composer<S>,
    /// Payload carried by the drag in progress.
    gesture: Option<DragPayload>,
    resolver: DataUrlResolver,
    /// Set by the canvas observer, cleared once the canvas is printed.
    needs_render: Rc<Cell<bool>>,
}

impl Shell<FileStorage> {
    /// Open a shell backed by file storage.
    pub fn open(config: AppConfig) -> StorageResult<Self> {
        let store = match &config.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => create_default_storage()?,
        };
        log::info!("Storing snapshots in {}", store.base_path().display());
        Ok(Self::with_store(&config, store))
    }
}

impl<S: KeyValueStore> Shell<S> {
    pub fn with_store(config: &AppConfig, store: S) -> Self {
        let mut composer = Composer::with_config(config.composer_config(), store);
        let needs_render = Rc::new(Cell::new(false));
        let flag = needs_render.clone();
        composer.subscribe(move |change, _| {
            log::trace!("Canvas changed: {:?}", change);
            flag.set(true);
        });

        Self {
            title: config.title.clone(),
            composer,
            gesture: None,
            resolver: DataUrlResolver,
            needs_render,
        }
    }

    pub fn composer(&self) -> &Composer<S> {
        &self.composer
    }

    /// Run a command and return what should be printed.
    pub fn execute(&mut self, command: Command) -> String {
        let mut out = match command {
            Command::Palette => palette()
                .iter()
                .map(|entry| format!("{:8} ({}={})\n", entry.label, entry.channel, entry.marker))
                .collect(),
            Command::Drag(kind) => {
                let mut payload = DragPayload::new();
                self.composer.drag_start(kind, &mut payload);
                self.gesture = Some(payload);
                format!("dragging {}\n", kind.label())
            }
            Command::Drop => {
                let payload = self.gesture.take().unwrap_or_default();
                match self.composer.drop_on_canvas(&payload) {
                    Some(_) => String::new(),
                    None => "nothing to drop\n".to_string(),
                }
            }
            Command::Release => {
                self.gesture = None;
                self.composer.drag_cancel();
                String::new()
            }
            Command::Focus(index) => match self.composer.focus(index) {
                Ok(()) => format!("editing [{index}]\n"),
                Err(e) => format!("{e}\n"),
            },
            Command::Blur => {
                self.composer.blur();
                String::new()
            }
            Command::Type { index, text } => match self.composer.edit_text(index, text) {
                Ok(()) => String::new(),
                Err(e) => format!("{e}\n"),
            },
            Command::Pick { index, path } => self.pick(index, path.as_deref()),
            Command::Save => match self.composer.save() {
                Ok(json) => format!("saved {} bytes\n", json.len()),
                Err(e) => format!("save failed: {e}\n"),
            },
            Command::Show => render_canvas(self.composer.records(), self.composer.focused()),
            Command::Saved => match self.composer.persistence().inspect() {
                Ok(Some(snapshot)) => match snapshot.to_json() {
                    Ok(json) => format!("{json}\n"),
                    Err(e) => format!("{e}\n"),
                },
                Ok(None) => "nothing saved yet\n".to_string(),
                Err(e) => format!("{e}\n"),
            },
            Command::Help => Command::usage().iter().map(|line| format!("{line}\n")).collect(),
            Command::Quit => String::new(),
        };

        if self.needs_render.replace(false) {
            out.push_str(&render_canvas(self.composer.records(), self.composer.focused()));
        }
        out
    }

    fn pick(&mut self, index: usize, path: Option<&Path>) -> String {
        let file = match path {
            Some(path) => match RawFile::from_path(path) {
                Ok(file) => Some(file),
                Err(e) => return format!("cannot read {}: {e}\n", path.display()),
            },
            None => match pick_with_dialog() {
                Ok(file) => file,
                Err(e) => return format!("cannot read selected file: {e}\n"),
            },
        };

        match self.composer.select_file(index, file, &mut self.resolver) {
            Ok(Some(_)) => String::new(),
            Ok(None) => "no file selected\n".to_string(),
            Err(e) => format!("{e}\n"),
        }
    }

    /// Read commands until end of input or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{} (type `help` for commands)", self.title)?;
        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    writeln!(output, "{e}")?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }

            write!(output, "{}", self.execute(command))?;
            output.flush()?;
        }

        if self.composer.is_dirty() {
            log::warn!("Exiting with unsaved changes");
        }
        Ok(())
    }
}

/// Ask the user for an image file. `Ok(None)` if the dialog was cancelled.
#[cfg(feature = "native")]
fn pick_with_dialog() -> io::Result<Option<RawFile>> {
    let dialog = rfd::FileDialog::new()
        .add_filter("Image", &["png", "jpg", "jpeg", "webp", "gif"])
        .set_title("Choose an image");

    match dialog.pick_file() {
        Some(path) => RawFile::from_path(&path).map(Some),
        None => Ok(None),
    }
}

#[cfg(not(feature = "native"))]
fn pick_with_dialog() -> io::Result<Option<RawFile>> {
    log::warn!("File dialog not available without the native feature");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::{MemoryStorage, PersistedSnapshot, WidgetKind};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn shell() -> (Arc<MemoryStorage>, Shell<Arc<MemoryStorage>>) {
        let store = Arc::new(MemoryStorage::new());
        (store.clone(), Shell::with_store(&AppConfig::default(), store))
    }

    fn exec(shell: &mut Shell<Arc<MemoryStorage>>, line: &str) -> String {
        shell.execute(Command::parse(line).unwrap())
    }

    #[test]
    fn test_drag_drop_renders_canvas() {
        let (_store, mut shell) = shell();

        assert_eq!(exec(&mut shell, "drag text"), "dragging Textbox\n");
        let out = exec(&mut shell, "drop");
        assert_eq!(out, " [0] text   \"\"\n");
    }

    #[test]
    fn test_drop_without_drag() {
        let (_store, mut shell) = shell();

        assert_eq!(exec(&mut shell, "drop"), "nothing to drop\n");
        assert!(shell.composer().records().is_empty());
    }

    #[test]
    fn test_release_discards_gesture() {
        let (_store, mut shell) = shell();
        exec(&mut shell, "drag image");
        exec(&mut shell, "release");

        assert_eq!(exec(&mut shell, "drop"), "nothing to drop\n");
    }

    #[test]
    fn test_payload_used_once() {
        let (_store, mut shell) = shell();
        exec(&mut shell, "drag image");
        exec(&mut shell, "drop");
        exec(&mut shell, "drop");

        assert_eq!(shell.composer().records().len(), 1);
    }

    #[test]
    fn test_type_and_save() {
        let (store, mut shell) = shell();
        exec(&mut shell, "drag text");
        exec(&mut shell, "drop");
        exec(&mut shell, "focus 0");
        let out = exec(&mut shell, "type 0 Hello");
        assert_eq!(out, "*[0] text   \"Hello\"\n");

        assert!(exec(&mut shell, "save").starts_with("saved "));
        let stored = store.read(pagecraft_core::DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        let snapshot = PersistedSnapshot::from_json(&stored).unwrap();
        assert_eq!(snapshot.last_text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_invalid_target_reported() {
        let (_store, mut shell) = shell();
        exec(&mut shell, "drag image");
        exec(&mut shell, "drop");

        assert!(exec(&mut shell, "type 0 nope").contains("expected Text"));
        assert!(exec(&mut shell, "type 3 nope").contains("out of range"));
    }

    #[test]
    fn test_pick_file_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]).unwrap();

        let (_store, mut shell) = shell();
        exec(&mut shell, "drag image");
        exec(&mut shell, "drop");
        let out = exec(&mut shell, &format!("pick 0 {}", path.display()));

        assert_eq!(out, " [0] image  photo.png\n");
        assert_eq!(shell.composer().images().last_bound_name(), Some("photo.png"));
        let image = shell.composer().records()[0].image().unwrap();
        assert!(image.locator.as_str().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_pick_missing_file_keeps_widget_unbound() {
        let (_store, mut shell) = shell();
        exec(&mut shell, "drag image");
        exec(&mut shell, "drop");

        let out = exec(&mut shell, "pick 0 /definitely/not/here.png");
        assert!(out.starts_with("cannot read"));
        assert!(shell.composer().records()[0].image().is_none());
    }

    #[test]
    fn test_saved_before_save() {
        let (_store, mut shell) = shell();
        assert_eq!(exec(&mut shell, "saved"), "nothing saved yet\n");
    }

    #[test]
    fn test_run_script() {
        let (_store, mut shell) = shell();
        let script = "drag text\ndrop\n\nbogus\ntype 0 Hi\nquit\ndrag image\ndrop\n";
        let mut output = Vec::new();

        shell.run(script.as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Unknown command: bogus"));
        let records = shell.composer().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), WidgetKind::Text);
        assert_eq!(records[0].text(), Some("Hi"));
    }

    #[test]
    fn test_open_with_storage_dir() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let mut shell = Shell::open(config).unwrap();

        shell.execute(Command::Drag(WidgetKind::Text));
        shell.execute(Command::Drop);
        shell.execute(Command::Save);

        let file = dir.path().join(format!("{}.json", pagecraft_core::DEFAULT_SNAPSHOT_KEY));
        assert!(file.exists());
    }
}
