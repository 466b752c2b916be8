//! The composition engine.
//!
//! [`Composer`] owns the canvas and its collaborators and is the single entry
//! point for user intents coming from a shell: drag start, drop, focus, text
//! input, file selection and save. A shell owns one instance and passes it to
//! its event handlers explicitly.

use crate::canvas::{CanvasChange, CanvasError, CanvasModel, SubscriptionId};
use crate::drag::{DragTransfer, DropSession, PendingDrag};
use crate::image::{BindingError, ImageBindingManager, RawFile, ResourceLocator, ResourceResolver};
use crate::persistence::{PersistedSnapshot, PersistenceAdapter};
use crate::storage::{KeyValueStore, StorageResult};
use crate::widget::{EditState, EditTracker, WidgetId, WidgetKind, WidgetRecord};

/// Default key snapshots are saved under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "pagecraft.canvas";

/// Composer configuration.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Store key the snapshot is written to.
    pub snapshot_key: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

/// Composition engine state.
pub struct Composer<S: KeyValueStore> {
    canvas: CanvasModel,
    drops: DropSession,
    editing: EditTracker,
    images: ImageBindingManager,
    persistence: PersistenceAdapter<S>,
    /// Whether there are changes since the last successful save.
    dirty: bool,
}

impl<S: KeyValueStore> Composer<S> {
    /// Create a composer with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(ComposerConfig::default(), store)
    }

    /// Create a composer with custom configuration.
    pub fn with_config(config: ComposerConfig, store: S) -> Self {
        Self {
            canvas: CanvasModel::new(),
            drops: DropSession::new(),
            editing: EditTracker::new(),
            images: ImageBindingManager::new(),
            persistence: PersistenceAdapter::new(store, config.snapshot_key),
            dirty: false,
        }
    }

    /// Read access to the canvas.
    pub fn canvas(&self) -> &CanvasModel {
        &self.canvas
    }

    /// Placed widgets, top to bottom.
    pub fn records(&self) -> &[WidgetRecord] {
        self.canvas.records()
    }

    pub fn images(&self) -> &ImageBindingManager {
        &self.images
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Register a render callback, run after every canvas change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&CanvasChange, &[WidgetRecord]) + 'static,
    {
        self.canvas.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.canvas.unsubscribe(id)
    }

    /// A palette item started being dragged.
    pub fn drag_start(&mut self, kind: WidgetKind, transfer: &mut dyn DragTransfer) -> PendingDrag {
        log::debug!("Drag started: {}", kind);
        self.drops.begin_drag(kind, transfer)
    }

    /// The drag ended somewhere other than the canvas.
    pub fn drag_cancel(&mut self) {
        if let Some(pending) = self.drops.cancel_drag() {
            log::debug!("Drag of {} ended outside the canvas", pending.kind);
        }
    }

    /// Something was dropped on the canvas.
    ///
    /// Returns the new widget, or `None` if the payload was not recognized.
    pub fn drop_on_canvas(&mut self, transfer: &dyn DragTransfer) -> Option<WidgetId> {
        match self.drops.complete_drop(transfer) {
            Ok(kind) => {
                let id = self.canvas.append(kind);
                self.dirty = true;
                log::info!("Dropped {} widget at {}", kind, self.canvas.len() - 1);
                Some(id)
            }
            Err(e) => {
                log::debug!("Ignoring drop: {}", e);
                None
            }
        }
    }

    /// A text widget gained keyboard focus.
    pub fn focus(&mut self, index: usize) -> Result<(), CanvasError> {
        let id = match self.canvas.check(index, WidgetKind::Text) {
            Ok(record) => record.id(),
            Err(e) => return Err(invariant_violation(e)),
        };
        self.editing.focus(id);
        Ok(())
    }

    /// The focused text widget lost focus.
    pub fn blur(&mut self) {
        self.editing.blur();
    }

    /// Editing state of the widget at `index`.
    pub fn edit_state(&self, index: usize) -> EditState {
        self.canvas
            .get(index)
            .map(|r| self.editing.state(r.id()))
            .unwrap_or_default()
    }

    /// Index of the text widget being edited, if any.
    pub fn focused(&self) -> Option<usize> {
        self.editing.focused().and_then(|id| self.canvas.index_of(id))
    }

    /// The text of a text widget changed.
    pub fn edit_text(&mut self, index: usize, value: impl Into<String>) -> Result<(), CanvasError> {
        self.canvas.set_text(index, value).map_err(invariant_violation)?;
        self.dirty = true;
        Ok(())
    }

    /// The file picker of an image widget returned.
    ///
    /// `file` is `None` when the picker was cancelled.
    pub fn select_file(
        &mut self,
        index: usize,
        file: Option<RawFile>,
        resolver: &mut dyn ResourceResolver,
    ) -> Result<Option<ResourceLocator>, BindingError> {
        let result = self
            .images
            .select_file(&mut self.canvas, index, file, resolver);
        match &result {
            Ok(Some(_)) => self.dirty = true,
            Ok(None) => {}
            Err(e) => log::warn!("Failed to bind image to widget {}: {}", index, e),
        }
        result
    }

    /// Write the current snapshot to the store.
    ///
    /// A failed write is logged and returned; the canvas is unaffected.
    pub fn save(&mut self) -> StorageResult<String> {
        match self.persistence.save(&self.canvas, &self.images) {
            Ok(json) => {
                self.dirty = false;
                Ok(json)
            }
            Err(e) => {
                log::error!("Failed to save canvas: {}", e);
                Err(e)
            }
        }
    }

    /// Snapshot of the current state, as it would be saved.
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::capture(&self.canvas, &self.images)
    }

    /// Check for changes since the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Shells only address widgets they rendered, so this is a caller bug.
fn invariant_violation(e: CanvasError) -> CanvasError {
    log::warn!("Rejected canvas mutation: {}", e);
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragPayload;
    use crate::image::DataUrlResolver;
    use crate::persistence::PersistedWidget;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn composer() -> (Arc<MemoryStorage>, Composer<Arc<MemoryStorage>>) {
        let store = Arc::new(MemoryStorage::new());
        (store.clone(), Composer::new(store))
    }

    /// Drag a palette item and drop it on the canvas.
    fn drag_and_drop<S: KeyValueStore>(composer: &mut Composer<S>, kind: WidgetKind) -> Option<WidgetId> {
        let mut transfer = DragPayload::new();
        composer.drag_start(kind, &mut transfer);
        composer.drop_on_canvas(&transfer)
    }

    #[test]
    fn test_drops_append_in_order() {
        let (_store, mut composer) = composer();
        let kinds = [WidgetKind::Image, WidgetKind::Text, WidgetKind::Text, WidgetKind::Image];

        for kind in kinds {
            assert!(drag_and_drop(&mut composer, kind).is_some());
        }

        let records = composer.records();
        assert_eq!(records.len(), kinds.len());
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.kind(), kinds[i]);
            assert_eq!(composer.canvas().index_of(record.id()), Some(i));
        }
    }

    #[test]
    fn test_empty_drop_is_ignored() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Text);

        assert_eq!(composer.drop_on_canvas(&DragPayload::new()), None);
        assert_eq!(composer.drop_on_canvas(&DragPayload::new()), None);
        assert_eq!(composer.records().len(), 1);
    }

    #[test]
    fn test_drag_cancel_then_empty_drop() {
        let (_store, mut composer) = composer();
        let mut transfer = DragPayload::new();
        composer.drag_start(WidgetKind::Text, &mut transfer);
        composer.drag_cancel();

        assert_eq!(composer.drop_on_canvas(&DragPayload::new()), None);
        assert!(composer.records().is_empty());
    }

    #[test]
    fn test_text_scenario() {
        let (store, mut composer) = composer();

        drag_and_drop(&mut composer, WidgetKind::Text).unwrap();
        assert_eq!(composer.records()[0].kind(), WidgetKind::Text);
        assert_eq!(composer.records()[0].text(), Some(""));

        composer.edit_text(0, "Hello").unwrap();
        assert_eq!(composer.records()[0].text(), Some("Hello"));

        let json = composer.save().unwrap();
        let stored = store.read(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        assert_eq!(stored, json);
        let snapshot = PersistedSnapshot::from_json(&stored).unwrap();
        assert_eq!(snapshot.last_text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_image_scenario() {
        let (store, mut composer) = composer();

        drag_and_drop(&mut composer, WidgetKind::Image).unwrap();
        assert!(composer.records()[0].image().is_none());

        let file = RawFile::new("photo.png", vec![0x89, 0x50, 0x4E, 0x47]);
        let locator = composer
            .select_file(0, Some(file), &mut DataUrlResolver)
            .unwrap()
            .unwrap();
        assert_eq!(composer.records()[0].image().unwrap().locator, locator);
        assert_eq!(composer.images().last_bound_name(), Some("photo.png"));

        composer.save().unwrap();
        let stored = store.read(DEFAULT_SNAPSHOT_KEY).unwrap().unwrap();
        let snapshot = PersistedSnapshot::from_json(&stored).unwrap();
        assert_eq!(snapshot.last_image.as_deref(), Some("photo.png"));
        assert!(!stored.contains(locator.as_str()));
    }

    #[test]
    fn test_text_then_image_are_independent() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Text);
        drag_and_drop(&mut composer, WidgetKind::Image);

        composer.edit_text(0, "caption").unwrap();
        assert!(composer.records()[1].image().is_none());

        composer
            .select_file(1, Some(RawFile::new("photo.png", vec![])), &mut DataUrlResolver)
            .unwrap();
        assert_eq!(composer.records()[0].text(), Some("caption"));

        assert_eq!(
            composer.snapshot().widgets,
            vec![
                PersistedWidget::Text { text: "caption".to_string() },
                PersistedWidget::Image { file: Some("photo.png".to_string()) },
            ]
        );
    }

    #[test]
    fn test_cancelled_picker_keeps_binding() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Image);
        composer
            .select_file(0, Some(RawFile::new("photo.png", vec![])), &mut DataUrlResolver)
            .unwrap();
        composer.save().unwrap();

        assert_eq!(composer.select_file(0, None, &mut DataUrlResolver), Ok(None));
        assert_eq!(composer.records()[0].image().unwrap().file_name, "photo.png");
        assert!(!composer.is_dirty());
    }

    #[test]
    fn test_invalid_targets_are_rejected() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Image);

        assert!(matches!(composer.edit_text(0, "x"), Err(CanvasError::KindMismatch { .. })));
        assert!(matches!(composer.edit_text(4, "x"), Err(CanvasError::OutOfRange { .. })));
        assert!(matches!(composer.focus(0), Err(CanvasError::KindMismatch { .. })));
        assert!(composer.is_dirty());
    }

    #[test]
    fn test_focus_state_machine() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Text);
        drag_and_drop(&mut composer, WidgetKind::Text);

        assert_eq!(composer.focused(), None);
        composer.focus(0).unwrap();
        assert_eq!(composer.edit_state(0), EditState::Editing);

        composer.focus(1).unwrap();
        assert_eq!(composer.edit_state(0), EditState::Idle);
        assert_eq!(composer.edit_state(1), EditState::Editing);
        assert_eq!(composer.focused(), Some(1));

        composer.blur();
        assert_eq!(composer.focused(), None);
        assert_eq!(composer.edit_state(7), EditState::Idle);
    }

    #[test]
    fn test_dirty_flag() {
        let (_store, mut composer) = composer();
        assert!(!composer.is_dirty());

        drag_and_drop(&mut composer, WidgetKind::Text);
        assert!(composer.is_dirty());

        composer.save().unwrap();
        assert!(!composer.is_dirty());

        composer.edit_text(0, "changed").unwrap();
        assert!(composer.is_dirty());
    }

    #[test]
    fn test_unchanged_saves_are_identical() {
        let (_store, mut composer) = composer();
        drag_and_drop(&mut composer, WidgetKind::Text);
        composer.edit_text(0, "Hello").unwrap();

        assert_eq!(composer.save().unwrap(), composer.save().unwrap());
    }

    #[test]
    fn test_custom_snapshot_key() {
        let store = Arc::new(MemoryStorage::new());
        let config = ComposerConfig {
            snapshot_key: "Data".to_string(),
        };
        let mut composer = Composer::with_config(config, store.clone());

        composer.save().unwrap();
        assert!(store.read("Data").unwrap().is_some());
        assert!(store.read(DEFAULT_SNAPSHOT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_subscribers_render_each_change() {
        let (_store, mut composer) = composer();
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let sink = rendered.clone();
        composer.subscribe(move |_, records| {
            sink.borrow_mut().push(records.len());
        });

        drag_and_drop(&mut composer, WidgetKind::Text);
        drag_and_drop(&mut composer, WidgetKind::Image);
        composer.edit_text(0, "a").unwrap();
        composer.drop_on_canvas(&DragPayload::new());

        assert_eq!(*rendered.borrow(), vec![1, 2, 2]);
    }
}
