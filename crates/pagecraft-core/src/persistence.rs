//! Snapshot persistence.
//!
//! A save flattens the canvas into a [`PersistedSnapshot`] and writes it as
//! JSON under a single key, replacing the previous snapshot. Image widgets
//! are recorded by file name; display locators are session-scoped and never
//! written.

use crate::canvas::CanvasModel;
use crate::image::ImageBindingManager;
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::widget::{WidgetContent, WidgetKind};
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One widget in a saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PersistedWidget {
    Text { text: String },
    Image { file: Option<String> },
}

impl PersistedWidget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            PersistedWidget::Text { .. } => WidgetKind::Text,
            PersistedWidget::Image { .. } => WidgetKind::Image,
        }
    }
}

/// Serialized canvas state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub version: u32,
    /// Every widget, in canvas order.
    pub widgets: Vec<PersistedWidget>,
    /// Text of the most recently edited text widget.
    pub last_text: Option<String>,
    /// Name of the most recently bound image file.
    pub last_image: Option<String>,
}

impl PersistedSnapshot {
    /// Build a snapshot from the current canvas state.
    pub fn capture(canvas: &CanvasModel, images: &ImageBindingManager) -> Self {
        let widgets = canvas
            .iter()
            .map(|record| match record.content() {
                WidgetContent::Text { text } => PersistedWidget::Text { text: text.clone() },
                WidgetContent::Image { image } => PersistedWidget::Image {
                    file: image.as_ref().map(|b| b.file_name.clone()),
                },
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            widgets,
            last_text: canvas
                .last_edited()
                .and_then(|r| r.text())
                .map(str::to_string),
            last_image: images.last_bound_name().map(str::to_string),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Writes snapshots to a key-value store.
#[derive(Debug)]
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key snapshots are written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Capture the canvas and write it, replacing the previous snapshot.
    ///
    /// Returns the JSON that was written.
    pub fn save(&self, canvas: &CanvasModel, images: &ImageBindingManager) -> StorageResult<String> {
        let snapshot = PersistedSnapshot::capture(canvas, images);
        let json = snapshot
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.store.write(&self.key, &json)?;
        log::info!("Saved {} widgets under {}", snapshot.widgets.len(), self.key);
        Ok(json)
    }

    /// Read the stored snapshot back, without touching the canvas.
    pub fn inspect(&self) -> StorageResult<Option<PersistedSnapshot>> {
        let Some(json) = self.store.read(&self.key)? else {
            return Ok(None);
        };

        PersistedSnapshot::from_json(&json)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", self.key, e)))
    }
}
