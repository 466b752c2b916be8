//! Pagecraft Core Library
//!
//! Platform-agnostic composition engine for the Pagecraft page builder:
//! widget records, the drag/drop protocol that creates them, text editing
//! state, image binding and snapshot persistence.

pub mod canvas;
pub mod composer;
pub mod drag;
pub mod image;
pub mod persistence;
pub mod storage;
pub mod widget;

pub use canvas::{CanvasChange, CanvasError, CanvasModel, SubscriptionId};
pub use composer::{Composer, ComposerConfig, DEFAULT_SNAPSHOT_KEY};
pub use drag::{ClassificationError, DragPayload, DragTransfer, DropSession, PendingDrag};
pub use image::{
    BindingError, DataUrlResolver, ImageBindingManager, ImageFormat, RawFile, ResourceLocator,
    ResourceResolver,
};
pub use persistence::{PersistedSnapshot, PersistedWidget, PersistenceAdapter, SNAPSHOT_VERSION};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, StorageResult};
pub use widget::{
    BoundImage, EditState, EditTracker, PaletteEntry, WidgetContent, WidgetId, WidgetKind,
    WidgetRecord, palette,
};
