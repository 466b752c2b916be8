//! Binding selected image files to image widgets.

use crate::canvas::{CanvasError, CanvasModel};
use crate::widget::{BoundImage, WidgetKind};
use thiserror::Error;

/// Errors from binding a file to a widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error("Failed to resolve {name}: {reason}")]
    Resolve { name: String, reason: String },
}

/// Image format of a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }

        None
    }
}

/// A file handed over by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Format from content, falling back to the extension.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_magic_bytes(&self.bytes).or_else(|| {
            self.name
                .rsplit_once('.')
                .and_then(|(_, ext)| ImageFormat::from_extension(ext))
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format()
            .map(|f| f.mime_type())
            .unwrap_or("application/octet-stream")
    }
}

/// Session-scoped reference used to display a bound image.
///
/// Not valid across reloads and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns selected files into displayable locators.
pub trait ResourceResolver {
    /// Create a locator for a file.
    fn resolve(&mut self, file: &RawFile) -> Result<ResourceLocator, BindingError>;

    /// Release a locator that is no longer displayed.
    fn release(&mut self, _locator: &ResourceLocator) {}
}

/// Resolves files to base64 `data:` URLs. Works on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlResolver;

impl ResourceResolver for DataUrlResolver {
    fn resolve(&mut self, file: &RawFile) -> Result<ResourceLocator, BindingError> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        Ok(ResourceLocator::new(format!(
            "data:{};base64,{}",
            file.mime_type(),
            STANDARD.encode(&file.bytes)
        )))
    }
}

/// Binds selected files to image widgets and remembers the latest binding.
#[derive(Debug, Clone, Default)]
pub struct ImageBindingManager {
    last_bound: Option<BoundImage>,
}

impl ImageBindingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the file chosen in the picker to the image widget at `index`.
    ///
    /// `None` means the picker was cancelled: nothing changes and `Ok(None)`
    /// is returned. The target is checked before the file is resolved, so a
    /// rejected bind leaves no locator behind.
    pub fn select_file(
        &mut self,
        canvas: &mut CanvasModel,
        index: usize,
        file: Option<RawFile>,
        resolver: &mut dyn ResourceResolver,
    ) -> Result<Option<ResourceLocator>, BindingError> {
        let Some(file) = file else {
            log::debug!("File selection cancelled for widget {}", index);
            return Ok(None);
        };

        canvas.check(index, WidgetKind::Image)?;
        let locator = resolver.resolve(&file)?;
        let bound = BoundImage {
            file_name: file.name,
            locator: locator.clone(),
        };

        let previous = match canvas.bind_image(index, bound.clone()) {
            Ok(previous) => previous,
            Err(e) => {
                resolver.release(&locator);
                return Err(e.into());
            }
        };
        if let Some(previous) = previous {
            if previous.locator != locator {
                resolver.release(&previous.locator);
            }
        }

        log::info!("Bound {} to image widget {}", bound.file_name, index);
        self.last_bound = Some(bound);
        Ok(Some(locator))
    }

    /// Name of the most recently bound file, across the whole canvas.
    pub fn last_bound_name(&self) -> Option<&str> {
        self.last_bound.as_ref().map(|b| b.file_name.as_str())
    }

    /// Locator of the most recently bound file.
    pub fn last_bound_locator(&self) -> Option<&ResourceLocator> {
        self.last_bound.as_ref().map(|b| &b.locator)
    }
}
