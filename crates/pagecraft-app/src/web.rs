//! WebAssembly entry point and DOM shell.
//!
//! Builds the navbar, the widget palette and the page container, wires the
//! browser drag/drop, input and file picker events into the [`Composer`], and
//! updates the DOM from canvas change notifications.

use crate::config::AppConfig;
use pagecraft_core::storage::{LocalStorage, create_default_storage};
use pagecraft_core::{
    BindingError, CanvasChange, Composer, DragTransfer, RawFile, ResourceLocator,
    ResourceResolver, WidgetKind, WidgetRecord, palette,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement};

/// Image shown in an image widget until a file is chosen.
const UPLOAD_PLACEHOLDER_SRC: &str = "./upload.jpg";

type SharedComposer = Rc<RefCell<Composer<LocalStorage>>>;

/// The browser's drag-transfer object.
struct DataTransferAdapter(web_sys::DataTransfer);

impl DragTransfer for DataTransferAdapter {
    fn set_data(&mut self, channel: &str, value: &str) {
        if let Err(e) = self.0.set_data(channel, value) {
            log::warn!("Failed to set drag data {}: {:?}", channel, e);
        }
    }

    fn get_data(&self, channel: &str) -> String {
        self.0.get_data(channel).unwrap_or_default()
    }
}

/// Resolves files to `blob:` URLs, revoked once no longer displayed.
struct BlobUrlResolver;

impl ResourceResolver for BlobUrlResolver {
    fn resolve(&mut self, file: &RawFile) -> Result<ResourceLocator, BindingError> {
        let to_error = |e: JsValue| BindingError::Resolve {
            name: file.name.clone(),
            reason: format!("{:?}", e),
        };

        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(file.mime_type());

        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(to_error)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(to_error)?;
        Ok(ResourceLocator::new(url))
    }

    fn release(&mut self, locator: &ResourceLocator) {
        if let Err(e) = web_sys::Url::revoke_object_url(locator.as_str()) {
            log::warn!("Failed to revoke {}: {:?}", locator, e);
        }
    }
}

/// Create an element with a class name.
fn element(document: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    el.set_class_name(class);
    Ok(el)
}

/// Attach a listener for the lifetime of the page.
fn listen<F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Applies canvas changes to the page container.
struct Renderer {
    document: Document,
    page: Element,
    composer: Weak<RefCell<Composer<LocalStorage>>>,
}

impl Renderer {
    fn apply(&self, change: &CanvasChange, records: &[WidgetRecord]) {
        let index = change.index();
        let Some(record) = records.get(index) else {
            return;
        };

        let result = match change {
            CanvasChange::Appended { .. } => self.append(index, record),
            CanvasChange::TextChanged { .. } => {
                self.sync_text(index, record);
                Ok(())
            }
            CanvasChange::ImageBound { .. } => {
                self.show_image(index, record);
                Ok(())
            }
        };
        if let Err(e) = result {
            log::error!("Failed to render widget {}: {:?}", index, e);
        }
    }

    fn append(&self, index: usize, record: &WidgetRecord) -> Result<(), JsValue> {
        let node = match record.kind() {
            WidgetKind::Text => self.text_widget(index)?,
            WidgetKind::Image => self.image_widget(index)?,
        };
        node.set_attribute("data-widget-id", &record.id().to_string())?;
        self.page.append_child(&node)?;
        Ok(())
    }

    fn text_widget(&self, index: usize) -> Result<Element, JsValue> {
        let area = element(&self.document, "textarea", "dropped-text")?;
        area.set_id(&format!("widget-{}", index));

        let composer = self.composer.clone();
        listen(&area, "input", move |event: web_sys::Event| {
            let Some(area) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            else {
                return;
            };
            if let Some(composer) = composer.upgrade() {
                let _ = composer.borrow_mut().edit_text(index, area.value());
            }
        })?;

        let composer = self.composer.clone();
        listen(&area, "focus", move |_: web_sys::Event| {
            if let Some(composer) = composer.upgrade() {
                let _ = composer.borrow_mut().focus(index);
            }
        })?;

        let composer = self.composer.clone();
        listen(&area, "blur", move |_: web_sys::Event| {
            if let Some(composer) = composer.upgrade() {
                composer.borrow_mut().blur();
            }
        })?;

        Ok(area)
    }

    fn image_widget(&self, index: usize) -> Result<Element, JsValue> {
        let wrapper = element(&self.document, "div", "image-widget")?;
        let drop_box = element(&self.document, "div", "drop-box")?;

        let img: HtmlImageElement = element(&self.document, "img", "preview")?.dyn_into()?;
        img.set_id(&format!("widget-{}-img", index));
        img.set_src(UPLOAD_PLACEHOLDER_SRC);
        drop_box.append_child(&img)?;

        // Kept outside the box so the synthetic click does not bubble back
        let input: HtmlInputElement = element(&self.document, "input", "file-input")?.dyn_into()?;
        input.set_type("file");
        input.set_accept("image/*");
        input.style().set_property("display", "none")?;

        let picker = input.clone();
        listen(&drop_box, "click", move |_: web_sys::Event| {
            picker.click();
        })?;

        let composer = self.composer.clone();
        listen(&input, "change", move |event: web_sys::Event| {
            let file = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            select_file(composer.clone(), index, file);
        })?;

        wrapper.append_child(&drop_box)?;
        wrapper.append_child(&input)?;
        Ok(wrapper)
    }

    fn sync_text(&self, index: usize, record: &WidgetRecord) {
        let Some(area) = self
            .document
            .get_element_by_id(&format!("widget-{}", index))
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let text = record.text().unwrap_or_default();
        if area.value() != text {
            area.set_value(text);
        }
    }

    fn show_image(&self, index: usize, record: &WidgetRecord) {
        let Some(img) = self
            .document
            .get_element_by_id(&format!("widget-{}-img", index))
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        if let Some(image) = record.image() {
            img.set_src(image.locator.as_str());
            img.set_alt(&image.file_name);
        }
    }
}

/// Read the chosen file and bind it. `None` means nothing was chosen.
fn select_file(composer: Weak<RefCell<Composer<LocalStorage>>>, index: usize, file: Option<web_sys::File>) {
    let Some(file) = file else {
        if let Some(composer) = composer.upgrade() {
            let _ = composer.borrow_mut().select_file(index, None, &mut BlobUrlResolver);
        }
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let name = file.name();
        let buffer = match wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("Failed to read {}: {:?}", name, e);
                return;
            }
        };
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

        if let Some(composer) = composer.upgrade() {
            let _ = composer
                .borrow_mut()
                .select_file(index, Some(RawFile::new(name, bytes)), &mut BlobUrlResolver);
        }
    });
}

/// Build the page and connect it to a new composer.
///
/// The event listeners own the composer for the lifetime of the page.
fn mount(config: AppConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("No body"))?;

    let store = create_default_storage().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let composer: SharedComposer = Rc::new(RefCell::new(Composer::with_config(
        config.composer_config(),
        store,
    )));

    // Navbar
    let navbar = element(&document, "div", "navbar")?;
    let title = element(&document, "span", "title")?;
    title.set_text_content(Some(&config.title));
    let save: HtmlElement = element(&document, "button", "save-button")?.dyn_into()?;
    save.set_text_content(Some("Save"));
    let shared = composer.clone();
    listen(&save, "click", move |_: web_sys::Event| {
        // Failures are logged by the composer
        let _ = shared.borrow_mut().save();
    })?;
    navbar.append_child(&title)?;
    navbar.append_child(&save)?;

    // Palette
    let widgets = element(&document, "div", "widgets")?;
    for entry in palette() {
        let item = element(&document, "div", "widget")?;
        item.set_attribute("draggable", "true")?;
        item.set_attribute("data-kind", entry.marker)?;
        item.set_text_content(Some(entry.label));

        let shared = composer.clone();
        listen(&item, "dragstart", move |event: web_sys::Event| {
            let event: web_sys::DragEvent = event.unchecked_into();
            if let Some(transfer) = event.data_transfer() {
                shared
                    .borrow_mut()
                    .drag_start(entry.kind, &mut DataTransferAdapter(transfer));
            }
        })?;

        let shared = composer.clone();
        listen(&item, "dragend", move |_: web_sys::Event| {
            shared.borrow_mut().drag_cancel();
        })?;

        widgets.append_child(&item)?;
    }

    // Page container: the only drop target
    let page = element(&document, "div", "page")?;
    listen(&page, "dragover", |event: web_sys::Event| {
        event.prevent_default();
    })?;
    let shared = composer.clone();
    listen(&page, "drop", move |event: web_sys::Event| {
        event.prevent_default();
        let event: web_sys::DragEvent = event.unchecked_into();
        if let Some(transfer) = event.data_transfer() {
            shared
                .borrow_mut()
                .drop_on_canvas(&DataTransferAdapter(transfer));
        }
    })?;

    body.append_child(&navbar)?;
    body.append_child(&widgets)?;
    body.append_child(&page)?;

    let renderer = Renderer {
        document,
        page,
        composer: Rc::downgrade(&composer),
    };
    composer
        .borrow_mut()
        .subscribe(move |change, records| renderer.apply(change, records));

    Ok(())
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting Pagecraft (WASM)");

    if let Err(e) = mount(AppConfig::default()) {
        log::error!("Failed to start Pagecraft: {:?}", e);
    }
}
