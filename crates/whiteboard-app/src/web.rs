//! WebAssembly entry point and browser file handling.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use whiteboard_core::platform::{
    BoxFuture, DownloadError, Downloader, ImagePicker, PickedFile, mime_from_file_name,
};

thread_local! {
    /// Images picked asynchronously, waiting for the next frame.
    static PENDING_IMAGES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Queue a picked image's data URL for insertion.
pub fn queue_image(data_url: String) {
    PENDING_IMAGES.with(|queue| queue.borrow_mut().push(data_url));
}

/// Take every queued image.
pub fn take_pending_images() -> Vec<String> {
    PENDING_IMAGES.with(|queue| std::mem::take(&mut *queue.borrow_mut()))
}

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

/// Browser viewport in physical pixels, or the fallback when unknown.
pub fn viewport_physical_size(fallback_width: u32, fallback_height: u32) -> (u32, u32) {
    let Some(window) = web_sys::window() else {
        return (fallback_width, fallback_height);
    };
    let dpr = window.device_pixel_ratio();
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_width as f64);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback_height as f64);
    ((width * dpr) as u32, (height * dpr) as u32)
}

/// Find or create the full-viewport canvas element.
pub fn create_canvas(
    fallback_width: u32,
    fallback_height: u32,
) -> Option<web_sys::HtmlCanvasElement> {
    let document = document()?;

    // Remove loading indicator
    if let Some(loading) = document.get_element_by_id("loading") {
        loading.remove();
    }

    let canvas = document
        .get_element_by_id("whiteboard-canvas")
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .or_else(|| {
            let app_div = document.get_element_by_id("app")?;
            let canvas = document.create_element("canvas").ok()?;
            canvas.set_id("whiteboard-canvas");
            app_div.append_child(&canvas).ok()?;
            canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
        })?;

    let (width, height) = viewport_physical_size(fallback_width, fallback_height);
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    for (property, value) in [
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
    ] {
        let _ = style.set_property(property, value);
    }

    log::info!("Canvas created: {}x{} physical", width, height);
    Some(canvas)
}

/// Picks images through a hidden `<input type="file">`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserImagePicker;

impl BrowserImagePicker {
    /// Open the browser file chooser. Resolves with the chosen `File`, or
    /// `null` when the chooser is dismissed.
    fn open_file_input(accept: &str) -> Result<js_sys::Promise, JsValue> {
        let document = document().ok_or_else(|| JsValue::from_str("No document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No body"))?;
        let input = document
            .create_element("input")?
            .dyn_into::<web_sys::HtmlInputElement>()?;
        input.set_type("file");
        input.set_accept(accept);
        input.style().set_property("display", "none")?;

        let chooser = input.clone();
        let promise = js_sys::Promise::new(&mut |resolve: js_sys::Function, _reject| {
            let changed = chooser.clone();
            let resolve_change = resolve.clone();
            let onchange = Closure::once(Box::new(move |_event: web_sys::Event| {
                let file = changed
                    .files()
                    .and_then(|files| files.get(0))
                    .map(JsValue::from)
                    .unwrap_or(JsValue::NULL);
                let _ = resolve_change.call1(&JsValue::NULL, &file);
                changed.remove();
            }) as Box<dyn FnOnce(_)>);
            chooser.set_onchange(Some(onchange.as_ref().unchecked_ref()));
            onchange.forget();

            let cancelled = chooser.clone();
            let oncancel = Closure::once(Box::new(move |_event: web_sys::Event| {
                let _ = resolve.call1(&JsValue::NULL, &JsValue::NULL);
                cancelled.remove();
            }) as Box<dyn FnOnce(_)>);
            let _ = chooser
                .add_event_listener_with_callback("cancel", oncancel.as_ref().unchecked_ref());
            oncancel.forget();
        });

        body.append_child(&input)?;
        input.click();
        Ok(promise)
    }
}

impl ImagePicker for BrowserImagePicker {
    fn pick_image(&self, accept: &str) -> BoxFuture<'static, Option<PickedFile>> {
        let opened = Self::open_file_input(accept);
        Box::pin(async move {
            let promise = match opened {
                Ok(promise) => promise,
                Err(e) => {
                    log::error!("Failed to open file chooser: {:?}", e);
                    return None;
                }
            };
            let file = JsFuture::from(promise)
                .await
                .ok()?
                .dyn_into::<web_sys::File>()
                .ok()?;
            let buffer = match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => buffer,
                Err(e) => {
                    log::error!("Failed to read {}: {:?}", file.name(), e);
                    return None;
                }
            };
            let name = file.name();
            let mime = match file.type_() {
                mime if mime.is_empty() => mime_from_file_name(&name).to_string(),
                mime => mime,
            };
            Some(PickedFile {
                name,
                mime,
                bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
            })
        })
    }
}

/// Downloads through a temporary hidden anchor with the `download`
/// attribute, attached to the body for the duration of the click.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorDownloader;

impl Downloader for AnchorDownloader {
    fn download(&self, filename: &str, data_url: &str) -> Result<(), DownloadError> {
        let platform = |e: JsValue| DownloadError::Platform(format!("{:?}", e));
        let document = document().ok_or(DownloadError::NoDestination)?;
        let body = document.body().ok_or(DownloadError::NoDestination)?;
        let anchor = document
            .create_element("a")
            .map_err(platform)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|e| platform(e.into()))?;
        anchor.set_href(data_url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").map_err(platform)?;

        // Some browsers ignore clicks on detached anchors
        body.append_child(&anchor).map_err(platform)?;
        anchor.click();
        anchor.remove();
        log::info!("Downloaded {}", filename);
        Ok(())
    }
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
    }

    log::info!("Starting Whiteboard (WASM)");
    crate::App::run().await;
}
