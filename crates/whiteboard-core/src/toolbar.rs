//! Toolbar controller: turns toolbar actions into store updates and surface
//! commands.
//!
//! Every handler that touches the surface reports [`Outcome::SurfaceNotReady`]
//! instead of acting when no surface is registered. Store updates happen
//! regardless.

use crate::color::CssColor;
use crate::config::ToolbarConfig;
use crate::platform::{BoxFuture, DownloadError, Downloader, ImagePicker};
use crate::shapes::{Shape, ShapeId, Text};
use crate::store::WhiteboardStore;
use crate::surface::{CanvasSurface, SurfaceError};
use crate::tools::{Tool, ToolKind};
use thiserror::Error;

/// Whether a handler reached the surface.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The surface was updated.
    Applied,
    /// No surface is registered; only the store changed, if anything.
    SurfaceNotReady,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Failures the toolbar can run into. The application logs them.
#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("export failed: {0}")]
    Export(#[source] SurfaceError),

    #[error("could not insert image: {0}")]
    Image(#[source] SurfaceError),

    #[error("download failed: {0}")]
    Download(#[from] DownloadError),
}

/// Result type for toolbar operations.
pub type ToolbarResult<T> = Result<T, ToolbarError>;

/// Toolbar state and handlers.
///
/// The two visibility flags are local to the toolbar and independent of the
/// store.
#[derive(Debug, Clone, Default)]
pub struct WhiteboardToolbar {
    config: ToolbarConfig,
    show_color_picker: bool,
    show_brush_sizes: bool,
}

impl WhiteboardToolbar {
    pub fn new(config: ToolbarConfig) -> Self {
        Self {
            config,
            show_color_picker: false,
            show_brush_sizes: false,
        }
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    pub fn show_color_picker(&self) -> bool {
        self.show_color_picker
    }

    pub fn show_brush_sizes(&self) -> bool {
        self.show_brush_sizes
    }

    pub fn toggle_color_picker(&mut self) {
        self.show_color_picker = !self.show_color_picker;
    }

    pub fn toggle_brush_sizes(&mut self) {
        self.show_brush_sizes = !self.show_brush_sizes;
    }

    /// Select a tool.
    ///
    /// With a surface, drawing mode is on exactly for pen and eraser. The pen
    /// takes the store's color and size. The eraser paints in the eraser color
    /// at a multiple of the store's size; it does not delete objects. Other
    /// tools leave the brush alone.
    pub fn handle_tool_change<S: CanvasSurface>(
        &self,
        store: &mut WhiteboardStore<S>,
        tool: impl Into<Tool>,
    ) -> Outcome {
        store.set_current_tool(tool);

        let Some((canvas, tool, color, size)) = store.canvas_with_values() else {
            log::debug!("Tool change before surface registration");
            return Outcome::SurfaceNotReady;
        };

        let kind = tool.kind();
        canvas.set_drawing_mode(kind.is_some_and(|k| k.uses_brush()));

        match kind {
            Some(ToolKind::Pen) => {
                let brush = canvas.brush_mut();
                brush.color = color.clone();
                brush.width = size;
            }
            Some(ToolKind::Eraser) => {
                let brush = canvas.brush_mut();
                brush.color = self.config.eraser_color.clone();
                brush.width = size * self.config.eraser_scale;
            }
            Some(_) => {}
            None => log::debug!("Unrecognized tool '{}' is inert", tool),
        }

        Outcome::Applied
    }

    /// Record a new color. The live brush follows only while drawing, and
    /// never while erasing: the eraser keeps painting in the eraser color.
    pub fn handle_color_change<S: CanvasSurface>(
        &self,
        store: &mut WhiteboardStore<S>,
        color: impl Into<CssColor>,
    ) -> Outcome {
        let color = color.into();
        store.set_current_color(color.clone());
        let erasing = store.current_tool().is(ToolKind::Eraser);

        let Some(canvas) = store.canvas_mut() else {
            return Outcome::SurfaceNotReady;
        };
        if canvas.is_drawing_mode() && !erasing {
            canvas.brush_mut().color = color;
        }
        Outcome::Applied
    }

    /// Record a new brush size. The live brush follows only while drawing,
    /// scaled by the eraser factor while erasing.
    pub fn handle_brush_size_change<S: CanvasSurface>(
        &self,
        store: &mut WhiteboardStore<S>,
        size: f64,
    ) -> Outcome {
        store.set_brush_size(size);
        let width = if store.current_tool().is(ToolKind::Eraser) {
            size * self.config.eraser_scale
        } else {
            size
        };

        let Some(canvas) = store.canvas_mut() else {
            return Outcome::SurfaceNotReady;
        };
        if canvas.is_drawing_mode() {
            canvas.brush_mut().width = width;
        }
        Outcome::Applied
    }

    /// Remove every object and repaint the background white. Not undoable.
    pub fn handle_clear<S: CanvasSurface>(&self, store: &mut WhiteboardStore<S>) -> Outcome {
        let Some(canvas) = store.canvas_mut() else {
            return Outcome::SurfaceNotReady;
        };
        let removed = canvas.object_count();
        canvas.clear();
        canvas.set_background(CssColor::white());
        canvas.render_all();
        log::info!("Cleared canvas ({} objects removed)", removed);
        Outcome::Applied
    }

    /// Export the surface at full quality and hand it to the downloader.
    pub fn handle_save<S: CanvasSurface, D: Downloader + ?Sized>(
        &self,
        store: &WhiteboardStore<S>,
        downloader: &D,
    ) -> ToolbarResult<Outcome> {
        let Some(canvas) = store.canvas() else {
            return Ok(Outcome::SurfaceNotReady);
        };
        let data_url = canvas
            .to_data_url(&self.config.export_options)
            .map_err(ToolbarError::Export)?;
        downloader.download(&self.config.export_filename, &data_url)?;
        log::info!("Saved canvas as {}", self.config.export_filename);
        Ok(Outcome::Applied)
    }

    /// Insert the default text object in the current color and select it.
    pub fn handle_add_text<S: CanvasSurface>(
        &self,
        store: &mut WhiteboardStore<S>,
    ) -> (Outcome, Option<ShapeId>) {
        let Some((canvas, _, color, _)) = store.canvas_with_values() else {
            return (Outcome::SurfaceNotReady, None);
        };
        let defaults = &self.config.text;
        let text = Text::new(defaults.position, defaults.content.clone(), color.clone())
            .with_font_family(defaults.font_family.clone())
            .with_font_size(defaults.font_size);

        let id = canvas.add(Shape::Text(text));
        canvas.set_active_object(id);
        canvas.render_all();
        log::debug!("Added text object {}", id);
        (Outcome::Applied, Some(id))
    }

    /// Prompt for an image file.
    ///
    /// The future resolves to the file as a `data:` URL, or `None` if the user
    /// cancelled. Pass the URL to [`Self::complete_add_image`]. Several of
    /// these may be in flight at once; each completes on its own.
    pub fn handle_add_image<P: ImagePicker + ?Sized>(
        &self,
        picker: &P,
    ) -> BoxFuture<'static, Option<String>> {
        let picked = picker.pick_image(&self.config.image_accept);
        Box::pin(async move {
            let file = picked.await?;
            log::debug!("Picked {} ({} bytes)", file.name, file.bytes.len());
            Some(file.to_data_url())
        })
    }

    /// Add a picked image, scaled to the configured width, and select it.
    pub fn complete_add_image<S: CanvasSurface>(
        &self,
        store: &mut WhiteboardStore<S>,
        data_url: &str,
    ) -> ToolbarResult<(Outcome, Option<ShapeId>)> {
        let Some(canvas) = store.canvas_mut() else {
            return Ok((Outcome::SurfaceNotReady, None));
        };
        let mut image = canvas
            .image_from_data_url(data_url)
            .map_err(ToolbarError::Image)?;
        image.scale_to_width(self.config.image_width);

        let id = canvas.add(Shape::Image(image));
        canvas.set_active_object(id);
        canvas.render_all();
        log::info!("Inserted image {}", id);
        Ok((Outcome::Applied, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::data_url::DataUrl;
    use crate::platform::PickedFile;
    use crate::shapes::Image;
    use crate::surface::{Brush, ExportOptions, SurfaceResult};
    use crate::test_support::{GIF_1X1, block_on, bmp_bytes, png_bytes, png_data_url};
    use kurbo::Size;
    use std::cell::RefCell;

    /// Surface fake that records what the toolbar asked of it.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        drawing_mode: bool,
        brush: Brush,
        objects: Vec<Shape>,
        active: Option<ShapeId>,
        background: CssColor,
        renders: usize,
        clears: usize,
        exports: RefCell<Vec<ExportOptions>>,
    }

    impl CanvasSurface for RecordingSurface {
        fn is_drawing_mode(&self) -> bool {
            self.drawing_mode
        }

        fn set_drawing_mode(&mut self, enabled: bool) {
            self.drawing_mode = enabled;
        }

        fn brush(&self) -> &Brush {
            &self.brush
        }

        fn brush_mut(&mut self) -> &mut Brush {
            &mut self.brush
        }

        fn add(&mut self, object: Shape) -> ShapeId {
            let id = object.id();
            self.objects.push(object);
            id
        }

        fn clear(&mut self) {
            self.objects.clear();
            self.active = None;
            self.background = CssColor::transparent();
            self.clears += 1;
        }

        fn set_active_object(&mut self, id: ShapeId) -> bool {
            let known = self.objects.iter().any(|o| o.id() == id);
            if known {
                self.active = Some(id);
            }
            known
        }

        fn active_object(&self) -> Option<ShapeId> {
            self.active
        }

        fn object_count(&self) -> usize {
            self.objects.len()
        }

        fn render_all(&mut self) {
            self.renders += 1;
        }

        fn background(&self) -> &CssColor {
            &self.background
        }

        fn set_background(&mut self, color: CssColor) {
            self.background = color;
        }

        fn to_data_url(&self, options: &ExportOptions) -> SurfaceResult<String> {
            self.exports.borrow_mut().push(*options);
            Ok("data:image/png;base64,AQID".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        downloads: RefCell<Vec<(String, String)>>,
    }

    impl Downloader for RecordingDownloader {
        fn download(&self, filename: &str, data_url: &str) -> Result<(), DownloadError> {
            self.downloads
                .borrow_mut()
                .push((filename.to_string(), data_url.to_string()));
            Ok(())
        }
    }

    struct FailingDownloader;

    impl Downloader for FailingDownloader {
        fn download(&self, _: &str, _: &str) -> Result<(), DownloadError> {
            Err(DownloadError::NoDestination)
        }
    }

    /// Picker that answers immediately.
    struct FixedPicker {
        file: Option<PickedFile>,
        accepted: RefCell<Option<String>>,
    }

    impl FixedPicker {
        fn new(file: Option<PickedFile>) -> Self {
            Self {
                file,
                accepted: RefCell::new(None),
            }
        }
    }

    impl ImagePicker for FixedPicker {
        fn pick_image(&self, accept: &str) -> BoxFuture<'static, Option<PickedFile>> {
            *self.accepted.borrow_mut() = Some(accept.to_string());
            let file = self.file.clone();
            Box::pin(async move { file })
        }
    }

    fn png_file(width: u32, height: u32) -> PickedFile {
        PickedFile {
            name: "pic.png".to_string(),
            mime: "image/png".to_string(),
            bytes: png_bytes(width, height),
        }
    }

    fn ready_store() -> WhiteboardStore<RecordingSurface> {
        let mut store = WhiteboardStore::default();
        store.set_canvas(RecordingSurface::default());
        store
    }

    fn surface(store: &WhiteboardStore<RecordingSurface>) -> &RecordingSurface {
        store.canvas().unwrap()
    }

    #[test]
    fn test_every_tool_updates_store() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        for kind in ToolKind::ALL {
            assert_eq!(toolbar.handle_tool_change(&mut store, kind), Outcome::Applied);
            assert_eq!(store.current_tool(), &Tool::Known(kind));
        }
    }

    #[test]
    fn test_pen_configures_brush() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        store.set_current_color("#ff8000");
        store.set_brush_size(14.0);

        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Pen);

        let canvas = surface(&store);
        assert!(canvas.drawing_mode);
        assert_eq!(canvas.brush.color.as_str(), "#ff8000");
        assert_eq!(canvas.brush.width, 14.0);
    }

    #[test]
    fn test_eraser_paints_white_at_double_width() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        store.set_current_color("#ff0000");
        store.set_brush_size(6.0);

        let _ = toolbar.handle_tool_change(&mut store, "eraser");

        let canvas = surface(&store);
        assert!(canvas.drawing_mode);
        assert!(canvas.brush.color.same_color(&CssColor::white()));
        assert_eq!(canvas.brush.width, 12.0);
        // Erasing paints; objects are never removed
        assert_eq!(canvas.clears, 0);
    }

    #[test]
    fn test_other_tools_leave_brush_alone() {
        let toolbar = WhiteboardToolbar::default();
        for tool in [
            Tool::from(ToolKind::Select),
            Tool::from(ToolKind::Rectangle),
            Tool::from(ToolKind::Circle),
            Tool::from("lasso"),
        ] {
            let mut store = ready_store();
            let _ = toolbar.handle_tool_change(&mut store, ToolKind::Pen);
            let before = surface(&store).brush.clone();
            store.set_current_color("#00ff00");
            store.set_brush_size(20.0);

            let _ = toolbar.handle_tool_change(&mut store, tool.clone());

            let canvas = surface(&store);
            assert!(!canvas.drawing_mode, "{tool} should leave drawing mode");
            assert_eq!(canvas.brush, before, "{tool} should not touch the brush");
        }
    }

    #[test]
    fn test_scenario_size_then_pen() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        store.set_brush_size(10.0);
        let _ = toolbar.handle_tool_change(&mut store, "pen");
        assert_eq!(surface(&store).brush.width, 10.0);
    }

    #[test]
    fn test_color_change_outside_drawing_mode() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Select);
        let before = surface(&store).brush.clone();

        assert_eq!(
            toolbar.handle_color_change(&mut store, "#0000ff"),
            Outcome::Applied
        );

        assert_eq!(store.current_color().as_str(), "#0000ff");
        assert_eq!(surface(&store).brush, before);
    }

    #[test]
    fn test_color_and_size_follow_while_drawing() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Pen);

        let _ = toolbar.handle_color_change(&mut store, "#8000ff");
        let _ = toolbar.handle_brush_size_change(&mut store, 16.0);

        let canvas = surface(&store);
        assert_eq!(canvas.brush.color.as_str(), "#8000ff");
        assert_eq!(canvas.brush.width, 16.0);
    }

    #[test]
    fn test_eraser_brush_stays_pinned() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Eraser);

        let _ = toolbar.handle_color_change(&mut store, "#ff0000");
        let _ = toolbar.handle_brush_size_change(&mut store, 4.0);

        assert_eq!(store.current_color().as_str(), "#ff0000");
        assert_eq!(store.brush_size(), 4.0);
        let canvas = surface(&store);
        assert!(canvas.brush.color.same_color(&CssColor::white()));
        assert_eq!(canvas.brush.width, 8.0);

        // The pen picks up the color chosen while erasing
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Pen);
        let canvas = surface(&store);
        assert_eq!(canvas.brush.color.as_str(), "#ff0000");
        assert_eq!(canvas.brush.width, 4.0);
    }

    #[test]
    fn test_size_change_outside_drawing_mode() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Circle);
        let _ = toolbar.handle_brush_size_change(&mut store, 8.0);
        assert_eq!(store.brush_size(), 8.0);
        assert_eq!(surface(&store).brush.width, Brush::default().width);
    }

    #[test]
    fn test_clear() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let _ = toolbar.handle_add_text(&mut store);
        let _ = toolbar.handle_add_text(&mut store);
        store.canvas_mut().unwrap().background = CssColor::new("#123456");

        assert_eq!(toolbar.handle_clear(&mut store), Outcome::Applied);

        let canvas = surface(&store);
        assert_eq!(canvas.object_count(), 0);
        assert_eq!(canvas.background.as_str(), CssColor::WHITE);
        assert_eq!(canvas.clears, 1);
        assert_eq!(canvas.renders, 3);
    }

    #[test]
    fn test_add_text() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        store.set_current_color("#ff00ff");

        let (outcome, id) = toolbar.handle_add_text(&mut store);
        assert_eq!(outcome, Outcome::Applied);

        let canvas = surface(&store);
        assert_eq!(canvas.object_count(), 1);
        assert_eq!(canvas.active_object(), id);

        let Shape::Text(text) = &canvas.objects[0] else {
            panic!("expected text");
        };
        assert_eq!(text.content(), "Double click to edit");
        assert_eq!(text.position, kurbo::Point::new(100.0, 100.0));
        assert_eq!(text.font_family, "Arial");
        assert_eq!(text.font_size, 20.0);
        assert_eq!(text.color().as_str(), "#ff00ff");
    }

    #[test]
    fn test_save_exports_full_quality_png() {
        let toolbar = WhiteboardToolbar::default();
        let store = ready_store();
        let downloader = RecordingDownloader::default();

        let outcome = toolbar.handle_save(&store, &downloader).unwrap();
        assert_eq!(outcome, Outcome::Applied);

        assert_eq!(
            surface(&store).exports.borrow().as_slice(),
            &[ExportOptions::default()]
        );
        assert_eq!(
            downloader.downloads.borrow().as_slice(),
            &[(
                "whiteboard.png".to_string(),
                "data:image/png;base64,AQID".to_string()
            )]
        );
    }

    #[test]
    fn test_save_reports_download_failure() {
        let toolbar = WhiteboardToolbar::default();
        let store = ready_store();
        assert!(matches!(
            toolbar.handle_save(&store, &FailingDownloader),
            Err(ToolbarError::Download(DownloadError::NoDestination))
        ));
    }

    #[test]
    fn test_add_image_flow() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let picker = FixedPicker::new(Some(png_file(400, 300)));

        let data_url = block_on(toolbar.handle_add_image(&picker)).unwrap();
        assert_eq!(picker.accepted.borrow().as_deref(), Some("image/*"));
        assert!(data_url.starts_with("data:image/png;base64,"));

        let (outcome, id) = toolbar.complete_add_image(&mut store, &data_url).unwrap();
        assert_eq!(outcome, Outcome::Applied);

        let canvas = surface(&store);
        assert_eq!(canvas.object_count(), 1);
        assert_eq!(canvas.active_object(), id);
        let image = canvas.objects[0].as_image().unwrap();
        assert_eq!(image.width, 200.0);
        assert_eq!(image.height, 150.0);
        assert_eq!(canvas.renders, 1);
    }

    #[test]
    fn test_add_image_cancelled() {
        let toolbar = WhiteboardToolbar::default();
        let picker = FixedPicker::new(None);
        assert!(block_on(toolbar.handle_add_image(&picker)).is_none());
    }

    #[test]
    fn test_add_image_concurrent_both_persist() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let first = toolbar.handle_add_image(&FixedPicker::new(Some(png_file(10, 10))));
        let second = toolbar.handle_add_image(&FixedPicker::new(Some(png_file(20, 10))));

        // Completion order decides the active object
        let second_url = block_on(second).unwrap();
        let first_url = block_on(first).unwrap();
        let _ = toolbar.complete_add_image(&mut store, &second_url).unwrap();
        let (_, last) = toolbar.complete_add_image(&mut store, &first_url).unwrap();

        let canvas = surface(&store);
        assert_eq!(canvas.object_count(), 2);
        assert_eq!(canvas.active_object(), last);
    }

    #[test]
    fn test_add_gif_and_bmp() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let gif = DataUrl::new("image/gif", GIF_1X1.to_vec()).to_string();
        let bmp = DataUrl::new("image/bmp", bmp_bytes(4, 2)).to_string();

        let (outcome, _) = toolbar.complete_add_image(&mut store, &gif).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        let (outcome, _) = toolbar.complete_add_image(&mut store, &bmp).unwrap();
        assert_eq!(outcome, Outcome::Applied);

        let canvas = surface(&store);
        assert_eq!(canvas.object_count(), 2);
        let gif = canvas.objects[0].as_image().unwrap();
        assert_eq!((gif.width, gif.height), (200.0, 200.0));
        let bmp = canvas.objects[1].as_image().unwrap();
        assert_eq!((bmp.width, bmp.height), (200.0, 100.0));
    }

    #[test]
    fn test_add_image_rejects_undecodable() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = ready_store();
        let bogus = DataUrl::new("image/png", b"nope".to_vec()).to_string();
        assert!(matches!(
            toolbar.complete_add_image(&mut store, &bogus),
            Err(ToolbarError::Image(_))
        ));
        assert_eq!(surface(&store).object_count(), 0);
    }

    #[test]
    fn test_no_surface_is_harmless() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = WhiteboardStore::<RecordingSurface>::default();
        let downloader = RecordingDownloader::default();

        assert_eq!(
            toolbar.handle_tool_change(&mut store, ToolKind::Eraser),
            Outcome::SurfaceNotReady
        );
        assert_eq!(
            toolbar.handle_color_change(&mut store, "#ff0000"),
            Outcome::SurfaceNotReady
        );
        assert_eq!(
            toolbar.handle_brush_size_change(&mut store, 4.0),
            Outcome::SurfaceNotReady
        );
        assert_eq!(toolbar.handle_clear(&mut store), Outcome::SurfaceNotReady);
        assert_eq!(toolbar.handle_add_text(&mut store), (Outcome::SurfaceNotReady, None));
        assert_eq!(
            toolbar.handle_save(&store, &downloader).unwrap(),
            Outcome::SurfaceNotReady
        );
        let (outcome, id) = toolbar
            .complete_add_image(&mut store, &png_data_url(4, 4))
            .unwrap();
        assert_eq!(outcome, Outcome::SurfaceNotReady);
        assert!(id.is_none());

        // Store values still change
        assert!(store.current_tool().is(ToolKind::Eraser));
        assert_eq!(store.current_color().as_str(), "#ff0000");
        assert_eq!(store.brush_size(), 4.0);
        assert!(downloader.downloads.borrow().is_empty());
    }

    #[test]
    fn test_flags_toggle_independently() {
        let mut toolbar = WhiteboardToolbar::default();
        assert!(!toolbar.show_color_picker());
        assert!(!toolbar.show_brush_sizes());

        toolbar.toggle_color_picker();
        assert!(toolbar.show_color_picker());
        assert!(!toolbar.show_brush_sizes());

        toolbar.toggle_brush_sizes();
        toolbar.toggle_color_picker();
        assert!(!toolbar.show_color_picker());
        assert!(toolbar.show_brush_sizes());
    }

    #[test]
    fn test_with_in_memory_canvas() {
        let toolbar = WhiteboardToolbar::default();
        let mut store = WhiteboardStore::default();
        store.set_canvas(Canvas::new(Size::new(64.0, 64.0)));

        store.set_brush_size(6.0);
        let _ = toolbar.handle_tool_change(&mut store, ToolKind::Eraser);
        let (_, text) = toolbar.handle_add_text(&mut store);
        let _ = toolbar
            .complete_add_image(&mut store, &png_data_url(100, 50))
            .unwrap();

        let canvas = store.canvas().unwrap();
        assert_eq!(canvas.brush().width, 12.0);
        assert_eq!(canvas.object_count(), 2);
        assert_ne!(canvas.active_object(), text);

        let _ = toolbar.handle_clear(&mut store);
        let canvas = store.canvas().unwrap();
        assert_eq!(canvas.object_count(), 0);
        assert!(canvas.background().same_color(&CssColor::white()));
    }

    #[test]
    fn test_image_from_surface_default() {
        let surface = RecordingSurface::default();
        let image: Image = surface.image_from_data_url(&png_data_url(8, 4)).unwrap();
        assert_eq!((image.source_width, image.source_height), (8, 4));
    }
}
