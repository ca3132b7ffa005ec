//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use whiteboard_core::canvas::Canvas;
use whiteboard_core::input::{MouseButton as PointerButton, PointerEvent};
use whiteboard_core::interaction::CanvasInteraction;
use whiteboard_core::store::WhiteboardStore;
use whiteboard_core::surface::CanvasSurface;
use whiteboard_core::toolbar::{Outcome, WhiteboardToolbar};
use whiteboard_core::WhiteboardConfig;
use whiteboard_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub whiteboard: WhiteboardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Whiteboard".to_string(),
            width: 1280,
            height: 800,
            whiteboard: WhiteboardConfig::default(),
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Converts vello's RGBA output to the surface format
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // Whiteboard
    store: WhiteboardStore<Canvas>,
    toolbar: WhiteboardToolbar,
    interaction: CanvasInteraction,
    modifiers: ModifiersState,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application with default configuration.
    pub async fn run() {
        Self::run_with_config(AppConfig::default()).await;
    }

    /// Run the application.
    pub async fn run_with_config(config: AppConfig) {
        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {}", e);
                return;
            }
        };
        let app = App::with_config(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("Event loop error: {}", e);
            }
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> RenderResult<()> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("render context missing".to_string()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("{:?}", e)))?;

        // Vello renders to Rgba8Unorm but WebGPU surfaces are usually Bgra8Unorm
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        // The canvas lives in logical pixels
        let scale = window.scale_factor();
        let canvas_size = Size::new(
            surface.config.width as f64 / scale,
            surface.config.height as f64 / scale,
        );

        let whiteboard = &self.config.whiteboard;
        let mut store = WhiteboardStore::new(&whiteboard.store);
        store.set_canvas(Canvas::new(canvas_size));
        let toolbar = WhiteboardToolbar::new(whiteboard.toolbar.clone());
        // Bring the fresh canvas's brush in line with the initial tool
        let initial_tool = store.current_tool().clone();
        let _ = toolbar.handle_tool_change(&mut store, initial_tool);

        log::info!(
            "Whiteboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            store,
            toolbar,
            interaction: CanvasInteraction::new(),
            modifiers: ModifiersState::empty(),
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    fn to_canvas_point(&self, position: PhysicalPosition<f64>) -> Point {
        let logical = position.to_logical::<f64>(self.window.scale_factor());
        Point::new(logical.x, logical.y)
    }

    /// Run a toolbar action against the store.
    fn apply(&mut self, action: UiAction) {
        let toolbar = &mut self.toolbar;
        let store = &mut self.store;
        let outcome = match action {
            UiAction::SelectTool(kind) => {
                self.interaction.cancel();
                toolbar.handle_tool_change(store, kind)
            }
            UiAction::SetColor(color) => toolbar.handle_color_change(store, color),
            UiAction::SetBrushSize(size) => toolbar.handle_brush_size_change(store, size),
            UiAction::ToggleColorPicker => {
                toolbar.toggle_color_picker();
                Outcome::Applied
            }
            UiAction::ToggleBrushSizes => {
                toolbar.toggle_brush_sizes();
                Outcome::Applied
            }
            UiAction::AddText => toolbar.handle_add_text(store).0,
            UiAction::Clear => toolbar.handle_clear(store),
            UiAction::Save => {
                self.save();
                return;
            }
            UiAction::AddImage => {
                self.add_image();
                return;
            }
        };
        if !outcome.is_applied() {
            log::debug!("Toolbar action skipped, canvas not ready");
        }
    }

    fn save(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        let result = whiteboard_core::FileDownloader::default_location()
            .map_err(whiteboard_core::ToolbarError::from)
            .and_then(|downloader| self.toolbar.handle_save(&self.store, &downloader));

        #[cfg(target_arch = "wasm32")]
        let result = self
            .toolbar
            .handle_save(&self.store, &crate::web::AnchorDownloader);

        match result {
            Ok(Outcome::Applied) => {}
            Ok(Outcome::SurfaceNotReady) => log::debug!("Save skipped, canvas not ready"),
            Err(e) => log::error!("Failed to save canvas: {}", e),
        }
    }

    /// The native dialog is modal, so the pick is resolved on return.
    #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
    fn add_image(&mut self) {
        let picked = pollster::block_on(
            self.toolbar
                .handle_add_image(&crate::file_ops::DialogImagePicker),
        );
        if let Some(data_url) = picked {
            self.insert_image(&data_url);
        }
    }

    /// The picked image is inserted on a later frame.
    #[cfg(target_arch = "wasm32")]
    fn add_image(&mut self) {
        let picked = self
            .toolbar
            .handle_add_image(&crate::web::BrowserImagePicker);
        wasm_bindgen_futures::spawn_local(async move {
            if let Some(data_url) = picked.await {
                crate::web::queue_image(data_url);
            }
        });
    }

    #[cfg(not(any(feature = "native", target_arch = "wasm32")))]
    fn add_image(&mut self) {
        log::warn!("No image picker available on this platform");
    }

    fn insert_image(&mut self, data_url: &str) {
        match self.toolbar.complete_add_image(&mut self.store, data_url) {
            Ok((Outcome::Applied, _)) => {}
            Ok((Outcome::SurfaceNotReady, _)) => {
                log::debug!("Image dropped, canvas not ready")
            }
            Err(e) => log::error!("Failed to insert image: {}", e),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if self.interaction.handle_pointer(&mut self.store, event) {
            self.window.request_redraw();
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let command = self.modifiers.control_key() || self.modifiers.super_key();

        let editing = self
            .store
            .canvas()
            .is_some_and(|canvas| canvas.editing_text().is_some());
        if editing && !command {
            self.edit_text(event);
            return;
        }

        if let Key::Character(key) = &event.logical_key {
            if let Some(action) = ShortcutRegistry::lookup(key.as_str(), command) {
                self.apply(action);
            }
        }
    }

    /// Keys go to the text object being edited.
    fn edit_text(&mut self, event: &KeyEvent) {
        let Some(canvas) = self.store.canvas_mut() else {
            return;
        };
        let edited = match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                canvas.end_text_edit();
                true
            }
            Key::Named(NamedKey::Backspace) => canvas.backspace_text(),
            Key::Named(NamedKey::Enter) => canvas.type_text("\n"),
            _ => event
                .text
                .as_ref()
                .is_some_and(|text| canvas.type_text(text.as_str())),
        };
        if edited {
            canvas.render_all();
        }
    }

    fn redraw(&mut self, render_cx: &vello::util::RenderContext) {
        #[cfg(target_arch = "wasm32")]
        for data_url in crate::web::take_pending_images() {
            self.insert_image(&data_url);
        }

        // Run egui and get any action
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut ui_action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            ui_action = render_ui(ctx, &self.toolbar, &self.store);
        });
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(action) = ui_action {
            self.apply(action);
        }

        let Some(canvas) = self.store.canvas() else {
            log::warn!("No canvas registered, skipping frame");
            return;
        };
        let ctx = RenderContext::new(canvas, canvas.size())
            .with_scale_factor(self.window.scale_factor())
            .with_preview(self.interaction.preview_shape());
        self.shape_renderer.build_scene(&ctx);
        let base_color = self.shape_renderer.background_color(&ctx);
        let scene = self.shape_renderer.take_scene();

        let frame = EguiFrame {
            primitives: &egui_primitives,
            textures: &egui_output.textures_delta,
            pixels_per_point: egui_output.pixels_per_point,
        };
        if let Err(e) = self.render_frame(render_cx, &scene, base_color, frame) {
            log::warn!("Frame dropped: {}", e);
        }

        // Free egui textures
        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.interaction.end_frame();
        self.window.request_redraw();
    }

    /// Render the canvas scene with vello, then egui on top.
    fn render_frame(
        &mut self,
        render_cx: &vello::util::RenderContext,
        scene: &Scene,
        base_color: Color,
        overlay: EguiFrame<'_>,
    ) -> RenderResult<()> {
        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(format!("{:?}", e)))?;

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need StorageBinding, which WebGPU only
        // allows for Rgba8Unorm; the result is blitted to the surface
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &overlay.textures.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: overlay.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                overlay.primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, overlay.primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        surface_texture.present();
        Ok(())
    }
}

/// egui output needed to paint one frame.
struct EguiFrame<'a> {
    primitives: &'a [egui::ClippedPrimitive],
    textures: &'a egui::TexturesDelta,
    pixels_per_point: f32,
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let Some(canvas) = crate::web::create_canvas(self.config.width, self.config.height)
            else {
                log::error!("Failed to create canvas element");
                return;
            };
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {:?}", e);
                    event_loop.exit();
                    return;
                }
            };

            // Transmute lifetime to 'static - safe because App owns everything
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            if let Err(e) = self.finish_init(window, surface) {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
            }
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let (width, height) =
                        crate::web::viewport_physical_size(self.config.width, self.config.height);

                    // Get raw pointer to self for async callback
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");
                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(
                                window_clone.clone(),
                                width,
                                height,
                                PresentMode::AutoVsync,
                            )
                            .await
                        {
                            Ok(surface) => {
                                let surface: RenderSurface<'static> =
                                    unsafe { std::mem::transmute(surface) };

                                // SAFETY: WASM is single-threaded and the event
                                // loop keeps the App alive
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                if let Err(e) = app.finish_init(window_clone, surface) {
                                    log::error!("Failed to initialize renderer: {}", e);
                                    app.init_in_progress.set(false);
                                }
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                // Request redraw to keep the event loop running
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                let logical = size.to_logical::<f64>(state.window.scale_factor());
                if let Some(canvas) = state.store.canvas_mut() {
                    canvas.set_size(Size::new(logical.width, logical.height));
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if let Some(render_cx) = self.render_cx.as_ref() {
                    state.redraw(render_cx);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position = state.to_canvas_point(position);
                state.handle_pointer(PointerEvent::Move { position });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let position = state.interaction.input().pointer_position;
                match btn_state {
                    ElementState::Pressed if !egui_wants_pointer => {
                        state.handle_pointer(PointerEvent::Down { position, button });
                    }
                    // Releases always reach the canvas so drags can finish
                    ElementState::Released => {
                        state.handle_pointer(PointerEvent::Up { position, button });
                    }
                    ElementState::Pressed => {}
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if !state.egui_ctx.wants_keyboard_input() {
                    state.handle_key(&event);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            _ => {}
        }
    }
}
