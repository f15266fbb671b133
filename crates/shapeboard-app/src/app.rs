//! Core application state and lifecycle.

use std::sync::Arc;

use kurbo::{Point, Size};
use peniko::Color;
use shapeboard_core::input::{InputState, Modifiers, MouseButton as CanvasButton, PointerEvent};
use shapeboard_core::{Scene, SceneEvent, seed};
use shapeboard_render::{RenderContext, Renderer, VelloRenderer};
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, pointer_blocked, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    /// Colour of the transform handle.
    pub selection_color: Color,
    /// Width of the text side panel, in logical pixels.
    pub panel_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapeboard".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            panel_width: 260.0,
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
    /// Converts the Rgba8 render target to the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    scene: Scene,
    input: InputState,
    config: AppConfig,

    event_handler: EventHandler,
}

impl AppState {
    /// Pointer position in canvas coordinates (logical pixels).
    fn canvas_point(&self, position: winit::dpi::PhysicalPosition<f64>) -> Point {
        let scale = self.window.scale_factor();
        Point::new(position.x / scale, position.y / scale)
    }

    fn dispatch(&mut self, event: SceneEvent) {
        if let Err(err) = self.scene.dispatch(event) {
            log::warn!("scene event rejected: {err}");
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
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
        }
    }

    /// Run the application with `config`.
    pub async fn run(config: AppConfig) {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface may be Bgra8Unorm.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

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

        let scene = Scene::new(seed::initial_shapes()).expect("Seed shapes have unique ids");

        log::info!(
            "Shapeboard initialized - {}x{}, {} shapes",
            surface.config.width,
            surface.config.height,
            scene.shapes().len()
        );
        log::info!("Shortcuts:");
        ShortcutRegistry::log_all();

        let ui_state = UiState {
            panel_width: self.config.panel_width,
            ..UiState::default()
        };

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            scene,
            input: InputState::new(),
            config: self.config.clone(),
            event_handler: EventHandler::new(),
        });

        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

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

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();
        let egui_blocks_press = pointer_blocked(&state.egui_ctx, egui_response.consumed);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.ui_state.panel.sync(&state.scene);

                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut action: Option<UiAction> = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    action = render_ui(ctx, &mut state.ui_state);
                });

                if let Some(UiAction::EditText(text)) = action {
                    if let Some(event) = state.ui_state.panel.input(text, &state.scene) {
                        state.dispatch(event);
                    }
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let render_ctx =
                    RenderContext::new(&state.scene, Size::new(width as f64, height as f64))
                        .with_scale_factor(state.window.scale_factor())
                        .with_background(state.config.background_color)
                        .with_selection_color(state.config.selection_color)
                        .with_live_node(state.event_handler.live_node());
                state.shape_renderer.build_scene(&render_ctx);
                let scene = state.shape_renderer.take_scene();

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        return;
                    }
                };

                let params = RenderParams {
                    base_color: state.shape_renderer.background_color(&render_ctx),
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello's compute shaders need a StorageBinding target, which
                // is only guaranteed for Rgba8Unorm.
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

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    &scene,
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });
                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );
                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                for (id, image_delta) in &egui_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(device, queue, *id, image_delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });
                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load,
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // egui-wgpu wants a 'static render pass.
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = state.canvas_point(position);
                state
                    .input
                    .handle_pointer_event(PointerEvent::Move { position: point });

                // A gesture that started on the canvas keeps tracking under the panel.
                if egui_wants_input && !state.event_handler.is_manipulating() {
                    return;
                }
                if state.input.is_button_pressed(CanvasButton::Left) {
                    let shift = state.input.modifiers.shift;
                    state.event_handler.handle_drag(point, shift);
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => CanvasButton::Left,
                    MouseButton::Right => CanvasButton::Right,
                    MouseButton::Middle => CanvasButton::Middle,
                    _ => return,
                };
                let position = state.input.pointer_position;

                match button_state {
                    ElementState::Pressed => {
                        if egui_blocks_press {
                            return;
                        }
                        state.egui_ctx.memory_mut(|m| m.stop_text_input());
                        state
                            .input
                            .handle_pointer_event(PointerEvent::Down { position, button });
                        if button == CanvasButton::Left {
                            state.event_handler.handle_press(
                                &mut state.scene,
                                position,
                                &state.input,
                            );
                        }
                    }
                    ElementState::Released => {
                        state
                            .input
                            .handle_pointer_event(PointerEvent::Up { position, button });
                        if button == CanvasButton::Left {
                            state.event_handler.handle_release(&mut state.scene);
                        }
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let m = modifiers.state();
                state.input.set_modifiers(Modifiers {
                    shift: m.shift_key(),
                    ctrl: m.control_key(),
                    alt: m.alt_key(),
                    meta: m.super_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed {
                    return;
                }
                if let Key::Named(NamedKey::Escape) = event.logical_key {
                    state.event_handler.cancel();
                    state.dispatch(SceneEvent::Deselect);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_keeps_config() {
        let config = AppConfig {
            title: "Board".to_string(),
            panel_width: 320.0,
            ..AppConfig::default()
        };
        let app = App::with_config(config);
        assert_eq!(app.config.title, "Board");
        assert_eq!(app.config.panel_width, 320.0);
        assert!(app.state.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Shapeboard");
        assert_eq!((config.width, config.height), (1280, 800));
    }
}
