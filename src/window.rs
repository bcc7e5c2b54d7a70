use std::{sync::Arc, time::Duration};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    engine::{self, FrameClock},
    rendering::renderer::Renderer,
    ui,
    viewer::{ViewerOptions, ViewerState},
};

const WINDOW_TITLE: &str = "Conveyors";
/// Pixel scroll distance that counts as one wheel notch.
const PIXELS_PER_LINE: f32 = 50.0;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

#[derive(Debug, Default)]
struct MouseState {
    position: Vec2,
    orbiting: bool,
    panning: bool,
}

struct App {
    renderer: Option<Renderer>,
    viewer: ViewerState,
    imgui: Option<ImguiState>,
    mouse: MouseState,
    clock: FrameClock,
}

impl App {
    fn from_viewer_state(viewer: ViewerState) -> Self {
        Self {
            renderer: None,
            viewer,
            imgui: None,
            mouse: MouseState::default(),
            clock: FrameClock::default(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes().with_title(WINDOW_TITLE);
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        let mut imgui = Self::setup_imgui(&window);
        let renderer = pollster::block_on(Renderer::new(
            Arc::new(window),
            &self.viewer,
            &mut imgui.context,
        ))
        .context("Failed to create renderer")?;

        self.imgui = Some(imgui);
        self.renderer = Some(renderer);

        Ok(())
    }

    fn handle_mouse(&mut self, event: &WindowEvent, capture_mouse: bool) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };
        let viewport_height = renderer.size.height.max(1) as f32;
        let camera = &mut self.viewer.camera;

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                let delta = position - self.mouse.position;
                self.mouse.position = position;

                if self.mouse.orbiting {
                    camera.orbit(delta, viewport_height);
                } else if self.mouse.panning {
                    camera.pan(delta, viewport_height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed && !capture_mouse;
                match button {
                    MouseButton::Left => self.mouse.orbiting = pressed,
                    MouseButton::Right => self.mouse.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !capture_mouse => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                camera.zoom(steps);
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let delta_time = self.clock.tick();
        imgui
            .context
            .io_mut()
            .update_delta_time(Duration::from_secs_f32(delta_time));

        renderer.window.request_redraw();

        if let Err(e) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::error!("Failed to prepare Imgui frame: {e}");
            return;
        }

        let frame = imgui.context.new_frame();
        let actions = ui::draw_config_panel(frame, &mut self.viewer);
        imgui.platform.prepare_render(frame, &renderer.window);

        engine::update(&mut self.viewer, delta_time, actions);

        match renderer.render(&self.viewer, &mut imgui.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(renderer), Some(imgui)) = (self.renderer.as_ref(), self.imgui.as_mut()) {
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                &renderer.window,
                &Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                },
            );
        }

        let capture_mouse = self
            .imgui
            .as_ref()
            .is_some_and(|imgui| imgui.context.io().want_capture_mouse);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => self.handle_mouse(&event, capture_mouse),
        }
    }
}

pub async fn run(options: ViewerOptions) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let viewer = ViewerState::new(&options).context("Failed to create viewer state")?;
    let mut app = App::from_viewer_state(viewer);
    event_loop.run_app(&mut app)?;

    Ok(())
}
