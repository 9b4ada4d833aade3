//! Windowed desk scene application
//!
//! [`DeskApp`] owns the winit event loop. The window, render engine and scene
//! are created lazily on `resumed`, the scene is prepared once, and every
//! redraw walks the scene and presents a frame.
//!
//! Keys: `P` perspective, `O` orthographic, `Escape` quits. Mouse and
//! `W`/`A`/`S`/`D`/`Q`/`E` move the camera through [`CameraController`].

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::AppConfig;
use crate::gfx::{CameraController, GpuScene, RenderEngine};
use crate::scene::{desk::desk_scene, Camera, ProjectionMode, SceneDefinition};

pub struct DeskApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    definition: Option<SceneDefinition>,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Option<GpuScene>,
    controller: CameraController,
    error: Option<anyhow::Error>,
}

impl DeskApp {
    /// Create an application that renders the desk scene
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let definition = desk_scene(&config.texture_dir);
        Self::with_scene(config, definition)
    }

    /// Create an application that renders an arbitrary scene definition
    pub fn with_scene(config: AppConfig, definition: SceneDefinition) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                definition: Some(definition),
                window: None,
                render_engine: None,
                scene: None,
                controller: CameraController::default(),
                error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    ///
    /// Returns the first fatal error hit while running, if any.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.app_state)
            .context("Failed to run event loop")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window_handle = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        let window_clone = window_handle.clone();
        let config = self.config.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, &config).await
        })?;

        let definition = self
            .definition
            .take()
            .context("Scene definition already consumed")?;
        let mut scene = renderer.create_scene(definition, &self.config);
        let report = scene.prepare()?;
        if !report.failed_textures.is_empty() {
            log::warn!(
                "{} texture(s) failed to load; affected objects use the missing-texture color",
                report.failed_textures.len()
            );
        }

        self.scene = Some(scene);
        self.render_engine = Some(renderer);
        window_handle.request_redraw();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let (Some(render_engine), Some(scene), Some(window)) = (
            self.render_engine.as_mut(),
            self.scene.as_mut(),
            self.window.as_ref(),
        ) else {
            return;
        };

        let controller = &mut self.controller;

        match event {
            WindowEvent::KeyboardInput { event: key, .. } => {
                steer(scene, window, |camera| controller.process_key(&key, camera));

                if key.state != ElementState::Pressed {
                    return;
                }
                match key.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::KeyP) => {
                        scene.set_projection_mode(ProjectionMode::Perspective);
                        window.request_redraw();
                    }
                    PhysicalKey::Code(KeyCode::KeyO) => {
                        scene.set_projection_mode(ProjectionMode::Orthographic);
                        window.request_redraw();
                    }
                    _ => (),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                controller.process_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                steer(scene, window, |camera| controller.process_scroll(&delta, camera));
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
                if width > 0 && height > 0 {
                    scene.update_projection(render_engine.aspect_ratio());
                }
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => match render_engine.render_frame(scene) {
                Ok(stats) => log::trace!(
                    "Frame: {} draws, {} texture fallbacks, {} material misses",
                    stats.draws,
                    stats.texture_fallbacks,
                    stats.material_misses
                ),
                Err(err) => self.fail(event_loop, err),
            },
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let DeviceEvent::MouseMotion { delta } = event else {
            return;
        };
        let (Some(scene), Some(window)) = (self.scene.as_mut(), self.window.as_ref()) else {
            return;
        };

        let controller = &self.controller;
        steer(scene, window, |camera| controller.process_mouse_motion(delta, camera));
    }
}

/// Runs `update` on a copy of the scene camera and commits it if it moved.
fn steer(scene: &mut GpuScene, window: &Window, update: impl FnOnce(&mut Camera) -> bool) {
    let mut camera = *scene.camera();
    if update(&mut camera) {
        scene.set_camera(camera);
        window.request_redraw();
    }
}
