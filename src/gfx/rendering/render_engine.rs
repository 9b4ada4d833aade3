//! WGPU-based rendering engine for the desk scene
//!
//! Owns the surface, device and the single scene pipeline. Each frame the
//! engine lets the [`SceneManager`] walk its draw blocks, then submits the
//! draws the mesh library recorded with one dynamic uniform offset per draw.
//!
//! Bind groups:
//! - group 0: [`FrameUniform`] (camera and lights)
//! - group 1: [`ObjectUniform`] at a dynamic offset
//! - group 2: texture slot (texture + sampler), white fallback when untextured

use std::sync::Arc;

use anyhow::{anyhow, Context};
use wgpu::TextureFormat;

use crate::config::AppConfig;
use crate::gfx::meshes::ShapeMeshes;
use crate::gfx::resources::{
    FrameUniform, GpuTextureBackend, ObjectUniform, TextureResource, UniformShader,
};
use crate::scene::{FrameStats, SceneDefinition, SceneManager, ShaderStateBinder, TextureRegistry};
use crate::wgpu_utils::{
    binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
    DynamicUniformBuffer, UniformBuffer,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

/// Scene manager wired to the wgpu backends.
pub type GpuScene = SceneManager<UniformShader, ShapeMeshes, GpuTextureBackend>;

const SCENE_PIPELINE: &str = "Scene";
const INITIAL_DRAW_CAPACITY: usize = 64;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pub pipeline_manager: PipelineManager,

    frame_uniform: UniformBuffer<FrameUniform>,
    frame_bind_group: wgpu::BindGroup,

    object_layout: BindGroupLayoutWithDesc,
    object_uniforms: DynamicUniformBuffer<ObjectUniform>,
    object_bind_group: wgpu::BindGroup,

    texture_layout: BindGroupLayoutWithDesc,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `app_config` - Clear color and vsync preference
    ///
    /// # Returns
    /// Configured RenderEngine, or why no adapter/device/surface could be set up
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        app_config: &AppConfig,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(app_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let frame_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Frame Layout");
        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(
                std::mem::size_of::<ObjectUniform>() as u64,
            ))
            .create(&device, "Object Layout");
        let texture_layout = GpuTextureBackend::create_layout(&device);

        let frame_uniform = UniformBuffer::<FrameUniform>::new(&device);
        let frame_bind_group = BindGroupBuilder::new(&frame_layout)
            .resource(frame_uniform.binding_resource())
            .create(&device, "Frame Bind Group");

        let object_uniforms = DynamicUniformBuffer::<ObjectUniform>::new(
            &device,
            INITIAL_DRAW_CAPACITY,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let object_bind_group = BindGroupBuilder::new(&object_layout)
            .resource(object_uniforms.binding_resource())
            .create(&device, "Object Bind Group");

        let device_handle: Arc<wgpu::Device> = Arc::new(device);
        let queue_handle: Arc<wgpu::Queue> = Arc::new(queue);
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        // Planes and tori are seen from both sides
        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::new("Scene Pipeline", "scene")
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING))
                .with_bind_group_layouts(vec![
                    frame_layout.layout.clone(),
                    object_layout.layout.clone(),
                    texture_layout.layout.clone(),
                ]),
        );
        pipeline_manager
            .create_all_pipelines()
            .context("Failed to build render pipelines")?;

        let [r, g, b, a] = app_config.clear_color;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color { r, g, b, a },
            pipeline_manager,
            frame_uniform,
            frame_bind_group,
            object_layout,
            object_uniforms,
            object_bind_group,
            texture_layout,
        })
    }

    /// Builds an unprepared scene manager backed by this engine's device.
    pub fn create_scene(&self, definition: SceneDefinition, app_config: &AppConfig) -> GpuScene {
        let backend = GpuTextureBackend::new(
            self.device.clone(),
            self.queue.clone(),
            self.texture_layout.clone(),
        );
        let textures = TextureRegistry::new(backend, app_config.max_texture_slots);
        let meshes = ShapeMeshes::new(self.device.clone());

        SceneManager::new(definition, Some(UniformShader::new()), meshes, textures)
            .with_binder(ShaderStateBinder::new(app_config.missing_texture_color.into()))
            .with_projection_mode(app_config.projection_mode)
            .with_aspect_ratio(self.aspect_ratio())
    }

    /// Walks the scene and submits one frame
    ///
    /// # Returns
    /// Statistics of the scene walk. Lost or outdated surfaces are
    /// reconfigured and the frame is dropped.
    pub fn render_frame(&mut self, scene: &mut GpuScene) -> anyhow::Result<FrameStats> {
        let stats = scene.render()?;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                scene.meshes_mut().take_draws();
                return Ok(stats);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                scene.meshes_mut().take_draws();
                return Ok(stats);
            }
            Err(e) => return Err(anyhow!("Failed to acquire surface texture: {}", e)),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = scene.meshes_mut().take_draws();
        if let Some(shader) = scene.shader() {
            self.frame_uniform
                .update_content(&self.queue, shader.frame_uniform());
        }

        let objects: Vec<ObjectUniform> = draws.iter().map(|draw| draw.object).collect();
        if self.object_uniforms.write(&self.device, &self.queue, &objects) {
            log::debug!(
                "Object uniform buffer grown to {} draws",
                self.object_uniforms.capacity()
            );
            self.object_bind_group = BindGroupBuilder::new(&self.object_layout)
                .resource(self.object_uniforms.binding_resource())
                .create(&self.device, "Object Bind Group");
        }

        let pipeline = self.pipeline_manager.get_pipeline(SCENE_PIPELINE)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            let meshes = scene.meshes();
            let texture_backend = scene.textures().backend();

            for (index, draw) in draws.iter().enumerate() {
                let Some(mesh) = meshes.mesh(draw.mesh) else {
                    continue;
                };

                render_pass.set_bind_group(
                    1,
                    &self.object_bind_group,
                    &[self.object_uniforms.offset(index)],
                );
                render_pass.set_bind_group(
                    2,
                    texture_backend
                        .bind_group_for(draw.object.use_texture != 0, draw.object.texture_unit),
                    &[],
                );
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(stats)
    }

    /// Resizes the render engine surface and recreates depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    ///
    /// # Arguments
    /// * `width` - New surface width in pixels
    /// * `height` - New surface height in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    ///
    /// # Returns
    /// Tuple of (width, height) in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Width over height of the current surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Set VSync (vertical synchronization) state
    ///
    /// # Arguments
    /// * `enable` - Whether to enable VSync
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
