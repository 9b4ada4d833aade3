//! Render pipeline management for wgpu
//!
//! Pipelines are registered as [`PipelineConfig`]s and built on first use,
//! then cached by name. All pipelines draw [`Vertex3D`] triangle lists.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use wgpu::*;

use super::vertex::Vertex3D;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Shader '{0}' has not been loaded")]
    ShaderNotFound(String),

    #[error("No pipeline registered under '{0}'")]
    UnknownPipeline(String),
}

/// Everything needed to build one render pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_target: ColorTargetState,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "shader.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            color_target: ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            },
        }
    }
}

impl PipelineConfig {
    /// Config drawing with the `vs_main`/`fs_main` entry points of `shader`
    pub fn new(label: &str, shader: &str) -> Self {
        Self {
            label: label.to_owned(),
            shader: shader.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    ///
    /// # Arguments
    /// * `layouts` - Bind group layouts in group index order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a depth buffer of `format` (builder pattern)
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Sets the single color target (builder pattern)
    ///
    /// # Arguments
    /// * `format` - Surface or render target format
    /// * `blend` - Blend state, `None` to overwrite
    pub fn with_color_target(mut self, format: TextureFormat, blend: Option<BlendState>) -> Self {
        self.color_target = ColorTargetState {
            format,
            blend,
            write_mask: ColorWrites::ALL,
        };
        self
    }
}

/// Caches shader modules and lazily built pipelines by name.
pub struct PipelineManager {
    device: Arc<Device>,
    shader_modules: HashMap<String, ShaderModule>,
    configs: HashMap<String, PipelineConfig>,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    /// # Arguments
    /// * `device` - Shared wgpu device for creating resources
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            shader_modules: HashMap::new(),
            configs: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles a WGSL shader module and stores it under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), module);
    }

    /// Registers (or replaces) a pipeline configuration without building it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipelines.remove(name);
        self.configs.insert(name.to_string(), config);
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Registered pipelines that have not been built yet
    pub fn pending_count(&self) -> usize {
        self.configs
            .keys()
            .filter(|name| !self.pipelines.contains_key(*name))
            .count()
    }

    /// Returns the pipeline, building it first if needed
    pub fn get_pipeline(&mut self, name: &str) -> Result<&RenderPipeline, PipelineError> {
        if !self.pipelines.contains_key(name) {
            let config = self
                .configs
                .get(name)
                .ok_or_else(|| PipelineError::UnknownPipeline(name.to_string()))?;
            let pipeline = self.build(name, config)?;
            log::debug!("Built pipeline '{}'", name);
            self.pipelines.insert(name.to_string(), pipeline);
        }

        self.pipelines
            .get(name)
            .ok_or_else(|| PipelineError::UnknownPipeline(name.to_string()))
    }

    /// Builds every registered pipeline now, so shader errors surface at startup
    pub fn create_all_pipelines(&mut self) -> Result<(), PipelineError> {
        let names: Vec<String> = self.configs.keys().cloned().collect();
        for name in names {
            self.get_pipeline(&name)?;
        }
        Ok(())
    }

    fn build(&self, name: &str, config: &PipelineConfig) -> Result<RenderPipeline, PipelineError> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| PipelineError::ShaderNotFound(config.shader.clone()))?;

        let layouts: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        Ok(self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(config.color_target.clone())],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                ..Default::default()
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
    }
}
