//! wgpu texture backend
//!
//! Uploads registry textures to the GPU and keeps one bind group per texture
//! slot. Draws that don't sample a texture get a 1x1 white fallback so the
//! pipeline layout is always satisfied.

use std::sync::Arc;

use crate::gfx::resources::texture_resource::TextureResource;
use crate::scene::{DecodedImage, TextureBackend};
use crate::wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};

struct SlotBinding {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// [`TextureBackend`] that owns real GPU textures.
pub struct GpuTextureBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    layout: BindGroupLayoutWithDesc,
    slots: Vec<Option<SlotBinding>>,
    fallback: wgpu::BindGroup,
    // Keeps the fallback texture alive for the lifetime of its bind group
    _fallback_texture: TextureResource,
}

impl GpuTextureBackend {
    /// Layout of the per-slot texture bind group: texture then sampler.
    pub fn create_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Texture Slot Layout")
    }

    /// # Arguments
    /// * `device` - Shared wgpu device
    /// * `queue` - Shared wgpu queue used for pixel uploads
    /// * `layout` - Layout the render pipeline expects at the texture group
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        layout: BindGroupLayoutWithDesc,
    ) -> Self {
        let fallback_texture =
            TextureResource::create_solid_color(&device, &queue, [255, 255, 255, 255], "Fallback Texture");
        let fallback = BindGroupBuilder::new(&layout)
            .texture(&fallback_texture.view)
            .sampler(&fallback_texture.sampler)
            .create(&device, "Fallback Texture Bind Group");

        Self {
            device,
            queue,
            layout,
            slots: Vec::new(),
            fallback,
            _fallback_texture: fallback_texture,
        }
    }

    pub fn layout(&self) -> &BindGroupLayoutWithDesc {
        &self.layout
    }

    /// Bind group to use for a draw.
    ///
    /// Returns the bind group of `unit` when the draw samples a texture and the
    /// slot is bound, otherwise the white fallback.
    pub fn bind_group_for(&self, use_texture: bool, unit: i32) -> &wgpu::BindGroup {
        if !use_texture {
            return &self.fallback;
        }
        usize::try_from(unit)
            .ok()
            .and_then(|slot| self.slots.get(slot))
            .and_then(|binding| binding.as_ref())
            .map(|binding| &binding.bind_group)
            .unwrap_or(&self.fallback)
    }

    /// Number of slots currently holding a bound texture.
    pub fn bound_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl TextureBackend for GpuTextureBackend {
    type Handle = TextureResource;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> Result<TextureResource, String> {
        let texture = TextureResource::create_scene_texture(&self.device, &self.queue, image, label)?;
        log::debug!(
            "Uploaded texture '{}' ({}x{}, {} mip levels)",
            label,
            image.width,
            image.height,
            texture.texture.mip_level_count()
        );
        Ok(texture)
    }

    fn bind(&mut self, slot: usize, handle: &TextureResource) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }

        let bind_group = BindGroupBuilder::new(&self.layout)
            .texture(&handle.view)
            .sampler(&handle.sampler)
            .create(&self.device, &format!("Texture Slot {}", slot));
        self.slots[slot] = Some(SlotBinding {
            texture: handle.texture.clone(),
            bind_group,
        });
    }

    fn release(&mut self, handle: TextureResource) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|binding| binding.texture == handle.texture) {
                *slot = None;
            }
        }
        handle.texture.destroy();
    }
}
