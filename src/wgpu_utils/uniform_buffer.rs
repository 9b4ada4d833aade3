// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

/// Typed wrapper around a single-element uniform buffer
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (skips the write when nothing changed)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Uniform buffer holding one `Content` per draw, addressed by dynamic offset
///
/// Elements are spaced by the device's minimum uniform offset alignment.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    /// # Arguments
    /// * `device` - Device to allocate on
    /// * `capacity` - Initial number of elements
    /// * `alignment` - `Limits::min_uniform_buffer_offset_alignment`
    pub fn new(device: &wgpu::Device, capacity: usize, alignment: u32) -> Self {
        let stride = Self::aligned_stride(alignment);
        let capacity = capacity.max(1);

        DynamicUniformBuffer {
            buffer: Self::create_buffer(device, stride, capacity),
            content_type: PhantomData,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    /// Size of `Content` rounded up to `alignment`.
    pub fn aligned_stride(alignment: u32) -> u64 {
        let size = std::mem::size_of::<Content>() as u64;
        let alignment = u64::from(alignment.max(1));
        size.div_ceil(alignment) * alignment
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!(
                "DynamicUniformBuffer<{}>",
                short_type_name::<Content>()
            )),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Writes `elements` starting at index 0, growing the buffer if needed.
    ///
    /// # Returns
    /// `true` when the buffer was reallocated and bind groups referencing it
    /// must be recreated
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, elements: &[Content]) -> bool {
        let mut reallocated = false;
        if elements.len() > self.capacity {
            self.capacity = elements.len().next_power_of_two();
            self.buffer = Self::create_buffer(device, self.stride, self.capacity);
            reallocated = true;
        }

        if elements.is_empty() {
            return reallocated;
        }

        let stride = self.stride as usize;
        let element_size = std::mem::size_of::<Content>();
        self.staging.clear();
        self.staging.resize(stride * elements.len(), 0);
        for (i, element) in elements.iter().enumerate() {
            self.staging[i * stride..i * stride + element_size]
                .copy_from_slice(bytemuck::bytes_of(element));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);

        reallocated
    }

    /// Dynamic offset of element `index`.
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    /// Binding covering a single element; the dynamic offset selects which.
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Block {
        data: [f32; 48],
    }

    #[test]
    fn test_aligned_stride() {
        assert_eq!(DynamicUniformBuffer::<Block>::aligned_stride(256), 256);
        assert_eq!(DynamicUniformBuffer::<Block>::aligned_stride(64), 192);
        assert_eq!(DynamicUniformBuffer::<[f32; 4]>::aligned_stride(256), 256);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Block>(), "Block");
    }
}
