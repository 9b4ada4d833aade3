//! Texture registry
//!
//! Decodes image files, hands the pixels to a [`TextureBackend`] for GPU
//! residency and indexes the result by a string tag. Each texture occupies
//! the slot matching its insertion order; slots never move once assigned.

use std::borrow::Cow;
use std::path::Path;

use image::GenericImageView;

use crate::config::DEFAULT_MAX_TEXTURE_SLOTS;
use crate::error::{Result, SceneError};

/// Decoded pixel data, rows ordered bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Pixels expanded to tightly packed RGBA8.
    ///
    /// Only RGB and RGBA images are registered, so anything that is not
    /// four channels is read as RGB.
    pub fn rgba_pixels(&self) -> Cow<'_, [u8]> {
        if self.channels == 4 {
            return Cow::Borrowed(&self.pixels);
        }
        Cow::Owned(
            self.pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        )
    }
}

/// Turns an image file into pixels.
pub trait ImageDecoder {
    /// Returns the decoded, vertically flipped image or a human readable reason.
    fn decode(&self, path: &Path) -> std::result::Result<DecodedImage, String>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&Path) -> std::result::Result<DecodedImage, String>,
{
    fn decode(&self, path: &Path) -> std::result::Result<DecodedImage, String> {
        self(path)
    }
}

/// [`ImageDecoder`] backed by the `image` crate (PNG and JPEG).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> std::result::Result<DecodedImage, String> {
        // Flip so that row 0 is the bottom of the image, matching UV v=0.
        let img = image::open(path).map_err(|e| e.to_string())?.flipv();
        let (width, height) = img.dimensions();
        let channels = img.color().channel_count();

        let pixels = match channels {
            3 => img.to_rgb8().into_raw(),
            4 => img.to_rgba8().into_raw(),
            _ => img.into_bytes(),
        };

        Ok(DecodedImage {
            width,
            height,
            channels,
            pixels,
        })
    }
}

/// GPU residency for decoded textures.
///
/// Uploads are expected to use repeat wrapping, linear filtering and a full
/// mip chain.
pub trait TextureBackend {
    type Handle;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> std::result::Result<Self::Handle, String>;

    /// Makes `handle` visible to the shader as texture unit `slot`.
    fn bind(&mut self, slot: usize, handle: &Self::Handle);

    fn release(&mut self, handle: Self::Handle);
}

/// A registered texture.
#[derive(Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
    pub slot: usize,
}

/// Tag-indexed, insertion-ordered set of GPU textures.
pub struct TextureRegistry<B: TextureBackend> {
    backend: B,
    decoder: Box<dyn ImageDecoder>,
    entries: Vec<TextureEntry<B::Handle>>,
    capacity: usize,
}

impl<B: TextureBackend> TextureRegistry<B> {
    /// Creates an empty registry decoding with the `image` crate.
    ///
    /// # Arguments
    /// * `backend` - GPU residency implementation
    /// * `capacity` - Maximum number of texture slots
    pub fn new(backend: B, capacity: usize) -> Self {
        Self {
            backend,
            decoder: Box::new(ImageCrateDecoder),
            entries: Vec::new(),
            capacity,
        }
    }

    /// Replaces the image decoder (builder pattern)
    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Decodes `path` and registers it under `tag` at the next slot.
    ///
    /// On any error the registry is left unchanged.
    ///
    /// # Returns
    /// The slot assigned to the texture
    pub fn load_texture(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<usize> {
        let path = path.as_ref();

        if self.entries.len() >= self.capacity {
            return Err(SceneError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if self.entries.iter().any(|entry| entry.tag == tag) {
            return Err(SceneError::DuplicateTextureTag(tag.to_string()));
        }

        let image = self.decoder.decode(path).map_err(|reason| {
            log::error!("Could not load image {}: {}", path.display(), reason);
            SceneError::DecodeFailure {
                path: path.to_path_buf(),
                reason,
            }
        })?;

        if image.channels != 3 && image.channels != 4 {
            log::error!(
                "Image {} has {} channels; only RGB and RGBA are handled",
                path.display(),
                image.channels
            );
            return Err(SceneError::UnsupportedChannelCount {
                path: path.to_path_buf(),
                channels: image.channels,
            });
        }

        let handle = self
            .backend
            .upload(&image, tag)
            .map_err(|reason| SceneError::Upload {
                tag: tag.to_string(),
                reason,
            })?;

        let slot = self.entries.len();
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            slot,
        });

        log::info!(
            "Loaded texture '{}' from {} ({}x{}, {} channels) into slot {}",
            tag,
            path.display(),
            image.width,
            image.height,
            image.channels,
            slot
        );
        Ok(slot)
    }

    /// Binds every registered texture to its slot, lowest slot first.
    pub fn bind_all(&mut self) {
        for entry in &self.entries {
            self.backend.bind(entry.slot, &entry.handle);
        }
    }

    /// Slot of the first texture registered under `tag`.
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.slot)
    }

    /// Frees every texture. Safe to call more than once.
    pub fn release(&mut self) {
        for entry in self.entries.drain(..) {
            log::debug!("Releasing texture '{}' (slot {})", entry.tag, entry.slot);
            self.backend.release(entry.handle);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[TextureEntry<B::Handle>] {
        &self.entries
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: TextureBackend + Default> Default for TextureRegistry<B> {
    fn default() -> Self {
        Self::new(B::default(), DEFAULT_MAX_TEXTURE_SLOTS)
    }
}

impl<B: TextureBackend> Drop for TextureRegistry<B> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::recording::HeadlessTextures;

    /// Decoder that derives the channel count from the file name, e.g. `wood.3.png`.
    fn stub_decoder(path: &Path) -> std::result::Result<DecodedImage, String> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| "no file name".to_string())?;
        let channels: u8 = stem
            .rsplit('.')
            .next()
            .and_then(|c| c.parse().ok())
            .ok_or_else(|| format!("cannot open {}", path.display()))?;
        Ok(DecodedImage {
            width: 2,
            height: 2,
            channels,
            pixels: vec![128; 4 * channels as usize],
        })
    }

    fn registry(capacity: usize) -> TextureRegistry<HeadlessTextures> {
        TextureRegistry::new(HeadlessTextures::new(), capacity).with_decoder(stub_decoder)
    }

    #[test]
    fn test_slots_follow_insertion_order() {
        let mut textures = registry(16);
        assert_eq!(textures.load_texture("table.3.jpg", "table").unwrap(), 0);
        assert_eq!(textures.load_texture("wall.4.png", "wall").unwrap(), 1);

        assert_eq!(textures.find_slot("table"), Some(0));
        assert_eq!(textures.find_slot("wall"), Some(1));
        assert_eq!(textures.len(), 2);
    }

    #[test]
    fn test_unsupported_channels_leave_registry_unchanged() {
        let mut textures = registry(16);
        textures.load_texture("table.3.jpg", "table").unwrap();

        let err = textures.load_texture("mask.1.png", "mask").unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedChannelCount { channels: 1, .. }
        ));
        let err = textures.load_texture("luma.2.png", "luma").unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnsupportedChannelCount { channels: 2, .. }
        ));

        assert_eq!(textures.len(), 1);
        assert_eq!(textures.find_slot("mask"), None);
        assert_eq!(textures.backend().uploads().len(), 1);
    }

    #[test]
    fn test_decode_failure_reports_reason() {
        let mut textures = registry(16);
        let err = textures.load_texture("missing.jpg", "missing").unwrap_err();
        match err {
            SceneError::DecodeFailure { reason, .. } => assert!(reason.contains("cannot open")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(textures.is_empty());
    }

    #[test]
    fn test_find_on_empty_registry() {
        let textures = registry(16);
        assert_eq!(textures.find_slot("anything"), None);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut textures = registry(2);
        textures.load_texture("a.3.png", "a").unwrap();
        textures.load_texture("b.3.png", "b").unwrap();

        let err = textures.load_texture("c.3.png", "c").unwrap_err();
        assert!(matches!(err, SceneError::CapacityExceeded { capacity: 2 }));
        assert_eq!(textures.len(), 2);
        assert_eq!(textures.find_slot("c"), None);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut textures = registry(16);
        textures.load_texture("a.3.png", "wood").unwrap();
        let err = textures.load_texture("b.4.png", "wood").unwrap_err();
        assert!(matches!(err, SceneError::DuplicateTextureTag(tag) if tag == "wood"));
        assert_eq!(textures.len(), 1);
    }

    #[test]
    fn test_upload_failure_leaves_registry_unchanged() {
        let mut textures =
            TextureRegistry::new(HeadlessTextures::failing(), 16).with_decoder(stub_decoder);
        let err = textures.load_texture("a.3.png", "a").unwrap_err();
        assert!(matches!(err, SceneError::Upload { .. }));
        assert!(textures.is_empty());
    }

    #[test]
    fn test_bind_all_in_slot_order() {
        let mut textures = registry(16);
        textures.load_texture("a.3.png", "a").unwrap();
        textures.load_texture("b.4.png", "b").unwrap();
        textures.load_texture("c.3.png", "c").unwrap();
        textures.bind_all();

        let slots: Vec<usize> = textures.backend().bindings().iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_release_twice() {
        let mut textures = registry(16);
        textures.load_texture("a.3.png", "a").unwrap();
        textures.load_texture("b.3.png", "b").unwrap();

        textures.release();
        textures.release();

        assert_eq!(textures.backend().released(), &[0, 1]);
        assert!(textures.is_empty());
        assert_eq!(textures.find_slot("a"), None);
    }

    #[test]
    fn test_rgb_expands_to_rgba() {
        let image = DecodedImage {
            width: 2,
            height: 1,
            channels: 3,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        assert_eq!(&*image.rgba_pixels(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_rgba_pixels_are_borrowed() {
        let image = DecodedImage {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![9, 8, 7, 6],
        };
        assert!(matches!(image.rgba_pixels(), Cow::Borrowed(&[9, 8, 7, 6])));
    }

    #[test]
    fn test_image_crate_decoder_flips_rows() {
        let path = std::env::temp_dir().join(format!(
            "desk_scene_flip_{}.png",
            std::process::id()
        ));
        // Top row red, bottom row blue.
        let img = image::RgbImage::from_fn(1, 2, |_, y| {
            if y == 0 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let decoded = ImageCrateDecoder.decode(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.channels, 3);
        assert_eq!((decoded.width, decoded.height), (1, 2));
        assert_eq!(&decoded.pixels[..3], &[0, 0, 255]);
        assert_eq!(&decoded.pixels[3..], &[255, 0, 0]);
    }

    #[test]
    fn test_image_crate_decoder_reports_missing_file() {
        let err = ImageCrateDecoder
            .decode(Path::new("/definitely/not/here.jpg"))
            .unwrap_err();
        assert!(!err.is_empty());
    }
}
