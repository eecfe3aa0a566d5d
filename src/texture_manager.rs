use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

/// Converts a decoded bitmap into an egui image
pub fn color_image(image: &RgbaImage) -> Result<ColorImage, TextureGenerationError> {
    let size = [image.width() as usize, image.height() as usize];
    if size[0] == 0 || size[1] == 0 {
        return Err(TextureGenerationError::InvalidDimensions);
    }
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

/// Caches GPU textures for page backgrounds, pictures and obscure previews.
///
/// Keys are free-form strings (a file path, `page:<stem>:<n>`, ...). Entries not used
/// for a while are evicted once the cache outgrows its limit.
pub struct TextureManager {
    texture_cache: HashMap<String, TextureHandle>,
    /// Frame each texture was last used in
    last_used: HashMap<String, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Call once at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Returns the cached texture for `key`, generating it on a miss
    pub fn get_or_create_texture<F>(
        &mut self,
        key: &str,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        if let Some(handle) = self.texture_cache.get(key) {
            self.last_used.insert(key.to_string(), self.current_frame);
            return Ok(handle.id());
        }

        self.prune_cache_if_needed();

        let image = generator()?;
        let handle = ctx.load_texture(key, image, TextureOptions::LINEAR);
        let id = handle.id();
        self.texture_cache.insert(key.to_string(), handle);
        self.last_used.insert(key.to_string(), self.current_frame);
        Ok(id)
    }

    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<(String, u64)> = self
            .last_used
            .iter()
            .map(|(key, frame)| (key.clone(), *frame))
            .collect();
        entries.sort_by_key(|(_, frame)| *frame);

        // make room for the texture about to be inserted
        let to_remove = entries.len() + 1 - self.max_cache_size.max(1);
        for (key, _) in entries.into_iter().take(to_remove) {
            self.texture_cache.remove(&key);
            self.last_used.remove(&key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    pub fn get_texture(&self, key: &str) -> Option<&TextureHandle> {
        self.texture_cache.get(key)
    }
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_texture_generator() -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        let first = manager.get_or_create_texture("logo.png", mock_texture_generator, &ctx).unwrap();
        let second = manager
            .get_or_create_texture("logo.png", || Err(TextureGenerationError::InvalidDimensions), &ctx)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn clearing_forgets_every_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        manager.get_or_create_texture("page:form:0", mock_texture_generator, &ctx).unwrap();
        manager.get_or_create_texture("logo.png", mock_texture_generator, &ctx).unwrap();

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
        assert!(manager.get_texture("logo.png").is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);

        manager.get_or_create_texture("a", mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture("b", mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture("c", mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(manager.get_texture("a").is_none());
        assert!(manager.get_texture("b").is_some());
        assert!(manager.get_texture("c").is_some());
    }

    #[test]
    fn failed_generation_caches_nothing() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let result = manager.get_or_create_texture("bad", || Err(TextureGenerationError::InvalidDimensions), &ctx);
        assert!(result.is_err());
        assert_eq!(manager.cache_size(), 0);
        assert!(color_image(&RgbaImage::new(0, 3)).is_err());
        assert_eq!(color_image(&RgbaImage::new(2, 3)).unwrap().size, [2, 3]);
    }
}
