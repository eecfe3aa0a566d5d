use std::path::{Path, PathBuf};

use egui::{Vec2, vec2};
use log::warn;

/// Finds image files referenced by image elements.
///
/// Relative paths are looked up in the template's own override directory
/// (`<input_img_dir>/<template stem>/`) before the shared image directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    image_dir: PathBuf,
    override_dir: Option<PathBuf>,
}

impl AssetResolver {
    pub fn new(image_dir: impl Into<PathBuf>, template_stem: Option<&str>) -> Self {
        let image_dir = image_dir.into();
        let override_dir = template_stem
            .filter(|stem| !stem.is_empty())
            .map(|stem| image_dir.join(stem));
        Self { image_dir, override_dir }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// The first existing file for `value`, or `None` when nothing matches
    pub fn resolve(&self, value: &str) -> Option<PathBuf> {
        if value.trim().is_empty() {
            return None;
        }
        let path = Path::new(value);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.override_dir
            .iter()
            .chain(std::iter::once(&self.image_dir))
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }

    /// `path` relative to the image directory when it lives inside it, as stored in
    /// image element values
    pub fn relative_value(&self, path: &Path) -> String {
        path.strip_prefix(&self.image_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Image files directly inside the shared image directory, sorted by name
    pub fn list_images(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.image_dir) else {
            return Vec::new();
        };
        let mut images: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();
        images.sort();
        images
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif" | "webp"))
}

/// Pixel size of an image file without decoding it fully
pub fn natural_size(path: &Path) -> Option<Vec2> {
    match image::image_dimensions(path) {
        Ok((width, height)) => Some(vec2(width as f32, height as f32)),
        Err(err) => {
            warn!("cannot read size of {}: {err}", path.display());
            None
        }
    }
}
