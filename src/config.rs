use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "doc_templater.json";

/// Directory layout and interaction tuning shared by the editor and the batch renderer.
///
/// Every field is optional in the JSON file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub config_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_img_dir: PathBuf,
    pub input_img_dir: PathBuf,
    /// Optional directory of `<font>.ttf` files used when baking text
    pub fonts_dir: Option<PathBuf>,
    pub template_keys_file: PathBuf,

    /// Height in base pixels of a rasterized page
    pub target_height: u32,
    pub pan_leeway: f32,
    /// Handle grab tolerance in screen pixels
    pub handle_size: f32,
    pub double_click_secs: f64,
    pub key_repeat_delay: f64,
    pub key_repeat_interval: f64,
    pub max_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("configs"),
            input_dir: PathBuf::from("input_pdfs"),
            output_dir: PathBuf::from("output_pdfs"),
            temp_img_dir: PathBuf::from("temp_images"),
            input_img_dir: PathBuf::from("input_img"),
            fonts_dir: None,
            template_keys_file: PathBuf::from("configs/template_keys.json"),
            target_height: 2000,
            pan_leeway: 500.0,
            handle_size: 10.0,
            double_click_secs: 0.3,
            key_repeat_delay: 0.3,
            key_repeat_interval: 0.05,
            max_history: 100,
        }
    }
}

impl EditorConfig {
    /// Reads a config file, failing on I/O or parse errors
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the given file (or [`DEFAULT_CONFIG_FILE`]), falling back to defaults.
    ///
    /// An explicitly named file that fails to load is reported; a missing default file is not.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default configuration");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pan_leeway": 250.0, "output_dir": "out" }}"#).unwrap();

        let config = EditorConfig::load(file.path()).unwrap();
        assert_eq!(config.pan_leeway, 250.0);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.max_history, 100);
        assert_eq!(config.config_dir, PathBuf::from("configs"));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(EditorConfig::load(file.path()).is_err());
        assert_eq!(EditorConfig::load_or_default(Some(file.path())), EditorConfig::default());
    }
}
