use std::collections::HashMap;
use std::path::PathBuf;

use ab_glyph::FontArc;
use log::{debug, warn};

/// Fonts for baked text, looked up by the element's font name.
///
/// `<fonts_dir>/<name>.ttf` wins when present; otherwise the fonts egui bundles are
/// used (its monospace face for `couriernew`, its proportional face for the rest), so
/// baked text matches what the editor shows.
#[derive(Debug)]
pub struct FontBook {
    fonts_dir: Option<PathBuf>,
    loaded: HashMap<String, Option<FontArc>>,
}

fn bundled(family: egui::FontFamily) -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let name = definitions.families.get(&family)?.first()?;
    let data = definitions.font_data.get(name)?;
    FontArc::try_from_vec(data.font.to_vec()).ok()
}

impl FontBook {
    pub fn new(fonts_dir: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            loaded: HashMap::new(),
        }
    }

    pub fn font(&mut self, name: &str) -> Option<FontArc> {
        if let Some(font) = self.loaded.get(name) {
            return font.clone();
        }
        let font = self.load_file(name).or_else(|| {
            let family = if name == "couriernew" {
                egui::FontFamily::Monospace
            } else {
                egui::FontFamily::Proportional
            };
            bundled(family)
        });
        if font.is_none() {
            warn!("no usable font for '{name}'; text will be skipped");
        }
        self.loaded.insert(name.to_string(), font.clone());
        font
    }

    fn load_file(&self, name: &str) -> Option<FontArc> {
        let path = self.fonts_dir.as_ref()?.join(format!("{name}.ttf"));
        let bytes = std::fs::read(&path).ok()?;
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                debug!("loaded font {}", path.display());
                Some(font)
            }
            Err(err) => {
                warn!("ignoring unreadable font {}: {err}", path.display());
                None
            }
        }
    }
}
