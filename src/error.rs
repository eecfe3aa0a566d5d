use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a template file
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to access template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize template: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Template {0} has no pages")]
    NoPages(PathBuf),

    #[error("Failed to read page geometry: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Result type for template persistence operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while baking templates into output pages
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Rasterizer failed on page {page} of {path}: {reason}")]
    Rasterizer {
        path: PathBuf,
        page: usize,
        reason: String,
    },

    #[error("Document {0} has no pages to render")]
    NoPages(PathBuf),
}

/// Errors raised by discrete document edits
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("No element at index {0}")]
    InvalidIndex(usize),

    #[error("Merging needs at least two elements, got {0}")]
    NotEnoughElements(usize),

    #[error("Cannot convert a {0} element")]
    UnsupportedConversion(&'static str),

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("Element {0} is not waiting for content")]
    NotAwaitingContent(usize),

    #[error("A {element} element has no {property}")]
    PropertyMismatch {
        property: &'static str,
        element: &'static str,
    },
}

/// Result type for command execution
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
