#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod geometry;
pub mod input;
pub mod ocr;
pub mod page_cache;
pub mod panels;
pub mod render;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod template_data;
pub mod texture_manager;
pub mod tools;
pub mod widgets;
pub mod workspace;

pub use app::TemplateEditorApp;
pub use command::{Command, History, PropertyChange};
pub use config::EditorConfig;
pub use document::{Document, Page, PageBox};
pub use element::{Element, ElementKind, ElementType, Handle};
pub use error::{CommandError, ConfigError, RenderError, TemplateError};
pub use input::{InputEvent, InputHandler};
pub use renderer::Renderer;
pub use selection::Selection;
pub use state::{EditorContext, EditorState};
pub use tools::{InsertKind, ToolMode};
pub use workspace::Workspace;
