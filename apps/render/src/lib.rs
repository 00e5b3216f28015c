//! Resume document engine: structured resume JSON → LaTeX → PDF.
//!
//! Flow: `ResumeDocument::from_json` → `TemplateDefinition::parse` →
//! `template::compose` (fixed or dynamic section order) → `Pipeline::compile`
//! (LaTeX.Online → TeXLive.net → local pdflatex → saved `.tex`).

pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod escape;
pub mod models;
pub mod render;
pub mod template;

pub use compile::{CompilationResult, Pipeline};
pub use engine::{Engine, GeneratedDocument};
pub use errors::{RenderError, TemplateError};
pub use models::ResumeDocument;
pub use template::TemplateDefinition;
