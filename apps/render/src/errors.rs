use std::time::Duration;

use thiserror::Error;

/// The resume record could not be read at all.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Resume content must be a JSON object")]
    NotAnObject,
}

/// Structural defects in a base template. These belong to the template
/// collaborator and should be caught when a template is stored, not per request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template has no section region (expected a line starting with '{marker}')")]
    MissingSectionRegion { marker: &'static str },

    #[error("Template has {count} section regions; exactly one is supported")]
    DuplicateSectionRegion { count: usize },

    #[error("Template section region is not closed by '{end}'")]
    UnterminatedSectionRegion { end: &'static str },

    #[error("Unsupported template engine: {0}")]
    UnsupportedEngine(String),
}

/// Why a single compilation tier did not produce an artifact.
/// Never surfaced on its own: the pipeline records it and moves on.
#[derive(Debug, Error)]
pub enum TierError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned status {status}")]
    Status { status: u16 },

    #[error("payload too small to be a document ({len} bytes, need more than {min})")]
    Undersized { len: u64, min: u64 },

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("compiler exited with {code}: {diagnostics}")]
    Exit { code: String, diagnostics: String },

    #[error("compiler reported success but produced no PDF")]
    MissingArtifact,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that stop a rendering request before compilation starts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid resume input: {0}")]
    Input(#[from] InputError),

    #[error("Invalid template: {0}")]
    Template(#[from] TemplateError),
}
