//! Entry point for collaborators: resume JSON + base template in, LaTeX text
//! and a compilation outcome out. Holds no per-request state.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::compile::{CompilationResult, Pipeline};
use crate::errors::RenderError;
use crate::models::ResumeDocument;
use crate::template::{compose, TemplateDefinition};

/// The rendered source is always returned, even when compilation failed.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub source: String,
    pub compilation: CompilationResult,
}

pub struct Engine {
    pipeline: Pipeline,
}

impl Engine {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Renders a resume into the template without compiling it.
    pub fn render(
        &self,
        document: &ResumeDocument,
        template: &TemplateDefinition,
    ) -> Result<String, RenderError> {
        Ok(compose(document, template)?)
    }

    /// Renders raw resume content, then runs the compilation chain.
    pub async fn generate(
        &self,
        content: &Value,
        template: &TemplateDefinition,
        output_path: &Path,
    ) -> Result<GeneratedDocument, RenderError> {
        let document = ResumeDocument::from_json(content)?;
        let source = self.render(&document, template)?;
        info!(
            "Rendered resume for '{}' ({} bytes of LaTeX)",
            document.heading.full_name,
            source.len()
        );

        let compilation = self.pipeline.compile(&source, output_path).await;
        Ok(GeneratedDocument {
            source,
            compilation,
        })
    }
}
