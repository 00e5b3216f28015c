use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_render::config::{require_env, Config};
use resume_render::{Engine, Pipeline, TemplateDefinition};

/// Renders and compiles one resume: RESUME_PATH (JSON) + TEMPLATE_PATH → OUTPUT_PATH.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-render v{}", env!("CARGO_PKG_VERSION"));

    let resume_path = PathBuf::from(require_env("RESUME_PATH")?);
    let template_path = PathBuf::from(require_env("TEMPLATE_PATH")?);
    let output_path = PathBuf::from(require_env("OUTPUT_PATH")?);
    let engine_id = std::env::var("TEMPLATE_ENGINE").unwrap_or_else(|_| "latex".to_string());

    let content: serde_json::Value = serde_json::from_str(
        &tokio::fs::read_to_string(&resume_path)
            .await
            .with_context(|| format!("Failed to read {}", resume_path.display()))?,
    )
    .with_context(|| format!("{} is not valid JSON", resume_path.display()))?;

    let raw_template = tokio::fs::read_to_string(&template_path)
        .await
        .with_context(|| format!("Failed to read {}", template_path.display()))?;
    let template = TemplateDefinition::parse(&raw_template, &engine_id)?;

    let pipeline = Pipeline::from_config(&config.compile)?;
    info!("Compilation chain: {} tier(s)", pipeline.tiers().len());

    let engine = Engine::new(pipeline);
    let generated = engine.generate(&content, &template, &output_path).await?;

    if generated.compilation.success {
        info!("{}", generated.compilation.message);
    } else {
        warn!("{}", generated.compilation.message);
    }

    Ok(())
}
