//! Compilation Pipeline: an ordered chain of backends tried one at a time.
//!
//! Tiers run sequentially on the caller's task; the first accepted artifact
//! wins and later tiers are never contacted. Every tier failure is recorded
//! and skipped past. When nothing succeeds, the LaTeX source is written next
//! to the requested output so it is never lost.
//!
//! Each request gets its own `tempfile` working directory, named from a fresh
//! request id and removed when the request finishes, so concurrent requests
//! never share build files.

pub mod local;
pub mod online;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CompileConfig;
use crate::errors::TierError;

pub use local::LocalLatex;
pub use online::{LatexOnline, TexLiveNet};

/// Extension of the source file written when every tier fails.
const SOURCE_EXTENSION: &str = "tex";

// ────────────────────────────────────────────────────────────────────────────
// Backend seam
// ────────────────────────────────────────────────────────────────────────────

/// What a backend hands back on success.
#[derive(Debug)]
pub enum Artifact {
    /// Document bytes received over the network.
    Bytes(Bytes),
    /// A document file produced inside the request's working directory.
    File(PathBuf),
}

/// Everything a backend needs for one attempt.
#[derive(Debug, Clone, Copy)]
pub struct CompileJob<'a> {
    pub request_id: Uuid,
    pub source: &'a str,
    /// Per-request scratch directory; `None` if it could not be created.
    pub work_dir: Option<&'a Path>,
}

/// One way of turning LaTeX source into a PDF.
#[async_trait]
pub trait Backend: Send + Sync {
    fn id(&self) -> &str;

    /// Cheap capability probe, run before `compile`.
    async fn is_available(&self) -> bool {
        true
    }

    async fn compile(&self, job: CompileJob<'_>) -> Result<Artifact, TierError>;

    fn success_message(&self) -> String {
        format!("Compiled using {}", self.id())
    }
}

/// Rule deciding whether a returned artifact is a real document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Strictly more than this many bytes. Guards against error pages
    /// served with a success status.
    MinBytes(u64),
    NonEmpty,
}

impl Acceptance {
    fn check(self, len: u64) -> Result<(), TierError> {
        let min = match self {
            Acceptance::MinBytes(min) => min,
            Acceptance::NonEmpty => 0,
        };
        if len > min {
            Ok(())
        } else {
            Err(TierError::Undersized { len, min })
        }
    }
}

/// One entry of the fallback chain.
#[derive(Clone)]
pub struct Tier {
    pub backend: Arc<dyn Backend>,
    pub acceptance: Acceptance,
    /// `None` runs the attempt to completion.
    pub timeout: Option<Duration>,
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded { bytes: u64 },
    Failed { reason: String },
    /// The capability probe said no; the backend was never invoked.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompilationAttempt {
    pub backend: String,
    pub timeout: Option<Duration>,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum OutputLocation {
    /// The compiled PDF.
    Artifact(PathBuf),
    /// The raw LaTeX, saved for manual recovery.
    Source(PathBuf),
}

/// Final outcome of one compilation request. `message` is meant to be shown
/// to the user as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationResult {
    pub success: bool,
    pub message: String,
    pub backend: Option<String>,
    pub output: Option<OutputLocation>,
    pub attempts: Vec<CompilationAttempt>,
}

// ────────────────────────────────────────────────────────────────────────────
// Driver
// ────────────────────────────────────────────────────────────────────────────

pub struct Pipeline {
    tiers: Vec<Tier>,
    work_root: PathBuf,
}

impl Pipeline {
    pub fn new(tiers: Vec<Tier>, work_root: impl Into<PathBuf>) -> Self {
        Self {
            tiers,
            work_root: work_root.into(),
        }
    }

    /// The standard chain: LaTeX.Online, TeXLive.net, then a local compiler.
    pub fn from_config(config: &CompileConfig) -> anyhow::Result<Self> {
        let mut tiers = Vec::new();

        if config.online_enabled {
            let client = reqwest::Client::builder().build()?;
            let acceptance = Acceptance::MinBytes(config.min_artifact_bytes);
            tiers.push(Tier {
                backend: Arc::new(LatexOnline::new(client.clone(), &config.latex_online_url)),
                acceptance,
                timeout: Some(config.online_timeout),
            });
            tiers.push(Tier {
                backend: Arc::new(TexLiveNet::new(client, &config.texlive_net_url)),
                acceptance,
                timeout: Some(config.online_timeout),
            });
        }

        tiers.push(Tier {
            backend: Arc::new(LocalLatex::new(&config.latex_binary, config.probe_timeout)),
            acceptance: Acceptance::NonEmpty,
            timeout: None,
        });

        Ok(Self::new(tiers, &config.work_dir))
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Compiles `source` to `output_path`. Never fails: on total failure the
    /// source is saved beside `output_path` with a `.tex` extension.
    pub async fn compile(&self, source: &str, output_path: &Path) -> CompilationResult {
        let request_id = Uuid::new_v4();

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("[{request_id}] Could not create output directory {}: {e}", parent.display());
            }
        }

        // Dropped at the end of this request, taking every build file with it.
        let work_dir = tempfile::Builder::new()
            .prefix(&format!("resume-{}-", request_id.simple()))
            .tempdir_in(&self.work_root)
            .map_err(|e| warn!("[{request_id}] Could not create working directory: {e}"))
            .ok();

        let job = CompileJob {
            request_id,
            source,
            work_dir: work_dir.as_ref().map(|d| d.path()),
        };

        let mut attempts = Vec::with_capacity(self.tiers.len());
        let mut last_error: Option<(String, TierError)> = None;

        for tier in &self.tiers {
            let id = tier.backend.id().to_string();

            if !tier.backend.is_available().await {
                info!("[{request_id}] {id} is not available, skipping");
                attempts.push(CompilationAttempt {
                    backend: id,
                    timeout: tier.timeout,
                    outcome: AttemptOutcome::Skipped,
                });
                continue;
            }

            info!("[{request_id}] Attempting compilation with {id}");
            let outcome = match self.attempt(tier, job).await {
                Ok(artifact) => store_artifact(artifact, tier.acceptance, output_path).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(bytes) => {
                    info!("[{request_id}] {id} produced {bytes} bytes at {}", output_path.display());
                    attempts.push(CompilationAttempt {
                        backend: id.clone(),
                        timeout: tier.timeout,
                        outcome: AttemptOutcome::Succeeded { bytes },
                    });
                    return CompilationResult {
                        success: true,
                        message: tier.backend.success_message(),
                        backend: Some(id),
                        output: Some(OutputLocation::Artifact(output_path.to_path_buf())),
                        attempts,
                    };
                }
                Err(e) => {
                    warn!("[{request_id}] {id} failed: {e}");
                    attempts.push(CompilationAttempt {
                        backend: id.clone(),
                        timeout: tier.timeout,
                        outcome: AttemptOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                    last_error = Some((id, e));
                }
            }
        }

        persist_source(request_id, source, output_path, last_error, attempts).await
    }

    async fn attempt(&self, tier: &Tier, job: CompileJob<'_>) -> Result<Artifact, TierError> {
        let compile = tier.backend.compile(job);
        match tier.timeout {
            Some(budget) => tokio::time::timeout(budget, compile)
                .await
                .unwrap_or(Err(TierError::Timeout(budget))),
            None => compile.await,
        }
    }
}

/// Applies the tier's acceptance rule and puts the artifact at `output_path`.
async fn store_artifact(
    artifact: Artifact,
    acceptance: Acceptance,
    output_path: &Path,
) -> Result<u64, TierError> {
    match artifact {
        Artifact::Bytes(bytes) => {
            let len = bytes.len() as u64;
            acceptance.check(len)?;
            tokio::fs::write(output_path, &bytes).await?;
            Ok(len)
        }
        Artifact::File(path) => {
            let len = tokio::fs::metadata(&path).await?.len();
            acceptance.check(len)?;
            if tokio::fs::rename(&path, output_path).await.is_err() {
                // Working directory may sit on another filesystem.
                tokio::fs::copy(&path, output_path).await?;
                tokio::fs::remove_file(&path).await?;
            }
            Ok(len)
        }
    }
}

/// Last resort: keep the LaTeX so the user can compile it by hand.
async fn persist_source(
    request_id: Uuid,
    source: &str,
    output_path: &Path,
    last_error: Option<(String, TierError)>,
    attempts: Vec<CompilationAttempt>,
) -> CompilationResult {
    let source_path = output_path.with_extension(SOURCE_EXTENSION);

    match tokio::fs::write(&source_path, source).await {
        Ok(()) => {
            let cause = match last_error {
                Some((id, e)) => format!("All compilation backends failed (last error from {id}: {e})"),
                None => "No compilation backend was available".to_string(),
            };
            warn!("[{request_id}] {cause}; source saved to {}", source_path.display());
            CompilationResult {
                success: false,
                message: format!("{cause}. LaTeX source saved to {}", source_path.display()),
                backend: None,
                output: Some(OutputLocation::Source(source_path)),
                attempts,
            }
        }
        Err(e) => {
            warn!("[{request_id}] Failed to save LaTeX source to {}: {e}", source_path.display());
            CompilationResult {
                success: false,
                message: format!("Failed to save LaTeX file {}: {e}", source_path.display()),
                backend: None,
                output: None,
                attempts,
            }
        }
    }
}
