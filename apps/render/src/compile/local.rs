//! Local `pdflatex` tier. Used only when the binary answers `--version`.
//!
//! Runs inside the request's working directory with stdin closed, so the
//! compiler cannot stall on an interactive prompt. There is no time limit on
//! the compile itself; callers that need one must impose it.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::compile::{Artifact, Backend, CompileJob};
use crate::errors::TierError;

/// Lines of compiler stdout kept when stderr is empty.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

pub struct LocalLatex {
    binary: String,
    probe_timeout: Duration,
}

impl LocalLatex {
    pub fn new(binary: &str, probe_timeout: Duration) -> Self {
        Self {
            binary: binary.to_string(),
            probe_timeout,
        }
    }
}

#[async_trait]
impl Backend for LocalLatex {
    fn id(&self) -> &str {
        &self.binary
    }

    async fn is_available(&self) -> bool {
        let probe = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!("{} probe failed: {e}", self.binary);
                false
            }
            Err(_) => {
                debug!("{} probe timed out", self.binary);
                false
            }
        }
    }

    async fn compile(&self, job: CompileJob<'_>) -> Result<Artifact, TierError> {
        let dir = job
            .work_dir
            .ok_or_else(|| TierError::Unavailable("no working directory".to_string()))?;

        let job_name = format!("resume-{}", job.request_id.simple());
        let tex_file = format!("{job_name}.tex");
        tokio::fs::write(dir.join(&tex_file), job.source).await?;

        let output = Command::new(&self.binary)
            .arg("-interaction=nonstopmode")
            .arg(&tex_file)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    TierError::Unavailable(format!("{} command not found", self.binary))
                }
                _ => TierError::Io(e),
            })?;

        if !output.status.success() {
            return Err(TierError::Exit {
                code: output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "a signal".to_string()),
                diagnostics: diagnostics(&output.stdout, &output.stderr),
            });
        }

        let pdf = dir.join(format!("{job_name}.pdf"));
        if !tokio::fs::try_exists(&pdf).await? {
            return Err(TierError::MissingArtifact);
        }
        Ok(Artifact::File(pdf))
    }

    fn success_message(&self) -> String {
        format!("PDF generated successfully using local {}", self.binary)
    }
}

/// stderr if the compiler wrote any, else the tail of stdout (where TeX
/// prints its `!` error lines).
fn diagnostics(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }

    let stdout = String::from_utf8_lossy(stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    lines[start..].join("\n").trim().to_string()
}
