use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_LATEX_ONLINE_URL: &str = "https://latexonline.cc/compile";
pub const DEFAULT_TEXLIVE_NET_URL: &str = "https://texlive.net/cgi-bin/latexcgi";

/// Engine configuration loaded from environment variables. Every variable is
/// optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub compile: CompileConfig,
}

/// Knobs for the compilation fallback chain.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// When false, both online tiers are left out of the chain.
    pub online_enabled: bool,
    pub latex_online_url: String,
    pub texlive_net_url: String,
    /// Budget for each online attempt, measured independently per tier.
    pub online_timeout: Duration,
    /// Online payloads at or below this size are treated as error pages.
    pub min_artifact_bytes: u64,
    pub latex_binary: String,
    pub probe_timeout: Duration,
    /// Parent of the per-request working directories.
    pub work_dir: PathBuf,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            online_enabled: true,
            latex_online_url: DEFAULT_LATEX_ONLINE_URL.to_string(),
            texlive_net_url: DEFAULT_TEXLIVE_NET_URL.to_string(),
            online_timeout: Duration::from_secs(45),
            min_artifact_bytes: 1000,
            latex_binary: "pdflatex".to_string(),
            probe_timeout: Duration::from_secs(5),
            work_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = CompileConfig::default();
        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            compile: CompileConfig {
                online_enabled: parse_env("COMPILE_ONLINE_ENABLED")?
                    .unwrap_or(defaults.online_enabled),
                latex_online_url: std::env::var("LATEX_ONLINE_URL")
                    .unwrap_or(defaults.latex_online_url),
                texlive_net_url: std::env::var("TEXLIVE_NET_URL")
                    .unwrap_or(defaults.texlive_net_url),
                online_timeout: parse_env("COMPILE_ONLINE_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.online_timeout),
                min_artifact_bytes: parse_env("COMPILE_MIN_ARTIFACT_BYTES")?
                    .unwrap_or(defaults.min_artifact_bytes),
                latex_binary: std::env::var("LATEX_BINARY").unwrap_or(defaults.latex_binary),
                probe_timeout: parse_env("LATEX_PROBE_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.probe_timeout),
                work_dir: std::env::var("COMPILE_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.work_dir),
            },
        })
    }
}

/// Reads a required variable, naming it in the error.
pub fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(None),
    }
}
