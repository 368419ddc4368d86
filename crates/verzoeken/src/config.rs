//! Process-wide configuration.
//!
//! Constructed once at startup and passed by reference into the remote
//! validator and authentication resolver; nothing here is ambient global
//! state.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level configuration of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerzoekenConfig {
    /// Directory the SQLite database lives in.
    pub database_dir: PathBuf,
    /// Upper bound on any single remote validation fetch, in
    /// milliseconds. A fetch that runs over is reported as the remote
    /// being unavailable.
    #[serde(default = "default_remote_timeout_ms")]
    pub remote_timeout_ms: u64,
    /// The remote APIs this deployment talks to.
    #[serde(default)]
    pub remote_apis: Vec<RemoteApiConfig>,
}

fn default_remote_timeout_ms() -> u64 {
    10_000
}

/// One remote API root plus the credential to use against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteApiConfig {
    /// Root URL of the API, e.g. `https://drc.example.com/api/v1/`.
    /// Resolution picks the configured root with the longest matching
    /// prefix.
    pub api_root: String,
    /// Bearer token; `None` means fetch anonymously.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Database(#[from] verzoeken_sqlite::error::DatabaseError),

    #[error("could not construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
