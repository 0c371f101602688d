// Server URL resolution. A `--server-url` flag wins, then `VITE_API_URL`
// (optionally loaded from an env file shared with the web frontend), then
// the local development default.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3050";
pub const SERVER_URL_VAR: &str = "VITE_API_URL";
pub const DEFAULT_ENV_FILE: &str = ".env.development";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_url: String,
}

impl Config {
    /// Resolve the configuration for this run. The env file is optional;
    /// variables already set in the process environment are not
    /// overridden by it.
    pub fn resolve(flag: Option<&str>, env_file: &Path) -> Result<Self> {
        Config::resolve_with(flag, env_file, SERVER_URL_VAR)
    }

    /// `resolve`, reading the URL from `var` instead of `VITE_API_URL`.
    pub fn resolve_with(flag: Option<&str>, env_file: &Path, var: &str) -> Result<Self> {
        if flag.is_none() {
            load_env_file(env_file)?;
        }
        let from_env = std::env::var(var).ok();
        Config::from_sources(flag, from_env.as_deref())
    }

    /// Pick the first non-blank source and validate it.
    pub fn from_sources(flag: Option<&str>, env_value: Option<&str>) -> Result<Self> {
        let raw = [flag, env_value]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL);
        let server_url = validate_url(raw)?;
        Ok(Config { server_url })
    }
}

fn load_env_file(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!(path = %path.display(), "env file not found, skipping");
        return Ok(());
    }
    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load env file {}", path.display()))?;
    debug!(path = %path.display(), "loaded env file");
    Ok(())
}

fn validate_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("Invalid server URL: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("Server URL must use http or https: {raw}");
    }
    Ok(raw.trim_end_matches('/').to_string())
}
