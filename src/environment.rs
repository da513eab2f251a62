// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::FsOps;

/// One section of the configuration file. Every key is optional; whatever is
/// missing falls through to environment variables and defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub api_url: Option<String>,
    pub session_path: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Name of the active environment, `local` unless told otherwise
    pub fn get_environment(var: impl Fn(&str) -> Option<String>) -> String {
        var("JOBMATCH_ENV")
            .or_else(|| var("ENVIRONMENT"))
            .filter(|env| !env.trim().is_empty())
            .unwrap_or_else(|| "local".to_string())
    }

    /// Read the section for `environment`. A missing file is not an error,
    /// a malformed one is.
    pub fn load_from_file(config_path: &Path, environment: &str, cwd: &Path) -> Result<Self> {
        let Some(content) = FsOps::read_optional(config_path)? else {
            info!("No configuration file at {}", config_path.display());
            return Ok(Self::default());
        };

        let config_file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        };

        info!(
            "Loaded {} section of {}",
            environment,
            config_path.display()
        );

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            session_path: env_config
                .session_path
                .map(|p| FsOps::normalize_path(cwd, &p)),
            log_path: env_config.log_path.map(|p| FsOps::normalize_path(cwd, &p)),
            ..env_config
        })
    }
}
