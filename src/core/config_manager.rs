// src/core/config_manager.rs
//! Client configuration: file section, then environment overrides, then
//! defaults

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::FsOps;
use crate::environment::EnvironmentConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_LOG_PATH: &str = "/tmp/jobmatch.log";
const DEFAULT_CONFIG_FILE: &str = "jobmatch.yaml";
const DEFAULT_SESSION_FILE: &str = ".jobmatch/session.json";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub service: ServiceConfig,
    pub session_path: PathBuf,
    pub log_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load from the process environment and the current directory
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(|key| std::env::var(key).ok(), &cwd)
    }

    pub fn load_from(var: impl Fn(&str) -> Option<String>, cwd: &Path) -> Result<Self> {
        let environment = EnvironmentConfig::get_environment(&var);
        info!("Loading configuration for environment: {}", environment);

        let config_path = var("JOBMATCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let file = EnvironmentConfig::load_from_file(
            &FsOps::normalize_path(cwd, &config_path),
            &environment,
            cwd,
        )?;

        let service = Self::load_service(&var, &file)?;

        let session_path = var("JOBMATCH_SESSION_PATH")
            .map(|p| FsOps::normalize_path(cwd, Path::new(&p)))
            .or(file.session_path)
            .unwrap_or_else(|| cwd.join(DEFAULT_SESSION_FILE));

        let log_path = var("JOBMATCH_LOG_PATH")
            .map(|p| FsOps::normalize_path(cwd, Path::new(&p)))
            .or(file.log_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

        Ok(Self {
            environment,
            service,
            session_path,
            log_path,
        })
    }

    fn load_service(
        var: &impl Fn(&str) -> Option<String>,
        file: &EnvironmentConfig,
    ) -> Result<ServiceConfig> {
        let api_url = var("JOBMATCH_API_URL")
            .or_else(|| file.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_seconds = match var("JOBMATCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid JOBMATCH_TIMEOUT_SECS: {}", raw))?,
            None => file.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        };
        if timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }

        Ok(ServiceConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout_seconds,
        })
    }

    /// Ensure the directories holding the session and log files exist
    pub fn ensure_directories(&self) -> Result<()> {
        for path in [&self.session_path, &self.log_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                FsOps::ensure_dir_exists(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::load_from(vars(&[]), dir.path()).unwrap();

        assert_eq!(config.environment, "local");
        assert_eq!(config.service.api_url, DEFAULT_API_URL);
        assert_eq!(config.service.timeout_seconds, 30);
        assert_eq!(config.session_path, dir.path().join(".jobmatch/session.json"));
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("custom.yaml"),
            "production:\n  api_url: https://jobs.example.com/\n  timeout_seconds: 5\n  log_path: logs/client.log\n",
        )
        .unwrap();

        let config = ConfigManager::load_from(
            vars(&[
                ("JOBMATCH_CONFIG", "custom.yaml"),
                ("ENVIRONMENT", "production"),
                ("JOBMATCH_TIMEOUT_SECS", "12"),
                ("JOBMATCH_SESSION_PATH", "/var/lib/jobmatch/session.json"),
            ]),
            dir.path(),
        )
        .unwrap();

        assert_eq!(config.environment, "production");
        assert_eq!(config.service.api_url, "https://jobs.example.com");
        assert_eq!(config.service.timeout_seconds, 12);
        assert_eq!(
            config.session_path,
            PathBuf::from("/var/lib/jobmatch/session.json")
        );
        assert_eq!(config.log_path, dir.path().join("logs/client.log"));
    }

    #[test]
    fn test_invalid_timeout() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            ConfigManager::load_from(vars(&[("JOBMATCH_TIMEOUT_SECS", "soon")]), dir.path())
                .is_err()
        );
        assert!(
            ConfigManager::load_from(vars(&[("JOBMATCH_TIMEOUT_SECS", "0")]), dir.path()).is_err()
        );
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::load_from(
            vars(&[("JOBMATCH_LOG_PATH", "logs/client.log")]),
            dir.path(),
        )
        .unwrap();

        config.ensure_directories().unwrap();
        assert!(dir.path().join(".jobmatch").is_dir());
        assert!(dir.path().join("logs").is_dir());
    }
}
