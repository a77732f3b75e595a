//! Tuning for the spread engine.
//!
//! Loaded from `engine_config.json` with an environment variable override.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_ENGINE_CONFIG: &str = include_str!("data/engine_config.json");
pub const ENGINE_CONFIG_ENV: &str = "BLIGHT_ENGINE_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the ring worker pool. `None` lets rayon pick.
    pub worker_threads: Option<usize>,
    /// Bound of the contribution channel between workers and the aggregator.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            channel_capacity: 4096,
        }
    }
}

impl EngineConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_ENGINE_CONFIG).expect("builtin engine config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| EngineConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = EngineConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn with_worker_threads(mut self, threads: Option<usize>) -> Self {
        if threads.is_some() {
            self.worker_threads = threads;
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read engine config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load engine configuration from `BLIGHT_ENGINE_CONFIG_PATH`, falling back to
/// the builtin file. Returns the path actually used, if any.
pub fn load_engine_config_from_env() -> (EngineConfig, Option<PathBuf>) {
    if let Some(path) = env::var_os(ENGINE_CONFIG_ENV).map(PathBuf::from) {
        match EngineConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "blight::config",
                    path = %path.display(),
                    "engine_config.loaded=file"
                );
                return (config, Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "blight::config",
                    path = %path.display(),
                    error = %err,
                    "engine_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "blight::config", "engine_config.loaded=builtin");
    (EngineConfig::builtin(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_matches_default() {
        assert_eq!(EngineConfig::builtin(), EngineConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"worker_threads": 3}"#).unwrap();
        assert_eq!(config.worker_threads, Some(3));
        assert_eq!(config.channel_capacity, 4096);
    }

    #[test]
    fn thread_override_only_when_given() {
        let config = EngineConfig::default().with_worker_threads(Some(2));
        assert_eq!(config.worker_threads, Some(2));
        let config = config.with_worker_threads(None);
        assert_eq!(config.worker_threads, Some(2));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::from_file(Path::new("/nonexistent/engine_config.json"))
            .unwrap_err();
        assert!(matches!(err, EngineConfigError::Read { .. }));
        assert!(err.to_string().contains("engine_config.json"));
    }
}
