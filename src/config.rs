//! Configuration management for the stroke risk service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Inference service listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Serialized classifier (.json, or .onnx with the `onnx` feature)
    pub model_path: String,
    /// Serialized age scaler (.json)
    pub scaler_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Form front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub host: String,
    /// Port of the direct-load form
    pub direct_port: u16,
    /// Port of the remote-call form
    pub remote_port: u16,
    /// Prediction endpoint used by the remote-call form
    pub api_url: String,
    /// Timeout for the remote-call request in milliseconds
    pub request_timeout_ms: u64,
}

impl UiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between summary log lines (0 disables the reporter)
    pub report_interval_secs: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from the default file, if present
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path layered over the defaults.
    ///
    /// A missing file is not an error; every key has a default.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            artifacts: ArtifactsConfig {
                model_path: "artifacts/best_stroke_model.json".to_string(),
                scaler_path: "artifacts/scaler.json".to_string(),
                onnx_threads: 1,
            },
            ui: UiConfig {
                host: "0.0.0.0".to_string(),
                direct_port: 8501,
                remote_port: 8502,
                api_url: "http://localhost:8000/predict".to_string(),
                request_timeout_ms: 10_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.artifacts.model_path, "artifacts/best_stroke_model.json");
        assert_eq!(config.artifacts.scaler_path, "artifacts/scaler.json");
        assert_eq!(config.ui.api_url, "http://localhost:8000/predict");
        assert_eq!(config.ui.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ui.direct_port, 8501);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[artifacts]\nmodel_path = \"models/forest.json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.artifacts.model_path, "models/forest.json");
        assert_eq!(config.artifacts.scaler_path, "artifacts/scaler.json");
    }
}
