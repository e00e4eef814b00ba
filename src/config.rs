//! Configuration management for the screening service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming screening requests
    pub request_subject: String,
    /// Subject for outgoing screening reports
    pub report_subject: String,
    /// Subject for requests that could not be screened
    #[serde(default = "default_rejection_subject")]
    pub rejection_subject: String,
    /// Queue group shared by service instances; empty to receive every message
    #[serde(default = "default_queue_group")]
    pub queue_group: String,
}

fn default_rejection_subject() -> String {
    "screening.rejected".to_string()
}

fn default_queue_group() -> String {
    "risk-screening".to_string()
}

/// Classifier model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX export of the trained classifier
    pub model_path: String,
    /// Name reported alongside each assessment
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_model_name() -> String {
    "depression_model".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of requests screened concurrently
    pub workers: usize,
    /// Interval between metrics summaries in seconds
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
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
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "screening.requests".to_string(),
                report_subject: "screening.reports".to_string(),
                rejection_subject: default_rejection_subject(),
                queue_group: default_queue_group(),
            },
            model: ModelConfig {
                model_path: "models/depression_model.onnx".to_string(),
                name: default_model_name(),
                onnx_threads: 1,
            },
            pipeline: PipelineConfig {
                workers: 4,
                metrics_interval_secs: default_metrics_interval(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.request_subject, "screening.requests");
        assert_eq!(config.model.model_path, "models/depression_model.onnx");
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_load_from_path_applies_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[nats]
url = "nats://broker:4222"
request_subject = "profiles"
report_subject = "reports"

[model]
model_path = "/opt/models/screening.onnx"

[pipeline]
workers = 8

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.nats.url, "nats://broker:4222");
        assert_eq!(config.nats.rejection_subject, "screening.rejected");
        assert_eq!(config.nats.queue_group, "risk-screening");
        assert_eq!(config.model.model_path, "/opt/models/screening.onnx");
        assert_eq!(config.model.name, "depression_model");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.pipeline.workers, 8);
        assert_eq!(config.pipeline.metrics_interval_secs, 30);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = AppConfig::load().unwrap();
        let defaults = AppConfig::default();
        assert_eq!(shipped.nats.request_subject, defaults.nats.request_subject);
        assert_eq!(shipped.nats.queue_group, defaults.nats.queue_group);
        assert_eq!(shipped.model.model_path, defaults.model.model_path);
        assert_eq!(shipped.pipeline.workers, defaults.pipeline.workers);
        assert_eq!(shipped.logging.format, defaults.logging.format);
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(AppConfig::load_from_path("does/not/exist.toml").is_err());
    }
}
