//! Student Risk Screening - Main Entry Point
//!
//! Consumes student profiles from NATS, classifies them with the ONNX model
//! and publishes screening reports.

use anyhow::{Context, Result};
use futures::StreamExt;
use student_risk_screening::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    consumer::ProfileConsumer,
    metrics::{MetricsReporter, ScreeningMetrics},
    models::OnnxClassifier,
    pipeline::{Outcome, ScreeningPipeline},
    producer::ReportProducer,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as first argument
    let config_arg = std::env::args().nth(1);
    let config_path = config_arg.as_deref().unwrap_or(DEFAULT_CONFIG_PATH).to_string();
    let config = match &config_arg {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
    .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    init_logging(&config.logging)?;

    info!(config = %config_path, "Starting Student Risk Screening service");

    // The model must be available before any request is screened
    let classifier = OnnxClassifier::load(
        &config.model.model_path,
        &config.model.name,
        config.model.onnx_threads,
    )
    .context("Classifier model is unavailable")?;
    let pipeline = Arc::new(ScreeningPipeline::new(classifier));
    info!(
        model = %config.model.name,
        path = %config.model.model_path,
        "Classifier loaded (features are passed unscaled)"
    );

    let metrics = Arc::new(ScreeningMetrics::new());

    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = ProfileConsumer::new(
        client.clone(),
        &config.nats.request_subject,
        Some(config.nats.queue_group.as_str()),
    );
    let producer = Arc::new(ReportProducer::new(
        client.clone(),
        &config.nats.report_subject,
        &config.nats.rejection_subject,
    ));

    info!(
        workers = config.pipeline.workers,
        requests = %consumer.subject(),
        reports = %producer.report_subject(),
        rejections = %producer.rejection_subject(),
        "Starting screening loop"
    );

    let workers = config.pipeline.workers.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));

    let reporter = MetricsReporter::new(metrics.clone(), config.pipeline.metrics_interval_secs);
    tokio::spawn(reporter.start());

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Worker semaphore closed")?;

        let pipeline = pipeline.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            match pipeline.handle_payload(&message.payload) {
                Outcome::Report(report) => {
                    let processing_time = start_time.elapsed();
                    metrics.record_screening(
                        processing_time,
                        report.assessment.level,
                        report.assessment.probability,
                    );

                    if let Err(e) = producer.publish_report(&report).await {
                        error!(request_id = %report.request_id, error = %e, "Failed to publish screening report");
                    } else {
                        info!(
                            request_id = %report.request_id,
                            risk_level = report.assessment.level.as_str(),
                            probability = report.assessment.probability,
                            burnout_index = report.features.burnout_index(),
                            total_stress = report.features.total_stress(),
                            processing_time_us = processing_time.as_micros(),
                            "{}",
                            report.summary()
                        );
                    }
                }
                Outcome::Rejection(rejection) => {
                    metrics.record_rejection();
                    warn!(request_id = %rejection.request_id, error = %rejection.error, "Screening request rejected");

                    if let Err(e) = producer.publish_rejection(&rejection).await {
                        error!(request_id = %rejection.request_id, error = %e, "Failed to publish rejection");
                    }
                }
                Outcome::Failure { request_id, error } => {
                    metrics.record_failure();
                    error!(request_id = %request_id, error = %error, "Screening failed");
                }
                Outcome::Dropped { reason } => {
                    warn!(error = %reason, "Dropped payload that is not JSON");
                }
            }

            debug!(elapsed_us = start_time.elapsed().as_micros(), "Message handled");
            drop(permit);
        });
    }

    // Wait for in-flight screenings before flushing their publishes
    let _drained = semaphore
        .acquire_many(workers as u32)
        .await
        .context("Worker semaphore closed")?;
    client.flush().await.context("Failed to flush NATS client")?;

    info!("Screening service shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!(
            "student_risk_screening={level},risk_screening={level}",
            level = logging.level
        )),
    };

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
    }
}
