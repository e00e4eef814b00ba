//! NATS message producer for screening reports and rejections

use crate::types::assessment::{ScreeningRejection, ScreeningReport};
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing screening outcomes to NATS
#[derive(Clone)]
pub struct ReportProducer {
    client: Client,
    report_subject: String,
    rejection_subject: String,
}

impl ReportProducer {
    /// Create a new report producer
    pub fn new(client: Client, report_subject: &str, rejection_subject: &str) -> Self {
        Self {
            client,
            report_subject: report_subject.to_string(),
            rejection_subject: rejection_subject.to_string(),
        }
    }

    /// Publish a screening report
    pub async fn publish_report(&self, report: &ScreeningReport) -> Result<()> {
        let payload = serde_json::to_vec(report)?;

        self.client
            .publish(self.report_subject.clone(), payload.into())
            .await?;

        debug!(
            report_id = %report.report_id,
            request_id = %report.request_id,
            risk_level = report.assessment.level.as_str(),
            "Published screening report"
        );

        Ok(())
    }

    /// Publish a rejection for a request that could not be screened
    pub async fn publish_rejection(&self, rejection: &ScreeningRejection) -> Result<()> {
        let payload = serde_json::to_vec(rejection)?;

        self.client
            .publish(self.rejection_subject.clone(), payload.into())
            .await?;

        debug!(
            request_id = %rejection.request_id,
            error = %rejection.error,
            "Published screening rejection"
        );

        Ok(())
    }

    pub fn report_subject(&self) -> &str {
        &self.report_subject
    }

    pub fn rejection_subject(&self) -> &str {
        &self.rejection_subject
    }
}

