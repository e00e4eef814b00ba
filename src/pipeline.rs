//! End-to-end screening of a single request

use crate::error::{Result, ScreeningError};
use crate::feature_engineer::FeatureEngineer;
use crate::models::classifier::Classifier;
use crate::risk_interpreter::RiskInterpreter;
use crate::types::assessment::{ScreeningRejection, ScreeningReport};
use crate::types::profile::{new_request_id, RawProfile, ScreeningRequest};
use tracing::debug;

/// What the service does with one incoming message
#[derive(Debug)]
pub enum Outcome {
    /// Screened; publish to the report subject
    Report(ScreeningReport),
    /// Bad request or classifier output; publish to the rejection subject
    Rejection(ScreeningRejection),
    /// Inference failed; log only
    Failure {
        request_id: String,
        error: ScreeningError,
    },
    /// Payload is not JSON; nothing to reply to
    Dropped { reason: String },
}

/// Runs feature engineering, classification and interpretation in order.
///
/// The classifier is injected so the model handle is owned by the caller.
pub struct ScreeningPipeline<C: Classifier> {
    engineer: FeatureEngineer,
    interpreter: RiskInterpreter,
    classifier: C,
}

impl<C: Classifier> ScreeningPipeline<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            engineer: FeatureEngineer::new(),
            interpreter: RiskInterpreter::new(),
            classifier,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Screen a request. Errors from any stage are returned unchanged.
    pub fn screen(&self, request: &ScreeningRequest) -> Result<ScreeningReport> {
        let features = self.engineer.compute(&request.profile)?;

        debug!(
            request_id = %request.request_id,
            burnout_index = features.burnout_index(),
            total_stress = features.total_stress(),
            "Features computed"
        );

        let result = self.classifier.predict(&features)?;
        let assessment = self.interpreter.interpret(&result)?;

        Ok(ScreeningReport::new(
            request.request_id.clone(),
            features,
            assessment,
            self.classifier.name().to_string(),
        ))
    }

    /// Screen a bare profile under a freshly generated request id
    pub fn screen_profile(&self, profile: RawProfile) -> Result<ScreeningReport> {
        self.screen(&ScreeningRequest::new(profile))
    }

    /// Decode a raw message payload and screen it.
    ///
    /// JSON that does not decode into a request (wrong types, missing fields,
    /// bad timestamp) is rejected under its `request_id` when one is present.
    pub fn handle_payload(&self, payload: &[u8]) -> Outcome {
        let request = match serde_json::from_slice::<ScreeningRequest>(payload) {
            Ok(request) => request,
            Err(decode_error) => {
                return match serde_json::from_slice::<serde_json::Value>(payload) {
                    Ok(value) => {
                        let request_id = value
                            .get("request_id")
                            .and_then(|id| id.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(new_request_id);
                        Outcome::Rejection(ScreeningRejection::new(
                            request_id,
                            format!("invalid request: {}", decode_error),
                        ))
                    }
                    Err(e) => Outcome::Dropped {
                        reason: e.to_string(),
                    },
                };
            }
        };

        match self.screen(&request) {
            Ok(report) => Outcome::Report(report),
            Err(e) if e.is_rejection() => {
                Outcome::Rejection(ScreeningRejection::new(request.request_id, e.to_string()))
            }
            Err(error) => Outcome::Failure {
                request_id: request.request_id,
                error,
            },
        }
    }
}
