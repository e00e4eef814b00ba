//! Classification, risk assessment and report data structures

use crate::feature_engineer::EngineeredFeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_RECOMMENDATION: &str = "This student shows signs of high stress and potential depression. Immediate counseling intervention is recommended.";
pub const LOW_RISK_RECOMMENDATION: &str =
    "Student appears stable. Continue monitoring academic pressure levels.";

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    /// Map a classifier label onto a risk level.
    ///
    /// Only 0 and 1 are part of the label domain; anything else yields `None`.
    pub fn from_label(label: i64) -> Option<Self> {
        match label {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// Fixed recommendation text for this level
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Low => LOW_RISK_RECOMMENDATION,
            RiskLevel::High => HIGH_RISK_RECOMMENDATION,
        }
    }

    /// Short verdict shown above the probability
    pub fn headline(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::High => "High Risk Detected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }
}

/// Raw output of the classifier for one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Predicted class label (0 = not at risk, 1 = at risk)
    pub label: i64,
    /// Probability of label 1
    pub probability: f64,
}

impl ClassificationResult {
    pub fn new(label: i64, probability: f64) -> Self {
        Self { label, probability }
    }
}

/// Human-facing verdict derived from a classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Probability of the at-risk class, unmodified
    pub probability: f64,
    pub recommendation: String,
}

/// Screening report published for each processed request
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    /// Unique report identifier
    pub report_id: String,

    /// Associated request ID
    pub request_id: String,

    /// Feature vector exactly as it was handed to the classifier
    pub features: EngineeredFeatureVector,

    pub assessment: RiskAssessment,

    /// Name of the classifier that produced the result
    pub model: String,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl ScreeningReport {
    /// Create a new screening report
    pub fn new(
        request_id: String,
        features: EngineeredFeatureVector,
        assessment: RiskAssessment,
        model: String,
    ) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            features,
            assessment,
            model,
            timestamp: Utc::now(),
        }
    }

    /// One-line verdict, e.g. "High Risk Detected (Probability: 82.00%)"
    pub fn summary(&self) -> String {
        format!(
            "{} (Probability: {:.2}%)",
            self.assessment.level.headline(),
            self.assessment.probability * 100.0
        )
    }
}

/// Published when a request cannot be screened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRejection {
    pub request_id: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ScreeningRejection {
    pub fn new(request_id: String, error: String) -> Self {
        Self {
            request_id,
            error,
            timestamp: Utc::now(),
        }
    }
}
