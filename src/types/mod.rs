//! Type definitions for the screening pipeline

pub mod assessment;
pub mod profile;

pub use assessment::{
    ClassificationResult, RiskAssessment, RiskLevel, ScreeningRejection, ScreeningReport,
};
pub use profile::{RawProfile, ScreeningRequest};
