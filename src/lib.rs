//! Student Risk Screening Library
//!
//! Turns raw student survey answers into the feature vector a pre-trained
//! classifier expects, and turns the classifier's output into a risk verdict
//! with a recommendation.

pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_engineer;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod producer;
pub mod risk_interpreter;
pub mod types;

pub use config::AppConfig;
pub use consumer::ProfileConsumer;
pub use error::ScreeningError;
pub use feature_engineer::{EngineeredFeatureVector, FeatureEngineer};
pub use models::{Classifier, OnnxClassifier};
pub use pipeline::ScreeningPipeline;
pub use producer::ReportProducer;
pub use risk_interpreter::RiskInterpreter;
pub use types::{ClassificationResult, RawProfile, RiskAssessment, RiskLevel, ScreeningReport};
