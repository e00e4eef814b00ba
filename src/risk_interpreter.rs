//! Turns classifier output into a risk verdict and recommendation

use crate::error::{Result, ScreeningError};
use crate::types::assessment::{ClassificationResult, RiskAssessment, RiskLevel};

/// Maps a classification result onto a `RiskAssessment`.
///
/// Label 1 is high risk and label 0 is low risk. The probability is passed
/// through as-is; formatting it is left to whoever renders the assessment.
pub struct RiskInterpreter;

impl RiskInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn interpret(&self, result: &ClassificationResult) -> Result<RiskAssessment> {
        let level = RiskLevel::from_label(result.label).ok_or_else(|| {
            ScreeningError::InvalidClassificationResult {
                reason: format!("label {} is not 0 or 1", result.label),
            }
        })?;

        if !(0.0..=1.0).contains(&result.probability) {
            return Err(ScreeningError::InvalidClassificationResult {
                reason: format!("probability {} is outside [0, 1]", result.probability),
            });
        }

        Ok(RiskAssessment {
            level,
            probability: result.probability,
            recommendation: level.recommendation().to_string(),
        })
    }
}

impl Default for RiskInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::assessment::{HIGH_RISK_RECOMMENDATION, LOW_RISK_RECOMMENDATION};

    #[test]
    fn test_high_risk() {
        let assessment = RiskInterpreter::new()
            .interpret(&ClassificationResult::new(1, 0.82))
            .unwrap();

        assert_eq!(assessment.level, RiskLevel::High);
        assert_eq!(assessment.probability, 0.82);
        assert_eq!(assessment.recommendation, HIGH_RISK_RECOMMENDATION);
    }

    #[test]
    fn test_low_risk() {
        let assessment = RiskInterpreter::new()
            .interpret(&ClassificationResult::new(0, 0.05))
            .unwrap();

        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.probability, 0.05);
        assert_eq!(assessment.recommendation, LOW_RISK_RECOMMENDATION);
    }

    #[test]
    fn test_probability_bounds_accepted() {
        let interpreter = RiskInterpreter::new();
        assert!(interpreter.interpret(&ClassificationResult::new(0, 0.0)).is_ok());
        assert!(interpreter.interpret(&ClassificationResult::new(1, 1.0)).is_ok());
    }

    #[test]
    fn test_label_outside_domain() {
        let result = RiskInterpreter::new().interpret(&ClassificationResult::new(2, 0.5));
        assert!(matches!(
            result,
            Err(ScreeningError::InvalidClassificationResult { .. })
        ));
    }

    #[test]
    fn test_probability_outside_domain() {
        let interpreter = RiskInterpreter::new();
        for probability in [1.2, -0.01, f64::NAN] {
            let result = interpreter.interpret(&ClassificationResult::new(1, probability));
            assert!(matches!(
                result,
                Err(ScreeningError::InvalidClassificationResult { .. })
            ));
        }
    }
}
