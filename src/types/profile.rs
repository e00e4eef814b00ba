//! Raw student profile and screening request structures

use crate::error::{Result, ScreeningError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const ACADEMIC_PRESSURE_RANGE: RangeInclusive<i32> = 1..=5;
pub const STUDY_HOURS_RANGE: RangeInclusive<i32> = 0..=16;
pub const FINANCIAL_STRESS_RANGE: RangeInclusive<i32> = 1..=5;
pub const STUDY_SATISFACTION_RANGE: RangeInclusive<i32> = 1..=5;
pub const CGPA_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const AGE_RANGE: RangeInclusive<i32> = 18..=35;

/// Survey answers for a single student, as collected by the input form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    /// Academic pressure (1 = low, 5 = high)
    #[serde(alias = "Academic Pressure")]
    pub academic_pressure: i32,

    /// Work/study hours per day (0 - 16)
    #[serde(alias = "Work/Study Hours")]
    pub study_hours: i32,

    /// Financial stress (1 = low, 5 = high)
    #[serde(alias = "Financial Stress")]
    pub financial_stress: i32,

    /// Study satisfaction (1 = low, 5 = high)
    #[serde(alias = "Study Satisfaction")]
    pub study_satisfaction: i32,

    /// Cumulative grade point average (0.0 - 5.0)
    #[serde(alias = "CGPA")]
    pub cgpa: f64,

    /// Age in years (18 - 35)
    #[serde(alias = "Age")]
    pub age: i32,
}

impl RawProfile {
    pub fn new(
        academic_pressure: i32,
        study_hours: i32,
        financial_stress: i32,
        study_satisfaction: i32,
        cgpa: f64,
        age: i32,
    ) -> Self {
        Self {
            academic_pressure,
            study_hours,
            financial_stress,
            study_satisfaction,
            cgpa,
            age,
        }
    }

    /// Check every field against its documented range.
    ///
    /// Returns the first violation in field order. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        check_int("academic_pressure", self.academic_pressure, &ACADEMIC_PRESSURE_RANGE)?;
        check_int("study_hours", self.study_hours, &STUDY_HOURS_RANGE)?;
        check_int("financial_stress", self.financial_stress, &FINANCIAL_STRESS_RANGE)?;
        check_int("study_satisfaction", self.study_satisfaction, &STUDY_SATISFACTION_RANGE)?;

        // NaN fails `contains`, so it is rejected here too
        if !CGPA_RANGE.contains(&self.cgpa) {
            return Err(ScreeningError::InvalidInput {
                field: "cgpa",
                value: self.cgpa,
                min: *CGPA_RANGE.start(),
                max: *CGPA_RANGE.end(),
            });
        }

        check_int("age", self.age, &AGE_RANGE)
    }
}

impl Default for RawProfile {
    /// Starting values of the screening form.
    fn default() -> Self {
        Self::new(3, 6, 3, 3, 3.5, 21)
    }
}

fn check_int(field: &'static str, value: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ScreeningError::InvalidInput {
            field,
            value: f64::from(value),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        })
    }
}

/// Screening request received from the messaging layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRequest {
    /// Caller-supplied identifier, generated when absent
    #[serde(default = "new_request_id")]
    pub request_id: String,

    #[serde(flatten)]
    pub profile: RawProfile,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

pub(crate) fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ScreeningRequest {
    pub fn new(profile: RawProfile) -> Self {
        Self {
            request_id: new_request_id(),
            profile,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(RawProfile::default().validate().is_ok());
    }

    #[test]
    fn test_boundaries_are_valid() {
        assert!(RawProfile::new(1, 0, 1, 1, 0.0, 18).validate().is_ok());
        assert!(RawProfile::new(5, 16, 5, 5, 5.0, 35).validate().is_ok());
    }

    #[test]
    fn test_age_out_of_range() {
        let profile = RawProfile::new(3, 6, 3, 3, 3.5, 10);
        match profile.validate() {
            Err(ScreeningError::InvalidInput { field, value, .. }) => {
                assert_eq!(field, "age");
                assert_eq!(value, 10.0);
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_satisfaction_rejected() {
        let profile = RawProfile::new(3, 6, 3, 0, 3.5, 21);
        assert!(matches!(
            profile.validate(),
            Err(ScreeningError::InvalidInput { field: "study_satisfaction", .. })
        ));
    }

    #[test]
    fn test_cgpa_out_of_range_and_nan() {
        assert!(RawProfile::new(3, 6, 3, 3, 5.01, 21).validate().is_err());
        assert!(RawProfile::new(3, 6, 3, 3, -0.1, 21).validate().is_err());
        assert!(RawProfile::new(3, 6, 3, 3, f64::NAN, 21).validate().is_err());
    }

    #[test]
    fn test_first_violation_reported() {
        let profile = RawProfile::new(9, 20, 3, 3, 3.5, 21);
        assert!(matches!(
            profile.validate(),
            Err(ScreeningError::InvalidInput { field: "academic_pressure", .. })
        ));
    }

    #[test]
    fn test_request_accepts_training_column_names() {
        let json = r#"{
            "request_id": "req_1",
            "Academic Pressure": 4,
            "Work/Study Hours": 10,
            "Financial Stress": 2,
            "Study Satisfaction": 1,
            "CGPA": 2.75,
            "Age": 24
        }"#;

        let request: ScreeningRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.request_id, "req_1");
        assert_eq!(request.profile, RawProfile::new(4, 10, 2, 1, 2.75, 24));
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let json = r#"{
            "academic_pressure": 3,
            "study_hours": 6,
            "financial_stress": 3,
            "study_satisfaction": 3,
            "cgpa": 3.5,
            "age": 21
        }"#;

        let request: ScreeningRequest = serde_json::from_str(json).unwrap();
        assert!(uuid::Uuid::parse_str(&request.request_id).is_ok());
        assert_eq!(request.profile, RawProfile::default());
    }
}
