//! Feature engineering for student risk classifier inference.
//!
//! Produces the same eight features, in the same order, that the
//! classifier was trained on.

use crate::error::Result;
use crate::types::profile::RawProfile;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const FEATURE_COUNT: usize = 8;

/// Feature names in training column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // Raw survey fields (6)
    "Academic Pressure",
    "Work/Study Hours",
    "Financial Stress",
    "Study Satisfaction",
    "CGPA",
    "Age",
    // Engineered (2)
    "Burnout_Index",
    "Total_Stress",
];

const BURNOUT_INDEX: usize = 6;
const TOTAL_STRESS: usize = 7;

/// Ordered feature vector handed to the classifier.
///
/// Position `i` always holds the feature named `FEATURE_NAMES[i]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl EngineeredFeatureVector {
    pub fn names(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Look up a feature by its training column name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values[i])
    }

    pub fn burnout_index(&self) -> f64 {
        self.values[BURNOUT_INDEX]
    }

    pub fn total_stress(&self) -> f64 {
        self.values[TOTAL_STRESS]
    }

    /// (name, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Single-precision copy for the ONNX input tensor
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }
}

impl Serialize for EngineeredFeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Feature engineer that turns raw profiles into classifier input.
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// Validate a profile and compute its feature vector.
    ///
    /// Out-of-range fields fail with `ScreeningError::InvalidInput`.
    pub fn compute(&self, profile: &RawProfile) -> Result<EngineeredFeatureVector> {
        profile.validate()?;

        // study_satisfaction >= 1 after validation, so the denominator is >= 2
        let burnout_index = f64::from(profile.academic_pressure * profile.study_hours)
            / f64::from(profile.study_satisfaction + 1);
        let total_stress = f64::from(profile.financial_stress * profile.academic_pressure);

        Ok(EngineeredFeatureVector {
            values: [
                f64::from(profile.academic_pressure),
                f64::from(profile.study_hours),
                f64::from(profile.financial_stress),
                f64::from(profile.study_satisfaction),
                profile.cgpa,
                f64::from(profile.age),
                burnout_index,
                total_stress,
            ],
        })
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn feature_names(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScreeningError;

    #[test]
    fn test_feature_values_and_order() {
        let engineer = FeatureEngineer::new();
        let profile = RawProfile::new(3, 6, 3, 3, 3.5, 21);

        let features = engineer.compute(&profile).unwrap();

        assert_eq!(
            features.values(),
            &[3.0, 6.0, 3.0, 3.0, 3.5, 21.0, 4.5, 9.0]
        );
        assert_eq!(features.burnout_index(), 4.5);
        assert_eq!(features.total_stress(), 9.0);
        assert_eq!(features.get("Burnout_Index"), Some(4.5));
        assert_eq!(features.get("CGPA"), Some(3.5));
        assert_eq!(features.get("burnout_index"), None);
    }

    #[test]
    fn test_feature_schema() {
        let engineer = FeatureEngineer::new();
        assert_eq!(engineer.feature_count(), 8);
        assert_eq!(
            engineer.feature_names(),
            &[
                "Academic Pressure",
                "Work/Study Hours",
                "Financial Stress",
                "Study Satisfaction",
                "CGPA",
                "Age",
                "Burnout_Index",
                "Total_Stress",
            ]
        );

        let features = engineer.compute(&RawProfile::new(5, 16, 4, 2, 1.25, 30)).unwrap();
        let names: Vec<&str> = features.iter().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let engineer = FeatureEngineer::new();
        let profile = RawProfile::new(4, 7, 2, 5, 2.87, 27);

        let first = engineer.compute(&profile).unwrap();
        let second = engineer.compute(&profile).unwrap();

        let first_bits: Vec<u64> = first.values().iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u64> = second.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn test_burnout_index_uses_true_division() {
        let engineer = FeatureEngineer::new();

        // 5 * 7 / (2 + 1) is not an integer
        let features = engineer.compute(&RawProfile::new(5, 7, 1, 2, 3.0, 20)).unwrap();
        assert_eq!(features.burnout_index(), 35.0 / 3.0);

        // zero study hours
        let features = engineer.compute(&RawProfile::new(5, 0, 1, 2, 3.0, 20)).unwrap();
        assert_eq!(features.burnout_index(), 0.0);
    }

    #[test]
    fn test_minimum_satisfaction_has_finite_burnout() {
        let engineer = FeatureEngineer::new();
        let features = engineer.compute(&RawProfile::new(5, 16, 5, 1, 0.0, 18)).unwrap();

        assert!(features.burnout_index().is_finite());
        assert_eq!(features.burnout_index(), 40.0);
        assert_eq!(features.total_stress(), 25.0);
    }

    #[test]
    fn test_invalid_age_rejected() {
        let engineer = FeatureEngineer::new();
        let result = engineer.compute(&RawProfile::new(3, 6, 3, 3, 3.5, 10));
        assert!(matches!(
            result,
            Err(ScreeningError::InvalidInput { field: "age", .. })
        ));
    }

    #[test]
    fn test_f32_conversion_keeps_order() {
        let features = FeatureEngineer::new()
            .compute(&RawProfile::new(2, 8, 4, 3, 3.25, 22))
            .unwrap();
        assert_eq!(
            features.to_f32_vec(),
            vec![2.0, 8.0, 4.0, 3.0, 3.25, 22.0, 4.0, 8.0]
        );
    }

    #[test]
    fn test_serialized_keys_follow_schema_order() {
        let features = FeatureEngineer::new().compute(&RawProfile::default()).unwrap();
        let json = serde_json::to_string(&features).unwrap();

        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{}\"", name)).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(json.contains("\"Burnout_Index\":4.5"));
    }
}
