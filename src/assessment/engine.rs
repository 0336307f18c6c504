//! Risk Assessment Engine
//!
//! Classifies a measurement set against the parameter table:
//! health-based violations force High risk, aesthetic violations give
//! Medium risk when nothing health-based failed, otherwise Low.
//!
//! Pure and stateless: safe to call from any number of threads.

use std::sync::Arc;

use thiserror::Error;

use super::comparator::compare_to_range;
use super::types::{Assessment, Finding, MeasurementSet, RiskLevel};
use crate::parameters::{Category, ParameterDefinition, ParameterTable};

/// Configuration errors. Never produced for well-formed input against a
/// well-formed table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssessError {
    #[error("parameter '{0}' has no guideline range defined")]
    UnknownParameter(String),

    #[error("parameter '{name}' has an invalid range [{lo}, {hi}]")]
    InvalidRange { name: String, lo: f64, hi: f64 },

    #[error("parameter '{0}' is defined more than once")]
    DuplicateParameter(String),
}

/// Assess a measurement set against a parameter table.
///
/// Only parameters present in `measurements` are evaluated. A measured name
/// missing from `table` is an error, not silently skipped.
pub fn assess(measurements: &MeasurementSet, table: &ParameterTable) -> Result<Assessment, AssessError> {
    if let Some(unknown) = measurements.names().find(|name| !table.contains(name)) {
        tracing::warn!("Measurement references undefined parameter '{}'", unknown);
        return Err(AssessError::UnknownParameter(unknown.to_string()));
    }

    let mut risk = RiskLevel::Low;
    let mut findings = Vec::new();

    for def in table.by_category(Category::HealthBased) {
        if let Some(finding) = check_parameter(def, measurements, "exceeds health guideline") {
            risk = RiskLevel::High;
            findings.push(finding);
        }
    }

    for def in table.by_category(Category::Aesthetic) {
        if risk == RiskLevel::High {
            break;
        }
        if let Some(finding) = check_parameter(def, measurements, "outside acceptable range") {
            risk = RiskLevel::Medium;
            findings.push(finding);
        }
    }

    let issues: Vec<String> = findings.iter().map(|f| f.parameter.clone()).collect();
    let treatments = risk.treatments().iter().map(|t| t.to_string()).collect();

    tracing::debug!(
        "Assessed {} parameters: risk={} issues={:?}",
        measurements.len(),
        risk,
        issues
    );

    Ok(Assessment {
        risk,
        issues,
        findings,
        treatments,
    })
}

/// Finding for `def` if it was measured and falls outside its range
fn check_parameter(def: &ParameterDefinition, measurements: &MeasurementSet, verdict: &str) -> Option<Finding> {
    let value = measurements.get(&def.name)?;
    let comparison = compare_to_range(value, def.range);
    if comparison.is_within_range() {
        return None;
    }

    let code = def.code();
    Some(Finding {
        message: format!("{} {}", code, verdict),
        parameter: code,
        label: def.label.clone(),
        unit: def.unit.clone(),
        category: def.category,
        value,
        range: def.range,
        fit: comparison.fit,
        distance_from_range: comparison.distance_from_range,
    })
}

/// Engine bound to a shared, immutable parameter table
#[derive(Debug, Clone)]
pub struct RiskAssessor {
    table: Arc<ParameterTable>,
}

impl RiskAssessor {
    pub fn new(table: Arc<ParameterTable>) -> Self {
        Self { table }
    }

    /// Assessor over the canonical WHO-style table
    pub fn with_who_guidelines() -> Self {
        Self::new(Arc::new(ParameterTable::who_guidelines()))
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn assess(&self, measurements: &MeasurementSet) -> Result<Assessment, AssessError> {
        assess(measurements, &self.table)
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::with_who_guidelines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::comparator::RangeFit;
    use crate::parameters::Range;

    fn who() -> ParameterTable {
        ParameterTable::who_guidelines()
    }

    #[test]
    fn test_all_in_range_is_low() {
        let m = MeasurementSet::new()
            .with("ph", 7.0)
            .with("turbidity", 2.0)
            .with("ecoli", 0.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.risk, RiskLevel::Low);
        assert!(result.issues.is_empty());
        assert_eq!(result.treatments, vec!["No treatment required".to_string()]);
        assert!(result.is_safe());
    }

    #[test]
    fn test_aesthetic_violation_is_medium() {
        let m = MeasurementSet::new().with("ph", 9.0).with("ecoli", 0.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.issues, vec!["PH"]);
        assert_eq!(result.treatments.len(), 4);
        assert_eq!(result.findings[0].message, "PH outside acceptable range");
        assert_eq!(result.findings[0].fit, RangeFit::AboveRange);
    }

    #[test]
    fn test_ecoli_detection_is_high() {
        let m = MeasurementSet::new().with("ecoli", 1.0).with("ph", 7.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.issues, vec!["ECOLI"]);
        assert_eq!(result.treatments[0], "DO NOT drink");
        assert_eq!(result.findings[0].message, "ECOLI exceeds health guideline");
    }

    #[test]
    fn test_empty_set_is_low() {
        let result = assess(&MeasurementSet::new(), &who()).unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
        assert!(result.issues.is_empty());
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_health_violation_suppresses_aesthetic_issues() {
        let m = MeasurementSet::new()
            .with("lead", 0.05)
            .with("ph", 4.0)
            .with("tds", 1200.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.issues, vec!["LEAD"]);
    }

    #[test]
    fn test_health_issues_in_canonical_order() {
        let m = MeasurementSet::new()
            .with("fluoride", 3.0)
            .with("arsenic", 0.5)
            .with("ecoli", 12.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.issues, vec!["ECOLI", "ARSENIC", "FLUORIDE"]);
    }

    #[test]
    fn test_multiple_aesthetic_issues() {
        let m = MeasurementSet::new()
            .with("tds", 601.0)
            .with("turbidity", 5.5)
            .with("ph", 6.0);
        let result = assess(&m, &who()).unwrap();

        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.issues, vec!["PH", "TURBIDITY", "TDS"]);
        assert_eq!(result.findings[0].fit, RangeFit::BelowRange);
    }

    #[test]
    fn test_bounds_are_not_violations() {
        let m = MeasurementSet::new()
            .with("ph", 8.5)
            .with("turbidity", 5.0)
            .with("tds", 600.0)
            .with("nitrate", 50.0)
            .with("mercury", 0.006);
        let result = assess(&m, &who()).unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn test_unknown_parameter_is_error() {
        let m = MeasurementSet::new().with("ph", 7.0).with("chlorine", 0.5);
        let err = assess(&m, &who()).unwrap_err();
        assert_eq!(err, AssessError::UnknownParameter("chlorine".to_string()));
    }

    #[test]
    fn test_custom_table() {
        let table = ParameterTable::from_definitions(vec![
            ParameterDefinition::new("chlorine", "Free chlorine", "mg/L", Range::new(0.2, 5.0), Category::HealthBased),
            ParameterDefinition::new("color", "Color", "TCU", Range::new(0.0, 15.0), Category::Aesthetic),
        ])
        .unwrap();
        let assessor = RiskAssessor::new(Arc::new(table));

        let low_chlorine = MeasurementSet::new().with("chlorine", 0.1);
        assert_eq!(assessor.assess(&low_chlorine).unwrap().risk, RiskLevel::High);

        let colored = MeasurementSet::new().with("chlorine", 1.0).with("color", 20.0);
        assert_eq!(assessor.assess(&colored).unwrap().risk, RiskLevel::Medium);
    }

    #[test]
    fn test_custom_table_mixed_case_name_is_assessed() {
        let table = ParameterTable::from_definitions(vec![ParameterDefinition {
            name: "Chlorine".to_string(),
            label: "Free chlorine".to_string(),
            unit: "mg/L".to_string(),
            range: Range::new(0.2, 5.0),
            category: Category::HealthBased,
        }])
        .unwrap();

        let result = assess(&MeasurementSet::new().with("Chlorine", 9.0), &table).unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.issues, vec!["CHLORINE"]);
    }

    #[test]
    fn test_repeated_assessment_is_identical() {
        let assessor = RiskAssessor::default();
        let m = MeasurementSet::new()
            .with("nitrate", 80.0)
            .with("lead", 0.02)
            .with("ph", 9.5);
        let first = assessor.assess(&m).unwrap();
        let second = assessor.assess(&m).unwrap();
        assert_eq!(first, second);
    }
}
