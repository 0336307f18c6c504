//! Assessment Types
//!
//! Inputs and outputs of the risk engine: measurement sets, the three-level
//! risk rating, per-parameter findings and the final assessment.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::comparator::RangeFit;
use crate::parameters::{Category, Range};

/// Overall water risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Every evaluated parameter within its guideline
    Low,
    /// Aesthetic parameters out of range, no health-based violation
    Medium,
    /// At least one health-based parameter out of range
    High,
}

const LOW_TREATMENTS: &[&str] = &["No treatment required"];

const MEDIUM_TREATMENTS: &[&str] = &[
    "Cloth filtration",
    "Boiling",
    "Solar disinfection (SODIS)",
    "Chlorination",
];

const HIGH_TREATMENTS: &[&str] = &[
    "DO NOT drink",
    "Reverse Osmosis (RO)",
    "UV treatment",
    "Source substitution",
];

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Recommended treatments, in the order they should be presented
    pub fn treatments(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Low => LOW_TREATMENTS,
            RiskLevel::Medium => MEDIUM_TREATMENTS,
            RiskLevel::High => HIGH_TREATMENTS,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "All measured parameters are within guideline values",
            RiskLevel::Medium => "Aesthetic parameters are outside acceptable ranges",
            RiskLevel::High => "One or more parameters exceed health-based guidelines",
        }
    }

    /// CSS class used by the HTML renderers
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Medium => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// Measured parameter values for one sample, keyed by lower-case name.
///
/// Absent parameters are not evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MeasurementSet {
    values: BTreeMap<String, f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value. Names are lower-cased.
    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.trim().to_ascii_lowercase(), value);
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut set = MeasurementSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl From<BTreeMap<String, f64>> for MeasurementSet {
    fn from(map: BTreeMap<String, f64>) -> Self {
        map.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }
}

impl From<MeasurementSet> for BTreeMap<String, f64> {
    fn from(set: MeasurementSet) -> Self {
        set.values
    }
}

/// Detail for one violated parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Upper-cased parameter name ("PH")
    pub parameter: String,
    pub label: String,
    pub unit: String,
    pub category: Category,
    pub value: f64,
    pub range: Range,
    pub fit: RangeFit,
    pub distance_from_range: f64,
    /// "ECOLI exceeds health guideline" / "PH outside acceptable range"
    pub message: String,
}

/// Result of assessing one measurement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub risk: RiskLevel,
    /// Violated parameter codes in canonical order
    pub issues: Vec<String>,
    /// One finding per entry in `issues`
    pub findings: Vec<Finding>,
    pub treatments: Vec<String>,
}

impl Assessment {
    pub fn is_safe(&self) -> bool {
        self.risk == RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_risk_from_str() {
        assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" medium ".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("critical".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_treatment_lists() {
        assert_eq!(RiskLevel::Low.treatments(), &["No treatment required"]);
        assert_eq!(RiskLevel::Medium.treatments().len(), 4);
        assert_eq!(RiskLevel::High.treatments()[0], "DO NOT drink");
    }

    #[test]
    fn test_measurement_names_lowercased() {
        let set = MeasurementSet::new().with("PH", 7.0).with(" Tds ", 300.0);
        assert_eq!(set.get("ph"), Some(7.0));
        assert_eq!(set.get("tds"), Some(300.0));
        assert_eq!(set.get("PH"), None);
    }

    #[test]
    fn test_measurement_overwrite() {
        let set = MeasurementSet::new().with("ph", 7.0).with("ph", 9.0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("ph"), Some(9.0));
    }

    #[test]
    fn test_measurement_json_is_plain_map() {
        let set = MeasurementSet::new().with("ph", 7.0).with("ecoli", 0.0);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"ecoli":0.0,"ph":7.0}"#);

        let back: MeasurementSet = serde_json::from_str(r#"{"ECOLI":0.0,"pH":7.0}"#).unwrap();
        assert_eq!(back, set);
    }
}
