//! Parameter Definitions
//!
//! WHO-style guideline ranges for every measurable parameter, grouped into
//! health-based and aesthetic categories. The table is built once at startup
//! and shared read-only (`Arc<ParameterTable>`) by every assessment.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assessment::AssessError;

/// Whether a violation threatens health or only palatability/usability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pathogen indicators, heavy metals: any violation means High risk
    HealthBased,
    /// Acidity, clarity, dissolved solids: violations mean Medium risk
    Aesthetic,
}

impl Category {
    pub fn display_text(&self) -> &'static str {
        match self {
            Category::HealthBased => "Health-based",
            Category::Aesthetic => "Aesthetic",
        }
    }
}

/// Inclusive acceptable range `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

impl Range {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Both bounds inclusive. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Zero-width range, e.g. E. coli must be exactly 0
    pub fn is_exact(&self) -> bool {
        self.lo == self.hi
    }

    /// Compact display, e.g. "6.5-8.5" or "0" for exact ranges
    pub fn display(&self) -> String {
        if self.is_exact() {
            format!("{}", self.lo)
        } else {
            format!("{}-{}", self.lo, self.hi)
        }
    }
}

/// A single measurable parameter and its guideline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Lower-case identifier used in forms and measurement sets ("ph")
    pub name: String,
    /// Human label ("pH", "E. coli")
    pub label: String,
    /// Display unit, empty for dimensionless parameters
    pub unit: String,
    pub range: Range,
    pub category: Category,
}

impl ParameterDefinition {
    pub fn new(name: &str, label: &str, unit: &str, range: Range, category: Category) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            label: label.to_string(),
            unit: unit.to_string(),
            range,
            category,
        }
    }

    /// Issue identifier: the upper-cased name ("PH", "ECOLI")
    pub fn code(&self) -> String {
        self.name.to_ascii_uppercase()
    }

    pub fn is_health_based(&self) -> bool {
        self.category == Category::HealthBased
    }
}

/// (name, label, unit, lo, hi) for the canonical health-based parameters
const HEALTH_BASED: [(&str, &str, &str, f64, f64); 6] = [
    ("ecoli", "E. coli", "CFU/100 mL", 0.0, 0.0),
    ("arsenic", "Arsenic", "mg/L", 0.0, 0.01),
    ("lead", "Lead", "mg/L", 0.0, 0.01),
    ("mercury", "Mercury", "mg/L", 0.0, 0.006),
    ("nitrate", "Nitrate", "mg/L", 0.0, 50.0),
    ("fluoride", "Fluoride", "mg/L", 0.0, 1.5),
];

/// (name, label, unit, lo, hi) for the canonical aesthetic parameters
const AESTHETIC: [(&str, &str, &str, f64, f64); 3] = [
    ("ph", "pH", "", 6.5, 8.5),
    ("turbidity", "Turbidity", "NTU", 0.0, 5.0),
    ("tds", "TDS", "mg/L", 0.0, 600.0),
];

/// Immutable parameter table in canonical evaluation order
#[derive(Debug, Clone)]
pub struct ParameterTable {
    definitions: Vec<ParameterDefinition>,
    index: FxHashMap<String, usize>,
}

impl ParameterTable {
    /// The canonical WHO-style guideline table (tds upper bound 600 mg/L)
    pub fn who_guidelines() -> Self {
        let health = HEALTH_BASED.iter().map(|&(name, label, unit, lo, hi)| {
            ParameterDefinition::new(name, label, unit, Range::new(lo, hi), Category::HealthBased)
        });
        let aesthetic = AESTHETIC.iter().map(|&(name, label, unit, lo, hi)| {
            ParameterDefinition::new(name, label, unit, Range::new(lo, hi), Category::Aesthetic)
        });
        let definitions: Vec<ParameterDefinition> = health.chain(aesthetic).collect();
        let index = build_index(&definitions);
        Self { definitions, index }
    }

    /// Build a custom table. Order of `definitions` is the canonical order
    /// within each category. Names are trimmed and lower-cased to match
    /// `MeasurementSet` keys.
    pub fn from_definitions(mut definitions: Vec<ParameterDefinition>) -> Result<Self, AssessError> {
        let mut index = FxHashMap::default();
        for (i, def) in definitions.iter_mut().enumerate() {
            def.name = def.name.trim().to_ascii_lowercase();
            if !(def.range.lo <= def.range.hi) {
                return Err(AssessError::InvalidRange {
                    name: def.name.clone(),
                    lo: def.range.lo,
                    hi: def.range.hi,
                });
            }
            if index.insert(def.name.clone(), i).is_some() {
                return Err(AssessError::DuplicateParameter(def.name.clone()));
            }
        }
        Ok(Self { definitions, index })
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All definitions, health-based and aesthetic interleaved as declared
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.definitions.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ParameterDefinition> {
        self.definitions.iter().filter(move |d| d.category == category)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::who_guidelines()
    }
}

fn build_index(definitions: &[ParameterDefinition]) -> FxHashMap<String, usize> {
    definitions
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_who_table_order() {
        let table = ParameterTable::who_guidelines();
        let health: Vec<&str> = table
            .by_category(Category::HealthBased)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(health, vec!["ecoli", "arsenic", "lead", "mercury", "nitrate", "fluoride"]);

        let aesthetic: Vec<&str> = table
            .by_category(Category::Aesthetic)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(aesthetic, vec!["ph", "turbidity", "tds"]);
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_range_inclusive() {
        let ph = Range::new(6.5, 8.5);
        assert!(ph.contains(6.5));
        assert!(ph.contains(8.5));
        assert!(!ph.contains(6.49));
        assert!(!ph.contains(8.51));
        assert!(!ph.contains(f64::NAN));
    }

    #[test]
    fn test_exact_range() {
        let table = ParameterTable::who_guidelines();
        let ecoli = table.get("ecoli").unwrap();
        assert!(ecoli.range.is_exact());
        assert!(ecoli.range.contains(0.0));
        assert!(!ecoli.range.contains(0.5));
        assert_eq!(ecoli.range.display(), "0");
        assert_eq!(table.get("ph").unwrap().range.display(), "6.5-8.5");
    }

    #[test]
    fn test_tds_canonical_bound() {
        let table = ParameterTable::who_guidelines();
        assert_eq!(table.get("tds").unwrap().range.hi, 600.0);
    }

    #[test]
    fn test_custom_table_rejects_inverted_range() {
        let defs = vec![ParameterDefinition::new(
            "chlorine",
            "Chlorine",
            "mg/L",
            Range::new(5.0, 0.2),
            Category::HealthBased,
        )];
        let err = ParameterTable::from_definitions(defs).unwrap_err();
        assert!(matches!(err, AssessError::InvalidRange { .. }));
    }

    #[test]
    fn test_custom_table_rejects_duplicates() {
        let def = ParameterDefinition::new("ph", "pH", "", Range::new(6.5, 8.5), Category::Aesthetic);
        let err = ParameterTable::from_definitions(vec![def.clone(), def]).unwrap_err();
        assert!(matches!(err, AssessError::DuplicateParameter(ref name) if name == "ph"));
    }

    #[test]
    fn test_custom_table_normalises_names() {
        let def = ParameterDefinition {
            name: " Chlorine ".to_string(),
            label: "Free chlorine".to_string(),
            unit: "mg/L".to_string(),
            range: Range::new(0.2, 5.0),
            category: Category::HealthBased,
        };
        let table = ParameterTable::from_definitions(vec![def]).unwrap();

        assert!(table.contains("chlorine"));
        assert_eq!(table.get("chlorine").unwrap().code(), "CHLORINE");
    }

    #[test]
    fn test_custom_table_duplicates_ignore_case() {
        let lower = ParameterDefinition::new("ph", "pH", "", Range::new(6.5, 8.5), Category::Aesthetic);
        let mut upper = lower.clone();
        upper.name = "PH".to_string();

        let err = ParameterTable::from_definitions(vec![lower, upper]).unwrap_err();
        assert!(matches!(err, AssessError::DuplicateParameter(ref name) if name == "ph"));
    }

    #[test]
    fn test_code_is_uppercase() {
        let table = ParameterTable::who_guidelines();
        assert_eq!(table.get("ecoli").unwrap().code(), "ECOLI");
    }
}
