//! Form coercion
//!
//! Turns raw submitted form fields into site details and a measurement set.
//! Only type coercion happens here: blank measurement fields are left out,
//! anything that does not parse as a finite number is rejected.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::MeasurementSet;
use crate::parameters::ParameterTable;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error("value '{value}' for {field} is not a number")]
    InvalidNumber { field: String, value: String },
}

/// Where the sample was drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterSource {
    Well,
    Borehole,
    River,
    Tap,
    Other(String),
}

impl WaterSource {
    /// Choices offered by the form
    pub const CHOICES: [&'static str; 4] = ["Well", "Borehole", "River", "Tap"];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "well" => WaterSource::Well,
            "borehole" => WaterSource::Borehole,
            "river" => WaterSource::River,
            "tap" => WaterSource::Tap,
            _ => WaterSource::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WaterSource::Well => "Well",
            WaterSource::Borehole => "Borehole",
            WaterSource::River => "River",
            WaterSource::Tap => "Tap",
            WaterSource::Other(s) => s,
        }
    }
}

impl fmt::Display for WaterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who submitted the sample and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub location: String,
    pub source: WaterSource,
}

/// Coerce raw form fields.
///
/// Fields not in the parameter table (other than name/location/source)
/// are ignored.
pub fn parse_submission(
    fields: &HashMap<String, String>,
    table: &ParameterTable,
) -> Result<(SiteInfo, MeasurementSet), FormError> {
    let text = |key: &str| fields.get(key).map(|s| s.trim().to_string()).unwrap_or_default();

    let site = SiteInfo {
        name: text("name"),
        location: text("location"),
        source: WaterSource::parse(&text("source")),
    };

    let mut measurements = MeasurementSet::new();
    for def in table.iter() {
        let Some(raw) = fields.get(&def.name) else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FormError::InvalidNumber {
                field: def.code(),
                value: raw.to_string(),
            })?;
        measurements.insert(&def.name, value);
    }

    Ok((site, measurements))
}
