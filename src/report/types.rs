use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::{Assessment, MeasurementSet, RangeFit, RiskLevel, compare_to_range};
use crate::form::SiteInfo;
use crate::parameters::{Category, ParameterTable};
use crate::storage::SubmissionRecord;

/// Everything a rendered report shows for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterReport {
    pub title: String,
    /// Submission id when the report comes from storage
    pub submission_id: Option<i64>,
    pub generated_at: DateTime<Utc>,
    pub site: SiteInfo,
    pub risk: RiskLevel,
    pub risk_description: String,
    /// Measured parameters in canonical order
    pub measurements: Vec<MeasurementRow>,
    /// Issue messages, one per violated parameter
    pub issues: Vec<String>,
    pub treatments: Vec<String>,
}

/// One measured parameter as displayed in the report table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRow {
    pub code: String,
    pub label: String,
    pub category: Category,
    pub value: f64,
    pub unit: String,
    /// "6.5-8.5", "0"
    pub guideline: String,
    pub fit: RangeFit,
}

impl MeasurementRow {
    pub fn is_violation(&self) -> bool {
        self.fit != RangeFit::WithinRange
    }

    /// Value with unit, e.g. "0.02 mg/L"
    pub fn value_display(&self) -> String {
        if self.unit.is_empty() {
            format!("{}", self.value)
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }
}

impl WaterReport {
    /// Build a report from an assessment that was produced for `measurements`
    pub fn new(
        site: SiteInfo,
        measurements: &MeasurementSet,
        assessment: &Assessment,
        table: &ParameterTable,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let rows = table
            .iter()
            .filter_map(|def| {
                let value = measurements.get(&def.name)?;
                Some(MeasurementRow {
                    code: def.code(),
                    label: def.label.clone(),
                    category: def.category,
                    value,
                    unit: def.unit.clone(),
                    guideline: def.range.display(),
                    fit: compare_to_range(value, def.range).fit,
                })
            })
            .collect();

        Self {
            title: "Water Quality Assessment Report".to_string(),
            submission_id: None,
            generated_at,
            site,
            risk: assessment.risk,
            risk_description: assessment.risk.description().to_string(),
            measurements: rows,
            issues: assessment.findings.iter().map(|f| f.message.clone()).collect(),
            treatments: assessment.treatments.clone(),
        }
    }

    /// Report for a stored submission, re-deriving findings with `assessment`
    pub fn from_record(record: &SubmissionRecord, assessment: &Assessment, table: &ParameterTable) -> Self {
        let mut report = Self::new(
            record.site.clone(),
            &record.measurements,
            assessment,
            table,
            record.created_at,
        );
        report.submission_id = Some(record.id);
        report
    }

    /// Download file name, e.g. "water_report_12.html"
    pub fn file_name(&self, extension: &str) -> String {
        match self.submission_id {
            Some(id) => format!("water_report_{}.{}", id, extension),
            None => format!("water_report.{}", extension),
        }
    }
}
