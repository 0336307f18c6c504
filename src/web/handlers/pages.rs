// Page views for HTML rendering with Askama

use std::collections::HashMap;

use askama::Template;

use crate::assessment::Assessment;
use crate::form::WaterSource;
use crate::parameters::ParameterTable;

// ============================================================================
// Assessment Page
// ============================================================================

/// One measurement input on the form
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub unit: String,
    pub guideline: String,
    pub category: String,
    /// Previously submitted text, echoed back into the input
    pub value: String,
}

/// Outcome shown under the form after a successful submission
pub struct ResultView {
    pub submission_id: i64,
    pub risk: String,
    pub risk_class: String,
    pub issues: Vec<String>,
    pub treatments: Vec<String>,
}

impl ResultView {
    pub fn new(submission_id: i64, assessment: &Assessment) -> Self {
        Self {
            submission_id,
            risk: assessment.risk.to_string(),
            risk_class: assessment.risk.css_class().to_string(),
            issues: assessment.findings.iter().map(|f| f.message.clone()).collect(),
            treatments: assessment.treatments.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/assess.html")]
pub struct AssessPage {
    pub title: String,
    pub name: String,
    pub location: String,
    pub selected_source: String,
    pub sources: Vec<String>,
    pub fields: Vec<FieldView>,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl AssessPage {
    /// Empty form
    pub fn new(table: &ParameterTable) -> Self {
        Self::with_input(table, &HashMap::new())
    }

    /// Form pre-filled with the submitted fields
    pub fn with_input(table: &ParameterTable, input: &HashMap<String, String>) -> Self {
        let text = |key: &str| input.get(key).cloned().unwrap_or_default();

        let fields = table
            .iter()
            .map(|def| FieldView {
                name: def.name.clone(),
                label: def.label.clone(),
                unit: def.unit.clone(),
                guideline: def.range.display(),
                category: def.category.display_text().to_string(),
                value: text(&def.name),
            })
            .collect();

        Self {
            title: "Water Quality Assessment".to_string(),
            name: text("name"),
            location: text("location"),
            selected_source: text("source"),
            sources: WaterSource::CHOICES.iter().map(|s| s.to_string()).collect(),
            fields,
            result: None,
            error: None,
        }
    }

    pub fn with_result(mut self, result: ResultView) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }
}
