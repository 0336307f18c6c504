//! Water quality reports
//!
//! A `WaterReport` collects site details, measurements, the risk rating,
//! issues and treatments; the formatters render it as HTML, Markdown or JSON.

pub mod types;
pub mod formatters;

pub use types::{MeasurementRow, WaterReport};
pub use formatters::{HtmlFormatter, JsonFormatter, MarkdownFormatter};

use std::fmt;
use std::str::FromStr;

/// Output format for a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Html => "text/html; charset=utf-8",
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }

    pub fn render(&self, report: &WaterReport) -> Result<String, serde_json::Error> {
        match self {
            ReportFormat::Html => Ok(HtmlFormatter::format(report)),
            ReportFormat::Markdown => Ok(MarkdownFormatter::format(report)),
            ReportFormat::Json => JsonFormatter::format(report),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
