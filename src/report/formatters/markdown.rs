use crate::report::types::WaterReport;

/// Markdown formatter for water reports
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format report as markdown
    pub fn format(report: &WaterReport) -> String {
        let mut md = String::with_capacity(2048);

        md.push_str(&format!("# {}\n\n", report.title));
        md.push_str(&format!(
            "**Date:** {}  \n",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str(&format!("**Name:** {}  \n", report.site.name));
        md.push_str(&format!("**Location:** {}  \n", report.site.location));
        md.push_str(&format!("**Water Source:** {}\n\n", report.site.source));

        md.push_str(&format!("## Risk Level: {}\n\n", report.risk));
        md.push_str(&format!("{}\n\n", report.risk_description));

        if !report.measurements.is_empty() {
            md.push_str("## Measurements\n\n");
            md.push_str("| Parameter | Value | Guideline | Status |\n");
            md.push_str("|-----------|-------|-----------|--------|\n");
            for row in &report.measurements {
                let status = if row.is_violation() {
                    format!("**{}**", row.fit.display_text())
                } else {
                    row.fit.display_text().to_string()
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    row.label,
                    row.value_display(),
                    row.guideline,
                    status
                ));
            }
            md.push('\n');
        }

        md.push_str("## Issues Identified\n\n");
        if report.issues.is_empty() {
            md.push_str("None\n\n");
        } else {
            for issue in &report.issues {
                md.push_str(&format!("- {}\n", issue));
            }
            md.push('\n');
        }

        md.push_str("## Recommended Treatments\n\n");
        for treatment in &report.treatments {
            md.push_str(&format!("- {}\n", treatment));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::formatters::test_support::{low_risk_report, sample_report};

    #[test]
    fn test_format_markdown() {
        let md = MarkdownFormatter::format(&sample_report());

        assert!(md.starts_with("# Water Quality Assessment Report"));
        assert!(md.contains("## Risk Level: High"));
        assert!(md.contains("| E. coli | 3 CFU/100 mL | 0 | **Above guideline** |"));
        assert!(md.contains("| pH | 7 | 6.5-8.5 | Within guideline |"));
        assert!(md.contains("- ECOLI exceeds health guideline"));
        assert!(md.contains("- Reverse Osmosis (RO)"));
    }

    #[test]
    fn test_no_issues() {
        let md = MarkdownFormatter::format(&low_risk_report());

        assert!(md.contains("## Issues Identified\n\nNone"));
        assert!(md.contains("- No treatment required"));
    }
}
