use crate::report::types::WaterReport;

/// JSON formatter for water reports
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report as pretty-printed JSON
    pub fn format(report: &WaterReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Format report as compact JSON (no whitespace)
    pub fn format_compact(report: &WaterReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::formatters::test_support::sample_report;

    #[test]
    fn test_format_json() {
        let json = JsonFormatter::format(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["risk"], "High");
        assert_eq!(value["site"]["source"], "Well");
        assert_eq!(value["measurements"][0]["code"], "ECOLI");
        assert_eq!(value["measurements"][0]["fit"], "above_range");
        assert_eq!(value["treatments"][0], "DO NOT drink");
    }

    #[test]
    fn test_compact_has_no_newlines() {
        let json = JsonFormatter::format_compact(&sample_report()).unwrap();
        assert!(!json.contains('\n'));
    }
}
