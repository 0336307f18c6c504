use crate::report::types::WaterReport;

/// HTML formatter for water reports
pub struct HtmlFormatter;

impl HtmlFormatter {
    /// Format report as standalone HTML with embedded CSS
    pub fn format(report: &WaterReport) -> String {
        let mut html = String::with_capacity(4096);

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&report.title)));
        html.push_str("<style>\n");
        html.push_str("body { font-family: Arial, sans-serif; max-width: 800px; margin: 40px auto; padding: 20px; line-height: 1.6; }\n");
        html.push_str("h1 { color: #0277bd; margin-bottom: 10px; }\n");
        html.push_str("h2 { color: #34495e; border-bottom: 2px solid #ecf0f1; padding-bottom: 5px; margin-top: 30px; }\n");
        html.push_str(".risk-low { background: #d4edda; border-left: 4px solid #28a745; padding: 15px; border-radius: 4px; }\n");
        html.push_str(".risk-medium { background: #fff3cd; border-left: 4px solid #ffc107; padding: 15px; border-radius: 4px; }\n");
        html.push_str(".risk-high { background: #f8d7da; border-left: 4px solid #dc3545; padding: 15px; border-radius: 4px; }\n");
        html.push_str("table { width: 100%; border-collapse: collapse; margin: 16px 0; }\n");
        html.push_str("th { background: #34495e; color: white; text-align: left; padding: 12px; font-weight: 600; }\n");
        html.push_str("td { padding: 12px; border-bottom: 1px solid #ecf0f1; }\n");
        html.push_str("tr.violation td { color: #dc3545; font-weight: bold; }\n");
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&report.title)));
        html.push_str(&format!(
            "<p>Date: {}</p>\n",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        html.push_str(&format!("<p>Name: {}</p>\n", escape_html(&report.site.name)));
        html.push_str(&format!("<p>Location: {}</p>\n", escape_html(&report.site.location)));
        html.push_str(&format!(
            "<p>Water Source: {}</p>\n",
            escape_html(report.site.source.as_str())
        ));

        html.push_str(&format!("<div class=\"{}\">\n", report.risk.css_class()));
        html.push_str(&format!("<h2>Risk Level: {}</h2>\n", report.risk));
        html.push_str(&format!("<p>{}</p>\n", report.risk_description));
        html.push_str("</div>\n");

        if !report.measurements.is_empty() {
            html.push_str("<h2>Measurements</h2>\n");
            html.push_str("<table>\n<tr><th>Parameter</th><th>Value</th><th>Guideline</th><th>Category</th><th>Status</th></tr>\n");
            for row in &report.measurements {
                let class = if row.is_violation() { " class=\"violation\"" } else { "" };
                html.push_str(&format!(
                    "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    class,
                    escape_html(&row.label),
                    escape_html(&row.value_display()),
                    row.guideline,
                    row.category.display_text(),
                    row.fit.display_text()
                ));
            }
            html.push_str("</table>\n");
        }

        html.push_str("<h2>Issues Identified</h2>\n");
        if report.issues.is_empty() {
            html.push_str("<p>None</p>\n");
        } else {
            html.push_str("<ul>\n");
            for issue in &report.issues {
                html.push_str(&format!("<li>{}</li>\n", escape_html(issue)));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("<h2>Recommended Treatments</h2>\n<ul>\n");
        for treatment in &report.treatments {
            html.push_str(&format!("<li>{}</li>\n", escape_html(treatment)));
        }
        html.push_str("</ul>\n");

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Escape the five HTML-significant characters
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
