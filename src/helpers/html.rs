use std::fmt::Write;
use tracing::info;

use crate::models::time_entry::EmployeeSummary;

/// Rows below this many hours are highlighted.
pub const LOW_HOURS_THRESHOLD: f64 = 100.0;

const STYLESHEET: &str = concat!(
    "table { width: 100%; border-collapse: collapse; }",
    "th, td { border: 1px solid black; padding: 8px; text-align: left; }",
    "tr.low-hours { background-color: #ffcccc; }",
);

/// Renders the summary as a standalone HTML document, one table row per
/// employee in the order given.
pub fn render_html(summary: &[EmployeeSummary]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>");
    html.push_str("<html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Employee Time Report</title>");
    html.push_str("<style>");
    html.push_str(STYLESHEET);
    html.push_str("</style></head><body>");
    html.push_str("<h1>Employee Time Report</h1>");
    html.push_str("<table>");
    html.push_str("<tr><th>Name</th><th>Total Time Worked (hours)</th></tr>");

    for employee in summary {
        if employee.total_hours < LOW_HOURS_THRESHOLD {
            html.push_str("<tr class=\"low-hours\">");
        } else {
            html.push_str("<tr>");
        }
        // Writing into a String cannot fail
        let _ = write!(
            html,
            "<td>{}</td><td>{:.2}</td></tr>",
            escape(&employee.name),
            employee.total_hours
        );
    }

    html.push_str("</table>");
    html.push_str("</body></html>");

    info!(
        "Rendered HTML report with {} rows, {} bytes",
        summary.len(),
        html.len()
    );
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
