// Terminal rendering of probe reports
use crate::core::mhs::types::{CheckOutcome, ProbeReport};

/// Renders a `ProbeReport` as plain text or JSON
#[derive(Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// One line per check, then a summary line
    /// Marker: ✓/✗ for passed/failed
    pub fn render_plain(&self, report: &ProbeReport) -> String {
        let mut lines: Vec<String> = report
            .outcomes
            .iter()
            .map(|outcome| self.render_outcome(outcome))
            .collect();

        let failed = report.failures().count();
        let summary = if report.outcomes.is_empty() {
            format!("[{}] no checks run", report.nhs_environment)
        } else if failed == 0 {
            format!("[{}] all {} checks passed", report.nhs_environment, report.outcomes.len())
        } else {
            format!(
                "[{}] {} of {} checks failed",
                report.nhs_environment,
                failed,
                report.outcomes.len()
            )
        };
        lines.push(summary);
        lines.join("\n")
    }

    fn render_outcome(&self, outcome: &CheckOutcome) -> String {
        let marker = if outcome.passed { "✓" } else { "✗" };
        let status = outcome
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "---".to_string());

        let mut line = format!(
            "{} {} {} {}ms {}",
            marker, outcome.name, status, outcome.duration_ms, outcome.url
        );
        if let Some(id) = &outcome.correlation_id {
            line.push_str(&format!(" correlation-id={}", id));
        }
        if let Some(message) = &outcome.message {
            line.push_str(&format!("\n    {}", message));
        }
        line
    }

    pub fn render_json(&self, report: &ProbeReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}
