//! Report rendering.
//!
//! Check-level errors print distinctly from assertion failures so operators
//! can tell "the harness couldn't probe" from "the proxy misbehaved".

use turnstile_domain::{CheckOutcome, RunReport};

/// Renders the report as human-readable text, one block per check.
#[must_use]
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        match &result.outcome {
            CheckOutcome::Success => {
                out.push_str(&format!(
                    "PASS  {} ({}ms)\n",
                    result.name, result.duration_ms
                ));
            }
            CheckOutcome::Failure { violations } => {
                out.push_str(&format!(
                    "FAIL  {} ({}ms)\n",
                    result.name, result.duration_ms
                ));
                for violation in violations {
                    out.push_str(&format!("      {violation}\n"));
                }
            }
            CheckOutcome::Error { message } => {
                out.push_str(&format!(
                    "ERROR {} ({}ms): {message}\n",
                    result.name, result.duration_ms
                ));
            }
        }
    }

    out.push_str(&format!(
        "\n{} checks: {} passed, {} failed, {} errored ({}ms)\n",
        report.total, report.passed, report.failed, report.errored, report.duration_ms
    ));
    out
}

/// Renders the full report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn render_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
