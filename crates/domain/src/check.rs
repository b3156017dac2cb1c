//! Check outcomes, per-check results, and the run-level report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal outcome of one check invocation.
///
/// `Failure` means the probe succeeded but the observed HTTP metadata
/// violated expectations; `Error` means the harness could not probe at all
/// (unresolved host, network failure, timeout, malformed capture payload).
/// Operators need to tell those apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Capture succeeded and zero violations were recorded.
    Success,
    /// Capture succeeded but assertions found violations.
    Failure {
        /// One diagnostic line per violation.
        violations: Vec<String>,
    },
    /// Infrastructure failure before or during capture.
    Error {
        /// Description of the underlying failure.
        message: String,
    },
}

impl CheckOutcome {
    /// Returns true for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true for `Failure`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns true for `Error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Result of running a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The check's registered name.
    pub name: String,
    /// Terminal outcome.
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    /// Wall-clock duration across all attempts, in milliseconds.
    pub duration_ms: u64,
    /// Attempts made (1 unless the runner retried an error).
    pub attempts: u32,
}

/// Aggregate report over one full run of the registry.
///
/// Results appear in registration order, one entry per registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-check results in registration order.
    pub results: Vec<CheckResult>,
    /// Total number of checks run.
    pub total: usize,
    /// Checks that succeeded.
    pub passed: usize,
    /// Checks with assertion violations.
    pub failed: usize,
    /// Checks with infrastructure errors.
    pub errored: usize,
    /// Wall-clock duration of the whole run, in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Builds a report from per-check results, deriving the counts.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, results: Vec<CheckResult>, duration_ms: u64) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.outcome.is_success()).count();
        let failed = results.iter().filter(|r| r.outcome.is_failure()).count();
        let errored = total - passed - failed;

        Self {
            started_at,
            results,
            total,
            passed,
            failed,
            errored,
            duration_ms,
        }
    }

    /// Returns true if every check succeeded.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Process exit code for this report: zero iff every check succeeded.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(name: &str, outcome: CheckOutcome) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            outcome,
            duration_ms: 10,
            attempts: 1,
        }
    }

    #[test]
    fn test_report_counts() {
        let report = RunReport::new(
            Utc::now(),
            vec![
                result("a", CheckOutcome::Success),
                result(
                    "b",
                    CheckOutcome::Failure {
                        violations: vec!["bad".to_string()],
                    },
                ),
                result(
                    "c",
                    CheckOutcome::Error {
                        message: "timeout".to_string(),
                    },
                ),
            ],
            42,
        );

        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errored, 1);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_all_passed_report_exits_zero() {
        let report = RunReport::new(Utc::now(), vec![result("a", CheckOutcome::Success)], 5);
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_empty_report_passes() {
        let report = RunReport::new(Utc::now(), Vec::new(), 0);
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(CheckOutcome::Error {
            message: "no route".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "no route");
    }
}
