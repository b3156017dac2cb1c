//! Check runner: executes every registered check and aggregates results.

use std::time::{Duration, Instant};

use chrono::Utc;
use turnstile_domain::{CheckOutcome, CheckResult, RunReport};

use crate::context::CheckContext;
use crate::registry::{Check, CheckRegistry};

/// Pause between retry attempts after an infrastructure error.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Executes checks sequentially in registration order.
///
/// Each check moves `Pending -> Running -> {Success, Failure, Error}`:
/// an infrastructure failure before assertions is an Error, a non-empty
/// assertion set is a Failure, anything else is a Success. One check's
/// outcome never aborts the rest of the run.
///
/// Only Error outcomes are retried, up to `RunConfig::retry_attempts`
/// additional attempts with a fixed backoff; assertion failures are
/// deterministic verdicts and never retried.
pub struct CheckRunner {
    context: CheckContext,
}

impl CheckRunner {
    /// Creates a runner over the given context.
    #[must_use]
    pub const fn new(context: CheckContext) -> Self {
        Self { context }
    }

    /// The context checks are run against.
    #[must_use]
    pub const fn context(&self) -> &CheckContext {
        &self.context
    }

    /// Runs every registered check and returns the aggregate report.
    ///
    /// Exactly one result is produced per registered check, in registration
    /// order. After cancellation, checks not yet started are reported as
    /// errors without probing; completed results are untouched.
    pub async fn run_all(&self, registry: &CheckRegistry) -> RunReport {
        let started_at = Utc::now();
        let run_start = Instant::now();
        let mut results = Vec::with_capacity(registry.len());

        for check in registry.all() {
            if self.context.cancellation().is_cancelled() {
                tracing::warn!(check = check.name(), "run cancelled, skipping check");
                results.push(CheckResult {
                    name: check.name().to_string(),
                    outcome: CheckOutcome::Error {
                        message: "run cancelled before this check started".to_string(),
                    },
                    duration_ms: 0,
                    attempts: 0,
                });
                continue;
            }
            results.push(self.run_check(check.as_ref()).await);
        }

        let report = RunReport::new(
            started_at,
            results,
            run_start.elapsed().as_millis() as u64,
        );
        tracing::info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            errored = report.errored,
            "run finished"
        );
        report
    }

    /// Runs a single check to a terminal outcome, retrying errors within the
    /// configured budget.
    pub async fn run_check(&self, check: &dyn Check) -> CheckResult {
        let start = Instant::now();
        let max_attempts = self.context.config().retry_attempts.saturating_add(1);
        let mut attempts = 0;

        tracing::info!(check = check.name(), "running check");
        let outcome = loop {
            attempts += 1;
            let outcome = self.attempt(check).await;

            let cancelled = self.context.cancellation().is_cancelled();
            if outcome.is_error() && attempts < max_attempts && !cancelled {
                tracing::warn!(
                    check = check.name(),
                    attempt = attempts,
                    "check errored, retrying"
                );
                tokio::time::sleep(RETRY_BACKOFF).await;
                continue;
            }
            break outcome;
        };

        match &outcome {
            CheckOutcome::Success => tracing::info!(check = check.name(), "check passed"),
            CheckOutcome::Failure { violations } => tracing::warn!(
                check = check.name(),
                violations = violations.len(),
                "check failed"
            ),
            CheckOutcome::Error { message } => {
                tracing::error!(check = check.name(), error = %message, "check errored");
            }
        }

        CheckResult {
            name: check.name().to_string(),
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
            attempts,
        }
    }

    /// One attempt of one check, racing the cancellation token.
    async fn attempt(&self, check: &dyn Check) -> CheckOutcome {
        tokio::select! {
            () = self.context.cancellation().cancelled() => CheckOutcome::Error {
                message: "run cancelled".to_string(),
            },
            result = check.run(&self.context) => match result {
                Ok(assertions) if assertions.is_empty() => CheckOutcome::Success,
                Ok(assertions) => CheckOutcome::Failure {
                    violations: assertions.into_violations(),
                },
                Err(e) => CheckOutcome::Error {
                    message: e.to_string(),
                },
            },
        }
    }
}
