//! Violation-accumulating assertion set.
//!
//! A check typically performs several related comparisons; stopping at the
//! first mismatch would hide the rest. Every comparison here records a
//! violation message and continues, so one run surfaces all mismatches.
//! A failed comparison is never an error.

use std::fmt;

use regex::Regex;

use crate::headers::HeaderMap;

/// Mutable accumulator of violation messages for a single check invocation.
#[derive(Debug, Default)]
pub struct AssertionSet {
    violations: Vec<String>,
}

impl AssertionSet {
    /// Creates an empty set with no violations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation unless `actual == expected`.
    ///
    /// Works uniformly over any comparable, displayable type (strings,
    /// integers, ...). Records exactly one violation per mismatch.
    pub fn equals<T>(&mut self, actual: T, expected: T, field: &str) -> &mut Self
    where
        T: PartialEq + fmt::Display,
    {
        if actual != expected {
            self.violations
                .push(format!("expected {field} to be '{expected}' but was '{actual}'"));
        }
        self
    }

    /// Records one violation per required header name absent from `headers`
    /// (case-insensitive).
    pub fn contains_keys(&mut self, headers: &HeaderMap, required: &[&str], field: &str) -> &mut Self {
        for name in headers.missing_from(required) {
            self.violations
                .push(format!("expected {field} to contain '{name}' but it was absent"));
        }
        self
    }

    /// Records one violation per header name in `headers` that falls outside
    /// the `allowed` set (case-insensitive). Used to assert a proxy does not
    /// leak or invent headers.
    pub fn contains_only_keys(
        &mut self,
        headers: &HeaderMap,
        allowed: &[&str],
        field: &str,
    ) -> &mut Self {
        let allowed_list = allowed.join(", ");
        for name in headers.not_in(allowed) {
            self.violations.push(format!(
                "expected {field} to contain only [{allowed_list}] but found unexpected '{name}'"
            ));
        }
        self
    }

    /// Records a violation unless `actual` matches the regex `pattern`.
    /// An unparseable pattern is itself recorded as a violation.
    pub fn matches(&mut self, actual: &str, pattern: &str, field: &str) -> &mut Self {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(actual) => {}
            Ok(_) => {
                self.violations.push(format!(
                    "expected {field} to match /{pattern}/ but was '{actual}'"
                ));
            }
            Err(e) => {
                self.violations
                    .push(format!("invalid pattern /{pattern}/ for {field}: {e}"));
            }
        }
        self
    }

    /// Records a pre-formatted violation message.
    pub fn record(&mut self, message: impl Into<String>) -> &mut Self {
        self.violations.push(message.into());
        self
    }

    /// All recorded violations, in the order they were recorded.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Returns true if no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// All violations joined into one newline-separated string; empty iff no
    /// violation was recorded. This is the sole success signal for a check,
    /// idempotent and side-effect-free.
    #[must_use]
    pub fn error_text(&self) -> String {
        self.violations.join("\n")
    }

    /// Consumes the set, returning the recorded violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }
}

impl fmt::Display for AssertionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_set_has_empty_error_text() {
        let a = AssertionSet::new();
        assert_eq!(a.error_text(), "");
        assert!(a.is_empty());
    }

    #[test]
    fn test_equals_on_equal_values_records_nothing() {
        let mut a = AssertionSet::new();
        a.equals("GET", "GET", "request method");
        a.equals(200, 200, "status code");
        assert!(a.is_empty());
    }

    #[test]
    fn test_equals_on_unequal_values_records_one_violation() {
        let mut a = AssertionSet::new();
        a.equals(404, 200, "status code");

        assert_eq!(a.len(), 1);
        assert_eq!(
            a.violations()[0],
            "expected status code to be '200' but was '404'"
        );
    }

    #[test]
    fn test_failed_comparison_does_not_stop_later_ones() {
        let mut a = AssertionSet::new();
        a.equals("HTTP/2.0", "HTTP/1.1", "request protocol")
            .equals("POST", "GET", "request method");

        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_contains_keys_one_violation_per_missing_key() {
        let headers: HeaderMap = [("User-Agent", "x")].into_iter().collect();
        let mut a = AssertionSet::new();
        a.contains_keys(&headers, &["user-agent", "Host", "Accept"], "request headers");

        assert_eq!(a.len(), 2);
        assert!(a.violations()[0].contains("'Host'"));
        assert!(a.violations()[1].contains("'Accept'"));
    }

    #[test]
    fn test_contains_only_keys_accepts_subset() {
        let headers: HeaderMap = [("Content-Type", "a"), ("Date", "b")].into_iter().collect();
        let mut a = AssertionSet::new();
        a.contains_only_keys(
            &headers,
            &["Content-Length", "Content-Type", "Date", "Server"],
            "response headers",
        );

        assert!(a.is_empty());
    }

    #[test]
    fn test_contains_only_keys_names_the_unexpected_key() {
        let headers: HeaderMap = [("Content-Type", "a"), ("X-Debug", "1")].into_iter().collect();
        let mut a = AssertionSet::new();
        a.contains_only_keys(
            &headers,
            &["Content-Length", "Content-Type", "Date", "Server"],
            "response headers",
        );

        assert_eq!(a.len(), 1);
        assert!(a.violations()[0].contains("'X-Debug'"));
    }

    #[test]
    fn test_matches() {
        let mut a = AssertionSet::new();
        a.matches("Turnstile/0.1.0", r"^Turnstile/\d+\.\d+\.\d+$", "user agent");
        assert!(a.is_empty());

        a.matches("curl/8.0", r"^Turnstile/", "user agent");
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_a_violation_not_a_panic() {
        let mut a = AssertionSet::new();
        a.matches("anything", r"(unclosed", "user agent");
        assert_eq!(a.len(), 1);
        assert!(a.violations()[0].starts_with("invalid pattern"));
    }

    #[test]
    fn test_record_keeps_the_message_verbatim() {
        let mut a = AssertionSet::new();
        a.record("the proxy dropped the connection mid-response");

        assert_eq!(a.len(), 1);
        assert_eq!(a.to_string(), "the proxy dropped the connection mid-response");
    }

    #[test]
    fn test_error_text_is_idempotent() {
        let mut a = AssertionSet::new();
        a.equals(1, 2, "x");

        let first = a.error_text();
        let second = a.error_text();
        assert_eq!(first, second);
        assert_eq!(first, "expected x to be '2' but was '1'");
    }
}
