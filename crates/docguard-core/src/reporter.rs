//! Suppression-aware violation sink.

use crate::rule::Rule;
use crate::suppression::SuppressionIndex;
use crate::types::{Location, Severity, Violation};

/// Collects the violations of one rule over one package.
///
/// Every report is checked against the package's [`SuppressionIndex`] for
/// this reporter's rule; suppressed reports are dropped without a trace in
/// the output. Recorded messages get the rule name appended, as in
/// `function "run" has no comment associated with it (doculint)`.
#[derive(Debug)]
pub struct Reporter<'a> {
    rule: &'static str,
    code: &'static str,
    severity: Severity,
    suppressions: &'a SuppressionIndex,
    violations: Vec<Violation>,
    suppressed: usize,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter for `rule` at the rule's default severity.
    #[must_use]
    pub fn new(rule: &dyn Rule, suppressions: &'a SuppressionIndex) -> Self {
        Self {
            rule: rule.name(),
            code: rule.code(),
            severity: rule.default_severity(),
            suppressions,
            violations: Vec::new(),
            suppressed: 0,
        }
    }

    /// Records findings as warnings instead of errors.
    #[must_use]
    pub fn warn(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Reports a finding unless a `nolint` directive for this rule covers
    /// its line.
    pub fn report(&mut self, location: Location, message: impl AsRef<str>) {
        if self.suppressions.is_suppressed(self.rule, &location) {
            tracing::debug!(
                rule = self.rule,
                file = %location.file.display(),
                line = location.line,
                "violation suppressed"
            );
            self.suppressed += 1;
            return;
        }

        self.violations.push(Violation::new(
            self.code,
            self.rule,
            self.severity,
            location,
            format!("{} ({})", message.as_ref(), self.rule),
        ));
    }

    /// Number of reports dropped by suppressions.
    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    /// Consumes the reporter and returns the recorded violations in report
    /// order.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
