//! Violations and the result of one analysis run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a violation affects the exit status.
///
/// Every rule reports errors unless its config section sets `warn: true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, but does not fail the run.
    Warning,
    /// Fails the run.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Resolved source location of a violation.
///
/// Package-level findings that belong to no single file point at the
/// package directory with line and column 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File (or package directory) path.
    pub file: PathBuf,
    /// Line number (1-indexed, 0 for package-level findings).
    pub line: usize,
    /// Column number (1-indexed, 0 for package-level findings).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// Creates a package-level location that points at a directory.
    #[must_use]
    pub fn package(dir: PathBuf) -> Self {
        Self::new(dir, 0, 0)
    }
}

/// One finding of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code, `DG001` through `DG006`.
    pub code: String,
    /// Rule name, as used in config sections and `nolint` lists.
    pub rule: String,
    /// Error, or warning when the rule is downgraded.
    pub severity: Severity,
    /// Where the finding was reported.
    pub location: Location,
    /// Message with the rule name appended, e.g. `... (doculint)`.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
        }
    }
}

/// `file:line:col: severity [code] message`, one line per violation.
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location { file, line, column } = &self.location;
        write!(
            f,
            "{}:{line}:{column}: {} [{}] {}",
            file.display(),
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Everything one `Analyzer::analyze` call found.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Violations ordered by file, line and column.
    pub violations: Vec<Violation>,
    /// Analyzed files, excluding those dropped by build constraints.
    pub files_checked: usize,
    /// Analyzed packages.
    pub packages_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when any violation is an error, which fails the CLI run.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns `(errors, warnings)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }

    /// Sorts violations by file, then line, then column.
    ///
    /// The sort is stable, so violations at the same location keep the order
    /// in which rules reported them.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            let key = |v: &Violation| (v.location.line, v.location.column);
            a.location
                .file
                .cmp(&b.location.file)
                .then_with(|| key(a).cmp(&key(b)))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(file: &str, line: usize, rule: &str, severity: Severity) -> Violation {
        Violation::new(
            "DG001",
            rule,
            severity,
            Location::new(PathBuf::from(file), line, 1),
            format!("finding ({rule})"),
        )
    }

    #[test]
    fn display_is_one_compact_line() {
        let v = Violation::new(
            "DG001",
            "doculint",
            Severity::Error,
            Location::new(PathBuf::from("pkg/foo.go"), 12, 1),
            "function \"run\" has no comment associated with it (doculint)",
        );
        assert_eq!(
            v.to_string(),
            "pkg/foo.go:12:1: error [DG001] function \"run\" has no comment associated with it (doculint)"
        );
    }

    #[test]
    fn warnings_alone_do_not_fail() {
        let mut result = LintResult::new();
        result.violations.push(at("a.go", 1, "todo", Severity::Warning));
        assert!(!result.has_errors());

        result.violations.push(at("a.go", 2, "todo", Severity::Error));
        result.violations.push(at("a.go", 3, "todo", Severity::Error));
        assert!(result.has_errors());
        assert_eq!(result.counts(), (2, 1));
    }

    #[test]
    fn sort_keeps_rule_order_at_one_location() {
        let mut result = LintResult::new();
        result.violations.push(at("pkg/b.go", 9, "doculint", Severity::Error));
        result.violations.push(at("pkg/a.go", 1, "copyright", Severity::Error));
        result.violations.push(Violation::new(
            "DG001",
            "doculint",
            Severity::Error,
            Location::package(PathBuf::from("pkg")),
            "package-level",
        ));
        result.violations.push(at("pkg/a.go", 1, "header", Severity::Error));
        result.sort();

        let order: Vec<(String, usize, &str)> = result
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line, v.rule.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("pkg".to_string(), 0, "doculint"),
                ("pkg/a.go".to_string(), 1, "copyright"),
                ("pkg/a.go".to_string(), 1, "header"),
                ("pkg/b.go".to_string(), 9, "doculint"),
            ]
        );
    }
}
