//! Rule trait for defining lint rules.

use crate::context::PackageContext;
use crate::reporter::Reporter;
use crate::types::Severity;

/// A per-package lint rule working on the syntax tree model.
///
/// Rules walk the files of [`PackageContext::package`] and report findings
/// through the [`Reporter`] they are handed, which applies `nolint`
/// suppressions before anything is recorded.
///
/// # Example
///
/// ```ignore
/// use docguard_core::{PackageContext, Reporter, Rule};
///
/// pub struct NoEmptyPackages;
///
/// impl Rule for NoEmptyPackages {
///     fn name(&self) -> &'static str { "noempty" }
///     fn code(&self) -> &'static str { "DG100" }
///
///     fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
///         if ctx.package.files.is_empty() {
///             reporter.report(ctx.package_location(), "package has no files");
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the name of this rule as used in config and directives
    /// (e.g., "doculint").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "DG001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks one package and reports findings.
    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
