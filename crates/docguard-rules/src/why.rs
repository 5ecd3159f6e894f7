//! Rules for `nolint` directive hygiene.
//!
//! - `why` requires every directive to carry `// Why: <reason>` on the same
//!   line: `//nolint:doculint // Why: mirrors the C API.`
//! - `barenolint` rejects directives that name no rule at all.
//!
//! A bare directive is only reported by `barenolint`; once it names its
//! rules, `why` takes over.

use docguard_core::syntax::Comment;
use docguard_core::suppression::DIRECTIVE_TOKEN;
use docguard_core::{PackageContext, Reporter, Rule, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rule code for why.
pub const WHY_CODE: &str = "DG005";

/// Rule name for why.
pub const WHY_NAME: &str = "why";

/// Rule code for barenolint.
pub const BARE_CODE: &str = "DG006";

/// Rule name for barenolint.
pub const BARE_NAME: &str = "barenolint";

static NOLINT_WHY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^nolint:\s?[\w,-]+\s?//\s?Why:\s?.+$").unwrap_or_else(|e| panic!("{e}"))
});

static NOLINT_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^nolint(\s*//\s*Why:.*)*$").unwrap_or_else(|e| panic!("{e}")));

/// Calls `f` for every directive-looking comment of the analyzed files.
fn for_each_directive<'a>(
    ctx: &PackageContext<'a>,
    mut f: impl FnMut(&'a SourceFile, &'a Comment, &'a str),
) {
    for file in ctx.analyzed_files() {
        for comment in file.all_comments() {
            let text = comment.body();
            if text.starts_with(DIRECTIVE_TOKEN) {
                f(file, comment, text);
            }
        }
    }
}

fn is_bare(text: &str) -> bool {
    NOLINT_BARE_RE.is_match(text)
}

/// Requires a `// Why: <reason>` after every `nolint` directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Why;

impl Why {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Why {
    fn name(&self) -> &'static str {
        WHY_NAME
    }

    fn code(&self) -> &'static str {
        WHY_CODE
    }

    fn description(&self) -> &'static str {
        "Requires nolint directives to be justified with // Why: <reason>"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        if ctx.is_test_package() {
            return;
        }

        for_each_directive(ctx, |file, comment, text| {
            if is_bare(text) || NOLINT_WHY_RE.is_match(text) {
                return;
            }
            reporter.report(
                PackageContext::location(file, comment.pos),
                "nolint comment must immediately be followed by // Why: <reason> on the same line.",
            );
        });
    }
}

/// Rejects `nolint` directives that do not name the rules they silence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareNolint;

impl BareNolint {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BareNolint {
    fn name(&self) -> &'static str {
        BARE_NAME
    }

    fn code(&self) -> &'static str {
        BARE_CODE
    }

    fn description(&self) -> &'static str {
        "Rejects nolint directives without a rule list"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        if ctx.is_test_package() {
            return;
        }

        for_each_directive(ctx, |file, comment, text| {
            if is_bare(text) {
                reporter.report(
                    PackageContext::location(file, comment.pos),
                    "nolint directive must contain the specific linters it is nolinting against",
                );
            }
        });
    }
}
