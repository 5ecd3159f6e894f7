//! Rule to require a copyright comment on line 1.
//!
//! The comment is compared either against a literal string or, when a
//! pattern is configured, against a regular expression. With neither set the
//! rule does nothing.
//!
//! # Good Patterns
//!
//! ```go
//! // Copyright 2024 Example Corp. All Rights Reserved.
//!
//! package foo
//! ```

use docguard_core::{CopyrightConfig, PackageContext, Position, Reporter, Rule};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Rule code for copyright.
pub const CODE: &str = "DG002";

/// Rule name for copyright.
pub const NAME: &str = "copyright";

/// How line 1 is compared.
#[derive(Debug, Clone)]
enum Matcher {
    Text(String),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Text(text) => text == value,
            Self::Pattern(re) => re.is_match(value),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Pattern(_) => "regular expression",
        }
    }

    fn literal(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Pattern(re) => re.as_str(),
        }
    }
}

/// Requires the configured copyright comment on line 1 of every file.
#[derive(Debug)]
pub struct Copyright {
    matcher: Option<Matcher>,
    seen: Mutex<BTreeSet<String>>,
}

impl Default for Copyright {
    fn default() -> Self {
        Self::new()
    }
}

impl Copyright {
    /// Creates a rule with nothing to check.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: None,
            seen: Mutex::new(BTreeSet::new()),
        }
    }

    /// Requires line 1 to equal `text` (trimmed).
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        let text = text.trim();
        self.matcher = (!text.is_empty()).then(|| Matcher::Text(text.to_string()));
        self
    }

    /// Requires line 1 to match `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = pattern.trim();
        if !pattern.is_empty() {
            self.matcher = Some(Matcher::Pattern(Regex::new(pattern)?));
        }
        Ok(self)
    }

    /// Creates the rule from its configuration section. The pattern takes
    /// precedence over the text.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pattern is invalid.
    pub fn from_config(config: &CopyrightConfig) -> Result<Self, regex::Error> {
        Self::new().text(&config.text).pattern(&config.pattern)
    }

    /// Distinct copyright lines matched so far.
    #[must_use]
    pub fn seen(&self) -> Vec<String> {
        self.seen
            .lock()
            .map(|seen| seen.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn track(&self, line: &str) {
        if let Ok(mut seen) = self.seen.lock() {
            if seen.insert(line.to_string()) {
                tracing::debug!(copyright = line, "new copyright string");
            }
        }
    }
}

impl Rule for Copyright {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the configured copyright comment on line 1 of every file"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        let Some(matcher) = &self.matcher else {
            return;
        };
        if ctx.is_test_package() {
            return;
        }

        for file in ctx.analyzed_files() {
            let line_one = file
                .comments
                .iter()
                .find(|group| group.pos().line == 1)
                .and_then(|group| group.comments.first())
                .map(|comment| comment.body());

            let found = line_one.is_some_and(|text| matcher.matches(text));
            if found {
                if let Some(text) = line_one {
                    self.track(text);
                }
                continue;
            }

            reporter.report(
                PackageContext::location(file, Position::new(1, 1)),
                format!(
                    "file \"{}\" does not contain the required copyright {} [{}] (sans-brackets) as a comment on line 1",
                    file.path.display(),
                    matcher.kind(),
                    matcher.literal()
                ),
            );
        }
    }
}
