//! Rule to require header fields before the package clause.
//!
//! ```go
//! // Copyright 2024 Example Corp.
//!
//! // Description: Turns widgets into gadgets. The value may continue
//! // on the following lines of the same comment group.
//! package widget
//! ```
//!
//! `main` packages are exempt.

use docguard_core::{HeaderConfig, PackageContext, Reporter, Rule, SourceFile};

/// Rule code for header.
pub const CODE: &str = "DG004";

/// Rule name for header.
pub const NAME: &str = "header";

/// Requires `<Field>: <value>` lines in a comment group above `package`.
#[derive(Debug, Clone)]
pub struct Header {
    /// Required fields, in reporting order.
    pub fields: Vec<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// Creates a rule requiring `Description`.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&HeaderConfig::default())
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &HeaderConfig) -> Self {
        Self {
            fields: config.fields.clone(),
        }
    }

    /// Sets the required fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the configured fields missing a value in `file`'s header.
    fn missing_fields<'a>(&'a self, file: &SourceFile) -> Vec<&'a str> {
        let prefixes: Vec<String> = self.fields.iter().map(|f| format!("{f}: ")).collect();

        let header = file
            .comments
            .iter()
            .take_while(|group| group.pos().line < file.package.pos.line)
            .find(|group| {
                let text = group.text();
                prefixes.iter().all(|prefix| text.contains(prefix.as_str()))
            });

        let mut valid = vec![false; self.fields.len()];
        if let Some(group) = header {
            for comment in &group.comments {
                let line = comment.body();
                for (i, prefix) in prefixes.iter().enumerate() {
                    if line
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|value| !value.is_empty())
                    {
                        valid[i] = true;
                    }
                }
            }
        }

        self.fields
            .iter()
            .zip(valid)
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

impl Rule for Header {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires header fields in a comment before the package clause"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        if ctx.is_test_package() || ctx.package.is_main() || self.fields.is_empty() {
            return;
        }

        for file in ctx.analyzed_files() {
            for field in self.missing_fields(file) {
                reporter.report(
                    PackageContext::location(file, file.package.pos),
                    format!(
                        "file \"{}\" does not contain the required header key \"{field}\" and corresponding value existing before the package keyword",
                        file.path.display()
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{messages, package};

    fn missing(rule: &Header, src: &str) -> Vec<String> {
        let file = crate::test_support::parse("foo/foo.go", src);
        rule.missing_fields(&file)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn description_present() {
        let src = "// Copyright 2024 Me\n\n// Description: Does things\n// over several lines.\npackage foo\n";
        assert!(missing(&Header::new(), src).is_empty());
    }

    #[test]
    fn description_missing_or_empty() {
        assert_eq!(missing(&Header::new(), "package foo\n"), vec!["Description"]);
        assert_eq!(
            missing(&Header::new(), "// Description:\npackage foo\n"),
            vec!["Description"]
        );
    }

    #[test]
    fn fields_must_share_one_group() {
        let rule = Header::new().fields(["Author(s)", "Description"]);
        let split = "// Author(s): me\n\n// Description: x\npackage foo\n";
        assert_eq!(missing(&rule, split), vec!["Author(s)", "Description"]);

        let joined = "// Author(s): me\n// Description: x\npackage foo\n";
        assert!(missing(&rule, joined).is_empty());
    }

    #[test]
    fn comments_after_package_clause_do_not_count() {
        assert_eq!(
            missing(&Header::new(), "package foo\n\n// Description: late\nvar x = 1\n"),
            vec!["Description"]
        );
    }

    #[test]
    fn reports_in_configured_order_at_package_clause() {
        let rule = Header::new().fields(["Owner", "Description"]);
        let pkg = package(&[("foo/foo.go", "// Copyright\n\npackage foo\n")]);
        assert_eq!(
            messages(&rule, &pkg),
            vec![
                "3: file \"foo/foo.go\" does not contain the required header key \"Owner\" and corresponding value existing before the package keyword (header)",
                "3: file \"foo/foo.go\" does not contain the required header key \"Description\" and corresponding value existing before the package keyword (header)",
            ]
        );
    }

    #[test]
    fn main_packages_are_exempt() {
        let pkg = package(&[("cmd/x/main.go", "package main\n")]);
        assert!(messages(&Header::new(), &pkg).is_empty());
    }
}
