//! Rule to enforce the TODO comment format.
//!
//! Accepted: `TODO(<user>): <summary>`, `TODO[<ticket>]: <summary>` or both,
//! in that order. With `require_ticket` the `[<ticket>]` part is mandatory.
//! Only `//` comments are checked.

use docguard_core::{PackageContext, Reporter, Rule, TodoConfig};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rule code for todo.
pub const CODE: &str = "DG003";

/// Rule name for todo.
pub const NAME: &str = "todo";

static TODO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^TODO(\([\w-]+\))?(\[[a-zA-Z\d-]+\])?: .+$").unwrap_or_else(|e| panic!("{e}"))
});

/// Result of matching one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TodoShape {
    NotTodo,
    Valid,
    Malformed,
    MissingTicket,
}

/// Enforces `TODO(<user>)[<ticket>]: <summary>`.
#[derive(Debug, Clone, Default)]
pub struct Todo {
    /// Require the bracketed ticket.
    pub require_ticket: bool,
}

impl Todo {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &TodoConfig) -> Self {
        Self {
            require_ticket: config.require_ticket,
        }
    }

    /// Sets whether a ticket is required.
    #[must_use]
    pub fn require_ticket(mut self, require: bool) -> Self {
        self.require_ticket = require;
        self
    }

    fn shape(&self, text: &str) -> TodoShape {
        if !text.starts_with("TODO") {
            return TodoShape::NotTodo;
        }
        let Some(caps) = TODO_RE.captures(text) else {
            return TodoShape::Malformed;
        };
        let user = caps.get(1).is_some();
        let ticket = caps.get(2).is_some();
        if !user && !ticket {
            TodoShape::Malformed
        } else if self.require_ticket && !ticket {
            TodoShape::MissingTicket
        } else {
            TodoShape::Valid
        }
    }
}

impl Rule for Todo {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires TODO comments to name an owner or ticket"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        if ctx.is_test_package() {
            return;
        }

        for file in ctx.analyzed_files() {
            for comment in file.all_comments().filter(|c| c.is_line_comment()) {
                let message = match self.shape(comment.body()) {
                    TodoShape::NotTodo | TodoShape::Valid => continue,
                    TodoShape::Malformed => {
                        "TODO comment must start the line, have a github username and / or a Jira ticket, and be followed by a colon and space: `TODO(<gh-user>)[<jira-ticket>]: `"
                    }
                    TodoShape::MissingTicket => {
                        "TODO comment must reference a Jira ticket: `TODO(<gh-user>)[<jira-ticket>]: `"
                    }
                };
                reporter.report(PackageContext::location(file, comment.pos), message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{messages, package};

    #[test]
    fn shapes() {
        let rule = Todo::new();
        let cases = [
            ("TODO(octocat): fix this", TodoShape::Valid),
            ("TODO[DT-123]: fix this", TodoShape::Valid),
            ("TODO(octocat)[DT-123]: fix this", TodoShape::Valid),
            ("TODO(oct-o_cat): hyphen and underscore", TodoShape::Valid),
            ("TODO: fix this", TodoShape::Malformed),
            ("TODO(octocat) fix this", TodoShape::Malformed),
            ("TODO(octocat):", TodoShape::Malformed),
            ("TODO[DT-123](octocat): wrong order", TodoShape::Malformed),
            ("TODOs are bad", TodoShape::Malformed),
            ("Here we do stuff. TODO: later", TodoShape::NotTodo),
            ("Nothing to see", TodoShape::NotTodo),
        ];
        for (text, expected) in cases {
            assert_eq!(rule.shape(text), expected, "{text}");
        }
    }

    #[test]
    fn require_ticket() {
        let rule = Todo::new().require_ticket(true);
        assert_eq!(rule.shape("TODO(octocat): x"), TodoShape::MissingTicket);
        assert_eq!(rule.shape("TODO(octocat)[DT-1]: x"), TodoShape::Valid);
        assert_eq!(rule.shape("TODO: x"), TodoShape::Malformed);
    }

    #[test]
    fn reports_malformed_comments() {
        let pkg = package(&[(
            "foo/foo.go",
            "package foo\n\n// TODO: fix\nvar x = 1 // TODO(me): ok\n\n/* Here we're doing stuff badly.\n\tTODO(jkinkead): Fix this.\n*/\n",
        )]);
        assert_eq!(
            messages(&Todo::new(), &pkg),
            vec!["3: TODO comment must start the line, have a github username and / or a Jira ticket, and be followed by a colon and space: `TODO(<gh-user>)[<jira-ticket>]: ` (todo)"]
        );
    }

    #[test]
    fn suppressed_todo() {
        let pkg = package(&[(
            "foo/foo.go",
            "package foo\n\n//nolint:todo // Why: vendored comment.\n// TODO: fix\nvar x = 1\n",
        )]);
        assert!(messages(&Todo::new(), &pkg).is_empty());
    }
}
