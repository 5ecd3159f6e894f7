//! Inline `nolint` directives and the per-package suppression index.
//!
//! Directive syntax: `nolint[:rule1,rule2,...] [// Why: <explanation>]`.
//! A directive on line `L` silences the named rules on lines `L` and `L + 1`
//! of the same file.

use crate::syntax::{Comment, SourceFile};
use crate::types::Location;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Token that starts a suppression directive.
pub const DIRECTIVE_TOKEN: &str = "nolint";

/// Separator between the directive and its justification.
const JUSTIFICATION_SEPARATOR: &str = "//";

/// Prefix of a proper justification.
const JUSTIFICATION_PREFIX: &str = "Why:";

/// A parsed suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionDirective {
    /// File the directive appears in.
    pub file_path: PathBuf,
    /// Line of the comment holding the directive.
    pub line: usize,
    /// Rules the directive names. Empty for bare directives.
    pub rule_names: BTreeSet<String>,
    /// Whether a `// Why: <text>` justification follows the directive.
    pub has_justification: bool,
}

impl SuppressionDirective {
    /// Parses a comment into a directive, if it is one.
    #[must_use]
    pub fn parse(file_path: &Path, comment: &Comment) -> Option<Self> {
        let (rule_names, has_justification) = parse_directive(comment.body())?;
        Some(Self {
            file_path: file_path.to_path_buf(),
            line: comment.pos.line,
            rule_names,
            has_justification,
        })
    }

    /// Returns true when the directive names `rule`.
    #[must_use]
    pub fn names(&self, rule: &str) -> bool {
        self.rule_names.contains(rule)
    }
}

/// Parses stripped comment text. Returns the rule list and whether a
/// justification is present.
fn parse_directive(body: &str) -> Option<(BTreeSet<String>, bool)> {
    let (head, justification) = match body.split_once(JUSTIFICATION_SEPARATOR) {
        Some((head, tail)) => (head.trim(), Some(tail.trim())),
        None => (body.trim(), None),
    };

    let rest = head.strip_prefix(DIRECTIVE_TOKEN)?;
    // `nolintfoo` is not a directive.
    if rest
        .chars()
        .next()
        .is_some_and(|c| c != ':' && !c.is_whitespace())
    {
        return None;
    }
    let list = rest.strip_prefix(':').unwrap_or(rest);

    let rule_names = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    let has_justification = justification
        .and_then(|tail| tail.strip_prefix(JUSTIFICATION_PREFIX))
        .is_some_and(|why| !why.trim().is_empty());

    Some((rule_names, has_justification))
}

/// Suppressed lines per rule and file, built once per package.
#[derive(Debug, Default)]
pub struct SuppressionIndex {
    lines: HashMap<String, HashMap<PathBuf, BTreeSet<usize>>>,
    directives: Vec<SuppressionDirective>,
}

impl SuppressionIndex {
    /// Scans every comment of `files` and records their directives.
    pub fn build<'a>(files: impl IntoIterator<Item = &'a SourceFile>) -> Self {
        let mut index = Self::default();
        for file in files {
            for comment in file.all_comments() {
                if let Some(directive) = SuppressionDirective::parse(&file.path, comment) {
                    index.insert(directive);
                }
            }
        }
        tracing::trace!(directives = index.directives.len(), "built suppression index");
        index
    }

    fn insert(&mut self, directive: SuppressionDirective) {
        for rule in &directive.rule_names {
            self.lines
                .entry(rule.clone())
                .or_default()
                .entry(directive.file_path.clone())
                .or_default()
                .insert(directive.line);
        }
        self.directives.push(directive);
    }

    /// Returns every directive in scan order, including bare ones.
    #[must_use]
    pub fn directives(&self) -> &[SuppressionDirective] {
        &self.directives
    }

    /// Returns true when a directive for `rule` sits on the violation's line
    /// or the line directly above it.
    #[must_use]
    pub fn is_suppressed(&self, rule: &str, location: &Location) -> bool {
        let Some(lines) = self
            .lines
            .get(rule)
            .and_then(|files| files.get(&location.file))
        else {
            return false;
        };

        let line = location.line;
        lines.contains(&line) || (line > 0 && lines.contains(&(line - 1)))
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
