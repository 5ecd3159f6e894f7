//! Front-end seam: turning source text into the syntax model.

use crate::syntax::SourceFile;
use std::path::Path;

/// Parses source files of one language into [`SourceFile`]s.
///
/// Implementations must reject trees with syntax errors rather than hand
/// partial trees to the rules.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., "go").
    fn language(&self) -> &'static str;

    /// File extensions handled, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source`. `path` is recorded on the result as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the source does
    /// not parse cleanly.
    fn parse(&self, path: &Path, source: &str) -> Result<SourceFile, ParseError>;

    /// Returns true when this parser handles `path`.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

/// Errors produced by a [`SourceParser`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// The tree contains syntax errors.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },

    /// The file has no package clause.
    #[error("missing package clause")]
    MissingPackage,
}
