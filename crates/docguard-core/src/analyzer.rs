//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::constraint;
use crate::context::PackageContext;
use crate::parser::{ParseError, SourceParser};
use crate::reporter::Reporter;
use crate::rule::{Rule, RuleBox};
use crate::syntax::{Package, SourceFile};
use crate::types::{LintResult, Violation};

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Directory walk failed.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parser error.
        source: ParseError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// `analyze` was called without a parser.
    #[error("No source parser configured")]
    NoParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the front end used to parse source files.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let exclude_patterns = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let build_tags = constraint::host_tags(&config.analyzer.build_tags);

        Ok(Analyzer {
            root,
            rules: self.rules,
            parser: self.parser,
            exclude_patterns,
            build_tags,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<glob::Pattern>,
    build_tags: BTreeSet<String>,
    config: Config,
    fail_on_parse_error: bool,
}

/// Outcome of one directory.
#[derive(Default)]
struct DirResult {
    violations: Vec<Violation>,
    files: usize,
    packages: usize,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes every package under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        let parser = self.parser.as_deref().ok_or(AnalyzerError::NoParser)?;
        info!(root = %self.root.display(), "starting analysis");

        let files = self.discover_files(parser)?;
        info!("Found {} files to analyze", files.len());

        let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for file in files {
            let dir = file.parent().map_or_else(PathBuf::new, Path::to_path_buf);
            by_dir.entry(dir).or_default().push(file);
        }
        let dirs: Vec<(PathBuf, Vec<PathBuf>)> = by_dir.into_iter().collect();

        let run = || -> Result<Vec<DirResult>, AnalyzerError> {
            dirs.par_iter()
                .map(|(dir, files)| self.analyze_dir(parser, dir, files))
                .collect()
        };
        let per_dir = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run)?,
            None => run()?,
        };

        let mut result = LintResult::new();
        for dir in per_dir {
            result.violations.extend(dir.violations);
            result.files_checked += dir.files;
            result.packages_checked += dir.packages;
        }
        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Runs every enabled rule over one package.
    ///
    /// Builds the package's suppression index first, then hands each rule
    /// its own reporter. Violations come back in rule order, then report
    /// order.
    #[must_use]
    pub fn analyze_package(&self, package: &Package) -> Vec<Violation> {
        let ctx = PackageContext::new(package);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut reporter = Reporter::new(&**rule, &ctx.suppressions);
            if self.config.rule_warns(rule.name()) {
                reporter = reporter.warn();
            }
            rule.check(&ctx, &mut reporter);
            debug!(
                rule = rule.name(),
                package = %package.name,
                suppressed = reporter.suppressed_count(),
                "rule finished"
            );
            violations.extend(reporter.into_violations());
        }

        violations
    }

    fn analyze_dir(
        &self,
        parser: &dyn SourceParser,
        dir: &Path,
        files: &[PathBuf],
    ) -> Result<DirResult, AnalyzerError> {
        let packages = self.load_packages(parser, dir, files)?;

        let mut result = DirResult::default();
        for package in &packages {
            debug!(package = %package.name, dir = %package.dir.display(), "analyzing package");
            result.violations.extend(self.analyze_package(package));
            result.files += package.files.len();
            result.packages += 1;
        }
        Ok(result)
    }

    /// Parses the files of one directory and groups them into packages.
    fn load_packages(
        &self,
        parser: &dyn SourceParser,
        dir: &Path,
        files: &[PathBuf],
    ) -> Result<Vec<Package>, AnalyzerError> {
        let mut included: Vec<SourceFile> = Vec::new();

        for path in files {
            let Some(file) = self.parse_file(parser, path)? else {
                continue;
            };
            if self.satisfies_constraint(&file) {
                included.push(file);
            } else {
                debug!(file = %file.path.display(), "excluded by build constraint");
            }
        }

        let rel_dir = self.relative(dir);
        let mut packages: BTreeMap<String, Package> = BTreeMap::new();
        for file in included {
            packages
                .entry(file.package_name().to_string())
                .or_insert_with_key(|name| Package::new(name.clone(), rel_dir.clone(), Vec::new()))
                .files
                .push(file);
        }

        Ok(packages.into_values().collect())
    }

    fn parse_file(
        &self,
        parser: &dyn SourceParser,
        path: &Path,
    ) -> Result<Option<SourceFile>, AnalyzerError> {
        let rel = self.relative(path);
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::InvalidData => {
                warn!("Skipping {}: {}", rel.display(), source);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Read { path: rel, source });
                }
                return Ok(None);
            }
            Err(source) => {
                return Err(AnalyzerError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match parser.parse(&rel, &content) {
            Ok(file) => Ok(Some(file)),
            Err(source) => {
                warn!("Failed to parse {}: {}", rel.display(), source);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Parse { path: rel, source });
                }
                Ok(None)
            }
        }
    }

    fn satisfies_constraint(&self, file: &SourceFile) -> bool {
        let Some(expr) = file.build_constraint.as_deref() else {
            return true;
        };
        constraint::evaluate(expr, &self.build_tags).unwrap_or_else(|e| {
            warn!(file = %file.path.display(), "{e}, analyzing the file anyway");
            true
        })
    }

    fn relative(&self, path: &Path) -> PathBuf {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        if rel.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            rel.to_path_buf()
        }
    }

    /// Discovers all source files the parser handles.
    fn discover_files(&self, parser: &dyn SourceParser) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .git_exclude(self.config.analyzer.respect_gitignore)
            .parents(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) || !parser.handles(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(rel) || pattern.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{CommentGroup, Ident, PackageDecl, Position};
    use crate::types::Severity;

    /// Reads `package <name>`, `//go:build <expr>` and `//` comments.
    struct LineParser;

    impl SourceParser for LineParser {
        fn language(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["go"]
        }

        fn parse(&self, path: &Path, source: &str) -> Result<SourceFile, ParseError> {
            let mut package = None;
            let mut comments = Vec::new();
            let mut build_constraint = None;

            for (i, line) in source.lines().enumerate() {
                let line_no = i + 1;
                if let Some(name) = line.strip_prefix("package ") {
                    package = Some(PackageDecl {
                        name: Ident::new(name.trim(), Position::new(line_no, 9)),
                        doc: None,
                        pos: Position::new(line_no, 1),
                    });
                } else if let Some(expr) = line.strip_prefix("//go:build ") {
                    build_constraint = Some(expr.to_string());
                } else if line.starts_with("//") {
                    comments.push(CommentGroup::lines(line_no, &[line]));
                } else if line.contains("{{") {
                    return Err(ParseError::Syntax {
                        line: line_no,
                        column: 1,
                    });
                }
            }

            let mut file = SourceFile::new(path, package.ok_or(ParseError::MissingPackage)?);
            file.comments = comments;
            file.build_constraint = build_constraint;
            Ok(file)
        }
    }

    /// Reports every comment line of every analyzed file.
    struct EveryComment;

    impl Rule for EveryComment {
        fn name(&self) -> &'static str {
            "every"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
            for file in ctx.analyzed_files() {
                for comment in file.all_comments() {
                    reporter.report(PackageContext::location(file, comment.pos), "comment");
                }
            }
        }
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn analyzer(root: &Path, config: Config) -> Analyzer {
        Analyzer::builder()
            .root(root)
            .parser(LineParser)
            .rule(EveryComment)
            .config(config)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let err = Analyzer::builder().exclude("[").build().err().unwrap();
        assert!(matches!(err, AnalyzerError::Glob(_)));
    }

    #[test]
    fn analyze_without_parser_fails() {
        let analyzer = Analyzer::builder().root(".").build().unwrap();
        assert!(matches!(analyzer.analyze(), Err(AnalyzerError::NoParser)));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/repo")
            .exclude("**/vendor/**")
            .build()
            .unwrap();

        assert!(analyzer.should_exclude(Path::new("/repo/vendor/x/a.go")));
        assert!(analyzer.should_exclude(Path::new("/repo/pkg/vendor/a.go")));
        assert!(!analyzer.should_exclude(Path::new("/repo/pkg/a.go")));
    }

    #[test]
    fn groups_by_directory_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b/b.go", "package b\n// one\n");
        write(tmp.path(), "a/a.go", "package a\n\n// two\n// three\n");
        write(tmp.path(), "a/notes.txt", "// not go\n");

        let result = analyzer(tmp.path(), Config::default()).analyze().unwrap();

        assert_eq!(result.files_checked, 2);
        assert_eq!(result.packages_checked, 2);
        let places: Vec<(String, usize)> = result
            .violations
            .iter()
            .map(|v| (v.location.file.display().to_string(), v.location.line))
            .collect();
        assert_eq!(
            places,
            vec![
                ("a/a.go".to_string(), 3),
                ("a/a.go".to_string(), 4),
                ("b/b.go".to_string(), 2),
            ]
        );
        assert_eq!(result.violations[0].message, "comment (every)");
    }

    #[test]
    fn build_constraints_exclude_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "p/a.go", "package p\n// kept\n");
        write(
            tmp.path(),
            "p/b.go",
            "//go:build integration\npackage p\n// dropped\n",
        );

        let result = analyzer(tmp.path(), Config::default()).analyze().unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);

        let mut config = Config::default();
        config.analyzer.build_tags = vec!["integration".to_string()];
        let result = analyzer(tmp.path(), config).analyze().unwrap();
        assert_eq!(result.files_checked, 2);
    }

    #[test]
    fn parse_errors_are_skipped_unless_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "p/good.go", "package p\n// ok\n");
        write(tmp.path(), "p/bad.go", "package p\n{{\n");

        let result = analyzer(tmp.path(), Config::default()).analyze().unwrap();
        assert_eq!(result.files_checked, 1);

        let strict = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .fail_on_parse_error(true)
            .build()
            .unwrap();
        let err = strict.analyze().unwrap_err();
        assert!(matches!(err, AnalyzerError::Parse { .. }));
    }

    #[test]
    fn analyze_package_in_memory() {
        let analyzer = Analyzer::builder().rule(EveryComment).build().unwrap();
        let package = Package::new(
            "p",
            "p",
            vec![LineParser
                .parse(Path::new("p/a.go"), "package p\n// x\n")
                .unwrap()],
        );

        let violations = analyzer.analyze_package(&package);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].location.line, 2);
    }

    #[test]
    fn parallelism_cap_gives_same_result() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c", "d"] {
            write(tmp.path(), &format!("{name}/x.go"), &format!("package {name}\n// c\n"));
        }

        let unbounded = analyzer(tmp.path(), Config::default()).analyze().unwrap();
        let mut config = Config::default();
        config.analyzer.parallelism = Some(1);
        let capped = analyzer(tmp.path(), config).analyze().unwrap();

        assert_eq!(unbounded.violations, capped.violations);
    }

    #[test]
    fn suppressions_apply_within_package() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "p/a.go", "package p\n//nolint:every // Why: test\n// next\n// after\n");

        let result = analyzer(tmp.path(), Config::default()).analyze().unwrap();
        let lines: Vec<usize> = result.violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![4]);
    }
}
