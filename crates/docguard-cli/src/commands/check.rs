//! Check command implementation.

use anyhow::{Context, Result};
use docguard_core::{Analyzer, Config, LintResult, RuleBox};
use docguard_go::GoParser;
use docguard_rules::rules_from_config;
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of one `check` invocation.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Directory to analyze.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to restrict the run to.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Extra build tags.
    pub tags: Vec<String>,
}

/// Runs the check command. Returns `true` when error-severity violations
/// were found.
pub fn run(options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let mut config = source.load()?;
    config.analyzer.build_tags.extend(options.tags.iter().cloned());

    let result = analyze(options, config)?;
    super::output::print(&result, options.format)?;

    Ok(result.has_errors())
}

/// Builds the analyzer for `options` and runs it.
pub fn analyze(options: &CheckOptions, config: Config) -> Result<LintResult> {
    let mut rules = rules_from_config(&config).context("Invalid rule configuration")?;
    if let Some(filter) = &options.rules {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        rules = filter_rules(rules, &names);
    }

    let analyzer = Analyzer::builder()
        .root(&options.path)
        .parser(GoParser::new())
        .rules(rules)
        .excludes(options.exclude.iter().cloned())
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        options.path.display(),
        analyzer.rule_count()
    );

    analyzer.analyze().context("Analysis failed")
}

/// Keeps the rules named (by name or code) in `names`.
fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown or disabled rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(path: &std::path::Path) -> CheckOptions {
        CheckOptions {
            path: path.to_path_buf(),
            format: OutputFormat::Compact,
            rules: None,
            exclude: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn filter_by_name_and_code() {
        let rules = docguard_rules::all_rules();
        let kept: Vec<_> = filter_rules(rules, &["todo", "DG001", "nope"])
            .iter()
            .map(|r| r.name())
            .collect();
        assert_eq!(kept, vec!["doculint", "todo"]);
    }

    #[test]
    fn analyzes_a_go_tree() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("widget");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("widget.go"),
            "// Package widget builds widgets.\npackage widget\n\n// TODO: later\nvar x = 1\n",
        )
        .unwrap();

        let mut opts = options(tmp.path());
        opts.rules = Some("todo".to_string());
        let result = analyze(&opts, Config::default()).unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "DG003");
        assert_eq!(result.violations[0].location.line, 4);
    }

    #[test]
    fn excludes_apply() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("gen");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("gen.go"), "package gen\n\n// TODO: later\n").unwrap();

        let mut opts = options(tmp.path());
        opts.exclude = vec!["gen/**".to_string()];
        let result = analyze(&opts, Config::default()).unwrap();
        assert_eq!(result.files_checked, 0);
        assert!(result.violations.is_empty());
    }
}
