//! Helpers shared by the rule tests.

use docguard_core::{Package, PackageContext, Reporter, Rule, SourceFile, SourceParser, Violation};
use docguard_go::GoParser;
use std::path::{Path, PathBuf};

/// Parses Go source, panicking on syntax errors.
pub(crate) fn parse(path: &str, source: &str) -> SourceFile {
    GoParser::new()
        .parse(Path::new(path), source)
        .unwrap_or_else(|e| panic!("{path}: {e}"))
}

/// Builds a package from `(path, source)` pairs. Name and directory come from
/// the first file.
pub(crate) fn package(files: &[(&str, &str)]) -> Package {
    let files: Vec<SourceFile> = files.iter().map(|(path, src)| parse(path, src)).collect();
    let name = files[0].package_name().to_string();
    let dir = files[0]
        .path
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf);
    Package::new(name, dir, files)
}

/// Runs one rule over a package.
pub(crate) fn run(rule: &dyn Rule, package: &Package) -> Vec<Violation> {
    let ctx = PackageContext::new(package);
    let mut reporter = Reporter::new(rule, &ctx.suppressions);
    rule.check(&ctx, &mut reporter);
    reporter.into_violations()
}

/// Runs one rule and renders each violation as `line: message`.
pub(crate) fn messages(rule: &dyn Rule, package: &Package) -> Vec<String> {
    run(rule, package)
        .into_iter()
        .map(|v| format!("{}: {}", v.location.line, v.message))
        .collect()
}
