//! # docguard-core
//!
//! Core framework for documentation linting of Go packages.
//!
//! This crate provides the foundational traits and types for building
//! documentation linters. It includes:
//!
//! - the syntax model ([`SourceFile`], [`Decl`], [`CommentGroup`]) that a
//!   [`SourceParser`] front end produces
//! - [`Rule`] trait for per-package rules
//! - [`SuppressionIndex`] and [`Reporter`] for `nolint` directive handling
//! - [`Config`] with tier minimums
//! - [`Analyzer`] for orchestrating lint execution
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use docguard_core::Analyzer;
//! use docguard_go::GoParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./")
//!     .parser(GoParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
pub mod constraint;
mod context;
mod parser;
mod reporter;
mod rule;
pub mod suppression;
pub mod syntax;
mod tiers;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, Config, ConfigError, ConfigFormat, CopyrightConfig, DoculintConfig,
    HeaderConfig, TodoConfig, ToggleConfig,
};
pub use context::PackageContext;
pub use parser::{ParseError, SourceParser};
pub use reporter::Reporter;
pub use rule::{Rule, RuleBox};
pub use suppression::{SuppressionDirective, SuppressionIndex};
pub use syntax::{
    Comment, CommentGroup, Decl, FuncDecl, GenDecl, GenKind, Ident, ImportSpec, Package,
    PackageDecl, Position, SourceFile, Spec, TypeExpr, TypeSpec, ValueSpec,
};
pub use tiers::Tier;
pub use types::{LintResult, Location, Severity, Violation};
