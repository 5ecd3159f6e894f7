//! # docguard-rules
//!
//! Built-in lint rules for docguard.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DG001 | `doculint` | Requires godoc-style comments on packages, functions and declarations |
//! | DG002 | `copyright` | Requires the configured copyright comment on line 1 |
//! | DG003 | `todo` | Requires `TODO(<user>)[<ticket>]: <summary>` |
//! | DG004 | `header` | Requires header fields before the package clause |
//! | DG005 | `why` | Requires `// Why: <reason>` after `nolint` directives |
//! | DG006 | `barenolint` | Rejects `nolint` directives without a rule list |
//!
//! ## Usage
//!
//! ```ignore
//! use docguard_core::{Analyzer, Config};
//! use docguard_go::GoParser;
//!
//! let config = Config::from_file("docguard.yaml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .parser(GoParser::new())
//!     .rules(docguard_rules::rules_from_config(&config)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod copyright;
mod doculint;
mod header;
mod presets;
mod todo;
mod why;

#[cfg(test)]
mod test_support;

pub use copyright::Copyright;
pub use doculint::Doculint;
pub use header::Header;
pub use presets::{all_rules, rules_from_config, tier_rules};
pub use todo::Todo;
pub use why::{BareNolint, Why};

/// Re-export core types for convenience.
pub use docguard_core::{Rule, Severity, Violation};
