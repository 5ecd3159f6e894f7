//! # docguard-go
//!
//! Go front end for docguard.
//!
//! [`GoParser`] parses `.go` files with tree-sitter and builds the
//! [`docguard_core::SourceFile`] model the rules work on: the package
//! clause, top-level declarations with their doc comments, and every
//! comment group of the file. Comments are grouped and attached to
//! declarations the way `go doc` does.
//!
//! ```ignore
//! use docguard_core::SourceParser;
//! use docguard_go::GoParser;
//!
//! let file = GoParser::new().parse("foo/foo.go".as_ref(), "package foo\n")?;
//! assert_eq!(file.package_name(), "foo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod comments;
mod parser;

pub use parser::GoParser;
