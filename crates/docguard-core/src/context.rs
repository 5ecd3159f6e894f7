//! Context types for rule execution.

use crate::suppression::SuppressionIndex;
use crate::syntax::{Package, Position, SourceFile};
use crate::types::Location;

/// Context provided to rules for one package.
///
/// Holds the package being analyzed and its suppression index, built once
/// before any rule runs and read-only afterwards.
#[derive(Debug)]
pub struct PackageContext<'a> {
    /// Package under analysis.
    pub package: &'a Package,
    /// Suppression directives found in the package's files.
    pub suppressions: SuppressionIndex,
}

impl<'a> PackageContext<'a> {
    /// Creates a context and builds the package's suppression index.
    #[must_use]
    pub fn new(package: &'a Package) -> Self {
        Self {
            package,
            suppressions: SuppressionIndex::build(&package.files),
        }
    }

    /// Returns true when rules should leave the whole package alone.
    #[must_use]
    pub fn is_test_package(&self) -> bool {
        self.package.is_test_package()
    }

    /// Files that rules inspect: neither generated nor `_test.go`.
    pub fn analyzed_files(&self) -> impl Iterator<Item = &'a SourceFile> {
        self.package
            .files
            .iter()
            .filter(|file| !file.is_generated() && !file.is_test())
    }

    /// Resolves a position inside `file` to a violation location.
    #[must_use]
    pub fn location(file: &SourceFile, pos: Position) -> Location {
        Location::new(file.path.clone(), pos.line, pos.column)
    }

    /// Location for findings that concern the package as a whole.
    #[must_use]
    pub fn package_location(&self) -> Location {
        Location::package(self.package.dir.clone())
    }
}
