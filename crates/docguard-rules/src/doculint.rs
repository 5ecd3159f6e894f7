//! Rule to require godoc-style documentation.
//!
//! # Rationale
//!
//! Exported or not, declarations in a package are read far more often than
//! written. Doc comments that start with the declared name render well in
//! `go doc` and tell the reader what a thing is before they read it.
//!
//! # Detected Patterns
//!
//! - Packages without a `Package <name>` comment in `<name>.go` or `doc.go`
//! - Package names containing `-` or `_`, or uppercase letters
//! - Functions of at least `min_fun_len` lines without a comment starting
//!   with `<name> `
//! - Const, var and type blocks without a block comment
//! - Constants, variables and types without a comment starting with their name
//! - Specs declaring several names at once
//!
//! # Enum-like blocks
//!
//! A parenthesized, uncommented const block directly after a single
//! `type T ...` declaration, where every member is explicitly typed `T`, is
//! exempt along with its members:
//!
//! ```go
//! // Color is a terminal color.
//! type Color int
//!
//! const (
//!     Red   Color = iota
//!     Green Color = 1
//! )
//! ```

use docguard_core::syntax::{BLANK_IDENT, DOC_FILE_STEM, FUNC_INIT, FUNC_MAIN};
use docguard_core::{
    CommentGroup, Decl, DoculintConfig, FuncDecl, GenDecl, GenKind, Package, PackageContext,
    Position, Reporter, Rule, SourceFile, Spec, TypeExpr,
};

/// Rule code for doculint.
pub const CODE: &str = "DG001";

/// Rule name for doculint.
pub const NAME: &str = "doculint";

/// Requires documentation on packages, functions and declarations.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Doculint {
    /// Functions spanning fewer lines need no doc comment.
    pub min_fun_len: usize,
    /// Validate package comments and names.
    pub validate_packages: bool,
    /// Validate function comments.
    pub validate_functions: bool,
    /// Validate variable comments.
    pub validate_variables: bool,
    /// Validate constant comments.
    pub validate_constants: bool,
    /// Validate type comments.
    pub validate_types: bool,
    /// Validate the package comment of `main` packages too.
    pub force_main_package: bool,
}

impl Default for Doculint {
    fn default() -> Self {
        Self::new()
    }
}

impl Doculint {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&DoculintConfig::default())
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &DoculintConfig) -> Self {
        Self {
            min_fun_len: config.min_fun_len,
            validate_packages: config.validate_packages,
            validate_functions: config.validate_functions,
            validate_variables: config.validate_variables,
            validate_constants: config.validate_constants,
            validate_types: config.validate_types,
            force_main_package: config.force_main_package,
        }
    }

    /// Sets the minimum function length that requires a doc comment.
    #[must_use]
    pub fn min_fun_len(mut self, lines: usize) -> Self {
        self.min_fun_len = lines;
        self
    }

    /// Sets whether `main` packages need a package comment.
    #[must_use]
    pub fn force_main_package(mut self, force: bool) -> Self {
        self.force_main_package = force;
        self
    }

    fn check_package_file(&self, file: &SourceFile, name: &str, reporter: &mut Reporter<'_>) {
        let location = || PackageContext::location(file, file.package.pos);

        if name.contains(['-', '_']) {
            reporter.report(
                location(),
                format!("package \"{name}\" should not contain - or _ in name"),
            );
        }
        if name != name.to_lowercase() {
            reporter.report(location(), format!("package \"{name}\" should be all lowercase"));
        }

        match &file.package.doc {
            None => reporter.report(
                location(),
                format!("package \"{name}\" has no comment associated with it in \"{name}.go\""),
            ),
            Some(doc) => {
                let prefix = format!("Package {name}");
                if !doc_text(doc).starts_with(&prefix) {
                    reporter.report(
                        location(),
                        format!("comment for package \"{name}\" should begin with \"{prefix}\""),
                    );
                }
            }
        }
    }
}

impl Rule for Doculint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires godoc-style comments on packages, functions, types, constants and variables"
    }

    fn check(&self, ctx: &PackageContext<'_>, reporter: &mut Reporter<'_>) {
        if ctx.is_test_package() {
            return;
        }

        let package = ctx.package;
        let skip_package_docs =
            !self.validate_packages || (package.is_main() && !self.force_main_package);
        let mut has_package_file = skip_package_docs;
        let mut any_analyzed = false;

        for file in ctx.analyzed_files() {
            any_analyzed = true;

            if !skip_package_docs {
                let stem = file.stem();
                if stem == package.name || stem == DOC_FILE_STEM {
                    has_package_file = true;
                    self.check_package_file(file, &package.name, reporter);
                }
            }

            FileWalk {
                rule: self,
                package,
                file,
                reporter: &mut *reporter,
                func: None,
            }
            .run();
        }

        if any_analyzed && !has_package_file {
            reporter.report(
                ctx.package_location(),
                format!(
                    "package \"{}\" has no file with the same name containing package comment",
                    package.name
                ),
            );
        }
    }
}

/// Trimmed doc text used for prefix checks.
fn doc_text(doc: &CommentGroup) -> String {
    doc.text().trim().to_string()
}

/// One pass over the declarations of a file.
struct FileWalk<'a, 'r> {
    rule: &'a Doculint,
    package: &'a Package,
    file: &'a SourceFile,
    reporter: &'a mut Reporter<'r>,
    /// Most recently entered function.
    func: Option<&'a FuncDecl>,
}

impl<'a> FileWalk<'a, '_> {
    fn run(mut self) {
        let file = self.file;
        for (index, decl) in file.decls.iter().enumerate() {
            match decl {
                Decl::Func(func) => {
                    self.func = Some(func);
                    self.check_func(func);
                    // Local declarations are walked like the rest of the
                    // tree and dropped by the span check in `check_gen`.
                    for nested in &func.nested {
                        self.check_gen(nested, None);
                    }
                }
                Decl::Gen(gen) => self.check_gen(gen, Some(index)),
            }
        }
    }

    fn report(&mut self, pos: Position, message: String) {
        let location = PackageContext::location(self.file, pos);
        self.reporter.report(location, message);
    }

    fn check_func(&mut self, func: &FuncDecl) {
        let rule = self.rule;
        if !rule.validate_functions {
            return;
        }
        let name = func.name.name.as_str();
        if self.package.is_main() && name == FUNC_MAIN {
            return;
        }
        if func.line_span() < rule.min_fun_len || name == FUNC_INIT {
            return;
        }

        match &func.doc {
            None => self.report(
                func.pos,
                format!("function \"{name}\" has no comment associated with it"),
            ),
            Some(doc) => {
                if !doc_text(doc).starts_with(&format!("{name} ")) {
                    self.report(
                        func.pos,
                        format!(
                            "comment for function \"{name}\" should be a sentence that starts with \"{name} \""
                        ),
                    );
                }
            }
        }
    }

    /// `top_level` is the index in the file's declaration list, `None` for
    /// declarations inside a function body.
    fn check_gen(&mut self, gen: &GenDecl, top_level: Option<usize>) {
        // Declarations local to a function body are not package API.
        if self.func.is_some_and(|func| func.contains_line(gen.pos.line)) {
            return;
        }

        let rule = self.rule;
        match gen.kind {
            GenKind::Const if rule.validate_constants => self.check_constants(gen, top_level),
            GenKind::Var if rule.validate_variables => {
                self.check_block_doc(gen, "variable");
                self.check_values(gen, "variable", "variables", true);
            }
            GenKind::Type if rule.validate_types => self.check_types(gen),
            _ => {}
        }
    }

    fn check_block_doc(&mut self, gen: &GenDecl, kind: &str) {
        if gen.parenthesized && gen.doc.is_none() {
            self.report(gen.pos, format!("{kind} block has no comment associated with it"));
        }
    }

    fn check_constants(&mut self, gen: &GenDecl, top_level: Option<usize>) {
        if gen.parenthesized && gen.doc.is_none() {
            if self.is_enum_like(gen, top_level) {
                return;
            }
            self.report(gen.pos, "constant block has no comment associated with it".to_string());
        }
        self.check_values(gen, "constant", "constants", false);
    }

    fn check_values(&mut self, gen: &GenDecl, kind: &str, plural: &str, skip_blank: bool) {
        for spec in &gen.specs {
            let Spec::Value(value) = spec else {
                continue;
            };
            let Some(first) = value.names.first() else {
                continue;
            };

            if value.names.len() > 1 {
                let names = value
                    .names
                    .iter()
                    .map(|n| format!("\"{}\"", n.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.report(
                    first.pos,
                    format!(
                        "{plural} {names} should be separated and each have a comment associated with them"
                    ),
                );
                continue;
            }

            if skip_blank && first.name == BLANK_IDENT {
                continue;
            }

            let doc = if gen.parenthesized {
                value.doc.as_ref()
            } else {
                gen.doc.as_ref()
            };
            self.check_named_doc(first.pos, kind, &first.name, doc);
        }
    }

    fn check_types(&mut self, gen: &GenDecl) {
        self.check_block_doc(gen, "type");
        for spec in &gen.specs {
            let Spec::Type(ty) = spec else {
                continue;
            };
            let doc = if gen.parenthesized {
                ty.doc.as_ref()
            } else {
                gen.doc.as_ref()
            };
            self.check_named_doc(ty.name.pos, "type", &ty.name.name, doc);
        }
    }

    fn check_named_doc(&mut self, pos: Position, kind: &str, name: &str, doc: Option<&CommentGroup>) {
        match doc {
            None => self.report(
                pos,
                format!("{kind} \"{name}\" has no comment associated with it"),
            ),
            Some(doc) if !doc_text(doc).starts_with(name) => self.report(
                pos,
                format!("comment for {kind} \"{name}\" should begin with \"{name}\""),
            ),
            Some(_) => {}
        }
    }

    /// A const block is enum-like when it sits at the top level right after a
    /// single, non-parenthesized type declaration and every member is
    /// explicitly typed with that type.
    fn is_enum_like(&self, gen: &GenDecl, top_level: Option<usize>) -> bool {
        let Some(index) = top_level else {
            return false;
        };
        let Some(Decl::Gen(prev)) = index
            .checked_sub(1)
            .and_then(|i| self.file.decls.get(i))
        else {
            return false;
        };
        if prev.kind != GenKind::Type || prev.parenthesized || prev.specs.len() != 1 {
            return false;
        }
        let Some(Spec::Type(enum_type)) = prev.specs.first() else {
            return false;
        };

        gen.specs.iter().all(|spec| match spec {
            Spec::Value(value) => {
                value.ty.as_ref().and_then(TypeExpr::as_ident) == Some(enum_type.name.name.as_str())
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{messages, package};
    use docguard_core::{Ident, ValueSpec};

    const PKG_DOC: &str = "// Package foo does foo things.\npackage foo\n";

    fn check(src: &str) -> Vec<String> {
        let pkg = package(&[("foo/foo.go", &format!("{PKG_DOC}{src}"))]);
        messages(&Doculint::new().min_fun_len(1), &pkg)
    }

    #[test]
    fn documented_package_is_clean() {
        assert!(check("").is_empty());
    }

    #[test]
    fn package_without_comment() {
        let pkg = package(&[("foo/foo.go", "package foo\n")]);
        assert_eq!(
            messages(&Doculint::new(), &pkg),
            vec!["1: package \"foo\" has no comment associated with it in \"foo.go\" (doculint)"]
        );
    }

    #[test]
    fn package_comment_prefix() {
        let pkg = package(&[("foo/doc.go", "// This package does foo.\npackage foo\n")]);
        assert_eq!(
            messages(&Doculint::new(), &pkg),
            vec!["2: comment for package \"foo\" should begin with \"Package foo\" (doculint)"]
        );
    }

    #[test]
    fn package_without_named_file_reports_once_at_directory() {
        let pkg = package(&[
            ("foo/a.go", "package foo\n"),
            ("foo/b.go", "package foo\n"),
        ]);
        let violations = crate::test_support::run(&Doculint::new(), &pkg);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 0);
        assert_eq!(violations[0].location.file, std::path::PathBuf::from("foo"));
        assert_eq!(
            violations[0].message,
            "package \"foo\" has no file with the same name containing package comment (doculint)"
        );
    }

    #[test]
    fn all_generated_package_is_skipped() {
        let pkg = package(&[(
            "foo/a.go",
            "// Code generated by protoc-gen-go. DO NOT EDIT.\n\npackage foo\n\nfunc Run() {\n}\n",
        )]);
        assert!(messages(&Doculint::new().min_fun_len(1), &pkg).is_empty());
    }

    #[test]
    fn main_package_needs_no_package_comment() {
        let pkg = package(&[("cmd/app/app.go", "package main\n\nfunc main() {\n}\n")]);
        assert!(messages(&Doculint::new().min_fun_len(1), &pkg).is_empty());

        assert_eq!(
            messages(&Doculint::new().force_main_package(true), &pkg),
            vec!["0: package \"main\" has no file with the same name containing package comment (doculint)"]
        );
    }

    #[test]
    fn test_packages_and_files_are_skipped() {
        let pkg = package(&[("foo/foo_test.go", "package foo_test\n\nfunc helper() {\n}\n")]);
        assert!(messages(&Doculint::new().min_fun_len(1), &pkg).is_empty());

        let pkg = package(&[
            ("foo/foo.go", PKG_DOC),
            ("foo/foo_test.go", "package foo\n\nfunc helper() {\n}\n"),
        ]);
        assert!(messages(&Doculint::new().min_fun_len(1), &pkg).is_empty());
    }

    #[test]
    fn package_name_conventions() {
        let pkg = package(&[("x/my_pkg.go", "// Package my_pkg is bad.\npackage my_pkg\n")]);
        assert_eq!(
            messages(&Doculint::new(), &pkg),
            vec!["2: package \"my_pkg\" should not contain - or _ in name (doculint)"]
        );

        let pkg = package(&[("x/Foo.go", "// Package Foo is loud.\npackage Foo\n")]);
        assert_eq!(
            messages(&Doculint::new(), &pkg),
            vec!["2: package \"Foo\" should be all lowercase (doculint)"]
        );
    }

    #[test]
    fn function_docs() {
        assert_eq!(
            check("\nfunc run() {\n}\n"),
            vec!["4: function \"run\" has no comment associated with it (doculint)"]
        );
        assert_eq!(
            check("\n// This runs.\nfunc run() {\n}\n"),
            vec!["5: comment for function \"run\" should be a sentence that starts with \"run \" (doculint)"]
        );
        assert_eq!(
            check("\n// run: does things.\nfunc run() {\n}\n"),
            vec!["5: comment for function \"run\" should be a sentence that starts with \"run \" (doculint)"]
        );
        assert!(check("\n// run does things.\nfunc run() {\n}\n").is_empty());
        assert!(check("\nfunc init() {\n}\n").is_empty());
    }

    #[test]
    fn methods_are_functions() {
        assert_eq!(
            check("\n// T is a type.\ntype T int\n\nfunc (t T) Get() int {\n\treturn int(t)\n}\n"),
            vec!["7: function \"Get\" has no comment associated with it (doculint)"]
        );
    }

    #[test]
    fn short_functions_are_exempt() {
        let src = format!("{PKG_DOC}\nfunc a() {{\n}}\n\nfunc b() {{\n\tx := 1\n\t_ = x\n}}\n");
        let pkg = package(&[("foo/foo.go", &src)]);
        assert_eq!(
            messages(&Doculint::new().min_fun_len(3), &pkg),
            vec!["7: function \"b\" has no comment associated with it (doculint)"]
        );
        assert_eq!(messages(&Doculint::new().min_fun_len(5), &pkg).len(), 0);
    }

    #[test]
    fn single_line_function_spans_one_line() {
        let src = format!("{PKG_DOC}\nfunc a() {{}}\n");
        let pkg = package(&[("foo/foo.go", &src)]);
        assert_eq!(messages(&Doculint::new().min_fun_len(1), &pkg).len(), 1);
        assert!(messages(&Doculint::new().min_fun_len(2), &pkg).is_empty());
    }

    #[test]
    fn declarations_inside_functions_are_skipped() {
        let src = "\n// run does things.\nfunc run() {\n\tconst x = 1\n\tvar y int\n\ttype z struct{}\n\t_ = y\n}\n";
        assert!(check(src).is_empty());
    }

    #[test]
    fn constant_blocks() {
        assert_eq!(
            check("\nconst (\n\t// A is a.\n\tA = 1\n\tB = 2\n)\n"),
            vec![
                "4: constant block has no comment associated with it (doculint)",
                "7: constant \"B\" has no comment associated with it (doculint)",
            ]
        );
    }

    #[test]
    fn single_constants() {
        assert_eq!(
            check("\nconst A = 1\n"),
            vec!["4: constant \"A\" has no comment associated with it (doculint)"]
        );
        assert_eq!(
            check("\n// The answer.\nconst A = 42\n"),
            vec!["5: comment for constant \"A\" should begin with \"A\" (doculint)"]
        );
        assert!(check("\n// A is the answer.\nconst A = 42\n").is_empty());
    }

    #[test]
    fn multi_name_specs_must_be_split() {
        assert_eq!(
            check("\n// Pair of things.\nconst a, b = 1, 2\n"),
            vec!["5: constants \"a\", \"b\" should be separated and each have a comment associated with them (doculint)"]
        );
        assert_eq!(
            check("\n// Pair of things.\nvar a, b int\n"),
            vec!["5: variables \"a\", \"b\" should be separated and each have a comment associated with them (doculint)"]
        );
    }

    #[test]
    fn enum_like_block_is_exempt() {
        let src = "\n// Color is a color.\ntype Color int\n\nconst (\n\tRed Color = iota\n\tGreen Color = 1\n)\n";
        assert!(check(src).is_empty());
    }

    #[test]
    fn enum_like_fails_closed() {
        // Untyped member.
        let src = "\n// Color is a color.\ntype Color int\n\nconst (\n\tRed Color = iota\n\tGreen = 1\n)\n";
        let found = check(src);
        assert_eq!(found[0], "7: constant block has no comment associated with it (doculint)");
        assert_eq!(found.len(), 3);

        // Different type.
        let src = "\n// Color is a color.\ntype Color int\n\nconst (\n\t// Red is red.\n\tRed Shade = 1\n)\n";
        assert_eq!(
            check(src),
            vec!["7: constant block has no comment associated with it (doculint)"]
        );

        // Preceded by a var, not a type.
        let src = "\n// Color is a color.\nvar Color int\n\nconst (\n\t// Red is red.\n\tRed Color = 1\n)\n";
        assert_eq!(
            check(src),
            vec!["7: constant block has no comment associated with it (doculint)"]
        );
    }

    #[test]
    fn enum_like_requires_plain_type_declaration() {
        let src = "\n// Types.\ntype (\n\t// Color is a color.\n\tColor int\n)\n\nconst (\n\t// Red is red.\n\tRed Color = 1\n)\n";
        assert_eq!(
            check(src),
            vec!["10: constant block has no comment associated with it (doculint)"]
        );
    }

    #[test]
    fn documented_constant_block_still_checks_members() {
        let src = "\n// Colors.\nconst (\n\tRed = 1\n)\n";
        assert_eq!(
            check(src),
            vec!["6: constant \"Red\" has no comment associated with it (doculint)"]
        );
    }

    #[test]
    fn variables() {
        assert_eq!(
            check("\nvar (\n\t_ = 1\n\t// x is x.\n\tx = 2\n)\n"),
            vec!["4: variable block has no comment associated with it (doculint)"]
        );
        assert_eq!(
            check("\n// Something.\nvar count int\n"),
            vec!["5: comment for variable \"count\" should begin with \"count\" (doculint)"]
        );
        assert!(check("\nvar _ = 1\n").is_empty());
    }

    #[test]
    fn types() {
        assert_eq!(
            check("\ntype (\n\t// A is a.\n\tA int\n\tB string\n)\n"),
            vec![
                "4: type block has no comment associated with it (doculint)",
                "7: type \"B\" has no comment associated with it (doculint)",
            ]
        );
        assert_eq!(
            check("\n// Thing.\ntype T struct{}\n"),
            vec!["5: comment for type \"T\" should begin with \"T\" (doculint)"]
        );
    }

    #[test]
    fn toggles_disable_checks() {
        let mut config = DoculintConfig {
            validate_constants: false,
            validate_variables: false,
            validate_types: false,
            validate_functions: false,
            validate_packages: false,
            ..DoculintConfig::default()
        };
        config.min_fun_len = 1;
        let pkg = package(&[(
            "foo/a.go",
            "package foo\n\nconst A = 1\n\nvar B = 2\n\ntype C int\n\nfunc d() {\n}\n",
        )]);
        assert!(messages(&Doculint::from_config(&config), &pkg).is_empty());
    }

    #[test]
    fn suppression_silences_doculint() {
        let src = "\n//nolint:doculint // Why: mirrors a C API.\nconst A = 1\n";
        assert!(check(src).is_empty());
    }

    #[test]
    fn value_spec_without_names_is_skipped() {
        let mut file = crate::test_support::parse("foo/foo.go", PKG_DOC);
        file.decls.push(Decl::Gen(
            GenDecl::new(GenKind::Const, Position::new(4, 1), false).with_spec(Spec::Value(
                ValueSpec {
                    names: Vec::new(),
                    ty: None,
                    doc: None,
                    pos: Position::new(4, 7),
                },
            )),
        ));
        file.decls.push(Decl::Gen(
            GenDecl::new(GenKind::Const, Position::new(5, 1), false).with_spec(Spec::Value(
                ValueSpec {
                    names: vec![Ident::new("Z", Position::new(5, 7))],
                    ty: None,
                    doc: None,
                    pos: Position::new(5, 7),
                },
            )),
        ));
        let pkg = Package::new("foo", "foo", vec![file]);
        assert_eq!(
            messages(&Doculint::new(), &pkg),
            vec!["5: constant \"Z\" has no comment associated with it (doculint)"]
        );
    }
}
