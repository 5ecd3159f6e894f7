//! Syntax tree model produced by a language front end.
//!
//! The model only carries what the rules need: the package clause,
//! top-level declarations with their doc comments, and every comment group
//! of the file. Front ends (see the `docguard-go` crate) build it once per
//! file; rules never mutate it.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Name of the program-entry package.
pub const PACKAGE_MAIN: &str = "main";

/// Name of the program-entry function in [`PACKAGE_MAIN`].
pub const FUNC_MAIN: &str = "main";

/// Name of the package initializer function.
pub const FUNC_INIT: &str = "init";

/// Conventional file stem for a file that only holds package documentation.
pub const DOC_FILE_STEM: &str = "doc";

/// Blank identifier.
pub const BLANK_IDENT: &str = "_";

/// Matches the marker line of a generated file.
static GENERATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^// Code generated .* DO NOT EDIT\.$").unwrap_or_else(|e| panic!("{e}"))
});

/// Line and column of a syntax element (both 1-indexed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number.
    pub line: usize,
    /// Column number (byte based).
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An identifier and where it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    /// Identifier text.
    pub name: String,
    /// Position of the first character.
    pub pos: Position,
}

impl Ident {
    /// Creates an identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

/// A single `//` or `/* */` comment, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Raw comment text including the comment markers.
    pub text: String,
    /// Position of the opening marker.
    pub pos: Position,
}

impl Comment {
    /// Creates a comment from its raw text.
    #[must_use]
    pub fn new(text: impl Into<String>, pos: Position) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }

    /// Returns the comment text without markers, trimmed.
    #[must_use]
    pub fn body(&self) -> &str {
        let text = self.text.as_str();
        if let Some(rest) = text.strip_prefix("//") {
            rest.trim()
        } else if let Some(rest) = text.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest).trim()
        } else {
            text.trim()
        }
    }

    /// Returns true for `//` comments.
    #[must_use]
    pub fn is_line_comment(&self) -> bool {
        self.text.starts_with("//")
    }

    /// Returns the line the comment ends on.
    #[must_use]
    pub fn end_line(&self) -> usize {
        self.pos.line + self.text.matches('\n').count()
    }
}

/// Adjacent comments with no blank line or token between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentGroup {
    /// Comments in source order. Never empty when built by a front end.
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// Creates a group from comments.
    #[must_use]
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    /// Creates a group of `//` comments on consecutive lines starting at
    /// `line`, column 1.
    #[must_use]
    pub fn lines(line: usize, texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| Comment::new(*text, Position::new(line + i, 1)))
                .collect(),
        )
    }

    /// Position of the first comment.
    #[must_use]
    pub fn pos(&self) -> Position {
        self.comments.first().map(|c| c.pos).unwrap_or_default()
    }

    /// Line the last comment ends on.
    #[must_use]
    pub fn end_line(&self) -> usize {
        self.comments.last().map_or(0, Comment::end_line)
    }

    /// Returns the documentation text of the group.
    ///
    /// Markers and the first space after `//` are removed, tool directives
    /// such as `//nolint:why` or `//go:build` are dropped, trailing
    /// whitespace is trimmed per line, runs of blank lines collapse to one,
    /// and leading and trailing blank lines are removed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        for comment in &self.comments {
            let raw = comment.text.as_str();
            let body = if let Some(rest) = raw.strip_prefix("//") {
                if is_directive(rest) {
                    continue;
                }
                rest.strip_prefix(' ').unwrap_or(rest)
            } else if let Some(rest) = raw.strip_prefix("/*") {
                rest.strip_suffix("*/").unwrap_or(rest)
            } else {
                raw
            };
            lines.extend(body.split('\n').map(str::trim_end));
        }

        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            out.push(line);
        }
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        out.join("\n")
    }
}

/// Reports whether the text after `//` is a tool directive rather than prose.
fn is_directive(rest: &str) -> bool {
    if ["line ", "extern ", "export "]
        .iter()
        .any(|prefix| rest.starts_with(prefix))
    {
        return true;
    }

    let Some((head, tail)) = rest.split_once(':') else {
        return false;
    };
    let word = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    !head.is_empty() && head.bytes().all(word) && tail.bytes().next().is_some_and(word)
}

/// The `package` clause of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    /// Package name.
    pub name: Ident,
    /// Leading doc comment.
    pub doc: Option<CommentGroup>,
    /// Position of the `package` keyword.
    pub pos: Position,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Function name.
    pub name: Ident,
    /// Receiver type text for methods.
    pub receiver: Option<String>,
    /// Leading doc comment.
    pub doc: Option<CommentGroup>,
    /// Position of the `func` keyword.
    pub pos: Position,
    /// Position of the closing brace (or end of signature without a body).
    pub end: Position,
    /// Const, type and var declarations inside the body, in source order.
    pub nested: Vec<GenDecl>,
}

impl FuncDecl {
    /// Number of lines the declaration spans, both ends included.
    #[must_use]
    pub fn line_span(&self) -> usize {
        self.end.line.saturating_sub(self.pos.line) + 1
    }

    /// Returns true when `line` falls within the declaration.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        (self.pos.line..=self.end.line).contains(&line)
    }
}

/// Keyword of a general declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenKind {
    /// `const`
    Const,
    /// `type`
    Type,
    /// `var`
    Var,
    /// `import`
    Import,
}

impl std::fmt::Display for GenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Const => write!(f, "const"),
            Self::Type => write!(f, "type"),
            Self::Var => write!(f, "var"),
            Self::Import => write!(f, "import"),
        }
    }
}

/// A `const`, `type`, `var` or `import` declaration, parenthesized or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    /// Declaration keyword.
    pub kind: GenKind,
    /// Doc comment above the keyword.
    pub doc: Option<CommentGroup>,
    /// Position of the keyword.
    pub pos: Position,
    /// Whether the specs are wrapped in `( ... )`.
    pub parenthesized: bool,
    /// Specs in source order.
    pub specs: Vec<Spec>,
}

impl GenDecl {
    /// Creates a declaration without doc or specs.
    #[must_use]
    pub fn new(kind: GenKind, pos: Position, parenthesized: bool) -> Self {
        Self {
            kind,
            doc: None,
            pos,
            parenthesized,
            specs: Vec::new(),
        }
    }

    /// Sets the doc comment.
    #[must_use]
    pub fn with_doc(mut self, doc: CommentGroup) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Appends a spec.
    #[must_use]
    pub fn with_spec(mut self, spec: Spec) -> Self {
        self.specs.push(spec);
        self
    }
}

/// One spec of a general declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    /// `name [, name]* [Type] [= values]`
    Value(ValueSpec),
    /// `Name Type` or `Name = Type`
    Type(TypeSpec),
    /// `[alias] "path"`
    Import(ImportSpec),
}

/// Type written in a value spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare type identifier such as `Color`.
    Ident(String),
    /// Any other type expression (`pkg.T`, `*T`, `[]T`, `T[int]`, ...).
    Other(String),
}

impl TypeExpr {
    /// Returns the identifier for bare type identifiers.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name),
            Self::Other(_) => None,
        }
    }
}

/// A constant or variable spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    /// Declared names.
    pub names: Vec<Ident>,
    /// Explicit type, if written.
    pub ty: Option<TypeExpr>,
    /// Doc comment (only inside parenthesized blocks).
    pub doc: Option<CommentGroup>,
    /// Position of the spec.
    pub pos: Position,
}

/// A type spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Declared type name.
    pub name: Ident,
    /// Doc comment (only inside parenthesized blocks).
    pub doc: Option<CommentGroup>,
}

/// An import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Import path without quotes.
    pub path: String,
    /// Position of the spec.
    pub pos: Position,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// Function or method.
    Func(FuncDecl),
    /// General declaration.
    Gen(GenDecl),
}

impl Decl {
    /// Position of the declaration keyword.
    #[must_use]
    pub fn pos(&self) -> Position {
        match self {
            Self::Func(func) => func.pos,
            Self::Gen(gen) => gen.pos,
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file, relative to the analysis root.
    pub path: PathBuf,
    /// Package clause.
    pub package: PackageDecl,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
    /// Every comment group of the file in source order.
    pub comments: Vec<CommentGroup>,
    /// Expression of the `//go:build` line, if any.
    pub build_constraint: Option<String>,
}

impl SourceFile {
    /// Creates a file with only a package clause.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, package: PackageDecl) -> Self {
        Self {
            path: path.into(),
            package,
            decls: Vec::new(),
            comments: Vec::new(),
            build_constraint: None,
        }
    }

    /// Returns the package name declared by this file.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package.name.name
    }

    /// File name without directory and `.go` extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or("", |n| n.strip_suffix(".go").unwrap_or(n))
    }

    /// Returns true for `_test.go` files.
    #[must_use]
    pub fn is_test(&self) -> bool {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"))
    }

    /// Returns true when a comment before the package clause marks the file
    /// as generated (`// Code generated ... DO NOT EDIT.`).
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.comments
            .iter()
            .take_while(|group| group.pos().line < self.package.pos.line)
            .flat_map(|group| &group.comments)
            .any(|comment| {
                comment
                    .text
                    .lines()
                    .any(|line| GENERATED_RE.is_match(line.trim_end()))
            })
    }

    /// Returns every comment of the file in source order.
    pub fn all_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().flat_map(|group| &group.comments)
    }
}

/// The files of one package in one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Package name.
    pub name: String,
    /// Directory of the package, relative to the analysis root.
    pub dir: PathBuf,
    /// Files taking part in the analysis. Files excluded by build
    /// constraints are not part of the package.
    pub files: Vec<SourceFile>,
}

impl Package {
    /// Creates a package.
    #[must_use]
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, files: Vec<SourceFile>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            files,
        }
    }

    /// Returns true for external test packages (`foo_test`).
    #[must_use]
    pub fn is_test_package(&self) -> bool {
        self.name.ends_with("_test")
    }

    /// Returns true for the program-entry package.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.name == PACKAGE_MAIN
    }
}
