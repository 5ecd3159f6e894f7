//! Go front end built on tree-sitter.

use crate::comments::{Comments, RawComment};
use docguard_core::syntax::{
    CommentGroup, Decl, FuncDecl, GenDecl, GenKind, Ident, ImportSpec, PackageDecl, Position,
    SourceFile, Spec, TypeExpr, TypeSpec, ValueSpec,
};
use docguard_core::{ParseError, SourceParser};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Language, Node, Parser, Point};

const LANGUAGE_ID: &str = "go";

/// Parses Go source files into the docguard syntax model.
#[derive(Clone)]
pub struct GoParser {
    language: Language,
}

impl GoParser {
    /// Creates a new Go parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GoParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoParser").finish_non_exhaustive()
    }
}

impl SourceParser for GoParser {
    fn language(&self) -> &'static str {
        LANGUAGE_ID
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SourceFile, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language {
                language: LANGUAGE_ID,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Language {
                language: LANGUAGE_ID,
                message: "parser produced no tree".to_string(),
            })?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).map_or(root.start_position(), |n| n.start_position());
            let pos = position(at);
            return Err(ParseError::Syntax {
                line: pos.line,
                column: pos.column,
            });
        }

        let mut raw = Vec::new();
        preorder(root, |node| {
            if node.kind() == "comment" {
                raw.push(RawComment {
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                    pos: position(node.start_position()),
                });
                return false;
            }
            true
        });

        let walker = FileWalker {
            src: source.as_bytes(),
            comments: Comments::build(source, &raw),
        };
        let file = walker.file(path, root)?;
        debug!(
            file = %path.display(),
            decls = file.decls.len(),
            comment_groups = file.comments.len(),
            "parsed"
        );
        Ok(file)
    }
}

/// Builds the syntax model of one parsed file.
struct FileWalker<'s> {
    src: &'s [u8],
    comments: Comments,
}

impl<'s> FileWalker<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn ident(&self, node: Node<'_>) -> Ident {
        Ident::new(self.text(node), position(node.start_position()))
    }

    fn file(self, path: &Path, root: Node<'_>) -> Result<SourceFile, ParseError> {
        let mut package = None;
        let mut decls = Vec::new();

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => package = Some(self.package(node)),
                "import_declaration" => decls.push(Decl::Gen(self.gen_decl(node, GenKind::Import))),
                "const_declaration" => decls.push(Decl::Gen(self.gen_decl(node, GenKind::Const))),
                "var_declaration" => decls.push(Decl::Gen(self.gen_decl(node, GenKind::Var))),
                "type_declaration" => decls.push(Decl::Gen(self.gen_decl(node, GenKind::Type))),
                "function_declaration" | "method_declaration" => {
                    decls.push(Decl::Func(self.func_decl(node)));
                }
                _ => {}
            }
        }

        let package = package.ok_or(ParseError::MissingPackage)?;
        let package_line = package.pos.line;
        let comments = self.comments.into_groups();

        let build_constraint = comments
            .iter()
            .take_while(|group| group.pos().line < package_line)
            .flat_map(|group| &group.comments)
            .find_map(|c| c.text.strip_prefix("//go:build "))
            .map(|expr| expr.trim().to_string());

        let mut file = SourceFile::new(path, package);
        file.decls = decls;
        file.comments = comments;
        file.build_constraint = build_constraint;
        Ok(file)
    }

    fn package(&self, node: Node<'_>) -> PackageDecl {
        let pos = position(node.start_position());
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_identifier")
            .map_or_else(|| Ident::new("", pos), |n| self.ident(n));

        PackageDecl {
            name,
            doc: self.comments.lead_doc(pos.line, 0),
            pos,
        }
    }

    fn gen_decl(&self, node: Node<'_>, kind: GenKind) -> GenDecl {
        let pos = position(node.start_position());
        let mut decl = GenDecl::new(kind, pos, false);
        decl.doc = self.comments.lead_doc(pos.line, 0);
        self.collect_specs(node, &mut decl);
        decl
    }

    fn collect_specs(&self, node: Node<'_>, decl: &mut GenDecl) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "(" => decl.parenthesized = true,
                "var_spec_list" | "import_spec_list" => self.collect_specs(child, decl),
                "const_spec" | "var_spec" => {
                    let spec = self.value_spec(child, decl);
                    decl.specs.push(Spec::Value(spec));
                }
                "type_spec" | "type_alias" => {
                    let name = child
                        .child_by_field_name("name")
                        .map_or_else(|| self.ident(child), |n| self.ident(n));
                    decl.specs.push(Spec::Type(TypeSpec {
                        name,
                        doc: self.spec_doc(child, decl),
                    }));
                }
                "import_spec" => {
                    let path = child
                        .child_by_field_name("path")
                        .map_or("", |n| self.text(n))
                        .trim_matches(|c| c == '"' || c == '`')
                        .to_string();
                    decl.specs.push(Spec::Import(ImportSpec {
                        path,
                        pos: position(child.start_position()),
                    }));
                }
                _ => {}
            }
        }
    }

    fn value_spec(&self, node: Node<'_>, decl: &GenDecl) -> ValueSpec {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.ident(n))
            .collect();

        let ty = node.child_by_field_name("type").map(|t| {
            let text = self.text(t).to_string();
            if t.kind() == "type_identifier" {
                TypeExpr::Ident(text)
            } else {
                TypeExpr::Other(text)
            }
        });

        ValueSpec {
            names,
            ty,
            doc: self.spec_doc(node, decl),
            pos: position(node.start_position()),
        }
    }

    /// Specs only carry their own doc inside `( ... )`; otherwise the doc
    /// belongs to the declaration.
    fn spec_doc(&self, node: Node<'_>, decl: &GenDecl) -> Option<CommentGroup> {
        if !decl.parenthesized {
            return None;
        }
        self.comments
            .lead_doc(node.start_position().row + 1, decl.pos.line)
    }

    fn func_decl(&self, node: Node<'_>) -> FuncDecl {
        let pos = position(node.start_position());
        let name = node
            .child_by_field_name("name")
            .map_or_else(|| Ident::new("", pos), |n| self.ident(n));

        let receiver = node.child_by_field_name("receiver").map(|list| {
            let mut cursor = list.walk();
            let ty = list
                .named_children(&mut cursor)
                .find(|n| n.kind() == "parameter_declaration")
                .and_then(|p| p.child_by_field_name("type"));
            match ty {
                Some(t) => self.text(t).to_string(),
                None => self
                    .text(list)
                    .trim_start_matches('(')
                    .trim_end_matches(')')
                    .trim()
                    .to_string(),
            }
        });

        let body = node.child_by_field_name("body");
        let end_point = body.unwrap_or(node).end_position();
        // `end_position` is exclusive; the closing brace sits one column left.
        let end = Position::new(end_point.row + 1, end_point.column.max(1));

        let mut nested = Vec::new();
        if let Some(body) = body {
            preorder(body, |n| {
                let kind = match n.kind() {
                    "const_declaration" => GenKind::Const,
                    "var_declaration" => GenKind::Var,
                    "type_declaration" => GenKind::Type,
                    _ => return true,
                };
                nested.push(self.gen_decl(n, kind));
                false
            });
        }

        FuncDecl {
            name,
            receiver,
            doc: self.comments.lead_doc(pos.line, 0),
            pos,
            end,
            nested,
        }
    }
}

fn position(point: Point) -> Position {
    Position::new(point.row + 1, point.column + 1)
}

/// Visits `root` and its descendants in source order. Returning false from
/// `visit` skips the node's children.
fn preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut cursor = root.walk();
    loop {
        let descend = visit(cursor.node());
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.node() == root {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Returns the first error or missing node in source order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    preorder(root, |node| {
        if found.is_some() {
            return false;
        }
        if node.is_error() || node.is_missing() {
            found = Some(node);
            return false;
        }
        node.has_error()
    });
    found
}
