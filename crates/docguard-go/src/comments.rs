//! Comment grouping and doc comment attachment.

use docguard_core::syntax::{Comment, CommentGroup, Position};

/// A comment group plus whether its first comment starts its own line.
#[derive(Debug)]
struct Group {
    group: CommentGroup,
    own_line: bool,
    trailing_only: bool,
}

/// Raw comment as found in the tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawComment {
    pub start_byte: usize,
    pub end_byte: usize,
    pub pos: Position,
}

/// Every comment group of a file, in source order.
#[derive(Debug, Default)]
pub(crate) struct Comments {
    groups: Vec<Group>,
}

impl Comments {
    /// Groups comments (sorted by offset) the way godoc does: comments with
    /// nothing but whitespace and at most one line break between them form a
    /// group, except that a comment trailing code only groups with comments
    /// on its own line.
    pub(crate) fn build(source: &str, raw: &[RawComment]) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut prev_end: Option<usize> = None;

        for c in raw {
            let text = &source[c.start_byte..c.end_byte];
            let comment = Comment::new(text, c.pos);
            let own_line = line_prefix(source, c.start_byte).trim().is_empty();

            let joins = prev_end.is_some_and(|end| {
                let gap = &source[end..c.start_byte];
                let newlines = gap.matches('\n').count();
                gap.trim().is_empty()
                    && newlines <= 1
                    && groups
                        .last()
                        .is_some_and(|g| !(g.trailing_only && newlines == 1))
            });

            match groups.last_mut() {
                Some(last) if joins => last.group.comments.push(comment),
                _ => groups.push(Group {
                    group: CommentGroup::new(vec![comment]),
                    own_line,
                    trailing_only: !own_line,
                }),
            }
            prev_end = Some(c.end_byte);
        }

        Self { groups }
    }

    /// Returns the group documenting a node starting on `line`: it must end
    /// on the line before, start its own line, and begin after `after_line`.
    pub(crate) fn lead_doc(&self, line: usize, after_line: usize) -> Option<CommentGroup> {
        let idx = self
            .groups
            .partition_point(|g| g.group.end_line() + 1 < line);
        let g = self.groups.get(idx)?;
        (g.group.end_line() + 1 == line && g.own_line && g.group.pos().line > after_line)
            .then(|| g.group.clone())
    }

    /// Returns the groups, consuming the index.
    pub(crate) fn into_groups(self) -> Vec<CommentGroup> {
        self.groups.into_iter().map(|g| g.group).collect()
    }
}

/// Text between the start of the line holding `offset` and `offset`.
fn line_prefix(source: &str, offset: usize) -> &str {
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    &source[start..offset]
}
