//! Shared machinery for turning a tree-sitter tree into the canonical AST:
//! positions, failure handling, comment attribution and syntax diagnostics.

use crate::ast::{Ast, Comment, NodeId, NodeKind};
use groovyscope_api::models::{Position, Problem, Range};
use groovyscope_core::ParseConfig;
use thiserror::Error;
use tree_sitter::Node as TsNode;

#[derive(Error, Debug, Clone)]
#[error("cannot convert `{kind}` at {range}: {message}")]
pub struct ConversionFailure {
    pub kind: String,
    pub message: String,
    pub range: Range,
}

pub(crate) type Conv<T> = std::result::Result<T, ConversionFailure>;

pub(crate) struct Converter<'a> {
    pub(crate) source: &'a str,
    pub(crate) config: &'a ParseConfig,
    pub(crate) ast: Ast,
    pub(crate) problems: Vec<Problem>,
    /// Names of the classes being converted, innermost last.
    pub(crate) class_names: Vec<String>,
    line_lengths: Vec<usize>,
}

impl<'a> Converter<'a> {
    pub(crate) fn new(source: &'a str, config: &'a ParseConfig) -> Self {
        Self {
            source,
            config,
            ast: Ast::new(),
            problems: Vec::new(),
            class_names: Vec::new(),
            line_lengths: source.split('\n').map(str::len).collect(),
        }
    }

    pub(crate) fn text(&self, node: TsNode) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// 1-based, inclusive range. Columns count bytes.
    pub(crate) fn range_of(&self, node: TsNode) -> Range {
        let start = node.start_position();
        let end = node.end_position();
        let begin = Position::new(start.row as u32 + 1, start.column as u32 + 1);

        let end = if end.column == 0 && end.row > start.row {
            // Ends right after a newline: the last character is on the previous line.
            let len = self.line_lengths.get(end.row - 1).copied().unwrap_or(0);
            Position::new(end.row as u32, len.max(1) as u32)
        } else {
            Position::new(end.row as u32 + 1, end.column as u32)
        };
        Range::new(begin, end.max(begin))
    }

    /// The range to store on a canonical node, if positions are attributed.
    pub(crate) fn attributed_range(&self, node: TsNode) -> Option<Range> {
        self.config
            .attribute_positions
            .then(|| self.range_of(node))
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, origin: TsNode) -> NodeId {
        let range = self.attributed_range(origin);
        self.ast.alloc(kind, range)
    }

    /// A node with no place in the source.
    pub(crate) fn alloc_synthetic(&mut self, kind: NodeKind) -> NodeId {
        self.ast.alloc(kind, None)
    }

    pub(crate) fn fail<T>(&self, node: TsNode, message: impl Into<String>) -> Conv<T> {
        Err(ConversionFailure {
            kind: node.kind().to_string(),
            message: message.into(),
            range: self.range_of(node),
        })
    }

    pub(crate) fn first_named<'t>(&self, node: TsNode<'t>) -> Conv<TsNode<'t>> {
        match operands(node).into_iter().next() {
            Some(child) => Ok(child),
            None => self.fail(node, "empty node"),
        }
    }

    /// The field `field`, or else the operand at `index`.
    pub(crate) fn field_or_operand<'t>(
        &self,
        node: TsNode<'t>,
        field: &str,
        index: usize,
    ) -> Conv<TsNode<'t>> {
        if let Some(child) = node.child_by_field_name(field) {
            return Ok(child);
        }
        match operands(node).get(index) {
            Some(child) => Ok(*child),
            None => self.fail(node, format!("missing `{}`", field)),
        }
    }

    /// Runs one sub-tree conversion. In lenient mode a failure becomes an
    /// error problem plus an `Empty` placeholder; in strict mode it aborts.
    pub(crate) fn guarded<F>(&mut self, node: TsNode, convert: F) -> Conv<NodeId>
    where
        F: FnOnce(&mut Self, TsNode) -> Conv<NodeId>,
    {
        if node.is_error() {
            // Already reported by the syntax pass.
            return self.placeholder(node);
        }
        match convert(self, node) {
            Ok(id) => Ok(id),
            Err(failure) if self.config.is_strict() => Err(failure),
            Err(failure) => {
                tracing::warn!(kind = %failure.kind, at = %failure.range, "{}", failure.message);
                self.problems
                    .push(Problem::error(failure.to_string(), failure.range));
                self.placeholder(node)
            }
        }
    }

    fn placeholder(&mut self, node: TsNode) -> Conv<NodeId> {
        let kind = NodeKind::Empty {
            foreign_kind: node.kind().to_string(),
        };
        Ok(self.alloc(kind, node))
    }

    /// Converts the members of a container, attaching each comment that
    /// directly precedes a member to it. Other comments are returned as the
    /// container's orphans.
    pub(crate) fn sequence<F>(
        &mut self,
        children: Vec<TsNode>,
        mut convert: F,
    ) -> Conv<(Vec<NodeId>, Vec<Comment>)>
    where
        F: FnMut(&mut Self, TsNode) -> Conv<Option<NodeId>>,
    {
        let mut converted = Vec::new();
        let mut orphans = Vec::new();
        let mut pending: Option<Comment> = None;

        for child in children {
            if is_comment(child) {
                if !self.config.attribute_comments {
                    continue;
                }
                let comment = Comment::from_source(self.text(child), self.attributed_range(child));
                if let Some(previous) = pending.replace(comment) {
                    orphans.push(previous);
                }
                continue;
            }
            if let Some(id) = convert(self, child)? {
                if let Some(comment) = pending.take() {
                    self.ast.set_comment(id, Some(comment));
                }
                converted.push(id);
            }
        }
        orphans.extend(pending);
        Ok((converted, orphans))
    }

    pub(crate) fn attach_orphans(&mut self, id: NodeId, orphans: Vec<Comment>) {
        for comment in orphans {
            self.ast.add_orphan_comment(id, comment);
        }
    }

    /// Reports `ERROR` nodes and `MISSING` tokens. A missing `;` is not a
    /// problem since statement terminators are optional.
    pub(crate) fn collect_syntax_problems(&mut self, root: TsNode) {
        if !root.has_error() {
            return;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() {
                let text: String = self.text(node).chars().take(40).collect();
                let message = if text.trim().is_empty() {
                    "Syntax error".to_string()
                } else {
                    format!("Unexpected `{}`", text.trim())
                };
                self.problems.push(Problem::error(message, self.range_of(node)));
                continue;
            }
            if node.is_missing() {
                if node.kind() != ";" {
                    self.problems.push(Problem::error(
                        format!("Missing `{}`", node.kind()),
                        self.range_of(node),
                    ));
                }
                continue;
            }
            if node.has_error() {
                let mut cursor = node.walk();
                let children: Vec<TsNode> = node.children(&mut cursor).collect();
                stack.extend(children.into_iter().rev());
            }
        }
    }

    pub(crate) fn finish(self) -> (Ast, Vec<Problem>) {
        (self.ast, self.problems)
    }
}

pub(crate) fn is_comment(node: TsNode) -> bool {
    is_comment_kind(node.kind())
}

pub(crate) fn is_comment_kind(kind: &str) -> bool {
    matches!(kind, "comment" | "groovy_doc" | "line_comment" | "block_comment")
}

/// Keywords that the grammar exposes as anonymous tokens but that stand for
/// whole expressions.
const KEYWORD_OPERANDS: &[&str] = &["this", "super", "true", "false", "null"];

/// Named children without comments.
pub(crate) fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra() && !is_comment(*child))
        .collect()
}

/// Named children including comments, for containers that attribute them.
pub(crate) fn named_children_with_comments(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The sub-expressions of an operator node: named children plus keyword
/// literals such as `this` or `null`.
pub(crate) fn operands(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| {
            if child.is_named() {
                !child.is_extra() && !is_comment(*child)
            } else {
                KEYWORD_OPERANDS.contains(&child.kind())
            }
        })
        .collect()
}

/// The first anonymous token that is not punctuation, e.g. the `+` of a
/// binary operation or the `++` of an increment.
pub(crate) fn operator_token<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| {
        !child.is_named()
            && !KEYWORD_OPERANDS.contains(&child.kind())
            && !matches!(child.kind(), "(" | ")" | "[" | "]" | "{" | "}" | "," | ";")
    })
}

pub(crate) fn child_of_kind<'t>(node: TsNode<'t>, kind: &str) -> Option<TsNode<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

pub(crate) fn has_token(node: TsNode, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token)
}
