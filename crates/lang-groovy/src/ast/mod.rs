//! Canonical syntax tree.
//!
//! All nodes of one parse live in an [`Ast`] arena and refer to each other by
//! [`NodeId`]. Relationship maps elsewhere in the crate key on these handles
//! (or on [`NodeRef`] when several arenas are involved), never on node content.

mod kind;
mod ops;
mod walk;

pub use kind::{ClassKind, NodeKind};
pub use ops::{AssignOp, BinaryOp, Comment, CommentKind, Primitive, UnaryOp};

use groovyscope_api::models::Range;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_AST_ID: AtomicU32 = AtomicU32::new(1);

/// Unique per arena, so handles from different parses never collide.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AstId(u32);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Stand-in used when comparing node payloads without their children.
    pub(crate) const DETACHED: NodeId = NodeId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena-qualified node identity.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub ast: AstId,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Option<Range>,
    pub annotations: Vec<NodeId>,
    pub comment: Option<Comment>,
    pub orphan_comments: Vec<Comment>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, range: Option<Range>) -> Self {
        Self {
            kind,
            range,
            annotations: Vec::new(),
            comment: None,
            orphan_comments: Vec::new(),
            parent: None,
        }
    }
}

#[derive(Debug)]
pub struct Ast {
    id: AstId,
    nodes: Vec<Node>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        Self {
            id: AstId(NEXT_AST_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: Vec::new(),
        }
    }

    pub fn id(&self) -> AstId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node and makes it the parent of every child its payload names.
    /// A child that already had a parent is silently moved.
    pub fn alloc(&mut self, kind: NodeKind, range: Option<Range>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = kind.children();
        self.nodes.push(Node::new(kind, range));
        for child in children {
            self.set_parent(child, Some(id));
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn range(&self, id: NodeId) -> Option<Range> {
        self.node(id).range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn node_ref(&self, id: NodeId) -> NodeRef {
        NodeRef {
            ast: self.id,
            node: id,
        }
    }

    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        self.node_mut(child).parent = parent;
    }

    pub fn set_range(&mut self, id: NodeId, range: Option<Range>) {
        self.node_mut(id).range = range;
    }

    pub fn add_annotation(&mut self, id: NodeId, annotation: NodeId) {
        self.node_mut(id).annotations.push(annotation);
        self.set_parent(annotation, Some(id));
    }

    pub fn set_comment(&mut self, id: NodeId, comment: Option<Comment>) {
        self.node_mut(id).comment = comment;
    }

    pub fn add_orphan_comment(&mut self, id: NodeId, comment: Comment) {
        self.node_mut(id).orphan_comments.push(comment);
    }

    /// Direct children: annotations first, then syntactic children in source order.
    pub fn child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        let mut children = node.annotations.clone();
        children.extend(node.kind.children());
        children
    }

    /// Declared name of a declaration-like node.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name()
    }

    /// Copies the subtree rooted at `id` into fresh nodes of this arena.
    /// The copy has no parent; ranges and comments are copied by value.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let source = self.node(id).clone();

        let annotations: Vec<NodeId> = source
            .annotations
            .iter()
            .map(|annotation| self.deep_clone(*annotation))
            .collect();

        let mut kind = source.kind;
        let mut originals = Vec::new();
        kind.visit_children_mut(&mut |slot| originals.push(*slot));
        let copies: Vec<NodeId> = originals.into_iter().map(|c| self.deep_clone(c)).collect();
        let mut copies = copies.into_iter();
        kind.visit_children_mut(&mut |slot| {
            if let Some(copy) = copies.next() {
                *slot = copy;
            }
        });

        let clone = self.alloc(kind, source.range);
        for annotation in annotations {
            self.add_annotation(clone, annotation);
        }
        let node = self.node_mut(clone);
        node.comment = source.comment;
        node.orphan_comments = source.orphan_comments;
        clone
    }

    /// Content equality of two subtrees of this arena, ignoring identity and parents.
    pub fn structurally_eq(&self, a: NodeId, b: NodeId) -> bool {
        self.subtree_eq(a, self, b)
    }

    /// Content equality between a subtree here and one in `other`.
    pub fn subtree_eq(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let left = self.node(a);
        let right = other.node(b);
        if left.range != right.range
            || left.comment != right.comment
            || left.orphan_comments != right.orphan_comments
            || left.kind.detached() != right.kind.detached()
        {
            return false;
        }
        let left_children = self.child_nodes(a);
        let right_children = other.child_nodes(b);
        left_children.len() == right_children.len()
            && left_children
                .iter()
                .zip(&right_children)
                .all(|(l, r)| self.subtree_eq(*l, other, *r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ast: &mut Ast) -> NodeId {
        let one = ast.alloc(
            NodeKind::IntegerLiteral {
                value: "1".into(),
            },
            Some(Range::from_coords(1, 9, 1, 9)),
        );
        let two = ast.alloc(
            NodeKind::IntegerLiteral {
                value: "2".into(),
            },
            Some(Range::from_coords(1, 13, 1, 13)),
        );
        ast.alloc(
            NodeKind::Binary {
                left: one,
                operator: BinaryOp::Plus,
                right: two,
            },
            Some(Range::from_coords(1, 9, 1, 13)),
        )
    }

    #[test]
    fn test_alloc_wires_parents() {
        let mut ast = Ast::new();
        let sum = sample(&mut ast);
        for child in ast.child_nodes(sum) {
            assert_eq!(ast.parent(child), Some(sum));
        }
        assert_eq!(ast.parent(sum), None);
    }

    #[test]
    fn test_reattaching_moves_ownership() {
        let mut ast = Ast::new();
        let sum = sample(&mut ast);
        let left = ast.child_nodes(sum)[0];
        let stmt = ast.alloc(NodeKind::ExpressionStmt { expression: left }, None);
        assert_eq!(ast.parent(left), Some(stmt));
    }

    #[test]
    fn test_deep_clone_is_independent_and_equal() {
        let mut ast = Ast::new();
        let sum = sample(&mut ast);
        let stmt = ast.alloc(NodeKind::ExpressionStmt { expression: sum }, None);

        let copy = ast.deep_clone(stmt);
        assert_ne!(copy, stmt);
        assert_eq!(ast.parent(copy), None);
        assert!(ast.structurally_eq(copy, stmt));

        let originals = ast.descendants(stmt);
        let copies = ast.descendants(copy);
        assert_eq!(originals.len(), copies.len());
        for (original, copied) in originals.iter().zip(&copies) {
            assert_ne!(original, copied);
            assert!(ast.structurally_eq(*original, *copied));
        }
    }

    #[test]
    fn test_structural_equality_sees_payload_changes() {
        let mut ast = Ast::new();
        let a = sample(&mut ast);
        let b = sample(&mut ast);
        assert!(ast.structurally_eq(a, b));

        let right = ast.child_nodes(b)[1];
        ast.node_mut(right).kind = NodeKind::IntegerLiteral {
            value: "3".into(),
        };
        assert!(!ast.structurally_eq(a, b));
    }

    #[test]
    fn test_node_refs_differ_between_arenas() {
        let mut first = Ast::new();
        let mut second = Ast::new();
        let a = sample(&mut first);
        let b = sample(&mut second);
        assert_eq!(a, b);
        assert_ne!(first.node_ref(a), second.node_ref(b));
    }
}
