//! Generic traversal over the arena.

use super::{Ast, NodeId, NodeKind};

impl Ast {
    /// Pre-order walk of the subtree rooted at `root`, root included.
    pub fn walk(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children = self.child_nodes(id);
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Every node below `root` in pre-order, root excluded.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut all = self.walk(root);
        all.remove(0);
        all
    }

    pub fn find_first<P>(&self, root: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&NodeKind) -> bool,
    {
        self.walk(root)
            .into_iter()
            .find(|id| predicate(self.kind(*id)))
    }

    pub fn find_all<P>(&self, root: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&NodeKind) -> bool,
    {
        self.walk(root)
            .into_iter()
            .filter(|id| predicate(self.kind(*id)))
            .collect()
    }

    /// Size of the subtree, root included.
    pub fn count_nodes(&self, root: NodeId) -> usize {
        self.walk(root).len()
    }

    /// Parent chain from the direct parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Nearest ancestor (or `id` itself) whose payload satisfies `predicate`.
    pub fn enclosing<P>(&self, id: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&NodeKind) -> bool,
    {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|candidate| predicate(self.kind(*candidate)))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, NodeKind};

    #[test]
    fn test_walk_counts_and_ancestors() {
        let mut ast = Ast::new();
        let name = ast.alloc(
            NodeKind::Name {
                identifier: "x".into(),
            },
            None,
        );
        let enclosed = ast.alloc(NodeKind::Enclosed { inner: name }, None);
        let stmt = ast.alloc(NodeKind::ExpressionStmt { expression: enclosed }, None);
        let block = ast.alloc(
            NodeKind::Block {
                statements: vec![stmt],
            },
            None,
        );

        assert_eq!(ast.count_nodes(block), 4);
        assert_eq!(ast.descendants(block), vec![stmt, enclosed, name]);
        assert_eq!(ast.ancestors(name), vec![enclosed, stmt, block]);
        assert_eq!(
            ast.find_first(block, |k| matches!(k, NodeKind::Name { .. })),
            Some(name)
        );
        assert_eq!(
            ast.enclosing(name, |k| matches!(k, NodeKind::Block { .. })),
            Some(block)
        );
    }
}
