//! State passed through the inference strategy chain.

use crate::ast::{Ast, NodeId};
use crate::inference::context::{Context, ContextTree};
use crate::inference::core::ResolvedType;
use crate::inference::lub::lub;
use crate::inference::solver::{TypeSolver, object_type};
use crate::inference::strategy::infer_expression;
use std::cell::Cell;
use std::sync::Arc;

/// Nested inferences deeper than this give up, which also stops cycles
/// such as `def x = x + 1`.
const MAX_DEPTH: u16 = 64;

pub struct InferContext<'a> {
    pub ast: &'a Ast,
    pub contexts: &'a ContextTree,
    depth: Cell<u16>,
}

impl<'a> InferContext<'a> {
    pub fn new(ast: &'a Ast, contexts: &'a ContextTree) -> Self {
        Self {
            ast,
            contexts,
            depth: Cell::new(0),
        }
    }

    pub fn solver(&self) -> &dyn TypeSolver {
        self.contexts.solver()
    }

    /// Resolution context enclosing `node`.
    pub fn context_for(&self, node: NodeId) -> Arc<Context> {
        self.contexts.context_for(self.ast, node)
    }

    /// Type of an expression node, `None` when nothing applies.
    pub fn infer(&self, node: NodeId) -> Option<ResolvedType> {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            tracing::debug!(node = node.index(), "inference depth exceeded");
            return None;
        }
        self.depth.set(depth + 1);
        let result = infer_expression(node, self);
        self.depth.set(depth);
        result
    }

    /// Types of several expressions; unknown ones count as `Object`.
    pub fn infer_all(&self, nodes: &[NodeId]) -> Vec<ResolvedType> {
        nodes
            .iter()
            .map(|n| self.infer(*n).unwrap_or_else(|| self.object()))
            .collect()
    }

    pub fn object(&self) -> ResolvedType {
        object_type(self.solver())
    }

    /// LUB that degrades to `Object` instead of failing.
    pub fn lub_or_object(&self, types: &[ResolvedType]) -> ResolvedType {
        match lub(types, self.solver()) {
            Ok(ty) => ty,
            Err(e) => {
                tracing::debug!("no least upper bound: {}", e);
                self.object()
            }
        }
    }
}
