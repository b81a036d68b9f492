//! Closure inference.

use super::InferStrategy;
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::{CLOSURE, ResolvedType};
use groovyscope_api::models::SymbolReference;

/// Infer `{ a -> ... }` as `groovy.lang.Closure<V>`, where `V` is the type
/// of an expression body, or of the last statement of a block body when it
/// is an expression or a `return`.
pub struct ClosureInfer;

impl InferStrategy for ClosureInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Closure { body, .. } = ctx.ast.kind(node) else {
            return None;
        };
        let SymbolReference::Solved(closure) = ctx.solver().try_to_solve_type(CLOSURE).ok()? else {
            return Some(ctx.object());
        };
        let result = last_value(*body, ctx)
            .and_then(|value| ctx.infer(value))
            .filter(|ty| !ty.is_void() && !ty.is_null());
        Some(match result {
            Some(ResolvedType::Primitive(primitive)) => match ctx.solver().solve_reference(primitive.boxed_name()) {
                Ok(SymbolReference::Solved(boxed)) => ResolvedType::generic(closure, vec![boxed]),
                _ => ResolvedType::reference(closure),
            },
            Some(value) => ResolvedType::generic(closure, vec![value]),
            None => ResolvedType::reference(closure),
        })
    }
}

fn last_value(body: NodeId, ctx: &InferContext) -> Option<NodeId> {
    let NodeKind::Block { statements } = ctx.ast.kind(body) else {
        return Some(body);
    };
    match ctx.ast.kind(*statements.last()?) {
        NodeKind::ExpressionStmt { expression } => Some(*expression),
        NodeKind::Return { expression } => *expression,
        _ => None,
    }
}
