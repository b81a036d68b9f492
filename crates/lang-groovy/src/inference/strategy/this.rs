//! `this` and `super` expression inference.

use super::{InferStrategy, resolve_in};
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::ResolvedType;

/// Infer the type of `this` (the enclosing class) and `super` (its
/// superclass). Outside a class both are `Object`.
pub struct ThisInfer;

impl InferStrategy for ThisInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let is_super = match ctx.ast.kind(node) {
            NodeKind::This { .. } => false,
            NodeKind::Super { .. } => true,
            _ => return None,
        };

        let context = ctx.context_for(node);
        let Some(class) = context.enclosing_class() else {
            return Some(ctx.object());
        };
        if !is_super {
            return Some(ResolvedType::reference(class.clone()));
        }
        Some(
            class
                .superclass
                .as_ref()
                .and_then(|superclass| resolve_in(&context, superclass))
                .unwrap_or_else(|| ctx.object()),
        )
    }
}
