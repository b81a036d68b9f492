//! `new` expression inference.

use super::{InferStrategy, type_of_type_node};
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::ResolvedType;

/// Infer `new Foo(...)`. A diamond leaves the type raw.
pub struct NewExprInfer;

impl InferStrategy for NewExprInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        match ctx.ast.kind(node) {
            NodeKind::ObjectCreation { class_type, .. } => type_of_type_node(*class_type, ctx),
            _ => None,
        }
    }
}

/// Infer `new int[3][]` and `new String[] { ... }`.
pub struct ArrayCreationInfer;

impl InferStrategy for ArrayCreationInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::ArrayCreation {
            element_type,
            dimensions,
            extra_dimensions,
            ..
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        let element = type_of_type_node(*element_type, ctx)?;
        Some((0..dimensions.len() + extra_dimensions).fold(element, |ty, _| ResolvedType::array_of(ty)))
    }
}
