//! Inference for expressions that name a type: casts, `instanceof` and
//! class literals.

use super::{InferStrategy, type_of_type_node};
use crate::ast::{NodeId, NodeKind, Primitive};
use crate::inference::InferContext;
use crate::inference::core::ResolvedType;
use groovyscope_api::models::SymbolReference;

/// `(Foo) x` has type `Foo`.
pub struct CastInfer;

impl InferStrategy for CastInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        match ctx.ast.kind(node) {
            NodeKind::Cast { target_type, .. } => type_of_type_node(*target_type, ctx),
            _ => None,
        }
    }
}

pub struct InstanceOfInfer;

impl InferStrategy for InstanceOfInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        match ctx.ast.kind(node) {
            NodeKind::InstanceOf { .. } => Some(ResolvedType::Primitive(Primitive::Boolean)),
            _ => None,
        }
    }
}

/// `Foo.class` has type `java.lang.Class<Foo>`.
pub struct ClassExprInfer;

impl InferStrategy for ClassExprInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::ClassExpr { class_type } = ctx.ast.kind(node) else {
            return None;
        };
        let SymbolReference::Solved(class) = ctx.solver().try_to_solve_type("java.lang.Class").ok()? else {
            return Some(ctx.object());
        };
        Some(match type_of_type_node(*class_type, ctx) {
            Some(target) if target.is_reference() => ResolvedType::generic(class, vec![target]),
            _ => ResolvedType::reference(class),
        })
    }
}
