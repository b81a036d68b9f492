//! List and map literal inference.

use super::InferStrategy;
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::ResolvedType;
use crate::inference::solver::reference_or_object;
use groovyscope_api::models::SymbolReference;

const ARRAY_LIST: &str = "java.util.ArrayList";
const LINKED_HASH_MAP: &str = "java.util.LinkedHashMap";

/// Infer `[a, b]` as `ArrayList<E>`, `E` being the boxed LUB of the
/// elements. An empty list is `ArrayList<Object>`.
pub struct ListInfer;

impl InferStrategy for ListInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::ListExpression { values } = ctx.ast.kind(node) else {
            return None;
        };
        Some(container(ARRAY_LIST, vec![element_type(values, ctx)], ctx))
    }
}

/// Infer `[k: v]` as `LinkedHashMap<K, V>`, like lists.
pub struct MapInfer;

impl InferStrategy for MapInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::MapExpression { entries } = ctx.ast.kind(node) else {
            return None;
        };
        let (keys, values): (Vec<NodeId>, Vec<NodeId>) = entries
            .iter()
            .filter_map(|entry| match ctx.ast.kind(*entry) {
                NodeKind::MapEntry { key, value } => Some((*key, *value)),
                _ => None,
            })
            .unzip();
        let arguments = vec![element_type(&keys, ctx), element_type(&values, ctx)];
        Some(container(LINKED_HASH_MAP, arguments, ctx))
    }
}

fn container(name: &str, arguments: Vec<ResolvedType>, ctx: &InferContext) -> ResolvedType {
    match ctx.solver().try_to_solve_type(name) {
        Ok(SymbolReference::Solved(declaration)) => ResolvedType::generic(declaration, arguments),
        _ => ctx.object(),
    }
}

fn element_type(nodes: &[NodeId], ctx: &InferContext) -> ResolvedType {
    let elements: Vec<ResolvedType> = ctx
        .infer_all(nodes)
        .into_iter()
        .map(|ty| match ty {
            ResolvedType::Primitive(primitive) => reference_or_object(ctx.solver(), primitive.boxed_name()),
            other => other,
        })
        .collect();
    if elements.is_empty() {
        return ctx.object();
    }
    match ctx.lub_or_object(&elements) {
        ResolvedType::Null => ctx.object(),
        ty => ty,
    }
}
