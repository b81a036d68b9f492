//! Variable type inference.

use super::{InferStrategy, resolve_in};
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::{ResolvedType, ValueDeclaration};
use groovyscope_api::models::SymbolReference;

/// Infer the type of a simple name through the context chain.
///
/// A `def` variable takes the type of its initializer. A name that is not
/// a variable may still name a class, as in `Math.max(1, 2)`.
pub struct NameInfer;

impl InferStrategy for NameInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Name { identifier } = ctx.ast.kind(node) else {
            return None;
        };
        let context = ctx.context_for(node);
        match context.solve_symbol(identifier) {
            SymbolReference::Solved(value) => Some(value_type(&value, node, ctx)),
            SymbolReference::Unsolved => match context.solve_type(identifier) {
                Ok(found) => found.into_option().map(ResolvedType::reference),
                Err(e) => {
                    tracing::debug!("cannot resolve name '{}': {}", identifier, e);
                    None
                }
            },
        }
    }
}

/// Infer the declared type of a variable declaration or one of its declarators.
pub struct VariableDeclarationInfer;

impl InferStrategy for VariableDeclarationInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        match ctx.ast.kind(node) {
            NodeKind::VariableDeclarator { name, .. } => {
                let value = ctx.context_for(node).solve_symbol(name).into_option()?;
                Some(value_type(&value, node, ctx))
            }
            NodeKind::VariableDeclarationExpr { variables, .. } => ctx.infer(*variables.first()?),
            _ => None,
        }
    }
}

fn value_type(value: &ValueDeclaration, usage: NodeId, ctx: &InferContext) -> ResolvedType {
    let context = match value.node {
        Some(declared_at) => ctx.context_for(declared_at),
        None => ctx.context_for(usage),
    };
    if value.is_dynamic() {
        if let Some(initialized) = initializer_type(value, usage, ctx) {
            return initialized;
        }
    }
    resolve_in(&context, &value.type_ref).unwrap_or_else(|| ctx.object())
}

/// Type of the initializer of a `def` variable, unless `usage` sits inside
/// that initializer.
fn initializer_type(value: &ValueDeclaration, usage: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
    let declarator = value.node?;
    let NodeKind::VariableDeclarator {
        initializer: Some(initializer),
        ..
    } = ctx.ast.kind(declarator)
    else {
        return None;
    };
    if usage != declarator && ctx.ast.ancestors(usage).contains(&declarator) {
        return None;
    }
    ctx.infer(*initializer)
}
