//! Field and element access inference.

use super::InferStrategy;
use crate::ast::{Ast, NodeId, NodeKind, Primitive};
use crate::inference::InferContext;
use crate::inference::core::{MemberKind, ResolvedReferenceType, ResolvedType, ancestors, as_supertype, bind_type_ref};
use groovyscope_api::models::SymbolReference;

/// Infer `obj.field`. Falls back to a Groovy property getter, and treats an
/// unresolvable dotted chain as a qualified class name.
pub struct FieldAccessInfer;

impl InferStrategy for FieldAccessInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::FieldAccess { scope, name } = ctx.ast.kind(node) else {
            return None;
        };
        let Some(receiver) = ctx.infer(*scope) else {
            return qualified_type(node, ctx);
        };
        if matches!(receiver, ResolvedType::Array(_)) && name == "length" {
            return Some(ResolvedType::Primitive(Primitive::Int));
        }
        let receiver = receiver_reference(&receiver, ctx)?;
        field_type(&receiver, name, ctx).or_else(|| property_type(&receiver, name, ctx))
    }
}

/// The reference type whose members a receiver exposes. Primitives are boxed
/// and arrays only have `Object`'s members.
pub(crate) fn receiver_reference(receiver: &ResolvedType, ctx: &InferContext) -> Option<ResolvedReferenceType> {
    match receiver {
        ResolvedType::Reference(reference) => Some(reference.clone()),
        ResolvedType::Primitive(primitive) => match ctx.solver().solve_reference(primitive.boxed_name()).ok()? {
            SymbolReference::Solved(ResolvedType::Reference(boxed)) => Some(boxed),
            _ => None,
        },
        ResolvedType::Array(_) => ctx.object().as_reference().cloned(),
        _ => None,
    }
}

fn field_type(receiver: &ResolvedReferenceType, name: &str, ctx: &InferContext) -> Option<ResolvedType> {
    ancestors(receiver, ctx.solver()).iter().find_map(|owner| {
        let field = owner.declaration.field(name)?;
        Some(bind_type_ref(&field.type_ref, owner, ctx.solver()).unwrap_or_else(|| ctx.object()))
    })
}

/// `obj.name` read through `getName()` or, for booleans, `isName()`.
fn property_type(receiver: &ResolvedReferenceType, name: &str, ctx: &InferContext) -> Option<ResolvedType> {
    let mut chars = name.chars();
    let first = chars.next()?;
    let capitalized: String = first.to_uppercase().chain(chars).collect();
    let getters = [format!("get{}", capitalized), format!("is{}", capitalized)];

    ancestors(receiver, ctx.solver()).iter().find_map(|owner| {
        let getter = owner.declaration.members.iter().find(|m| {
            m.kind == MemberKind::Method && m.parameters.is_empty() && getters.contains(&m.name)
        })?;
        Some(bind_type_ref(&getter.type_ref, owner, ctx.solver()).unwrap_or_else(|| ctx.object()))
    })
}

fn qualified_type(node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
    let name = dotted_name(ctx.ast, node)?;
    match ctx.context_for(node).solve_type(&name) {
        Ok(found) => found.into_option().map(ResolvedType::reference),
        Err(e) => {
            tracing::debug!("cannot resolve '{}': {}", name, e);
            None
        }
    }
}

/// `a.b.c` for a chain of names, `None` for anything else.
fn dotted_name(ast: &Ast, node: NodeId) -> Option<String> {
    match ast.kind(node) {
        NodeKind::Name { identifier } => Some(identifier.clone()),
        NodeKind::FieldAccess { scope, name } => Some(format!("{}.{}", dotted_name(ast, *scope)?, name)),
        _ => None,
    }
}

/// Infer `a[i]`: the component of an array, the element of a `List`, the
/// value of a `Map`.
pub struct ArrayAccessInfer;

impl InferStrategy for ArrayAccessInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::ArrayAccess { array, .. } = ctx.ast.kind(node) else {
            return None;
        };
        let container = ctx.infer(*array)?;
        if let ResolvedType::Array(component) = &container {
            return Some(component.as_ref().clone());
        }
        let reference = container.as_reference()?;
        for (target, position) in [("java.util.List", 0), ("java.util.Map", 1)] {
            if let Some(view) = as_supertype(reference, target, ctx.solver()) {
                return Some(
                    view.type_arguments
                        .get(position)
                        .cloned()
                        .unwrap_or_else(|| ctx.object()),
                );
            }
        }
        Some(ctx.object())
    }
}
