//! Method call inference.

use super::field::receiver_reference;
use super::{InferStrategy, resolve_in};
use crate::ast::{NodeId, NodeKind};
use crate::inference::InferContext;
use crate::inference::core::{MemberInfo, ResolvedReferenceType, ResolvedType, ancestors, bind_type_ref};
use groovyscope_api::models::SymbolReference;

/// Infer the return type of a method call.
///
/// Unscoped calls go through the context chain; scoped calls look the
/// method up in the receiver's type hierarchy with type arguments bound.
pub struct MethodCallInfer;

impl InferStrategy for MethodCallInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::MethodCall {
            scope,
            name,
            arguments,
            ..
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        // `this(...)` and `super(...)` constructor invocations.
        if matches!(name.as_str(), "this" | "super") {
            return Some(ResolvedType::Void);
        }

        let arguments = ctx.infer_all(arguments);
        match scope {
            None => unscoped_call(node, name, &arguments, ctx),
            Some(scope) => {
                let receiver = receiver_reference(&ctx.infer(*scope)?, ctx)?;
                scoped_call(&receiver, name, &arguments, ctx)
            }
        }
    }
}

fn unscoped_call(node: NodeId, name: &str, arguments: &[ResolvedType], ctx: &InferContext) -> Option<ResolvedType> {
    let context = ctx.context_for(node);
    let method = match context.solve_method(name, arguments) {
        Ok(SymbolReference::Solved(method)) => method,
        Ok(SymbolReference::Unsolved) => {
            tracing::debug!(name, arity = arguments.len(), "no applicable method");
            return None;
        }
        Err(e) => {
            tracing::debug!("cannot solve method '{}': {}", name, e);
            return None;
        }
    };
    Some(resolve_in(&context, &method.type_ref).unwrap_or_else(|| ctx.object()))
}

fn scoped_call(
    receiver: &ResolvedReferenceType,
    name: &str,
    arguments: &[ResolvedType],
    ctx: &InferContext,
) -> Option<ResolvedType> {
    let hierarchy = ancestors(receiver, ctx.solver());
    let found = hierarchy.iter().find_map(|owner| {
        owner
            .declaration
            .methods_named(name)
            .find(|m| is_applicable(m, arguments, owner, ctx))
            .map(|m| (owner, m))
    });
    let (owner, method) = found?;
    Some(bind_type_ref(&method.type_ref, owner, ctx.solver()).unwrap_or_else(|| ctx.object()))
}

/// Same rule as the context chain, with parameter types bound against the
/// receiver's type arguments.
fn is_applicable(method: &MemberInfo, arguments: &[ResolvedType], owner: &ResolvedReferenceType, ctx: &InferContext) -> bool {
    if method.parameters.len() != arguments.len() {
        return false;
    }
    let solver = ctx.solver();
    method
        .parameters
        .iter()
        .zip(arguments)
        .all(|(parameter, argument)| match bind_type_ref(&method.parameter_type(parameter), owner, solver) {
            Some(expected) => expected.is_assignable_by(argument, solver),
            None => false,
        })
}
