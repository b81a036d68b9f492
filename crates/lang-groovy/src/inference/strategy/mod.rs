//! Inference strategies using combinator pattern.
//!
//! Each strategy implements [`InferStrategy`] for the node kinds it
//! understands and returns `None` for everything else, so strategies chain
//! with `or_else()`.

mod collection;
mod combinator;
mod field;
mod lambda;
mod literal;
mod local;
mod method;
mod new_expr;
mod operator;
mod this;
mod type_id;

pub use collection::{ListInfer, MapInfer};
pub use combinator::OrElse;
pub use field::{ArrayAccessInfer, FieldAccessInfer};
pub use lambda::ClosureInfer;
pub use literal::{LiteralInfer, LiteralType, decimal_literal_type, integer_literal_type};
pub use local::{NameInfer, VariableDeclarationInfer};
pub use method::MethodCallInfer;
pub use new_expr::{ArrayCreationInfer, NewExprInfer};
pub use operator::{AssignInfer, BinaryInfer, ConditionalInfer, EnclosedInfer, UnaryInfer};
pub use this::ThisInfer;
pub use type_id::{CastInfer, ClassExprInfer, InstanceOfInfer};

use crate::ast::NodeId;
use crate::inference::InferContext;
use crate::inference::context::Context;
use crate::inference::core::ResolvedType;
use crate::inference::solver::type_ref_of;
use groovyscope_api::models::TypeRef;
use once_cell::sync::Lazy;

/// A type inference strategy.
pub trait InferStrategy: Sync + Send {
    /// Type of `node`, or `None` if this strategy does not apply.
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType>;

    /// Checks the inferred type against `expected`, returning `expected`
    /// when it accepts the inferred type.
    fn check(&self, node: NodeId, expected: &ResolvedType, ctx: &InferContext) -> Option<ResolvedType> {
        let inferred = self.infer(node, ctx)?;
        expected
            .is_assignable_by(&inferred, ctx.solver())
            .then(|| expected.clone())
    }

    /// If `self` returns `None`, try `other`.
    fn or_else<S: InferStrategy>(self, other: S) -> OrElse<Self, S>
    where
        Self: Sized,
    {
        OrElse::new(self, other)
    }
}

/// The default expression inferrer, strategies in priority order.
pub fn build_expression_inferrer() -> impl InferStrategy {
    LiteralInfer
        .or_else(NameInfer)
        .or_else(EnclosedInfer)
        .or_else(BinaryInfer)
        .or_else(UnaryInfer)
        .or_else(ConditionalInfer)
        .or_else(AssignInfer)
        .or_else(MethodCallInfer)
        .or_else(FieldAccessInfer)
        .or_else(ArrayAccessInfer)
        .or_else(NewExprInfer)
        .or_else(ArrayCreationInfer)
        .or_else(CastInfer)
        .or_else(InstanceOfInfer)
        .or_else(ClassExprInfer)
        .or_else(ClosureInfer)
        .or_else(ListInfer)
        .or_else(MapInfer)
        .or_else(ThisInfer)
        .or_else(VariableDeclarationInfer)
}

static INFERRER: Lazy<Box<dyn InferStrategy>> = Lazy::new(|| Box::new(build_expression_inferrer()));

/// Infer the type of an expression node.
///
/// Prefer [`InferContext::infer`], which also guards against runaway recursion.
pub fn infer_expression(node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
    INFERRER.infer(node, ctx)
}

/// Resolves a syntactic type in `context`, logging instead of failing.
pub(crate) fn resolve_in(context: &Context, type_ref: &TypeRef) -> Option<ResolvedType> {
    match context.resolve_type_ref(type_ref) {
        Ok(resolved) => resolved.into_option(),
        Err(e) => {
            tracing::debug!("cannot resolve type {}: {}", type_ref, e);
            None
        }
    }
}

/// Resolved type of a type node such as a cast target or `new` class type.
pub(crate) fn type_of_type_node(type_node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
    let type_ref = type_ref_of(ctx.ast, type_node);
    resolve_in(&ctx.context_for(type_node), &type_ref)
}
