//! Operator expression inference.

use super::InferStrategy;
use crate::ast::{AssignOp, BinaryOp, NodeId, NodeKind, Primitive, UnaryOp};
use crate::inference::InferContext;
use crate::inference::core::{BIG_DECIMAL, ResolvedType, STRING};
use crate::inference::solver::reference_or_object;

/// Infer binary expressions with Groovy's promotion rules.
pub struct BinaryInfer;

impl InferStrategy for BinaryInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Binary {
            left,
            operator,
            right,
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        if operator.is_predicate() {
            return Some(ResolvedType::Primitive(Primitive::Boolean));
        }
        let left = ctx.infer(*left).unwrap_or_else(|| ctx.object());
        let right = ctx.infer(*right).unwrap_or_else(|| ctx.object());
        Some(binary_type(*operator, &left, &right, ctx))
    }
}

/// Result type of `left operator right` for a non-predicate operator.
pub(crate) fn binary_type(
    operator: BinaryOp,
    left: &ResolvedType,
    right: &ResolvedType,
    ctx: &InferContext,
) -> ResolvedType {
    let numeric = left.is_numeric() && right.is_numeric();
    match operator {
        BinaryOp::Elvis => ctx.lub_or_object(&[left.clone(), right.clone()]),
        BinaryOp::Compare => ResolvedType::Primitive(Primitive::Int),
        BinaryOp::Plus if is_text(left) || is_text(right) => reference_or_object(ctx.solver(), STRING),
        BinaryOp::Divide if numeric => {
            if matches!(left.numeric_rank(), Some(7 | 8)) || matches!(right.numeric_rank(), Some(7 | 8)) {
                if left.is_primitive() && right.is_primitive() {
                    ResolvedType::Primitive(Primitive::Double)
                } else {
                    reference_or_object(ctx.solver(), Primitive::Double.boxed_name())
                }
            } else {
                reference_or_object(ctx.solver(), BIG_DECIMAL)
            }
        }
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Remainder | BinaryOp::Power
            if numeric =>
        {
            promote(&ctx.lub_or_object(&[left.clone(), right.clone()]), ctx)
        }
        BinaryOp::BinAnd | BinaryOp::BinOr | BinaryOp::Xor if left.is_boolean() && right.is_boolean() => {
            ResolvedType::Primitive(Primitive::Boolean)
        }
        BinaryOp::BinAnd | BinaryOp::BinOr | BinaryOp::Xor if left.is_integral() && right.is_integral() => {
            promote(&ctx.lub_or_object(&[left.clone(), right.clone()]), ctx)
        }
        BinaryOp::LeftShift | BinaryOp::SignedRightShift | BinaryOp::UnsignedRightShift if left.is_integral() => {
            promote(left, ctx)
        }
        // Operator overloading on other types: assume the receiver's type.
        _ => left.clone(),
    }
}

fn is_text(ty: &ResolvedType) -> bool {
    ty.is_string() || ty.is_gstring()
}

/// Unary numeric promotion: byte, char and short become int.
fn promote(ty: &ResolvedType, ctx: &InferContext) -> ResolvedType {
    match ty.numeric_rank() {
        Some(0..=2) if ty.is_primitive() => ResolvedType::Primitive(Primitive::Int),
        Some(0..=2) => reference_or_object(ctx.solver(), Primitive::Int.boxed_name()),
        _ => ty.clone(),
    }
}

/// Infer unary expressions.
pub struct UnaryInfer;

impl InferStrategy for UnaryInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Unary {
            operator,
            expression,
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        if *operator == UnaryOp::Not {
            return Some(ResolvedType::Primitive(Primitive::Boolean));
        }
        let operand = ctx.infer(*expression)?;
        Some(match operator {
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitwiseComplement if operand.is_numeric() => {
                promote(&operand, ctx)
            }
            _ => operand,
        })
    }
}

/// Infer `cond ? a : b` as the least upper bound of both branches.
pub struct ConditionalInfer;

impl InferStrategy for ConditionalInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Conditional {
            then_expr,
            else_expr,
            ..
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        let branches = ctx.infer_all(&[*then_expr, *else_expr]);
        Some(ctx.lub_or_object(&branches))
    }
}

/// Infer assignments: the assigned value for `=`, the operator result for
/// compound assignments.
pub struct AssignInfer;

impl InferStrategy for AssignInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let NodeKind::Assign {
            target,
            operator,
            value,
        } = ctx.ast.kind(node)
        else {
            return None;
        };
        let Some(operator) = compound_operator(*operator) else {
            return ctx.infer(*value);
        };
        let target = ctx.infer(*target).unwrap_or_else(|| ctx.object());
        let value = ctx.infer(*value).unwrap_or_else(|| ctx.object());
        Some(binary_type(operator, &target, &value, ctx))
    }
}

fn compound_operator(operator: AssignOp) -> Option<BinaryOp> {
    Some(match operator {
        AssignOp::Assign => return None,
        AssignOp::Plus => BinaryOp::Plus,
        AssignOp::Minus => BinaryOp::Minus,
        AssignOp::Multiply => BinaryOp::Multiply,
        AssignOp::Divide => BinaryOp::Divide,
        AssignOp::Remainder => BinaryOp::Remainder,
        AssignOp::BinAnd => BinaryOp::BinAnd,
        AssignOp::BinOr => BinaryOp::BinOr,
        AssignOp::Xor => BinaryOp::Xor,
        AssignOp::LeftShift => BinaryOp::LeftShift,
        AssignOp::SignedRightShift => BinaryOp::SignedRightShift,
        AssignOp::UnsignedRightShift => BinaryOp::UnsignedRightShift,
    })
}

/// Parenthesized expressions have the type of their content.
pub struct EnclosedInfer;

impl InferStrategy for EnclosedInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        match ctx.ast.kind(node) {
            NodeKind::Enclosed { inner } => ctx.infer(*inner),
            _ => None,
        }
    }
}
