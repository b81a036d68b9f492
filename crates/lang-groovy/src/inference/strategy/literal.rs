use super::InferStrategy;
use crate::ast::{NodeId, NodeKind, Primitive};
use crate::inference::InferContext;
use crate::inference::core::{BIG_DECIMAL, BIG_INTEGER, GSTRING, ResolvedType, STRING};
use crate::inference::solver::{TypeSolver, reference_or_object};

/// The type a numeric literal denotes before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralType {
    Primitive(Primitive),
    /// Fully qualified name of a library class such as `BigDecimal`.
    Class(&'static str),
}

impl LiteralType {
    pub fn resolve(self, solver: &dyn TypeSolver) -> ResolvedType {
        match self {
            LiteralType::Primitive(primitive) => ResolvedType::Primitive(primitive),
            LiteralType::Class(name) => reference_or_object(solver, name),
        }
    }
}

/// Literal types with Groovy's defaults: integers take the smallest of
/// int, long and BigInteger that holds them; decimals are BigDecimal
/// unless suffixed.
pub struct LiteralInfer;

impl InferStrategy for LiteralInfer {
    fn infer(&self, node: NodeId, ctx: &InferContext) -> Option<ResolvedType> {
        let solver = ctx.solver();
        match ctx.ast.kind(node) {
            NodeKind::IntegerLiteral { value } => Some(integer_literal_type(value).resolve(solver)),
            NodeKind::DecimalLiteral { value } => Some(decimal_literal_type(value).resolve(solver)),
            NodeKind::BooleanLiteral { .. } => Some(ResolvedType::Primitive(Primitive::Boolean)),
            NodeKind::StringLiteral { .. } => Some(reference_or_object(solver, STRING)),
            NodeKind::GStringLiteral { .. } => Some(reference_or_object(solver, GSTRING)),
            NodeKind::NullLiteral => Some(ResolvedType::Null),
            _ => None,
        }
    }
}

pub fn integer_literal_type(text: &str) -> LiteralType {
    let digits: String = text
        .trim_start_matches(['-', '+'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    let (digits, suffix) = match digits.chars().last() {
        Some(c @ ('l' | 'L' | 'g' | 'G' | 'i' | 'I')) => (&digits[..digits.len() - 1], Some(c.to_ascii_lowercase())),
        _ => (digits.as_str(), None),
    };
    match suffix {
        Some('l') => return LiteralType::Primitive(Primitive::Long),
        Some('g') => return LiteralType::Class(BIG_INTEGER),
        Some('i') => return LiteralType::Primitive(Primitive::Int),
        _ => {}
    }

    let lower = digits.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16)
    } else if let Some(binary) = lower.strip_prefix("0b") {
        u128::from_str_radix(binary, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        u128::from_str_radix(&lower[1..], 8)
    } else {
        lower.parse::<u128>()
    };
    match parsed {
        Ok(v) if v <= i32::MAX as u128 => LiteralType::Primitive(Primitive::Int),
        Ok(v) if v <= i64::MAX as u128 => LiteralType::Primitive(Primitive::Long),
        _ => LiteralType::Class(BIG_INTEGER),
    }
}

pub fn decimal_literal_type(text: &str) -> LiteralType {
    let lower = text.trim_start_matches(['-', '+']).to_ascii_lowercase();
    if lower.starts_with("0x") {
        // Hex floats need a `p` exponent, so a trailing `f` is a suffix.
        let primitive = if lower.ends_with('f') { Primitive::Float } else { Primitive::Double };
        return LiteralType::Primitive(primitive);
    }
    match lower.chars().last() {
        Some('f') => LiteralType::Primitive(Primitive::Float),
        Some('d') => LiteralType::Primitive(Primitive::Double),
        _ => LiteralType::Class(BIG_DECIMAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_magnitude() {
        assert_eq!(integer_literal_type("42"), LiteralType::Primitive(Primitive::Int));
        assert_eq!(integer_literal_type("2147483647"), LiteralType::Primitive(Primitive::Int));
        assert_eq!(integer_literal_type("2147483648"), LiteralType::Primitive(Primitive::Long));
        assert_eq!(integer_literal_type("1_000_000_000_000"), LiteralType::Primitive(Primitive::Long));
        assert_eq!(integer_literal_type("99999999999999999999"), LiteralType::Class(BIG_INTEGER));
        assert_eq!(integer_literal_type("0xFF"), LiteralType::Primitive(Primitive::Int));
        assert_eq!(integer_literal_type("017"), LiteralType::Primitive(Primitive::Int));
        assert_eq!(integer_literal_type("-42"), LiteralType::Primitive(Primitive::Int));
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(integer_literal_type("1L"), LiteralType::Primitive(Primitive::Long));
        assert_eq!(integer_literal_type("1G"), LiteralType::Class(BIG_INTEGER));
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(decimal_literal_type("1.5"), LiteralType::Class(BIG_DECIMAL));
        assert_eq!(decimal_literal_type("1e3"), LiteralType::Class(BIG_DECIMAL));
        assert_eq!(decimal_literal_type("1.5f"), LiteralType::Primitive(Primitive::Float));
        assert_eq!(decimal_literal_type("1.5D"), LiteralType::Primitive(Primitive::Double));
        assert_eq!(decimal_literal_type("0x1.8p1"), LiteralType::Primitive(Primitive::Double));
    }
}
