//! Resolved types.
//!
//! Unlike [`TypeRef`](groovyscope_api::models::TypeRef), a [`ResolvedType`]
//! points at a concrete declaration handed out by a type solver.

use super::declarations::TypeDeclaration;
use crate::ast::Primitive;
use std::fmt;
use std::sync::Arc;

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const GSTRING: &str = "groovy.lang.GString";
pub const BIG_INTEGER: &str = "java.math.BigInteger";
pub const BIG_DECIMAL: &str = "java.math.BigDecimal";
pub const CLOSURE: &str = "groovy.lang.Closure";

#[derive(Debug, Clone)]
pub struct ResolvedReferenceType {
    pub declaration: Arc<TypeDeclaration>,
    pub type_arguments: Vec<ResolvedType>,
}

impl ResolvedReferenceType {
    pub fn new(declaration: Arc<TypeDeclaration>) -> Self {
        Self {
            declaration,
            type_arguments: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.declaration.qualified_name
    }

    pub fn is_raw(&self) -> bool {
        self.type_arguments.is_empty()
    }
}

// Declarations are compared by name; two solvers may hand out distinct
// allocations for the same type.
impl PartialEq for ResolvedReferenceType {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name() && self.type_arguments == other.type_arguments
    }
}

impl Eq for ResolvedReferenceType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<ResolvedType>),
    Super(Box<ResolvedType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    Primitive(Primitive),
    Reference(ResolvedReferenceType),
    Wildcard(WildcardBound),
    Array(Box<ResolvedType>),
    Void,
    /// The type of the `null` literal.
    Null,
}

impl ResolvedType {
    pub fn reference(declaration: Arc<TypeDeclaration>) -> Self {
        ResolvedType::Reference(ResolvedReferenceType::new(declaration))
    }

    pub fn generic(declaration: Arc<TypeDeclaration>, type_arguments: Vec<ResolvedType>) -> Self {
        ResolvedType::Reference(ResolvedReferenceType {
            declaration,
            type_arguments,
        })
    }

    pub fn array_of(component: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(component))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, ResolvedType::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ResolvedType::Reference(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedType::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Void)
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            ResolvedType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ResolvedReferenceType> {
        match self {
            ResolvedType::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.as_reference().map(ResolvedReferenceType::qualified_name)
    }

    pub fn is_object(&self) -> bool {
        self.qualified_name() == Some(OBJECT)
    }

    pub fn is_string(&self) -> bool {
        self.qualified_name() == Some(STRING)
    }

    pub fn is_gstring(&self) -> bool {
        self.qualified_name() == Some(GSTRING)
    }

    pub fn is_boolean(&self) -> bool {
        self.unboxed() == Some(Primitive::Boolean)
    }

    /// The primitive behind a primitive or a boxed reference type.
    pub fn unboxed(&self) -> Option<Primitive> {
        match self {
            ResolvedType::Primitive(p) => Some(*p),
            ResolvedType::Reference(r) => Primitive::from_boxed_name(r.qualified_name()),
            _ => None,
        }
    }

    /// Position in the numeric promotion order, `None` for non-numeric types.
    pub fn numeric_rank(&self) -> Option<u8> {
        if let Some(name) = self.qualified_name() {
            match name {
                BIG_INTEGER => return Some(5),
                BIG_DECIMAL => return Some(6),
                _ => {}
            }
        }
        match self.unboxed()? {
            Primitive::Byte => Some(0),
            Primitive::Char => Some(1),
            Primitive::Short => Some(2),
            Primitive::Int => Some(3),
            Primitive::Long => Some(4),
            Primitive::Float => Some(7),
            Primitive::Double => Some(8),
            Primitive::Boolean => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    pub fn is_integral(&self) -> bool {
        matches!(self.numeric_rank(), Some(0..=5))
    }

    pub fn type_arguments(&self) -> &[ResolvedType] {
        match self {
            ResolvedType::Reference(r) => &r.type_arguments,
            _ => &[],
        }
    }

    /// Strips type arguments, keeping array structure.
    pub fn erasure(&self) -> ResolvedType {
        match self {
            ResolvedType::Reference(r) => ResolvedType::reference(r.declaration.clone()),
            ResolvedType::Array(component) => ResolvedType::array_of(component.erasure()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Primitive(p) => write!(f, "{}", p),
            ResolvedType::Reference(r) => {
                write!(f, "{}", r.qualified_name())?;
                if !r.type_arguments.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in r.type_arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            ResolvedType::Wildcard(WildcardBound::Unbounded) => write!(f, "?"),
            ResolvedType::Wildcard(WildcardBound::Extends(bound)) => write!(f, "? extends {}", bound),
            ResolvedType::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {}", bound),
            ResolvedType::Array(component) => write!(f, "{}[]", component),
            ResolvedType::Void => write!(f, "void"),
            ResolvedType::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::core::declarations::TypeKind;

    fn class(name: &str) -> Arc<TypeDeclaration> {
        Arc::new(TypeDeclaration::new(name, TypeKind::Class))
    }

    #[test]
    fn test_display() {
        let list = ResolvedType::generic(class("java.util.List"), vec![ResolvedType::reference(class(STRING))]);
        assert_eq!(list.to_string(), "java.util.List<java.lang.String>");
        assert_eq!(
            ResolvedType::array_of(ResolvedType::Primitive(Primitive::Int)).to_string(),
            "int[]"
        );
    }

    #[test]
    fn test_reference_equality_is_by_name() {
        assert_eq!(ResolvedType::reference(class(STRING)), ResolvedType::reference(class(STRING)));
    }

    #[test]
    fn test_numeric_ranks() {
        let boxed_long = ResolvedType::reference(class("java.lang.Long"));
        assert_eq!(boxed_long.numeric_rank(), Some(4));
        assert_eq!(ResolvedType::reference(class(BIG_DECIMAL)).numeric_rank(), Some(6));
        assert!(!ResolvedType::Primitive(Primitive::Boolean).is_numeric());
        assert!(ResolvedType::reference(class(BIG_INTEGER)).is_integral());
    }
}
