use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntactic reference to a type, as written in source or in a declaration
/// table. Resolution turns these into resolved types.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeRef {
    /// Unresolved or primitive type name (e.g., "int", "def", "List")
    Raw(String),

    /// Fully qualified reference (e.g., "java.util.List")
    Id(String),

    /// Generic instantiation (e.g., List<String>)
    Generic {
        base: Box<TypeRef>,
        args: Vec<TypeRef>,
    },

    /// Array type (e.g., String[])
    Array {
        element: Box<TypeRef>,
        dimensions: usize,
    },

    /// Wildcard type (e.g., ? extends Number)
    Wildcard {
        bound: Option<Box<TypeRef>>,
        is_upper_bound: bool, // true: extends, false: super
    },

    #[default]
    Unknown,
}

impl TypeRef {
    pub fn raw(s: impl Into<String>) -> Self {
        TypeRef::Raw(s.into())
    }

    pub fn id(s: impl Into<String>) -> Self {
        TypeRef::Id(s.into())
    }

    pub fn generic(base: TypeRef, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            base: Box::new(base),
            args,
        }
    }

    pub fn array(element: TypeRef) -> Self {
        match element {
            TypeRef::Array {
                element,
                dimensions,
            } => TypeRef::Array {
                element,
                dimensions: dimensions + 1,
            },
            other => TypeRef::Array {
                element: Box::new(other),
                dimensions: 1,
            },
        }
    }

    /// The name of the outermost class, ignoring type arguments.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeRef::Raw(name) | TypeRef::Id(name) => Some(name),
            TypeRef::Generic { base, .. } => base.base_name(),
            _ => None,
        }
    }

    pub fn type_arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Generic { args, .. } => args,
            _ => &[],
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Raw(name) | TypeRef::Id(name) => write!(f, "{}", name),
            TypeRef::Generic { base, args } => {
                write!(f, "{}<", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            TypeRef::Array {
                element,
                dimensions,
            } => write!(f, "{}{}", element, "[]".repeat(*dimensions)),
            TypeRef::Wildcard {
                bound: None, ..
            } => write!(f, "?"),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => {
                let keyword = if *is_upper_bound { "extends" } else { "super" };
                write!(f, "? {} {}", keyword, bound)
            }
            TypeRef::Unknown => write!(f, "?unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_generic_and_array() {
        let ty = TypeRef::generic(
            TypeRef::id("java.util.Map"),
            vec![TypeRef::raw("String"), TypeRef::array(TypeRef::raw("int"))],
        );
        assert_eq!(ty.to_string(), "java.util.Map<String, int[]>");
        assert_eq!(ty.base_name(), Some("java.util.Map"));
    }

    #[test]
    fn test_array_of_array_adds_dimension() {
        let ty = TypeRef::array(TypeRef::array(TypeRef::raw("String")));
        assert_eq!(
            ty,
            TypeRef::Array {
                element: Box::new(TypeRef::raw("String")),
                dimensions: 2
            }
        );
    }
}
