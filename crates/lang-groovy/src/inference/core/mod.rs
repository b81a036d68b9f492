//! Type model shared by solvers, contexts and inference.

mod declarations;
mod subtyping;
mod types;

pub use declarations::{
    MemberInfo, MemberKind, ParameterInfo, TypeDeclaration, TypeKind, TypeParameter,
    ValueDeclaration, ValueKind,
};
pub use subtyping::{ancestor_names, ancestors, as_supertype, bind_type_ref, is_primitive_subtype};
pub use types::{
    BIG_DECIMAL, BIG_INTEGER, CLOSURE, GSTRING, OBJECT, ResolvedReferenceType, ResolvedType,
    STRING, WildcardBound,
};
