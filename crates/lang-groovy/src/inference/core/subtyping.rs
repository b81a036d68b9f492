//! Subtyping and assignability.
//!
//! Supports:
//! - Identity
//! - Primitives (widening, unboxing)
//! - Boxing into `java.lang.Object` and the boxed type's supertypes
//! - Classes and interfaces (ancestor walk with type argument binding)
//! - Wildcard bounds
//! - Arrays (covariant for references)

use super::types::{OBJECT, ResolvedReferenceType, ResolvedType, WildcardBound};
use super::declarations::TypeDeclaration;
use crate::ast::Primitive;
use crate::inference::solver::{TypeSolver, object_type};
use groovyscope_api::models::{SymbolReference, TypeRef};
use indexmap::IndexSet;
use std::collections::VecDeque;
use std::sync::Arc;

/// `sub` widens to `sup` without a cast.
pub fn is_primitive_subtype(sub: Primitive, sup: Primitive) -> bool {
    use Primitive::*;
    match sub {
        Byte => matches!(sup, Short | Int | Long | Float | Double),
        Short => matches!(sup, Int | Long | Float | Double),
        Char => matches!(sup, Int | Long | Float | Double),
        Int => matches!(sup, Long | Float | Double),
        Long => matches!(sup, Float | Double),
        Float => matches!(sup, Double),
        _ => false,
    }
}

/// Resolves a declaration-table type against the type arguments of `owner`.
///
/// Type variables of `owner`'s declaration are replaced by the matching
/// argument, or by `Object` when `owner` is raw.
pub fn bind_type_ref(type_ref: &TypeRef, owner: &ResolvedReferenceType, solver: &dyn TypeSolver) -> Option<ResolvedType> {
    match type_ref {
        TypeRef::Raw(name) => {
            if let Some(primitive) = Primitive::from_name(name) {
                return Some(ResolvedType::Primitive(primitive));
            }
            match name.as_str() {
                "void" => return Some(ResolvedType::Void),
                "def" | "var" => return Some(object_type(solver)),
                _ => {}
            }
            if let Some(index) = owner.declaration.type_parameter_index(name) {
                return Some(
                    owner
                        .type_arguments
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| object_type(solver)),
                );
            }
            solve(name, solver)
        }
        TypeRef::Id(name) => solve(name, solver),
        TypeRef::Generic { base, args } => {
            let ResolvedType::Reference(mut reference) = bind_type_ref(base, owner, solver)? else {
                return None;
            };
            reference.type_arguments = args
                .iter()
                .map(|arg| bind_type_ref(arg, owner, solver).unwrap_or_else(|| object_type(solver)))
                .collect();
            Some(ResolvedType::Reference(reference))
        }
        TypeRef::Array {
            element,
            dimensions,
        } => {
            let mut ty = bind_type_ref(element, owner, solver)?;
            for _ in 0..*dimensions {
                ty = ResolvedType::array_of(ty);
            }
            Some(ty)
        }
        TypeRef::Wildcard {
            bound,
            is_upper_bound,
        } => Some(ResolvedType::Wildcard(match bound {
            None => WildcardBound::Unbounded,
            Some(bound) => {
                let bound = Box::new(bind_type_ref(bound, owner, solver)?);
                if *is_upper_bound {
                    WildcardBound::Extends(bound)
                } else {
                    WildcardBound::Super(bound)
                }
            }
        })),
        TypeRef::Unknown => None,
    }
}

fn solve(name: &str, solver: &dyn TypeSolver) -> Option<ResolvedType> {
    match solver.solve_reference(name) {
        Ok(SymbolReference::Solved(ty)) => Some(ty),
        Ok(SymbolReference::Unsolved) => None,
        Err(e) => {
            tracing::debug!("cannot resolve '{}': {}", name, e);
            None
        }
    }
}

/// `reference` and every supertype, breadth first, with type arguments
/// bound through the hierarchy. `java.lang.Object` always comes last.
/// Supertypes the solver does not know are skipped.
pub fn ancestors(reference: &ResolvedReferenceType, solver: &dyn TypeSolver) -> Vec<ResolvedReferenceType> {
    let mut seen = IndexSet::new();
    let mut out = Vec::new();
    let mut queue = VecDeque::from([reference.clone()]);

    while let Some(current) = queue.pop_front() {
        if current.qualified_name() == OBJECT || !seen.insert(current.qualified_name().to_string()) {
            continue;
        }
        for supertype in current.declaration.supertypes() {
            match bind_type_ref(supertype, &current, solver) {
                Some(ResolvedType::Reference(parent)) => queue.push_back(parent),
                _ => tracing::debug!(
                    "skipping unresolved supertype {} of {}",
                    supertype,
                    current.qualified_name()
                ),
            }
        }
        out.push(current);
    }

    if let ResolvedType::Reference(object) = object_type(solver) {
        out.push(object);
    }
    out
}

/// Qualified names of `declaration` and its supertypes, ending with `java.lang.Object`.
pub fn ancestor_names(declaration: &Arc<TypeDeclaration>, solver: &dyn TypeSolver) -> IndexSet<String> {
    ancestors(&ResolvedReferenceType::new(declaration.clone()), solver)
        .into_iter()
        .map(|a| a.qualified_name().to_string())
        .collect()
}

/// The view of `reference` as its supertype `target`, with bound type arguments.
pub fn as_supertype(
    reference: &ResolvedReferenceType,
    target: &str,
    solver: &dyn TypeSolver,
) -> Option<ResolvedReferenceType> {
    ancestors(reference, solver)
        .into_iter()
        .find(|a| a.qualified_name() == target)
}

impl ResolvedType {
    /// Whether a value of type `other` can be assigned to a variable of this type.
    pub fn is_assignable_by(&self, other: &ResolvedType, solver: &dyn TypeSolver) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (ResolvedType::Void, _) | (_, ResolvedType::Void) => false,
            (ResolvedType::Primitive(_), ResolvedType::Null) => false,
            (_, ResolvedType::Null) => true,

            (ResolvedType::Primitive(target), _) => match other.unboxed() {
                Some(source) => source == *target || is_primitive_subtype(source, *target),
                None => false,
            },

            (ResolvedType::Reference(target), _) if target.qualified_name() == OBJECT => true,
            (ResolvedType::Reference(_), ResolvedType::Primitive(source)) => {
                match solve(source.boxed_name(), solver) {
                    Some(boxed) => self.is_assignable_by(&boxed, solver),
                    None => false,
                }
            }
            (ResolvedType::Reference(target), ResolvedType::Reference(source)) => {
                reference_assignable(target, source, solver)
            }
            (ResolvedType::Reference(target), ResolvedType::Array(_)) => matches!(
                target.qualified_name(),
                "java.lang.Cloneable" | "java.io.Serializable"
            ),
            (ResolvedType::Reference(_), ResolvedType::Wildcard(WildcardBound::Extends(bound))) => {
                self.is_assignable_by(bound, solver)
            }
            (ResolvedType::Reference(_), ResolvedType::Wildcard(_)) => false,

            (ResolvedType::Array(target), ResolvedType::Array(source)) => {
                if target.is_primitive() || source.is_primitive() {
                    target == source
                } else {
                    target.is_assignable_by(source, solver)
                }
            }

            (ResolvedType::Wildcard(WildcardBound::Unbounded), _) => true,
            (ResolvedType::Wildcard(WildcardBound::Extends(bound)), _) => bound.is_assignable_by(other, solver),
            (ResolvedType::Wildcard(WildcardBound::Super(bound)), _) => other.is_assignable_by(bound, solver),

            _ => false,
        }
    }
}

fn reference_assignable(
    target: &ResolvedReferenceType,
    source: &ResolvedReferenceType,
    solver: &dyn TypeSolver,
) -> bool {
    let Some(view) = as_supertype(source, target.qualified_name(), solver) else {
        return false;
    };
    if target.is_raw() || view.is_raw() || target.type_arguments.len() != view.type_arguments.len() {
        return true;
    }
    target
        .type_arguments
        .iter()
        .zip(&view.type_arguments)
        .all(|(expected, actual)| match expected {
            ResolvedType::Wildcard(_) => expected.is_assignable_by(actual, solver),
            _ => expected == actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::solver::BuiltinTypeSolver;

    fn ty(solver: &BuiltinTypeSolver, name: &str) -> ResolvedType {
        solver.solve_reference(name).unwrap().into_option().unwrap()
    }

    fn list_of(solver: &BuiltinTypeSolver, list: &str, element: ResolvedType) -> ResolvedType {
        let ResolvedType::Reference(mut reference) = ty(solver, list) else {
            unreachable!()
        };
        reference.type_arguments = vec![element];
        ResolvedType::Reference(reference)
    }

    #[test]
    fn test_primitive_widening_and_unboxing() {
        let solver = BuiltinTypeSolver::new();
        let long = ResolvedType::Primitive(Primitive::Long);
        assert!(long.is_assignable_by(&ResolvedType::Primitive(Primitive::Int), &solver));
        assert!(!ResolvedType::Primitive(Primitive::Int).is_assignable_by(&long, &solver));
        assert!(long.is_assignable_by(&ty(&solver, "java.lang.Integer"), &solver));
        assert!(!long.is_assignable_by(&ResolvedType::Null, &solver));
    }

    #[test]
    fn test_object_and_boxing() {
        let solver = BuiltinTypeSolver::new();
        let object = ty(&solver, OBJECT);
        assert!(object.is_assignable_by(&ResolvedType::Primitive(Primitive::Boolean), &solver));
        assert!(ty(&solver, "java.lang.Number").is_assignable_by(&ResolvedType::Primitive(Primitive::Int), &solver));
        assert!(ty(&solver, "java.lang.String").is_assignable_by(&ResolvedType::Null, &solver));
    }

    #[test]
    fn test_generic_subtyping() {
        let solver = BuiltinTypeSolver::new();
        let string = ty(&solver, "java.lang.String");
        let integer = ty(&solver, "java.lang.Integer");
        let strings = list_of(&solver, "java.util.List", string.clone());
        assert!(strings.is_assignable_by(&list_of(&solver, "java.util.ArrayList", string.clone()), &solver));
        assert!(!strings.is_assignable_by(&list_of(&solver, "java.util.ArrayList", integer.clone()), &solver));

        let numbers = list_of(
            &solver,
            "java.util.Collection",
            ResolvedType::Wildcard(WildcardBound::Extends(Box::new(ty(&solver, "java.lang.Number")))),
        );
        assert!(numbers.is_assignable_by(&list_of(&solver, "java.util.LinkedList", integer), &solver));
    }

    #[test]
    fn test_array_covariance() {
        let solver = BuiltinTypeSolver::new();
        let objects = ResolvedType::array_of(ty(&solver, OBJECT));
        let strings = ResolvedType::array_of(ty(&solver, "java.lang.String"));
        assert!(objects.is_assignable_by(&strings, &solver));
        assert!(!strings.is_assignable_by(&objects, &solver));
        let ints = ResolvedType::array_of(ResolvedType::Primitive(Primitive::Int));
        assert!(!ResolvedType::array_of(ResolvedType::Primitive(Primitive::Long)).is_assignable_by(&ints, &solver));
    }

    #[test]
    fn test_ancestor_names_end_with_object() {
        let solver = BuiltinTypeSolver::new();
        let ResolvedType::Reference(list) = ty(&solver, "java.util.ArrayList") else {
            unreachable!()
        };
        let names = ancestor_names(&list.declaration, &solver);
        assert_eq!(names.first().map(String::as_str), Some("java.util.ArrayList"));
        assert_eq!(names.last().map(String::as_str), Some(OBJECT));
        assert!(names.contains("java.lang.Iterable"));
    }
}
