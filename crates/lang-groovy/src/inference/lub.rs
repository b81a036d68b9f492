//! Least upper bound of a set of types, following Groovy's static rules.
//!
//! The steps run in order and the first one that applies wins:
//! nulls and duplicates, `String`/`GString`, numeric promotion, generic
//! containers, primitive promotion, common reference ancestors, `Object`.

use crate::ast::Primitive;
use crate::inference::core::{
    BIG_DECIMAL, BIG_INTEGER, CLOSURE, OBJECT, ResolvedType, ancestor_names, as_supertype,
};
use crate::inference::solver::{TypeSolver, object_type, reference_or_object};
use groovyscope_api::models::SymbolReference;
use groovyscope_core::{GroovyscopeError, Result};
use indexmap::IndexSet;

/// Containers whose type arguments survive a LUB, most preferred first.
const GENERIC_CONTAINERS: &[&str] = &[
    "java.util.List",
    "java.util.Set",
    "java.util.Map",
    CLOSURE,
    "java.util.function.Function",
];

pub fn lub(types: &[ResolvedType], solver: &dyn TypeSolver) -> Result<ResolvedType> {
    if types.is_empty() {
        return Err(GroovyscopeError::EmptyLubInput);
    }

    let mut distinct: Vec<&ResolvedType> = Vec::with_capacity(types.len());
    for ty in types.iter().filter(|t| !t.is_null()) {
        if !distinct.contains(&ty) {
            distinct.push(ty);
        }
    }
    match distinct.as_slice() {
        [] => return Ok(ResolvedType::Null),
        [single] => return Ok((*single).clone()),
        [a, b] if (a.is_string() && b.is_gstring()) || (a.is_gstring() && b.is_string()) => {
            return Ok(if a.is_string() { (*a).clone() } else { (*b).clone() });
        }
        _ => {}
    }

    if distinct.iter().all(|t| t.is_numeric()) {
        return Ok(numeric_lub(&distinct, solver));
    }

    if let Some(container) = container_lub(&distinct, solver)? {
        return Ok(container);
    }

    if distinct.iter().all(|t| t.is_primitive()) {
        // Every non-boolean primitive is numeric, so a boolean is involved.
        let others: Vec<String> = distinct
            .iter()
            .filter(|t| !t.is_boolean())
            .map(|t| t.to_string())
            .collect();
        return Err(GroovyscopeError::BooleanPromotion(others.join(", ")));
    }

    if distinct
        .iter()
        .all(|t| matches!(t, ResolvedType::Reference(_) | ResolvedType::Array(_)))
    {
        return Ok(common_ancestor(&distinct, solver));
    }

    tracing::debug!(count = distinct.len(), "mixed primitive and reference types, using Object");
    Ok(object_type(solver))
}

pub fn lub2(a: &ResolvedType, b: &ResolvedType, solver: &dyn TypeSolver) -> Result<ResolvedType> {
    lub(&[a.clone(), b.clone()], solver)
}

/// `None` entries stand for `null`; only an all-`None` input yields [`ResolvedType::Null`].
pub fn lub_nullable(types: &[Option<ResolvedType>], solver: &dyn TypeSolver) -> Result<ResolvedType> {
    let types: Vec<ResolvedType> = types
        .iter()
        .map(|t| t.clone().unwrap_or(ResolvedType::Null))
        .collect();
    lub(&types, solver)
}

/// Promotion order: byte < char < short < int < long < BigInteger <
/// BigDecimal < float < double. Stays primitive only if every input is.
fn numeric_lub(types: &[&ResolvedType], solver: &dyn TypeSolver) -> ResolvedType {
    let rank = types.iter().filter_map(|t| t.numeric_rank()).max().unwrap_or(3);
    let primitive = match rank {
        0 => Some(Primitive::Byte),
        1 => Some(Primitive::Char),
        2 => Some(Primitive::Short),
        3 => Some(Primitive::Int),
        4 => Some(Primitive::Long),
        7 => Some(Primitive::Float),
        8 => Some(Primitive::Double),
        _ => None,
    };
    match primitive {
        Some(primitive) if types.iter().all(|t| t.is_primitive()) => ResolvedType::Primitive(primitive),
        Some(primitive) => reference_or_object(solver, primitive.boxed_name()),
        None if rank == 5 => reference_or_object(solver, BIG_INTEGER),
        None => reference_or_object(solver, BIG_DECIMAL),
    }
}

/// A shared generic container, parameterized position by position with the
/// LUB of the inputs' own type arguments. Stays raw when some input has
/// fewer arguments than the container declares.
fn container_lub(types: &[&ResolvedType], solver: &dyn TypeSolver) -> Result<Option<ResolvedType>> {
    let references: Vec<_> = types.iter().filter_map(|t| t.as_reference()).collect();
    if references.len() != types.len() {
        return Ok(None);
    }

    for container in GENERIC_CONTAINERS {
        let SymbolReference::Solved(declaration) = solver.try_to_solve_type(container)? else {
            continue;
        };
        if !references
            .iter()
            .all(|r| as_supertype(r, container, solver).is_some())
        {
            continue;
        }

        let arity = declaration.type_parameters.len();
        if arity == 0 || references.iter().any(|r| r.type_arguments.len() < arity) {
            return Ok(Some(ResolvedType::reference(declaration)));
        }
        let mut arguments = Vec::with_capacity(arity);
        for position in 0..arity {
            let column: Vec<ResolvedType> = references
                .iter()
                .map(|r| r.type_arguments[position].clone())
                .collect();
            arguments.push(lub(&column, solver)?);
        }
        return Ok(Some(ResolvedType::generic(declaration, arguments)));
    }
    Ok(None)
}

fn priority(name: &str) -> u8 {
    match name {
        "java.util.List" | "java.util.Set" | "java.util.Map" | "java.lang.Number" => 7,
        "java.util.Collection" => 6,
        "java.lang.Iterable" => 5,
        "java.lang.CharSequence" => 3,
        "java.lang.Comparable" => 2,
        "java.io.Serializable" => 1,
        OBJECT => 0,
        _ => 4,
    }
}

fn common_ancestor(types: &[&ResolvedType], solver: &dyn TypeSolver) -> ResolvedType {
    let mut common: Option<IndexSet<String>> = None;
    for ty in types {
        let names = match ty {
            ResolvedType::Reference(r) => ancestor_names(&r.declaration, solver),
            _ => ["java.lang.Cloneable", "java.io.Serializable", OBJECT]
                .into_iter()
                .map(String::from)
                .collect(),
        };
        common = Some(match common {
            None => names,
            Some(acc) => acc.into_iter().filter(|n| names.contains(n)).collect(),
        });
    }

    // Highest priority wins; ties keep the nearest ancestor.
    let mut best: Option<&String> = None;
    for name in common.iter().flatten() {
        if best.is_none_or(|b| priority(name) > priority(b)) {
            best = Some(name);
        }
    }
    match best {
        Some(name) => reference_or_object(solver, name),
        None => object_type(solver),
    }
}
