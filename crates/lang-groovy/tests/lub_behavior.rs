//! Least upper bound properties.

use groovyscope_core::GroovyscopeError;
use groovyscope_groovy::ast::Primitive;
use groovyscope_groovy::inference::{BuiltinTypeSolver, ResolvedType, TypeSolver, lub, lub2, lub_nullable};

fn reference(solver: &BuiltinTypeSolver, name: &str) -> ResolvedType {
    solver.solve_reference(name).unwrap().into_option().unwrap()
}

fn int() -> ResolvedType {
    ResolvedType::Primitive(Primitive::Int)
}

#[test]
fn test_single_and_repeated_types_are_themselves() {
    let solver = BuiltinTypeSolver::new();
    let string = reference(&solver, "java.lang.String");
    assert_eq!(lub(&[string.clone()], &solver).unwrap(), string);
    assert_eq!(lub(&[string.clone(), string.clone(), string.clone()], &solver).unwrap(), string);
}

#[test]
fn test_numeric_promotion() {
    let solver = BuiltinTypeSolver::new();
    let long = ResolvedType::Primitive(Primitive::Long);
    assert_eq!(lub2(&int(), &long, &solver).unwrap(), long);

    let decimal = reference(&solver, "java.math.BigDecimal");
    assert_eq!(lub2(&int(), &decimal, &solver).unwrap(), decimal);

    let big_integer = reference(&solver, "java.math.BigInteger");
    let double = ResolvedType::Primitive(Primitive::Double);
    assert_eq!(
        lub(&[big_integer, double], &solver).unwrap().qualified_name(),
        Some("java.lang.Double")
    );
}

#[test]
fn test_string_and_gstring_is_string() {
    let solver = BuiltinTypeSolver::new();
    let string = reference(&solver, "java.lang.String");
    let gstring = reference(&solver, "groovy.lang.GString");
    assert_eq!(lub2(&string, &gstring, &solver).unwrap(), string);
    assert_eq!(lub2(&gstring, &string, &solver).unwrap(), string);
}

#[test]
fn test_empty_input_is_an_error() {
    let solver = BuiltinTypeSolver::new();
    assert!(matches!(lub(&[], &solver), Err(GroovyscopeError::EmptyLubInput)));
}

#[test]
fn test_nulls() {
    let solver = BuiltinTypeSolver::new();
    assert_eq!(lub(&[ResolvedType::Null, ResolvedType::Null], &solver).unwrap(), ResolvedType::Null);

    let string = reference(&solver, "java.lang.String");
    assert_eq!(lub(&[ResolvedType::Null, string.clone()], &solver).unwrap(), string);
    assert_eq!(lub_nullable(&[None, Some(string.clone())], &solver).unwrap(), string);
    assert_eq!(lub_nullable(&[None, None], &solver).unwrap(), ResolvedType::Null);
}

#[test]
fn test_lists_keep_element_lub() {
    let solver = BuiltinTypeSolver::new();
    let array_list = solver.try_to_solve_type("java.util.ArrayList").unwrap().into_option().unwrap();
    let linked_list = solver.try_to_solve_type("java.util.LinkedList").unwrap().into_option().unwrap();
    let integers = ResolvedType::generic(array_list, vec![reference(&solver, "java.lang.Integer")]);
    let longs = ResolvedType::generic(linked_list, vec![reference(&solver, "java.lang.Long")]);

    let result = lub2(&integers, &longs, &solver).unwrap();
    assert_eq!(result.to_string(), "java.util.List<java.lang.Long>");
}

#[test]
fn test_raw_list_stays_raw() {
    let solver = BuiltinTypeSolver::new();
    let array_list = solver.try_to_solve_type("java.util.ArrayList").unwrap().into_option().unwrap();
    let hash_set = solver.try_to_solve_type("java.util.HashSet").unwrap().into_option().unwrap();
    let typed = ResolvedType::generic(array_list.clone(), vec![reference(&solver, "java.lang.String")]);
    let raw = ResolvedType::reference(array_list);
    assert_eq!(lub2(&typed, &raw, &solver).unwrap().to_string(), "java.util.List");

    let set = ResolvedType::reference(hash_set);
    assert_eq!(lub2(&raw, &set, &solver).unwrap().to_string(), "java.util.Collection");
}

#[test]
fn test_boolean_cannot_join_numbers() {
    let solver = BuiltinTypeSolver::new();
    let boolean = ResolvedType::Primitive(Primitive::Boolean);
    assert!(matches!(
        lub2(&boolean, &int(), &solver),
        Err(GroovyscopeError::BooleanPromotion(_))
    ));
}
