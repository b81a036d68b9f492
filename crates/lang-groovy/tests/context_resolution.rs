//! Symbol, type and method lookups through the context chain.

mod common;

use common::Analyzed;
use groovyscope_api::models::SymbolReference;
use groovyscope_groovy::ast::{NodeKind, Primitive};
use groovyscope_groovy::inference::{Context, ResolvedType, TypeSolver};
use groovyscope_groovy::inference::core::ValueKind;
use std::sync::Arc;

fn int() -> ResolvedType {
    ResolvedType::Primitive(Primitive::Int)
}

fn class_context(analyzed: &Analyzed, name: &str) -> Arc<Context> {
    let class = analyzed
        .parsed
        .ast
        .find_first(analyzed.unit, |k| matches!(k, NodeKind::ClassDeclaration { name: n, .. } if n == name))
        .unwrap();
    analyzed.contexts.get(class).unwrap().clone()
}

#[test]
fn test_class_method_applicability() {
    let analyzed = Analyzed::new("class Foo { void foo(int x) {} }");
    let context = class_context(&analyzed, "Foo");

    let solved = context.solve_method("foo", &[int()]).unwrap();
    assert!(matches!(solved, SymbolReference::Solved(ref m) if m.name == "foo"));

    let string = analyzed.contexts.solver().solve_reference("java.lang.String").unwrap().into_option().unwrap();
    assert!(!context.solve_method("foo", &[string]).unwrap().is_solved());
    assert!(!context.solve_method("bar", &[int()]).unwrap().is_solved());
    assert!(!context.solve_method("foo", &[]).unwrap().is_solved());
}

#[test]
fn test_inherited_method_from_superclass() {
    let analyzed = Analyzed::new("class Base { int size(String s) { return 0 } }\nclass Child extends Base { }");
    let context = class_context(&analyzed, "Child");
    let string = analyzed.contexts.solver().solve_reference("java.lang.String").unwrap().into_option().unwrap();
    let found = context.solve_method("size", &[string]).unwrap().into_option().unwrap();
    assert_eq!(found.declaring_type.as_deref(), Some("Base"));
}

#[test]
fn test_symbols_resolve_innermost_first() {
    let source = "class Box {\n  String value\n  void set(int value) { def copy = value }\n}";
    let analyzed = Analyzed::new(source);
    let name = analyzed
        .parsed
        .ast
        .find_first(analyzed.unit, |k| matches!(k, NodeKind::Name { identifier } if identifier == "value"))
        .unwrap();
    let context = analyzed.contexts.context_for(&analyzed.parsed.ast, name);

    let value = context.solve_symbol("value").into_option().unwrap();
    assert_eq!(value.kind, ValueKind::Parameter);
    assert_eq!(analyzed.infer(name), Some(int()));

    let class = class_context(&analyzed, "Box");
    let field = class.solve_symbol("value").into_option().unwrap();
    assert_eq!(field.kind, ValueKind::Field);
    assert!(!class.solve_symbol("copy").is_solved());
}

#[test]
fn test_types_resolve_through_imports() {
    let analyzed = Analyzed::new("import java.util.List\nclass Holder { List items }");
    let context = class_context(&analyzed, "Holder");
    let list = context.solve_type("List").unwrap().into_option().unwrap();
    assert_eq!(list.qualified_name, "java.util.List");
    let holder = context.solve_type("Holder").unwrap().into_option().unwrap();
    assert_eq!(holder.qualified_name, "Holder");
    assert!(!context.solve_type("Nowhere").unwrap().is_solved());
    assert!(context.solve_type("").is_err());
}

#[test]
fn test_type_variables_resolve_to_bounds() {
    let analyzed = Analyzed::new("class Sorter<T extends Number> { <U> void sort(T t, U u) {} }");
    let method = analyzed
        .parsed
        .ast
        .find_first(analyzed.unit, |k| matches!(k, NodeKind::MethodDeclaration { .. }))
        .unwrap();
    let context = analyzed.contexts.get(method).unwrap();

    let t = context.solve_generic_type("T").unwrap().into_option().unwrap();
    assert_eq!(t.qualified_name(), Some("java.lang.Number"));
    let u = context.solve_generic_type("U").unwrap().into_option().unwrap();
    assert!(u.is_object());
    assert!(!context.solve_generic_type("V").unwrap().is_solved());
}

#[test]
fn test_closure_has_implicit_it() {
    let analyzed = Analyzed::new("def c = { 1 }");
    let closure = analyzed
        .parsed
        .ast
        .find_first(analyzed.unit, |k| matches!(k, NodeKind::Closure { .. }))
        .unwrap();
    let context = analyzed.contexts.get(closure).unwrap();
    assert!(context.solve_symbol("it").is_solved());
    assert!(context.solve_symbol("c").is_solved());
}
