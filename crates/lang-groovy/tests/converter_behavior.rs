//! Conversion modes, positions, comments and cloning.

mod common;

use common::parse;
use groovyscope_api::models::Position;
use groovyscope_core::ParseConfig;
use groovyscope_groovy::ast::{CommentKind, NodeKind};

const BROKEN: &str = "def ok = 1\ndef bad = = 2\ndef after = 3";

/// Parses cleanly, but ranges have no canonical node.
const UNCONVERTIBLE: &str = "def before = 1\ndef r = 1..3\ndef after = 3";

fn has_variable(result: &groovyscope_groovy::ParseResult, name: &str) -> bool {
    let Some(unit) = result.unit else {
        return false;
    };
    result
        .ast
        .find_first(unit, |k| matches!(k, NodeKind::VariableDeclarator { name: n, .. } if n == name))
        .is_some()
}

#[test]
fn test_strict_mode_rejects_syntax_errors() {
    let result = parse(BROKEN, &ParseConfig::strict());
    assert!(result.unit.is_none());
    assert!(!result.problems.is_empty());
    assert!(!result.is_successful());
}

#[test]
fn test_lenient_mode_keeps_the_rest_of_the_unit() {
    let result = parse(BROKEN, &ParseConfig::lenient());
    assert!(result.unit.is_some());
    assert!(result.errors().count() > 0);
    assert!(has_variable(&result, "ok"));
    assert!(has_variable(&result, "after"));
    for problem in &result.problems {
        assert!(problem.position().line >= 1);
    }
}

#[test]
fn test_lenient_conversion_failure_becomes_placeholder() {
    let result = parse(UNCONVERTIBLE, &ParseConfig::lenient());
    let unit = result.unit.expect("lenient conversion keeps the unit");
    let placeholders = result
        .ast
        .walk(unit)
        .into_iter()
        .filter(|id| matches!(result.ast.kind(*id), NodeKind::Empty { .. }))
        .count();
    assert_eq!(placeholders, 1);
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", result.problems);
    assert!(errors[0].message.starts_with("cannot convert"), "{}", errors[0].message);
    assert_eq!(errors[0].position().line, 2);
    assert!(has_variable(&result, "before"));
    assert!(has_variable(&result, "r"));
    assert!(has_variable(&result, "after"));
}

#[test]
fn test_strict_conversion_failure_aborts() {
    let result = parse(UNCONVERTIBLE, &ParseConfig::strict());
    assert!(result.unit.is_none());
    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", result.problems);
    assert!(errors[0].message.starts_with("cannot convert"));
}

#[test]
fn test_positions_are_one_based() {
    let result = parse("class A {\n  int x = 42\n}", &ParseConfig::strict());
    let unit = result.unit.unwrap();
    let literal = result
        .ast
        .find_first(unit, |k| matches!(k, NodeKind::IntegerLiteral { .. }))
        .unwrap();
    let range = result.ast.range(literal).unwrap();
    assert_eq!(range.begin, Position::new(2, 11));
    assert_eq!(range.end, Position::new(2, 12));
}

#[test]
fn test_positions_can_be_turned_off() {
    let config = ParseConfig {
        attribute_positions: false,
        ..ParseConfig::strict()
    };
    let result = parse("def x = 1", &config);
    let unit = result.unit.unwrap();
    assert!(result.ast.walk(unit).iter().all(|id| result.ast.range(*id).is_none()));
}

#[test]
fn test_leading_comment_attaches_to_member() {
    let source = "class A {\n  /** The answer. */\n  int answer() { return 42 }\n  // trailing\n}";
    let result = parse(source, &ParseConfig::strict());
    let unit = result.unit.unwrap();
    let method = result
        .ast
        .find_first(unit, |k| matches!(k, NodeKind::MethodDeclaration { .. }))
        .unwrap();
    let comment = result.ast.node(method).comment.clone().unwrap();
    assert_eq!(comment.kind, CommentKind::Doc);
    assert_eq!(comment.content.trim(), "The answer.");

    let class = result
        .ast
        .find_first(unit, |k| matches!(k, NodeKind::ClassDeclaration { .. }))
        .unwrap();
    let orphans = &result.ast.node(class).orphan_comments;
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].content.trim(), "trailing");
}

#[test]
fn test_comments_can_be_dropped() {
    let config = ParseConfig {
        attribute_comments: false,
        ..ParseConfig::strict()
    };
    let result = parse("// header\nclass A {}", &config);
    let unit = result.unit.unwrap();
    assert!(result.ast.walk(unit).iter().all(|id| {
        let node = result.ast.node(*id);
        node.comment.is_none() && node.orphan_comments.is_empty()
    }));
}

#[test]
fn test_clone_is_equal_but_distinct() {
    let mut result = parse("class A { int f(int a) { return a + 1 } }", &ParseConfig::strict());
    let unit = result.unit.unwrap();
    let class = result
        .ast
        .find_first(unit, |k| matches!(k, NodeKind::ClassDeclaration { .. }))
        .unwrap();

    let copy = result.ast.deep_clone(class);
    assert_ne!(copy, class);
    assert_eq!(result.ast.parent(copy), None);
    assert!(result.ast.structurally_eq(class, copy));

    let originals = result.ast.walk(class);
    let copies = result.ast.walk(copy);
    assert_eq!(originals.len(), copies.len());
    for (original, copied) in originals.iter().zip(&copies) {
        assert_ne!(original, copied);
    }
}
