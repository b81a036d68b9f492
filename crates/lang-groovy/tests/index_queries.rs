//! Point queries over an indexed source file.

use groovyscope_api::models::Position;
use groovyscope_core::ParseConfig;
use groovyscope_groovy::ast::NodeKind;
use groovyscope_groovy::{GroovyParser, SourceIndex};
use url::Url;

const SOURCE: &str = "class R { void run() {\n  int a\n  int b\n  int c\n  int d = 7\n  int e\n  int f\n  int g\n  int h\n} }";

fn index() -> SourceIndex {
    let parser = GroovyParser::new().unwrap();
    let uri = Url::parse("file:///project/run.groovy").unwrap();
    SourceIndex::build(&parser, SOURCE, uri, &ParseConfig::strict()).unwrap()
}

#[test]
fn test_constant_inside_block_is_innermost() {
    let index = index();
    let node = index.node_at(Position::new(5, 11)).unwrap();
    assert!(matches!(
        index.ast().kind(node),
        NodeKind::IntegerLiteral { value } if value == "7"
    ));

    let block = index
        .ast()
        .find_first(index.parse_result().unit.unwrap(), |k| matches!(k, NodeKind::Block { .. }))
        .unwrap();
    let range = index.ast().range(block).unwrap();
    assert_eq!(range.begin.line, 1);
    assert_eq!(range.end.line, 10);
    assert!(index.contains(block, node));
    assert!(!index.contains(node, block));
}

#[test]
fn test_parent_and_children_follow_the_tree() {
    let index = index();
    let literal = index.node_at(Position::new(5, 11)).unwrap();
    let declarator = index.parent_of(literal).unwrap();
    assert!(matches!(index.ast().kind(declarator), NodeKind::VariableDeclarator { name, .. } if name == "d"));
    assert!(index.children_of(declarator).contains(&literal));
}

#[test]
fn test_position_outside_source_is_none() {
    let index = index();
    assert!(index.node_at(Position::new(42, 1)).is_none());
}
