//! Position index over a converted unit.

use crate::ast::{Ast, NodeId, NodeRef};
use crate::parser::{GroovyParser, ParseResult};
use groovyscope_api::models::Position;
use groovyscope_core::util::utf16_col_to_byte_col;
use groovyscope_core::{ParseConfig, RelationshipTracker, Result};
use url::Url;

pub type NodeTracker = RelationshipTracker<NodeRef>;

enum Visit {
    Enter(NodeId),
    Exit,
}

/// Walks the subtree at `root` once, pushing and popping every node.
/// Nodes without a range are walked but not recorded.
pub fn track_unit(ast: &Ast, root: NodeId, uri: &Url, tracker: &mut NodeTracker) {
    let mut stack = vec![Visit::Enter(root)];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                tracker.push_node(ast.node_ref(id), ast.range(id), uri);
                stack.push(Visit::Exit);
                for child in ast.child_nodes(id).into_iter().rev() {
                    stack.push(Visit::Enter(child));
                }
            }
            Visit::Exit => {
                tracker.pop_node();
            }
        }
    }
}

/// A parsed file together with its tracker.
pub struct SourceIndex {
    uri: Url,
    source: String,
    parsed: ParseResult,
    tracker: NodeTracker,
}

impl SourceIndex {
    pub fn build(parser: &GroovyParser, source: &str, uri: Url, config: &ParseConfig) -> Result<Self> {
        let parsed = parser.parse(source, config)?;
        Ok(Self::from_parse(parsed, source, uri))
    }

    pub fn from_parse(parsed: ParseResult, source: &str, uri: Url) -> Self {
        let mut tracker = NodeTracker::new();
        if let Some(unit) = parsed.unit {
            track_unit(&parsed.ast, unit, &uri, &mut tracker);
        }
        tracing::debug!(uri = %uri, tracked = tracker.len(), "indexed source");
        Self {
            uri,
            source: source.to_string(),
            parsed,
            tracker,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn ast(&self) -> &Ast {
        &self.parsed.ast
    }

    pub fn parse_result(&self) -> &ParseResult {
        &self.parsed
    }

    pub fn tracker(&self) -> &NodeTracker {
        &self.tracker
    }

    /// Most specific node at a 1-based line and byte column.
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.tracker
            .get_node_at(&self.uri, position)
            .map(|node_ref| node_ref.node)
    }

    /// Same as [`Self::node_at`] for a 0-based line and UTF-16 column, as editors send them.
    pub fn node_at_editor_position(&self, line: usize, utf16_col: usize) -> Option<NodeId> {
        let byte_col = utf16_col_to_byte_col(&self.source, line, utf16_col);
        self.node_at(Position::new(line as u32 + 1, byte_col as u32 + 1))
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.tracker
            .get_parent(self.parsed.ast.node_ref(id))
            .map(|node_ref| node_ref.node)
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.tracker
            .get_children(self.parsed.ast.node_ref(id))
            .into_iter()
            .map(|node_ref| node_ref.node)
            .collect()
    }

    pub fn contains(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let ast = &self.parsed.ast;
        self.tracker
            .contains(ast.node_ref(ancestor), ast.node_ref(descendant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn test_editor_position_accounts_for_multibyte_text() {
        let parser = GroovyParser::new().unwrap();
        let uri = Url::parse("file:///tmp/Unicode.groovy").unwrap();
        let index = SourceIndex::build(&parser, "def s = 'é'; def n = 42;", uri, &ParseConfig::default())
            .unwrap();

        // "42" starts at UTF-16 column 21, byte column 22.
        let node = index.node_at_editor_position(0, 21).unwrap();
        assert!(matches!(
            index.ast().kind(node),
            NodeKind::IntegerLiteral { value } if value == "42"
        ));
    }
}
