//! Front-end driver and syntax converter.
//!
//! tree-sitter produces the foreign tree; [`GroovyParser`] converts it into
//! the canonical [`Ast`], collecting syntax and conversion problems on the way.

mod converter;
mod declarations;
mod expressions;
mod literals;
mod statements;
mod types;

pub use converter::ConversionFailure;

use crate::ast::{Ast, NodeId};
use converter::Converter;
use groovyscope_api::models::Problem;
use groovyscope_core::{GroovyscopeError, ParseConfig, Result};
use tree_sitter::{Parser, Tree};
use tree_sitter_groovy as _;

unsafe extern "C" {
    fn tree_sitter_groovy() -> tree_sitter::Language;
}

#[derive(Debug)]
pub struct ParseResult {
    pub ast: Ast,
    /// `None` when a strict conversion was aborted.
    pub unit: Option<NodeId>,
    pub problems: Vec<Problem>,
}

impl ParseResult {
    pub fn is_successful(&self) -> bool {
        self.unit.is_some() && !self.problems.iter().any(Problem::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(|p| p.is_error())
    }
}

#[derive(Clone)]
pub struct GroovyParser {
    language: tree_sitter::Language,
}

impl GroovyParser {
    pub fn new() -> Result<Self> {
        let language = unsafe { tree_sitter_groovy() };
        // Fail early on an ABI mismatch instead of on the first parse.
        Parser::new()
            .set_language(&language)
            .map_err(|e| GroovyscopeError::Parsing(e.to_string()))?;
        Ok(Self { language })
    }

    pub fn parse(&self, source: &str, config: &ParseConfig) -> Result<ParseResult> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| GroovyscopeError::Parsing(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GroovyscopeError::Parsing("front-end produced no tree".to_string()))?;
        Ok(self.convert_from_existing(&tree, source, config))
    }

    /// Converts a tree obtained elsewhere. The tree must have been produced
    /// from `source`.
    pub fn convert_from_existing(&self, tree: &Tree, source: &str, config: &ParseConfig) -> ParseResult {
        let root = tree.root_node();
        let mut converter = Converter::new(source, config);
        converter.collect_syntax_problems(root);

        let unit = if config.is_strict() && !converter.problems.is_empty() {
            tracing::debug!(
                problems = converter.problems.len(),
                "strict parse rejected on syntax errors"
            );
            None
        } else {
            match converter.compilation_unit(root) {
                Ok(unit) => Some(unit),
                Err(failure) => {
                    tracing::warn!("strict conversion aborted: {}", failure);
                    converter
                        .problems
                        .push(Problem::error(failure.to_string(), failure.range));
                    None
                }
            }
        };

        let (ast, problems) = converter.finish();
        tracing::debug!(nodes = ast.len(), problems = problems.len(), "converted compilation unit");
        ParseResult {
            ast,
            unit,
            problems,
        }
    }
}
