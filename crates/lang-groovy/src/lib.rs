//! Groovy parsing and resolution engine.
//!
//! Source text goes through the tree-sitter front-end and the syntax
//! converter into a canonical [`ast::Ast`]. [`index::SourceIndex`] answers
//! position queries over it, and [`inference`] resolves types and symbols.

pub mod ast;
pub mod index;
pub mod inference;
pub mod parser;

pub use index::SourceIndex;
pub use parser::{GroovyParser, ParseResult};
