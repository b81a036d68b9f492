use groovyscope_core::ParseConfig;
use groovyscope_groovy::ast::{NodeId, NodeKind};
use groovyscope_groovy::inference::{ContextBuilder, ContextTree, InferContext, ResolvedType, default_solver};
use groovyscope_groovy::{GroovyParser, ParseResult};

#[allow(dead_code)]
pub fn parse(source: &str, config: &ParseConfig) -> ParseResult {
    GroovyParser::new()
        .expect("grammar loads")
        .parse(source, config)
        .expect("front-end produces a tree")
}

/// A strictly parsed unit with its resolution contexts.
#[allow(dead_code)]
pub struct Analyzed {
    pub parsed: ParseResult,
    pub unit: NodeId,
    pub contexts: ContextTree,
}

#[allow(dead_code)]
impl Analyzed {
    pub fn new(source: &str) -> Self {
        let parsed = parse(source, &ParseConfig::strict());
        assert!(parsed.problems.is_empty(), "{:?}", parsed.problems);
        let unit = parsed.unit.expect("unit converted");
        let contexts = ContextBuilder::new(&parsed.ast, default_solver())
            .build(unit)
            .expect("contexts build");
        Self {
            parsed,
            unit,
            contexts,
        }
    }

    pub fn infer(&self, node: NodeId) -> Option<ResolvedType> {
        InferContext::new(&self.parsed.ast, &self.contexts).infer(node)
    }

    /// The declarator of the first variable named `name`.
    pub fn declarator(&self, name: &str) -> NodeId {
        self.parsed
            .ast
            .find_first(self.unit, |k| matches!(k, NodeKind::VariableDeclarator { name: n, .. } if n == name))
            .unwrap_or_else(|| panic!("no variable named {}", name))
    }

    /// Type of the initializer of variable `name`, as its qualified name.
    pub fn initializer_type(&self, name: &str) -> String {
        let NodeKind::VariableDeclarator {
            initializer: Some(initializer),
            ..
        } = self.parsed.ast.kind(self.declarator(name))
        else {
            panic!("{} has no initializer", name);
        };
        self.infer(*initializer)
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    /// Type of the first node matching `predicate`.
    pub fn type_of(&self, predicate: impl Fn(&NodeKind) -> bool) -> Option<ResolvedType> {
        let node = self.parsed.ast.find_first(self.unit, predicate)?;
        self.infer(node)
    }
}
