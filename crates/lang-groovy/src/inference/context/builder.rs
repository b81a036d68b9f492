//! Context tree builder.
//!
//! Walks a converted unit once and creates a context for every node that
//! opens a scope.

use super::{BlockScope, ClassScope, ClosureScope, Context, MethodScope, Scope, UnitScope};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::inference::core::{TypeDeclaration, ValueDeclaration, ValueKind};
use crate::inference::solver::{
    CombinedTypeSolver, ImportScope, MemoryTypeSolver, TypeSolver, type_ref_of,
};
use crate::inference::solver::collect::{Collector, collect_with_imports};
use groovyscope_api::models::TypeRef;
use groovyscope_core::{ResolverConfig, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Contexts of one unit, keyed by the node that opens each scope.
#[derive(Debug)]
pub struct ContextTree {
    root: Arc<Context>,
    contexts: HashMap<NodeId, Arc<Context>>,
    declarations: Vec<Arc<TypeDeclaration>>,
}

impl ContextTree {
    pub fn root(&self) -> &Arc<Context> {
        &self.root
    }

    /// Solver chain used by every context: the unit's own types first.
    pub fn solver(&self) -> &dyn TypeSolver {
        self.root.solver()
    }

    /// Declarations derived from the unit's classes.
    pub fn declarations(&self) -> &[Arc<TypeDeclaration>] {
        &self.declarations
    }

    /// Context opened by `node` itself, if any.
    pub fn get(&self, node: NodeId) -> Option<&Arc<Context>> {
        self.contexts.get(&node)
    }

    /// Innermost context enclosing `node`; the root when nothing closer exists.
    pub fn context_for(&self, ast: &Ast, node: NodeId) -> Arc<Context> {
        std::iter::once(node)
            .chain(ast.ancestors(node))
            .find_map(|id| self.contexts.get(&id))
            .unwrap_or(&self.root)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

pub struct ContextBuilder<'a> {
    ast: &'a Ast,
    solver: Arc<dyn TypeSolver>,
    config: ResolverConfig,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(ast: &'a Ast, solver: Arc<dyn TypeSolver>) -> Self {
        Self {
            ast,
            solver,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self, unit: NodeId) -> Result<ContextTree> {
        let imports = ImportScope::from_unit(self.ast, unit, &self.config);
        let declarations = collect_with_imports(self.ast, unit, &imports, self.solver.as_ref())?;
        let unit_types = MemoryTypeSolver::from_declarations(declarations);
        let shared: Vec<Arc<TypeDeclaration>> = unit_types.declarations().cloned().collect();
        let solver: Arc<dyn TypeSolver> = Arc::new(CombinedTypeSolver::with_config(
            vec![Arc::new(unit_types), self.solver.clone()],
            &self.config,
        ));

        let unit_scope = self.unit_scope(unit, &imports, solver.as_ref())?;
        let root = Context::root(unit_scope, solver);

        let mut walker = Walker {
            ast: self.ast,
            imports: &imports,
            declarations: shared
                .iter()
                .map(|d| (d.qualified_name.clone(), d.clone()))
                .collect(),
            contexts: HashMap::new(),
        };
        walker.contexts.insert(unit, root.clone());
        for child in self.ast.kind(unit).children() {
            walker.visit(child, &root)?;
        }
        tracing::debug!(contexts = walker.contexts.len(), "built context tree");

        Ok(ContextTree {
            root,
            contexts: walker.contexts,
            declarations: shared,
        })
    }

    fn unit_scope(&self, unit: NodeId, imports: &ImportScope, solver: &dyn TypeSolver) -> Result<UnitScope> {
        let mut scope = UnitScope {
            imports: imports.clone(),
            ..UnitScope::default()
        };
        let NodeKind::CompilationUnit { members, .. } = self.ast.kind(unit) else {
            return Ok(scope);
        };
        let collector = Collector {
            ast: self.ast,
            imports,
            solver,
        };
        for member in members {
            match self.ast.kind(*member) {
                NodeKind::MethodDeclaration { .. } => {
                    scope.methods.push(collector.method(*member, None, &[])?);
                }
                _ => scope
                    .variables
                    .extend(declared_variables(self.ast, *member, ValueKind::ScriptVariable)),
            }
        }
        Ok(scope)
    }
}

struct Walker<'a> {
    ast: &'a Ast,
    imports: &'a ImportScope,
    declarations: HashMap<String, Arc<TypeDeclaration>>,
    contexts: HashMap<NodeId, Arc<Context>>,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, node: NodeId, current: &Arc<Context>) -> Result<()> {
        let scope = self.scope_of(node, current)?;
        let next = match scope {
            Some(scope) => {
                let context = Context::child(current, scope);
                self.contexts.insert(node, context.clone());
                context
            }
            None => current.clone(),
        };
        for child in self.ast.kind(node).children() {
            self.visit(child, &next)?;
        }
        Ok(())
    }

    fn scope_of(&self, node: NodeId, current: &Arc<Context>) -> Result<Option<Scope>> {
        let ast = self.ast;
        Ok(Some(match ast.kind(node) {
            NodeKind::ClassDeclaration { .. } => {
                let qualified = self.imports.qualified_class_name(ast, node);
                let declaration = match self.declarations.get(&qualified) {
                    Some(declaration) => declaration.clone(),
                    None => {
                        let collector = Collector {
                            ast,
                            imports: self.imports,
                            solver: current.solver(),
                        };
                        Arc::new(collector.declaration(node)?)
                    }
                };
                Scope::Class(ClassScope { declaration })
            }
            NodeKind::MethodDeclaration {
                name,
                type_parameters,
                parameters,
                ..
            }
            | NodeKind::ConstructorDeclaration {
                name,
                type_parameters,
                parameters,
                ..
            } => {
                let collector = Collector {
                    ast,
                    imports: self.imports,
                    solver: current.solver(),
                };
                Scope::Method(MethodScope {
                    name: name.clone(),
                    parameters: parameters
                        .iter()
                        .filter_map(|p| parameter_value(ast, *p))
                        .collect(),
                    type_parameters: collector.type_parameters(type_parameters, &[])?,
                })
            }
            NodeKind::Closure { parameters, .. } => Scope::Closure(ClosureScope::new(
                parameters
                    .iter()
                    .filter_map(|p| parameter_value(ast, *p))
                    .collect(),
            )),
            NodeKind::Block { statements } => Scope::Block(BlockScope {
                variables: statements
                    .iter()
                    .flat_map(|s| declared_variables(ast, *s, ValueKind::LocalVariable))
                    .collect(),
            }),
            NodeKind::For { init, .. } => Scope::Block(BlockScope {
                variables: init
                    .iter()
                    .flat_map(|s| declared_variables(ast, *s, ValueKind::LocalVariable))
                    .collect(),
            }),
            NodeKind::ForEach { variable, .. } => Scope::Block(BlockScope {
                variables: declared_variables(ast, *variable, ValueKind::LocalVariable),
            }),
            NodeKind::CatchClause { parameter, .. } => Scope::Block(BlockScope {
                variables: parameter_value(ast, *parameter).into_iter().collect(),
            }),
            _ => return Ok(None),
        }))
    }
}

fn parameter_value(ast: &Ast, parameter: NodeId) -> Option<ValueDeclaration> {
    let NodeKind::Parameter {
        name,
        param_type,
        is_varargs,
        ..
    } = ast.kind(parameter)
    else {
        return None;
    };
    let mut type_ref = type_ref_of(ast, *param_type);
    if *is_varargs {
        type_ref = TypeRef::array(type_ref);
    }
    Some(ValueDeclaration {
        node: Some(parameter),
        ..ValueDeclaration::new(name.as_str(), ValueKind::Parameter, type_ref)
    })
}

/// Variables declared by a statement or declaration expression, with their
/// declarator nodes.
fn declared_variables(ast: &Ast, node: NodeId, kind: ValueKind) -> Vec<ValueDeclaration> {
    let variables = match ast.kind(node) {
        NodeKind::ExpressionStmt { expression } => match ast.kind(*expression) {
            NodeKind::VariableDeclarationExpr { variables, .. } => variables,
            _ => return Vec::new(),
        },
        NodeKind::VariableDeclarationExpr { variables, .. } => variables,
        _ => return Vec::new(),
    };
    variables
        .iter()
        .filter_map(|declarator| match ast.kind(*declarator) {
            NodeKind::VariableDeclarator { name, var_type, .. } => Some(ValueDeclaration {
                node: Some(*declarator),
                ..ValueDeclaration::new(name.as_str(), kind, type_ref_of(ast, *var_type))
            }),
            _ => None,
        })
        .collect()
}
