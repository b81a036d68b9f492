//! Resolution contexts.
//!
//! A [`Context`] is one lexical scope plus a link to the enclosing one. Every
//! query answers from its own scope first and otherwise asks the parent;
//! the compilation unit at the root falls back to imports and the solver.

mod builder;

pub use builder::{ContextBuilder, ContextTree};

use crate::ast::Primitive;
use crate::inference::core::{
    MemberInfo, OBJECT, ResolvedType, TypeDeclaration, TypeParameter, ValueDeclaration, ValueKind,
    WildcardBound,
};
use crate::inference::solver::{ImportScope, TypeSolver, ensure_name, object_type};
use groovyscope_api::models::{SymbolReference, TypeRef};
use groovyscope_core::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct UnitScope {
    pub imports: ImportScope,
    /// Script-level variables.
    pub variables: Vec<ValueDeclaration>,
    /// Script-level methods.
    pub methods: Vec<MemberInfo>,
}

#[derive(Debug, Clone)]
pub struct ClassScope {
    pub declaration: Arc<TypeDeclaration>,
}

#[derive(Debug, Clone, Default)]
pub struct MethodScope {
    pub name: String,
    pub parameters: Vec<ValueDeclaration>,
    pub type_parameters: Vec<TypeParameter>,
}

#[derive(Debug, Clone)]
pub struct ClosureScope {
    pub parameters: Vec<ValueDeclaration>,
}

impl ClosureScope {
    /// A closure without declared parameters gets the implicit `it`.
    pub fn new(mut parameters: Vec<ValueDeclaration>) -> Self {
        if parameters.is_empty() {
            parameters.push(ValueDeclaration::new("it", ValueKind::Parameter, TypeRef::id(OBJECT)));
        }
        Self { parameters }
    }
}

/// Variables declared directly in a block, a `for` header or a catch clause.
#[derive(Debug, Clone, Default)]
pub struct BlockScope {
    pub variables: Vec<ValueDeclaration>,
}

#[derive(Debug, Clone)]
pub enum Scope {
    CompilationUnit(UnitScope),
    Class(ClassScope),
    Method(MethodScope),
    Closure(ClosureScope),
    Block(BlockScope),
}

pub struct Context {
    scope: Scope,
    parent: Option<Arc<Context>>,
    solver: Arc<dyn TypeSolver>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("scope", &self.scope)
            .field("depth", &self.depth())
            .finish()
    }
}

impl Context {
    pub fn root(unit: UnitScope, solver: Arc<dyn TypeSolver>) -> Arc<Self> {
        Arc::new(Self {
            scope: Scope::CompilationUnit(unit),
            parent: None,
            solver,
        })
    }

    pub fn child(parent: &Arc<Context>, scope: Scope) -> Arc<Self> {
        Arc::new(Self {
            scope,
            parent: Some(parent.clone()),
            solver: parent.solver.clone(),
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn parent(&self) -> Option<&Arc<Context>> {
        self.parent.as_ref()
    }

    pub fn solver(&self) -> &dyn TypeSolver {
        self.solver.as_ref()
    }

    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent.as_deref(), |c| c.parent.as_deref()).count()
    }

    /// Nearest enclosing class declaration, this context included.
    pub fn enclosing_class(&self) -> Option<&Arc<TypeDeclaration>> {
        std::iter::successors(Some(self), |c| c.parent.as_deref()).find_map(|c| match &c.scope {
            Scope::Class(class) => Some(&class.declaration),
            _ => None,
        })
    }

    pub fn solve_symbol(&self, name: &str) -> SymbolReference<ValueDeclaration> {
        let local = match &self.scope {
            Scope::CompilationUnit(unit) => find_value(&unit.variables, name),
            Scope::Class(class) => class.declaration.field(name).map(|field| ValueDeclaration {
                name: field.name.clone(),
                kind: ValueKind::Field,
                type_ref: field.type_ref.clone(),
                declaring_type: Some(class.declaration.qualified_name.clone()),
                node: None,
            }),
            Scope::Method(method) => find_value(&method.parameters, name),
            Scope::Closure(closure) => find_value(&closure.parameters, name),
            Scope::Block(block) => find_value(&block.variables, name),
        };
        SymbolReference::from(local).or_else(|| match &self.parent {
            Some(parent) => parent.solve_symbol(name),
            None => SymbolReference::unsolved(),
        })
    }

    /// Class-level scopes do not look at nested types; lookups go straight
    /// to the enclosing unit.
    pub fn solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        ensure_name(name)?;
        match (&self.scope, &self.parent) {
            (Scope::CompilationUnit(unit), _) => unit.imports.resolve(name, self.solver()),
            (_, Some(parent)) => parent.solve_type(name),
            (_, None) => self.solver.try_to_solve_type(name),
        }
    }

    /// Type variable lookup. Yields the erasure of the first bound, or
    /// `java.lang.Object` for an unbounded variable.
    pub fn solve_generic_type(&self, name: &str) -> Result<SymbolReference<ResolvedType>> {
        let parameters: &[TypeParameter] = match &self.scope {
            Scope::Class(class) => &class.declaration.type_parameters,
            Scope::Method(method) => &method.type_parameters,
            _ => &[],
        };
        if let Some(parameter) = parameters.iter().find(|p| p.name == name) {
            let bound = match parameter.bounds.first().and_then(TypeRef::base_name) {
                Some(base) if base != name => self.solve_type(base)?.map(ResolvedType::reference),
                _ => SymbolReference::unsolved(),
            };
            return Ok(SymbolReference::solved(
                bound.into_option().unwrap_or_else(|| object_type(self.solver())),
            ));
        }
        match &self.parent {
            Some(parent) => parent.solve_generic_type(name),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    /// First method named `name` whose parameters accept `arguments`.
    ///
    /// A class checks its own methods, then those declared by its direct
    /// superclass, then asks the enclosing context.
    pub fn solve_method(&self, name: &str, arguments: &[ResolvedType]) -> Result<SymbolReference<MemberInfo>> {
        match &self.scope {
            Scope::CompilationUnit(unit) => {
                if let Some(method) = self.first_applicable(unit.methods.iter().filter(|m| m.name == name), arguments)? {
                    return Ok(SymbolReference::solved(method));
                }
            }
            Scope::Class(class) => {
                if let Some(method) = self.first_applicable(class.declaration.methods_named(name), arguments)? {
                    return Ok(SymbolReference::solved(method));
                }
                if let Some(method) = self.solve_in_superclass(&class.declaration, name, arguments)? {
                    return Ok(SymbolReference::solved(method));
                }
            }
            _ => {}
        }
        match &self.parent {
            Some(parent) => parent.solve_method(name, arguments),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    fn first_applicable<'m>(
        &self,
        candidates: impl Iterator<Item = &'m MemberInfo>,
        arguments: &[ResolvedType],
    ) -> Result<Option<MemberInfo>> {
        for candidate in candidates {
            if self.is_applicable(candidate, arguments)? {
                return Ok(Some(candidate.clone()));
            }
        }
        Ok(None)
    }

    fn solve_in_superclass(
        &self,
        declaration: &TypeDeclaration,
        name: &str,
        arguments: &[ResolvedType],
    ) -> Result<Option<MemberInfo>> {
        let Some(superclass) = &declaration.superclass else {
            return Ok(None);
        };
        let SymbolReference::Solved(ResolvedType::Reference(parent)) = self.resolve_type_ref(superclass)? else {
            return Ok(None);
        };
        let found = self.first_applicable(parent.declaration.methods_named(name), arguments)?;
        if found.is_some() {
            tracing::debug!(name, superclass = %parent.qualified_name(), "method found in superclass");
        }
        Ok(found)
    }

    /// Parameter count must equal argument count and every argument must
    /// be assignable to its parameter. A parameter whose type cannot be
    /// resolved accepts nothing. A varargs parameter is matched as its array
    /// type; calls spreading arguments over it are not resolved.
    fn is_applicable(&self, method: &MemberInfo, arguments: &[ResolvedType]) -> Result<bool> {
        if method.parameters.len() != arguments.len() {
            return Ok(false);
        }
        for (parameter, argument) in method.parameters.iter().zip(arguments) {
            let Some(expected) = self.resolve_type_ref(&method.parameter_type(parameter))?.into_option() else {
                tracing::debug!(parameter = %parameter.name, "parameter type unresolved");
                return Ok(false);
            };
            if !expected.is_assignable_by(argument, self.solver()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Turns a syntactic type into a resolved one through this chain.
    pub fn resolve_type_ref(&self, type_ref: &TypeRef) -> Result<SymbolReference<ResolvedType>> {
        Ok(match type_ref {
            TypeRef::Raw(name) => {
                if let Some(primitive) = Primitive::from_name(name) {
                    return Ok(SymbolReference::solved(ResolvedType::Primitive(primitive)));
                }
                match name.as_str() {
                    "void" => SymbolReference::solved(ResolvedType::Void),
                    "def" | "var" => SymbolReference::solved(object_type(self.solver())),
                    _ => match self.solve_generic_type(name)? {
                        SymbolReference::Solved(ty) => SymbolReference::solved(ty),
                        SymbolReference::Unsolved => self.solve_type(name)?.map(ResolvedType::reference),
                    },
                }
            }
            TypeRef::Id(name) => self
                .solver
                .try_to_solve_type(name)?
                .map(ResolvedType::reference),
            TypeRef::Generic { base, args } => match self.resolve_type_ref(base)? {
                SymbolReference::Solved(ResolvedType::Reference(mut reference)) => {
                    let mut type_arguments = Vec::with_capacity(args.len());
                    for arg in args {
                        type_arguments.push(
                            self.resolve_type_ref(arg)?
                                .into_option()
                                .unwrap_or_else(|| object_type(self.solver())),
                        );
                    }
                    reference.type_arguments = type_arguments;
                    SymbolReference::solved(ResolvedType::Reference(reference))
                }
                _ => SymbolReference::unsolved(),
            },
            TypeRef::Array {
                element,
                dimensions,
            } => self.resolve_type_ref(element)?.map(|element| {
                (0..*dimensions).fold(element, |ty, _| ResolvedType::array_of(ty))
            }),
            TypeRef::Wildcard {
                bound: None, ..
            } => SymbolReference::solved(ResolvedType::Wildcard(WildcardBound::Unbounded)),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => self.resolve_type_ref(bound)?.map(|bound| {
                let bound = Box::new(bound);
                ResolvedType::Wildcard(if *is_upper_bound {
                    WildcardBound::Extends(bound)
                } else {
                    WildcardBound::Super(bound)
                })
            }),
            TypeRef::Unknown => SymbolReference::unsolved(),
        })
    }
}

fn find_value(values: &[ValueDeclaration], name: &str) -> Option<ValueDeclaration> {
    values.iter().find(|v| v.name == name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::core::{MemberKind, ParameterInfo, TypeKind};
    use crate::inference::solver::BuiltinTypeSolver;

    fn root() -> Arc<Context> {
        Context::root(UnitScope::default(), Arc::new(BuiltinTypeSolver::new()))
    }

    fn method(name: &str, params: &[(&str, TypeRef, bool)]) -> MemberInfo {
        MemberInfo {
            name: name.into(),
            kind: MemberKind::Method,
            declaring_type: Some("Foo".into()),
            type_ref: TypeRef::raw("void"),
            parameters: params
                .iter()
                .map(|(n, t, varargs)| ParameterInfo {
                    name: (*n).into(),
                    type_ref: t.clone(),
                    is_varargs: *varargs,
                })
                .collect(),
            type_parameters: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn test_closure_gets_implicit_it() {
        let closure = Context::child(&root(), Scope::Closure(ClosureScope::new(Vec::new())));
        let it = closure.solve_symbol("it").into_option().unwrap();
        assert_eq!(it.type_ref, TypeRef::id(OBJECT));
        assert!(!closure.solve_symbol("other").is_solved());
    }

    #[test]
    fn test_arity_must_match_exactly() {
        let mut foo = TypeDeclaration::new("Foo", TypeKind::Class);
        foo.members.push(method(
            "foo",
            &[
                ("a", TypeRef::raw("int"), false),
                ("rest", TypeRef::array(TypeRef::raw("int")), true),
            ],
        ));
        let class = Context::child(&root(), Scope::Class(ClassScope { declaration: Arc::new(foo) }));
        let int = ResolvedType::Primitive(Primitive::Int);
        let ints = ResolvedType::array_of(int.clone());

        assert!(!class.solve_method("foo", &[int.clone()]).unwrap().is_solved());
        assert!(!class.solve_method("foo", &[int.clone(), int.clone(), int.clone()]).unwrap().is_solved());
        assert!(class.solve_method("foo", &[int.clone(), ints]).unwrap().is_solved());
    }

    #[test]
    fn test_unresolved_parameter_type_is_not_applicable() {
        let mut foo = TypeDeclaration::new("Foo", TypeKind::Class);
        foo.members.push(method("take", &[("w", TypeRef::id("com.acme.Missing"), false)]));
        let class = Context::child(&root(), Scope::Class(ClassScope { declaration: Arc::new(foo) }));
        let string = class.solver().solve_reference("java.lang.String").unwrap().into_option().unwrap();

        assert!(!class.solve_method("take", &[string]).unwrap().is_solved());
    }

    #[test]
    fn test_type_variable_bound() {
        let mut method_scope = MethodScope::default();
        method_scope.type_parameters.push(TypeParameter {
            name: "N".into(),
            bounds: vec![TypeRef::id("java.lang.Number")],
        });
        method_scope.type_parameters.push(TypeParameter::new("T"));
        let ctx = Context::child(&root(), Scope::Method(method_scope));

        let n = ctx.resolve_type_ref(&TypeRef::raw("N")).unwrap().into_option().unwrap();
        assert_eq!(n.qualified_name(), Some("java.lang.Number"));
        let t = ctx.resolve_type_ref(&TypeRef::raw("T")).unwrap().into_option().unwrap();
        assert!(t.is_object());
    }

    #[test]
    fn test_empty_type_name_is_an_error() {
        assert!(root().solve_type("").is_err());
    }
}
