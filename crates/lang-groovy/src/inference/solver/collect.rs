//! Declarations derived from parsed source.

use super::{ImportScope, TypeSolver};
use crate::ast::{Ast, ClassKind, NodeId, NodeKind, Primitive};
use crate::inference::core::{
    MemberInfo, MemberKind, ParameterInfo, TypeDeclaration, TypeKind, TypeParameter,
};
use groovyscope_api::models::{SymbolReference, TypeRef};
use groovyscope_core::{GroovyscopeError, ResolverConfig, Result};

/// Syntactic type of a type node. Names are left as written.
pub fn type_ref_of(ast: &Ast, node: NodeId) -> TypeRef {
    match ast.kind(node) {
        NodeKind::ClassType {
            name,
            type_arguments: Some(args),
        } if !args.is_empty() => TypeRef::generic(
            TypeRef::raw(name.as_str()),
            args.iter().map(|arg| type_ref_of(ast, *arg)).collect(),
        ),
        NodeKind::ClassType { name, .. } => TypeRef::raw(name.as_str()),
        NodeKind::PrimitiveType { primitive } => TypeRef::raw(primitive.name()),
        NodeKind::VoidType => TypeRef::raw("void"),
        NodeKind::DynamicType { .. } => TypeRef::raw("def"),
        NodeKind::ArrayType { component } => TypeRef::array(type_ref_of(ast, *component)),
        NodeKind::WildcardType {
            bound,
            is_upper_bound,
        } => TypeRef::Wildcard {
            bound: bound.map(|b| Box::new(type_ref_of(ast, b))),
            is_upper_bound: *is_upper_bound,
        },
        NodeKind::UnionType { elements } => elements
            .first()
            .map(|first| type_ref_of(ast, *first))
            .unwrap_or_default(),
        _ => TypeRef::Unknown,
    }
}

/// Derives declarations for every class, interface, enum and record of
/// `unit`, nested ones included. Supertype and member type names are
/// normalized to qualified ids where the unit's imports (plus the extra
/// default imports of `config`) and `solver` allow.
pub fn collect_type_declarations(
    ast: &Ast,
    unit: NodeId,
    solver: &dyn TypeSolver,
    config: &ResolverConfig,
) -> Result<Vec<TypeDeclaration>> {
    let imports = ImportScope::from_unit(ast, unit, config);
    collect_with_imports(ast, unit, &imports, solver)
}

pub(crate) fn collect_with_imports(
    ast: &Ast,
    unit: NodeId,
    imports: &ImportScope,
    solver: &dyn TypeSolver,
) -> Result<Vec<TypeDeclaration>> {
    let collector = Collector {
        ast,
        imports,
        solver,
    };
    let declarations = ast
        .find_all(unit, |k| matches!(k, NodeKind::ClassDeclaration { .. }))
        .into_iter()
        .map(|class| collector.declaration(class))
        .collect::<Result<Vec<_>>>()?;
    tracing::debug!(count = declarations.len(), "collected type declarations");
    Ok(declarations)
}

pub(crate) struct Collector<'a> {
    pub ast: &'a Ast,
    pub imports: &'a ImportScope,
    pub solver: &'a dyn TypeSolver,
}

impl<'a> Collector<'a> {
    pub fn declaration(&self, class: NodeId) -> Result<TypeDeclaration> {
        let NodeKind::ClassDeclaration {
            class_kind,
            type_parameters,
            extended,
            implemented,
            members,
            ..
        } = self.ast.kind(class)
        else {
            return Ok(TypeDeclaration::new(
                self.imports.qualified_class_name(self.ast, class),
                TypeKind::Class,
            ));
        };

        let qualified_name = self.imports.qualified_class_name(self.ast, class);
        let kind = match class_kind {
            ClassKind::Class | ClassKind::Record => TypeKind::Class,
            ClassKind::Interface => TypeKind::Interface,
            ClassKind::Enum => TypeKind::Enum,
            ClassKind::Annotation => TypeKind::Annotation,
        };

        let mut declaration = TypeDeclaration::new(qualified_name.as_str(), kind);
        declaration.type_parameters = self.type_parameters(type_parameters, &[])?;
        let in_scope: Vec<String> = declaration
            .type_parameters
            .iter()
            .map(|p| p.name.clone())
            .collect();

        let extended = extended
            .iter()
            .map(|t| self.normalize(type_ref_of(self.ast, *t), &in_scope))
            .collect::<Result<Vec<_>>>()?;
        if kind == TypeKind::Interface {
            declaration.interfaces = extended;
        } else {
            declaration.superclass = extended.into_iter().next();
        }
        for t in implemented {
            let interface = self.normalize(type_ref_of(self.ast, *t), &in_scope)?;
            declaration.interfaces.push(interface);
        }

        for member in members {
            self.members(*member, &qualified_name, &in_scope, &mut declaration.members)?;
        }
        Ok(declaration)
    }

    fn members(
        &self,
        member: NodeId,
        declaring_type: &str,
        in_scope: &[String],
        out: &mut Vec<MemberInfo>,
    ) -> Result<()> {
        let declaring = Some(declaring_type.to_string());
        match self.ast.kind(member) {
            NodeKind::FieldDeclaration {
                modifiers,
                variables,
            } => {
                for variable in variables {
                    if let NodeKind::VariableDeclarator { name, var_type, .. } =
                        self.ast.kind(*variable)
                    {
                        out.push(MemberInfo {
                            name: name.clone(),
                            kind: MemberKind::Field,
                            declaring_type: declaring.clone(),
                            type_ref: self.normalize(type_ref_of(self.ast, *var_type), in_scope)?,
                            parameters: Vec::new(),
                            type_parameters: Vec::new(),
                            modifiers: modifiers.clone(),
                        });
                    }
                }
            }
            NodeKind::EnumConstant { name, .. } => out.push(MemberInfo {
                name: name.clone(),
                kind: MemberKind::Field,
                declaring_type: declaring,
                type_ref: TypeRef::id(declaring_type),
                parameters: Vec::new(),
                type_parameters: Vec::new(),
                modifiers: vec!["public".into(), "static".into(), "final".into()],
            }),
            // Record components: a field plus its accessor.
            NodeKind::Parameter {
                name, param_type, ..
            } => {
                let type_ref = self.normalize(type_ref_of(self.ast, *param_type), in_scope)?;
                out.push(MemberInfo {
                    name: name.clone(),
                    kind: MemberKind::Field,
                    declaring_type: declaring.clone(),
                    type_ref: type_ref.clone(),
                    parameters: Vec::new(),
                    type_parameters: Vec::new(),
                    modifiers: vec!["private".into(), "final".into()],
                });
                out.push(MemberInfo {
                    name: name.clone(),
                    kind: MemberKind::Method,
                    declaring_type: declaring,
                    type_ref,
                    parameters: Vec::new(),
                    type_parameters: Vec::new(),
                    modifiers: vec!["public".into()],
                });
            }
            NodeKind::MethodDeclaration { .. } | NodeKind::ConstructorDeclaration { .. } => {
                out.push(self.method(member, declaring, in_scope)?);
            }
            _ => {}
        }
        Ok(())
    }

    /// Method or constructor signature. Constructors return their declaring type.
    pub fn method(
        &self,
        method: NodeId,
        declaring_type: Option<String>,
        in_scope: &[String],
    ) -> Result<MemberInfo> {
        let (name, modifiers, type_parameters, parameters, return_type, kind) =
            match self.ast.kind(method) {
                NodeKind::MethodDeclaration {
                    name,
                    modifiers,
                    type_parameters,
                    parameters,
                    return_type,
                    ..
                } => (
                    name,
                    modifiers,
                    type_parameters,
                    parameters,
                    Some(*return_type),
                    MemberKind::Method,
                ),
                NodeKind::ConstructorDeclaration {
                    name,
                    modifiers,
                    type_parameters,
                    parameters,
                    ..
                } => (
                    name,
                    modifiers,
                    type_parameters,
                    parameters,
                    None,
                    MemberKind::Constructor,
                ),
                other => {
                    return Err(GroovyscopeError::Internal(format!(
                        "not a method: {:?}",
                        other.name()
                    )));
                }
            };

        let type_parameters = self.type_parameters(type_parameters, in_scope)?;
        let mut scope = in_scope.to_vec();
        scope.extend(type_parameters.iter().map(|p| p.name.clone()));

        let type_ref = match (return_type, &declaring_type) {
            (Some(return_type), _) => self.normalize(type_ref_of(self.ast, return_type), &scope)?,
            (None, Some(declaring)) => TypeRef::id(declaring.as_str()),
            (None, None) => TypeRef::Unknown,
        };

        Ok(MemberInfo {
            name: name.clone(),
            kind,
            declaring_type,
            type_ref,
            parameters: self.parameters(parameters, &scope)?,
            type_parameters,
            modifiers: modifiers.clone(),
        })
    }

    pub fn parameters(&self, parameters: &[NodeId], in_scope: &[String]) -> Result<Vec<ParameterInfo>> {
        let mut out = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if let NodeKind::Parameter {
                name,
                param_type,
                is_varargs,
                ..
            } = self.ast.kind(*parameter)
            {
                let mut type_ref = self.normalize(type_ref_of(self.ast, *param_type), in_scope)?;
                if *is_varargs {
                    type_ref = TypeRef::array(type_ref);
                }
                out.push(ParameterInfo {
                    name: name.clone(),
                    type_ref,
                    is_varargs: *is_varargs,
                });
            }
        }
        Ok(out)
    }

    pub fn type_parameters(&self, nodes: &[NodeId], in_scope: &[String]) -> Result<Vec<TypeParameter>> {
        let names: Vec<String> = in_scope
            .iter()
            .cloned()
            .chain(nodes.iter().filter_map(|n| self.ast.name_of(*n).map(str::to_string)))
            .collect();
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            if let NodeKind::TypeParameter { name, bounds } = self.ast.kind(*node) {
                let bounds = bounds
                    .iter()
                    .map(|b| self.normalize(type_ref_of(self.ast, *b), &names))
                    .collect::<Result<Vec<_>>>()?;
                out.push(TypeParameter {
                    name: name.clone(),
                    bounds,
                });
            }
        }
        Ok(out)
    }

    /// Rewrites raw class names to qualified ids. Primitives, `def` and type
    /// variables in scope stay raw, as do names nothing resolves.
    pub fn normalize(&self, type_ref: TypeRef, in_scope: &[String]) -> Result<TypeRef> {
        Ok(match type_ref {
            TypeRef::Raw(name) => {
                if Primitive::from_name(&name).is_some()
                    || matches!(name.as_str(), "void" | "def" | "var")
                    || in_scope.contains(&name)
                {
                    TypeRef::Raw(name)
                } else if let Some(qualified) = self.imports.unit_type(&name) {
                    TypeRef::id(qualified)
                } else {
                    match self.imports.resolve(&name, self.solver)? {
                        SymbolReference::Solved(declaration) => {
                            TypeRef::id(declaration.qualified_name.as_str())
                        }
                        SymbolReference::Unsolved => TypeRef::Raw(name),
                    }
                }
            }
            TypeRef::Generic { base, args } => TypeRef::Generic {
                base: Box::new(self.normalize(*base, in_scope)?),
                args: args
                    .into_iter()
                    .map(|a| self.normalize(a, in_scope))
                    .collect::<Result<Vec<_>>>()?,
            },
            TypeRef::Array {
                element,
                dimensions,
            } => TypeRef::Array {
                element: Box::new(self.normalize(*element, in_scope)?),
                dimensions,
            },
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => TypeRef::Wildcard {
                bound: Some(Box::new(self.normalize(*bound, in_scope)?)),
                is_upper_bound,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::solver::BuiltinTypeSolver;
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    fn collect_with(source: &str, config: &ResolverConfig) -> Vec<TypeDeclaration> {
        let result = GroovyParser::new().unwrap().parse(source, &ParseConfig::default()).unwrap();
        collect_type_declarations(&result.ast, result.unit.unwrap(), &BuiltinTypeSolver::new(), config).unwrap()
    }

    fn collect(source: &str) -> Vec<TypeDeclaration> {
        collect_with(source, &ResolverConfig::default())
    }

    #[test]
    fn test_supertypes_are_normalized() {
        let declarations = collect(
            "package app\nclass Base {}\nclass Names extends Base implements Comparable<Names> {\n  List<String> items\n  int count(String prefix) { return 0 }\n}",
        );
        let names = declarations.iter().find(|d| d.qualified_name == "app.Names").unwrap();
        assert_eq!(names.superclass, Some(TypeRef::id("app.Base")));
        assert_eq!(
            names.interfaces,
            vec![TypeRef::generic(TypeRef::id("java.lang.Comparable"), vec![TypeRef::id("app.Names")])]
        );
        let items = names.field("items").unwrap();
        assert_eq!(
            items.type_ref,
            TypeRef::generic(TypeRef::id("java.util.List"), vec![TypeRef::id("java.lang.String")])
        );
        let count = names.methods_named("count").next().unwrap();
        assert_eq!(count.type_ref, TypeRef::raw("int"));
        assert_eq!(count.parameters[0].type_ref, TypeRef::id("java.lang.String"));
    }

    #[test]
    fn test_type_variables_stay_raw() {
        let declarations = collect("class Box<T extends Number> {\n  T value\n  public <R> R map(T input) { return null }\n}");
        let boxed = &declarations[0];
        assert_eq!(boxed.type_parameters[0].bounds, vec![TypeRef::id("java.lang.Number")]);
        assert_eq!(boxed.field("value").unwrap().type_ref, TypeRef::raw("T"));
        let map = boxed.methods_named("map").next().unwrap();
        assert_eq!(map.type_ref, TypeRef::raw("R"));
    }

    #[test]
    fn test_nested_and_enum_members() {
        let declarations = collect("enum Color {\n  RED,\n  GREEN\n  static class Shade {}\n}");
        let color = declarations.iter().find(|d| d.qualified_name == "Color").unwrap();
        assert_eq!(color.kind, TypeKind::Enum);
        assert_eq!(color.field("RED").unwrap().type_ref, TypeRef::id("Color"));
        assert!(declarations.iter().any(|d| d.qualified_name == "Color.Shade"));
    }

    #[test]
    fn test_extra_default_imports_normalize_names() {
        let source = "class Holder {\n  Function mapper\n}";
        let plain = collect(source);
        assert_eq!(plain[0].field("mapper").unwrap().type_ref, TypeRef::raw("Function"));

        let config = ResolverConfig {
            extra_default_imports: vec!["java.util.function.".to_string()],
            ..ResolverConfig::default()
        };
        let configured = collect_with(source, &config);
        assert_eq!(
            configured[0].field("mapper").unwrap().type_ref,
            TypeRef::id("java.util.function.Function")
        );
    }
}
