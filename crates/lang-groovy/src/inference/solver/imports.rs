//! Simple-name → qualified-name lookup for one compilation unit.

use super::{TypeSolver, ensure_name};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::inference::core::TypeDeclaration;
use groovyscope_api::models::SymbolReference;
use groovyscope_core::{ResolverConfig, Result};
use std::sync::Arc;

/// Imported into every Groovy file. Entries ending in `.` are packages.
pub const GROOVY_DEFAULT_IMPORTS: &[&str] = &[
    "java.lang.",
    "java.util.",
    "java.io.",
    "java.net.",
    "groovy.lang.",
    "groovy.util.",
    "java.math.BigInteger",
    "java.math.BigDecimal",
];

#[derive(Debug, Clone, Default)]
pub struct ImportScope {
    package: Option<String>,
    /// Qualified names of the types declared in the unit, nested ones included.
    unit_types: Vec<String>,
    single_imports: Vec<String>,
    star_imports: Vec<String>,
    default_imports: Vec<String>,
}

impl ImportScope {
    pub fn from_unit(ast: &Ast, unit: NodeId, config: &ResolverConfig) -> Self {
        let mut scope = Self {
            default_imports: GROOVY_DEFAULT_IMPORTS
                .iter()
                .map(|s| s.to_string())
                .chain(config.extra_default_imports.iter().cloned())
                .collect(),
            ..Self::default()
        };

        let NodeKind::CompilationUnit {
            package, imports, ..
        } = ast.kind(unit)
        else {
            return scope;
        };
        scope.package = package.and_then(|p| ast.name_of(p)).map(str::to_string);

        for import in imports {
            if let NodeKind::ImportDeclaration {
                name,
                is_static: false,
                is_asterisk,
            } = ast.kind(*import)
            {
                if *is_asterisk {
                    scope.star_imports.push(name.clone());
                } else {
                    scope.single_imports.push(name.clone());
                }
            }
        }

        for class in ast.find_all(unit, |k| matches!(k, NodeKind::ClassDeclaration { .. })) {
            let qualified = scope.qualified_class_name(ast, class);
            scope.unit_types.push(qualified);
        }
        scope
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn unit_types(&self) -> &[String] {
        &self.unit_types
    }

    /// Qualified name of a class declaration: package, enclosing classes, name.
    pub fn qualified_class_name(&self, ast: &Ast, class: NodeId) -> String {
        let mut segments: Vec<&str> = std::iter::once(class)
            .chain(ast.ancestors(class))
            .filter(|id| matches!(ast.kind(*id), NodeKind::ClassDeclaration { .. }))
            .filter_map(|id| ast.name_of(id))
            .collect();
        segments.reverse();
        let relative = segments.join(".");
        match &self.package {
            Some(package) => format!("{}.{}", package, relative),
            None => relative,
        }
    }

    /// A type of this unit named `name`, which may be nested (`Outer.Inner`).
    pub fn unit_type(&self, name: &str) -> Option<&str> {
        let suffix = format!(".{}", name);
        self.unit_types
            .iter()
            .find(|qualified| {
                let relative = match &self.package {
                    Some(package) => qualified
                        .strip_prefix(package.as_str())
                        .and_then(|rest| rest.strip_prefix('.'))
                        .unwrap_or(qualified),
                    None => qualified.as_str(),
                };
                relative == name || (!name.contains('.') && qualified.ends_with(&suffix))
            })
            .map(String::as_str)
    }

    /// Candidate qualified names for `name`, in lookup order: unit types,
    /// the name itself when dotted, single imports, same package, star
    /// imports, default imports.
    pub fn candidates(&self, name: &str) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(qualified) = self.unit_type(name) {
            candidates.push(qualified.to_string());
        }
        if name.contains('.') {
            candidates.push(name.to_string());
        }

        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        for import in &self.single_imports {
            if import.rsplit('.').next() == Some(first) {
                candidates.push(match rest {
                    Some(rest) => format!("{}.{}", import, rest),
                    None => import.clone(),
                });
            }
        }

        candidates.push(match &self.package {
            Some(package) => format!("{}.{}", package, name),
            None => name.to_string(),
        });
        for package in &self.star_imports {
            candidates.push(format!("{}.{}", package, name));
        }
        for import in &self.default_imports {
            if import.ends_with('.') {
                candidates.push(format!("{}{}", import, name));
            } else if import.rsplit('.').next() == Some(name) {
                candidates.push(import.clone());
            }
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.clone()));
        candidates
    }

    pub fn resolve(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        ensure_name(name)?;
        for candidate in self.candidates(name) {
            if let SymbolReference::Solved(declaration) = solver.try_to_solve_type(&candidate)? {
                tracing::debug!(name, resolved = %candidate, "type name resolved through imports");
                return Ok(SymbolReference::solved(declaration));
            }
        }
        Ok(SymbolReference::unsolved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::solver::BuiltinTypeSolver;
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    fn scope(source: &str) -> ImportScope {
        let result = GroovyParser::new().unwrap().parse(source, &ParseConfig::default()).unwrap();
        ImportScope::from_unit(&result.ast, result.unit.unwrap(), &ResolverConfig::default())
    }

    #[test]
    fn test_candidate_order() {
        let imports = scope("package app;\nimport com.acme.Widget;\nimport org.tools.*;\nclass Local { class Inner {} }");
        assert_eq!(imports.candidates("Widget")[0], "com.acme.Widget");
        assert_eq!(imports.candidates("Inner")[0], "app.Local.Inner");
        let candidates = imports.candidates("Thing");
        assert_eq!(&candidates[..3], &["app.Thing", "org.tools.Thing", "java.lang.Thing"]);
    }

    #[test]
    fn test_default_imports_resolve_builtins() {
        let imports = scope("def x = 1");
        let solver = BuiltinTypeSolver::new();
        let resolved = imports.resolve("BigDecimal", &solver).unwrap().into_option().unwrap();
        assert_eq!(resolved.qualified_name, "java.math.BigDecimal");
        let list = imports.resolve("ArrayList", &solver).unwrap().into_option().unwrap();
        assert_eq!(list.qualified_name, "java.util.ArrayList");
        assert!(!imports.resolve("Nope", &solver).unwrap().is_solved());
    }
}
