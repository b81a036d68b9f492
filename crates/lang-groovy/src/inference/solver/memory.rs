use super::{TypeSolver, ensure_name};
use crate::inference::core::TypeDeclaration;
use groovyscope_api::models::SymbolReference;
use groovyscope_core::Result;
use indexmap::IndexMap;
use std::sync::Arc;

/// Declarations registered up front, e.g. the classes of the files being
/// analysed. Answers qualified names, and simple names when unambiguous.
#[derive(Debug, Default, Clone)]
pub struct MemoryTypeSolver {
    declarations: IndexMap<String, Arc<TypeDeclaration>>,
}

impl MemoryTypeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_declarations(declarations: impl IntoIterator<Item = TypeDeclaration>) -> Self {
        let mut solver = Self::new();
        for declaration in declarations {
            solver.register(declaration);
        }
        solver
    }

    /// Registers a declaration, replacing any previous one with the same name.
    pub fn register(&mut self, declaration: TypeDeclaration) {
        self.declarations
            .insert(declaration.qualified_name.clone(), Arc::new(declaration));
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Arc<TypeDeclaration>> {
        self.declarations.values()
    }
}

impl TypeSolver for MemoryTypeSolver {
    fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        ensure_name(name)?;
        if let Some(declaration) = self.declarations.get(name) {
            return Ok(SymbolReference::solved(declaration.clone()));
        }
        if name.contains('.') {
            return Ok(SymbolReference::unsolved());
        }

        let mut matches = self
            .declarations
            .values()
            .filter(|d| d.simple_name() == name);
        match (matches.next(), matches.next()) {
            (Some(declaration), None) => Ok(SymbolReference::solved(declaration.clone())),
            _ => Ok(SymbolReference::unsolved()),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::core::TypeKind;
    use groovyscope_core::GroovyscopeError;

    #[test]
    fn test_qualified_and_unique_simple_names() {
        let solver = MemoryTypeSolver::from_declarations([
            TypeDeclaration::new("com.acme.Widget", TypeKind::Class),
            TypeDeclaration::new("com.acme.Item", TypeKind::Class),
            TypeDeclaration::new("org.other.Item", TypeKind::Class),
        ]);
        assert!(solver.try_to_solve_type("com.acme.Widget").unwrap().is_solved());
        assert!(solver.try_to_solve_type("Widget").unwrap().is_solved());
        assert!(!solver.try_to_solve_type("Item").unwrap().is_solved());
        assert!(!solver.try_to_solve_type("com.acme.Missing").unwrap().is_solved());
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let solver = MemoryTypeSolver::new();
        assert!(matches!(
            solver.try_to_solve_type(""),
            Err(GroovyscopeError::EmptyTypeName)
        ));
    }
}
