//! Type solvers: name → declaration lookups, chained and cached.

mod builtin;
pub(crate) mod collect;
mod combined;
mod imports;
mod memory;

pub use builtin::BuiltinTypeSolver;
pub use collect::{collect_type_declarations, type_ref_of};
pub use combined::CombinedTypeSolver;
pub use imports::{GROOVY_DEFAULT_IMPORTS, ImportScope};
pub use memory::MemoryTypeSolver;

use crate::inference::core::{OBJECT, ResolvedType, TypeDeclaration, TypeKind};
use groovyscope_api::models::SymbolReference;
use groovyscope_core::{GroovyscopeError, Result};
use std::sync::Arc;

/// Resolves qualified type names to declarations.
///
/// Unknown names are `Unsolved`; an empty name is a caller error.
pub trait TypeSolver: Send + Sync {
    fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>>;

    /// Label used in logs.
    fn name(&self) -> &str {
        "solver"
    }

    /// Same as [`Self::try_to_solve_type`], wrapped as a raw reference type.
    fn solve_reference(&self, name: &str) -> Result<SymbolReference<ResolvedType>> {
        Ok(self.try_to_solve_type(name)?.map(ResolvedType::reference))
    }
}

pub(crate) fn ensure_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GroovyscopeError::EmptyTypeName);
    }
    Ok(())
}

/// `java.lang.Object` from `solver`, or a bare stand-in when the solver
/// does not know it.
pub fn object_type(solver: &dyn TypeSolver) -> ResolvedType {
    match solver.try_to_solve_type(OBJECT) {
        Ok(SymbolReference::Solved(declaration)) => ResolvedType::reference(declaration),
        _ => {
            tracing::debug!("{} unknown to {}, using a bare declaration", OBJECT, solver.name());
            ResolvedType::reference(Arc::new(TypeDeclaration::new(OBJECT, TypeKind::Class)))
        }
    }
}

/// A reference type by qualified name, falling back to `java.lang.Object`.
pub fn reference_or_object(solver: &dyn TypeSolver, name: &str) -> ResolvedType {
    match solver.solve_reference(name) {
        Ok(SymbolReference::Solved(ty)) => ty,
        _ => object_type(solver),
    }
}
