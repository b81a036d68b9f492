use super::{TypeSolver, ensure_name};
use crate::inference::core::TypeDeclaration;
use dashmap::DashMap;
use groovyscope_api::models::SymbolReference;
use groovyscope_core::{ResolverConfig, Result};
use std::sync::Arc;

/// Ordered chain of solvers with a shared result cache.
///
/// The first child that solves a name wins. Misses are cached too unless
/// [`ResolverConfig::cache_unsolved`] is off. A child that fails is logged
/// and treated as a miss.
pub struct CombinedTypeSolver {
    children: Vec<Arc<dyn TypeSolver>>,
    cache: DashMap<String, SymbolReference<Arc<TypeDeclaration>>>,
    cache_unsolved: bool,
}

impl Default for CombinedTypeSolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CombinedTypeSolver {
    pub fn new(children: Vec<Arc<dyn TypeSolver>>) -> Self {
        Self {
            children,
            cache: DashMap::new(),
            cache_unsolved: true,
        }
    }

    pub fn with_config(children: Vec<Arc<dyn TypeSolver>>, config: &ResolverConfig) -> Self {
        Self {
            cache_unsolved: config.cache_unsolved,
            ..Self::new(children)
        }
    }

    /// Appends a child. Cached results may be stale afterwards, so the cache
    /// is dropped unless the caller knows better.
    pub fn add(&mut self, solver: Arc<dyn TypeSolver>, reset_cache: bool) {
        tracing::debug!(child = solver.name(), reset_cache, "adding solver to chain");
        self.children.push(solver);
        if reset_cache {
            self.cache.clear();
        }
    }

    pub fn children(&self) -> &[Arc<dyn TypeSolver>] {
        &self.children
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn solve_uncached(&self, name: &str) -> SymbolReference<Arc<TypeDeclaration>> {
        for child in &self.children {
            match child.try_to_solve_type(name) {
                Ok(SymbolReference::Solved(declaration)) => {
                    tracing::debug!(name, child = child.name(), "type solved");
                    return SymbolReference::solved(declaration);
                }
                Ok(SymbolReference::Unsolved) => {}
                Err(e) => {
                    tracing::warn!("Solver '{}' failed on '{}': {}", child.name(), name, e);
                }
            }
        }
        SymbolReference::unsolved()
    }
}

impl TypeSolver for CombinedTypeSolver {
    fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        ensure_name(name)?;
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.value().clone());
        }

        let result = self.solve_uncached(name);
        if result.is_solved() || self.cache_unsolved {
            self.cache.insert(name.to_string(), result.clone());
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "combined"
    }
}
