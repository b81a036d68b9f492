//! Combined solver ordering and caching.

use groovyscope_api::models::SymbolReference;
use groovyscope_core::{GroovyscopeError, Result};
use groovyscope_groovy::inference::core::{TypeDeclaration, TypeKind};
use groovyscope_groovy::inference::{CombinedTypeSolver, MemoryTypeSolver, TypeSolver};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a solver and counts how often it is asked.
struct CountingSolver {
    inner: MemoryTypeSolver,
    calls: Arc<AtomicUsize>,
}

impl CountingSolver {
    fn new(names: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = MemoryTypeSolver::from_declarations(
            names
                .iter()
                .map(|name| TypeDeclaration::new(*name, TypeKind::Class)),
        );
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl TypeSolver for CountingSolver {
    fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.try_to_solve_type(name)
    }
}

#[test]
fn test_second_lookup_is_served_from_cache() {
    let (first, first_calls) = CountingSolver::new(&["app.Foo"]);
    let (second, second_calls) = CountingSolver::new(&["app.Foo", "app.Bar"]);
    let combined = CombinedTypeSolver::new(vec![Arc::new(first), Arc::new(second)]);

    let found = combined.try_to_solve_type("app.Foo").unwrap().into_option().unwrap();
    assert_eq!(found.qualified_name, "app.Foo");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);

    let again = combined.try_to_solve_type("app.Foo").unwrap().into_option().unwrap();
    assert!(Arc::ptr_eq(&found, &again));
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_later_child_answers_when_earlier_misses() {
    let (first, _) = CountingSolver::new(&["app.Foo"]);
    let (second, second_calls) = CountingSolver::new(&["app.Bar"]);
    let combined = CombinedTypeSolver::new(vec![Arc::new(first), Arc::new(second)]);

    assert!(combined.try_to_solve_type("app.Bar").unwrap().is_solved());
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert!(!combined.try_to_solve_type("app.Missing").unwrap().is_solved());
    assert_eq!(combined.cache_len(), 2);
}

#[test]
fn test_empty_name_is_rejected() {
    let combined = CombinedTypeSolver::default();
    assert!(matches!(
        combined.try_to_solve_type(""),
        Err(GroovyscopeError::EmptyTypeName)
    ));
}
