//! Groovy type and symbol resolution.
//!
//! # Architecture
//!
//! ```text
//! TypeSolver (trait)       →  qualified name → declaration, chained and cached
//!       │
//!       ▼
//! Context (linked chain)   →  unit → class → method → closure → block
//!       │
//!       ▼
//! InferStrategy (trait)    →  combines via or_else(), typed by lub()
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use groovyscope_groovy::inference::{ContextBuilder, InferContext, default_solver};
//!
//! let contexts = ContextBuilder::new(&ast, default_solver()).build(unit)?;
//! let ctx = InferContext::new(&ast, &contexts);
//! let ty = ctx.infer(expression);
//! ```

pub mod context;
pub mod core;
mod infer_context;
pub mod lub;
pub mod solver;
pub mod strategy;

// Re-export public API
pub use context::{Context, ContextBuilder, ContextTree, Scope};
pub use core::{ResolvedReferenceType, ResolvedType, TypeDeclaration};
pub use infer_context::InferContext;
pub use lub::{lub, lub2, lub_nullable};
pub use solver::{BuiltinTypeSolver, CombinedTypeSolver, MemoryTypeSolver, TypeSolver};
pub use strategy::{InferStrategy, infer_expression};

use std::sync::Arc;

/// The built-in JDK and Groovy declarations behind a cache.
pub fn default_solver() -> Arc<dyn TypeSolver> {
    Arc::new(CombinedTypeSolver::new(vec![Arc::new(BuiltinTypeSolver::new())]))
}
