//! Value models shared by every groovyscope crate.
//!
//! Nothing in here performs analysis; these are the shapes that cross crate
//! boundaries (positions, problems, resolution results, syntactic types).

pub mod models;

pub use models::*;
