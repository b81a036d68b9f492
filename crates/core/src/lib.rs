pub mod config;
pub mod error;
pub mod logging;
pub mod tracker;
pub mod util;

pub use config::{ConversionMode, CoreConfig, ParseConfig, ResolverConfig};
pub use error::{GroovyscopeError, Result};
pub use tracker::RelationshipTracker;
