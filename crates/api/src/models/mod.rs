pub mod problem;
pub mod reference;
pub mod symbol;
pub mod type_ref;

pub use problem::*;
pub use reference::*;
pub use symbol::*;
pub use type_ref::*;
