//! Modelier: declare models with attributes and relationships, compose immutable queries and
//! persist records through any [`Connection`].
pub use modelier_core::*;
