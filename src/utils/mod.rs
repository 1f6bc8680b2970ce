//! Project-specific utilities shared by the entity modules.

pub mod openapi;
pub mod serde_trim;
