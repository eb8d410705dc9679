//! Pure domain types shared by the engine and its collaborators.

pub mod errors;
pub mod model;
pub mod selector;
