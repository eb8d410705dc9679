//! Application layer: the drag-sort engine and the services around it.

pub mod dom;
pub mod emitter;
pub mod engine;
pub mod handle;
pub mod registry;
pub mod replay;
pub mod session;
