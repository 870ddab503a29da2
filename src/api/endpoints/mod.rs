//! REST endpoint handlers.

pub mod health;
pub mod resources;
