//! API endpoint handlers.

pub mod classify;
pub mod health;
pub mod ml;
