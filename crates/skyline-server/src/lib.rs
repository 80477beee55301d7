//! Shared library surface for the search server and its tests.

pub mod api;
pub mod assistant;
pub mod config;
pub mod router;
pub mod state;
