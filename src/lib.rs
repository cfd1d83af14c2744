//! Library crate for duck-arcade-back, exposing modules for binaries and integration tests.

/// Runtime configuration loaded at startup.
pub mod config;
/// Storage access: key-value backends and typed repositories.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routing.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
