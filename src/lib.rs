//! Detailed JSON health reports for axum services, and OpenAPI descriptions of the endpoints
//! serving them.

pub mod config;
/// Wire payloads.
pub mod dto;
/// Library and HTTP error types.
pub mod error;
pub mod health;
pub mod openapi;
/// HTTP routes and application assembly.
pub mod routes;
/// Report formatting, JSON policies and the sample API.
pub mod services;
/// Shared application state.
pub mod state;
