//! HTTP API: state, router, route handlers, and wire models.

pub mod models;
pub mod routes;
pub mod server;
