//! HTTP server wiring: routes, request/response shells, error mapping,
//! and shared state. The binary in `main.rs` composes this with loaded
//! settings and real provider clients.

pub mod error;
pub mod routes;
pub mod schemas;
pub mod state;
