//! hostwatch dashboard library entry.
//!
//! Wires the auth flow, session guard, and metrics component into an axum
//! router. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod router;
pub mod session;
pub mod web;
