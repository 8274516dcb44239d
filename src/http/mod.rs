//! HTTP transport for the broker

pub mod server;

pub use server::{router, serve, AppState};
