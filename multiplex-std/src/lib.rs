//! # multiplex-std
//!
//! Standard implementations for the multiplex message dispatch toolkit.
//!
//! This crate provides:
//! - **Dispatch**: [`MessageMux`], a pattern-keyed route table with global middleware
//! - **Heartbeat**: [`wait_ping_send_pong`] and [`send_ping_wait_pong`] liveness loops
//! - **Standard middleware**: Logging, Tracing, Timeout, Recover
//! - **Testing utilities**: recording decorators and counting handlers
//!
//! [`wait_ping_send_pong`]: heartbeat::wait_ping_send_pong
//! [`send_ping_wait_pong`]: heartbeat::send_ping_wait_pong

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use multiplex_core;

// Modules
pub mod heartbeat;
pub mod middleware;
pub mod mux;
pub mod testing;

pub use mux::MessageMux;
