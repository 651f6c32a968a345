//! # multiplex-core
//!
//! Core traits for the multiplex message dispatch toolkit.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! integrations that only need to write handlers or middleware, without
//! pulling in the runtime pieces of `multiplex-std`.
//!
//! # Building Blocks
//!
//! ## Handler ([`MessageHandler`])
//!
//! The terminal endpoint: an async function from a message to
//! `Result<(), BoxError>`. Plain closures are handlers. [`MessageFunc`] is the
//! shared, type-erased form stored in route tables.
//!
//! ## Decorator ([`Decorator`])
//!
//! Takes a [`MessageFunc`] and returns a new one that runs extra behavior
//! around it (logging, validation, recovery). Plain closures are decorators.
//!
//! ## Chain ([`MessageChain`])
//!
//! An ordered list of decorators composed around a terminal handler with
//! onion semantics: list order on the way in, reverse order on the way out.
//!
//! # Error Types
//!
//! - [`RoutingError`] - Route table errors (not found, duplicate pattern)
//! - [`HandlerError`] - Errors raised by standard middleware
//! - [`HeartbeatError`] - Liveness protocol failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod chain;
mod decorator;
mod error;
mod handler;
mod message;

// Re-exports
pub use chain::{MessageChain, link_func_and_chain};
pub use decorator::{Decorator, SharedDecorator};
pub use error::{BoxError, HandlerError, HeartbeatError, RoutingError, is_not_found};
pub use handler::{DynMessageHandler, MessageFunc, MessageHandler, MessageResult};
pub use message::{Message, Pattern};
