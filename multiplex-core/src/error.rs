//! Error types for multiplex.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`RoutingError`] - Errors from the route table
//! - [`HandlerError`] - Errors raised by standard middleware around a handler
//! - [`HeartbeatError`] - Errors that end a heartbeat session

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
///
/// Handlers, decorators and pattern extractors all report failures with it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// No handler matched the pattern and no fallback was configured.
    #[error("not found handler")]
    HandlerNotFound,

    /// A handler is already registered for this pattern.
    #[error("duplicate pattern: {0}")]
    DuplicatePattern(String),
}

/// Errors raised by middleware wrapped around a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler panicked during execution.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// The handler timed out.
    #[error("handler timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that end a heartbeat session.
///
/// Every variant is tagged with the phase it happened in, so a caller can tell
/// "we failed to send" apart from "the peer went silent".
#[derive(Error, Debug)]
pub enum HeartbeatError {
    /// No ping arrived within the wait window.
    #[error("wait ping timeout after {0:?}")]
    PingTimeout(Duration),

    /// The transport reported an error while receiving a ping.
    #[error("handle ping: {0}")]
    HandlePing(#[source] BoxError),

    /// Replying with a pong failed.
    #[error("send pong: {0}")]
    SendPong(#[source] BoxError),

    /// No pong arrived within the wait window.
    #[error("wait pong timeout after {0:?}")]
    PongTimeout(Duration),

    /// The transport reported an error while receiving a pong.
    #[error("handle pong: {0}")]
    HandlePong(#[source] BoxError),

    /// Emitting a ping failed.
    #[error("send ping: {0}")]
    SendPing(#[source] BoxError),

    /// The inbound signal channel was closed by its sender.
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),

    /// The wait window is too small to derive a ping period from.
    #[error("invalid heartbeat window: {0:?}")]
    InvalidWindow(Duration),

    /// A heartbeat task panicked or ended without reporting an outcome.
    #[error("heartbeat aborted")]
    Aborted,
}

impl HeartbeatError {
    /// Returns `true` if the peer went silent past its wait window.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            HeartbeatError::PingTimeout(_) | HeartbeatError::PongTimeout(_)
        )
    }
}

/// Returns `true` if `err` is [`RoutingError::HandlerNotFound`].
pub fn is_not_found(err: &BoxError) -> bool {
    matches!(
        err.downcast_ref::<RoutingError>(),
        Some(RoutingError::HandlerNotFound)
    )
}
