//! # multiplex - Message Dispatch and Heartbeat for Long-Lived Connections
//!
//! `multiplex` gives pub/sub subscribers and socket servers two building
//! blocks:
//!
//! - a pattern-keyed dispatcher, [`MessageMux`], that routes each message to
//!   one handler through a chain of global middleware;
//! - ping/pong liveness loops, [`heartbeat::wait_ping_send_pong`] and
//!   [`heartbeat::send_ping_wait_pong`], that detect a dead peer.
//!
//! Transport, framing and serialization stay with the integrator.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use multiplex::prelude::*;
//!
//! #[derive(Debug)]
//! struct Frame { topic: String, body: Vec<u8> }
//!
//! let mux = MessageMux::new(|f: &Frame| Ok::<_, BoxError>(f.topic.clone()));
//! mux.add_middleware(RecoverMiddleware)
//!     .await
//!     .add_middleware(LoggingMiddleware::named("frames"))
//!     .await
//!     .register_func("orders".to_string(), |f: Frame| async move {
//!         handle_order(f.body).await
//!     })
//!     .await;
//!
//! while let Some(frame) = read_frame().await {
//!     if let Err(err) = mux.serve(frame).await {
//!         if is_not_found(&err) { continue; }
//!         return Err(err);
//!     }
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Handler
pub use multiplex_core::{DynMessageHandler, MessageFunc, MessageHandler, MessageResult};

// Decorator and chain
pub use multiplex_core::{Decorator, MessageChain, SharedDecorator, link_func_and_chain};

// Message
pub use multiplex_core::{Message, Pattern};

// Error types
pub use multiplex_core::{
    BoxError, HandlerError, HeartbeatError, RoutingError, is_not_found,
};

// Dispatch
pub use multiplex_std::MessageMux;

/// Ping/pong liveness loops.
pub mod heartbeat {
    pub use multiplex_std::heartbeat::{
        Signal, ping_period, send_ping_wait_pong, wait_ping_send_pong,
    };
}

/// Standard middleware implementations.
pub mod middleware {
    pub use multiplex_std::middleware::{
        LoggingMiddleware, RecoverMiddleware, TimeoutMiddleware, TracingMiddleware,
    };
}

/// Testing utilities.
pub mod testing {
    pub use multiplex_std::testing::{
        CountingHandler, FailingHandler, RecordingDecorator, RecordingHandler,
    };
}

/// Prelude module - common imports for multiplex.
///
/// # Usage
///
/// ```rust,ignore
/// use multiplex::prelude::*;
/// ```
pub mod prelude {
    // Core traits
    pub use crate::{Decorator, Message, MessageChain, MessageFunc, MessageHandler, MessageMux};

    // Results and errors
    pub use crate::{BoxError, HeartbeatError, MessageResult, RoutingError, is_not_found};

    // Heartbeat
    pub use crate::heartbeat::{send_ping_wait_pong, wait_ping_send_pong};

    // Middleware
    pub use crate::middleware::{
        LoggingMiddleware, RecoverMiddleware, TimeoutMiddleware, TracingMiddleware,
    };
}
