//! Standard middleware.
//!
//! Each type here is a [`Decorator`](multiplex_core::Decorator) usable as
//! global middleware on a [`MessageMux`](crate::MessageMux) or inside a local
//! [`MessageChain`](multiplex_core::MessageChain).

pub mod logging;
pub mod recover;
pub mod timeout;
pub mod tracing;

pub use logging::LoggingMiddleware;
pub use recover::RecoverMiddleware;
pub use timeout::TimeoutMiddleware;
pub use self::tracing::TracingMiddleware;
