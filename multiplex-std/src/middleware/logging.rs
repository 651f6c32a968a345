//! Logging middleware for message observation.

use multiplex_core::{Decorator, Message, MessageFunc};
use std::fmt::Debug;

/// A decorator that logs each message and the outcome of its handler.
///
/// Messages are logged at `debug` before the handler runs. Success is logged
/// at `debug`, failure at `warn`, both with the elapsed time. Without the
/// `tracing` feature this decorator only forwards.
///
/// # Example
///
/// ```rust,ignore
/// mux.add_middleware(LoggingMiddleware::named("orders")).await;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    name: &'static str,
}

impl LoggingMiddleware {
    /// Create a new `LoggingMiddleware` with a default name.
    pub fn new() -> Self {
        Self { name: "message" }
    }

    /// Create a new `LoggingMiddleware` with a custom name.
    ///
    /// The name identifies the dispatcher or route in log events.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log events.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Decorator<M> for LoggingMiddleware
where
    M: Message + Debug,
{
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        let name = self.name;
        MessageFunc::new(move |message: M| {
            let next = next.clone();
            async move {
                #[cfg(feature = "tracing")]
                let started = {
                    tracing::debug!(name = %name, message = ?message, "Processing message");
                    std::time::Instant::now()
                };
                #[cfg(not(feature = "tracing"))]
                let _ = name;

                let result = next.call(message).await;

                #[cfg(feature = "tracing")]
                {
                    let elapsed = started.elapsed();
                    match &result {
                        Ok(()) => tracing::debug!(name = %name, ?elapsed, "Message handled"),
                        Err(err) => {
                            tracing::warn!(name = %name, ?elapsed, error = %err, "Message failed")
                        }
                    }
                }

                result
            }
        })
    }
}
