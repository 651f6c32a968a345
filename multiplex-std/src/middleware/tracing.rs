//! Span-per-message tracing middleware.

use multiplex_core::{Decorator, Message, MessageFunc};

#[cfg(feature = "tracing")]
use ::tracing::Instrument;

/// A decorator that runs the downstream handler inside a `tracing` span.
///
/// Every message gets its own `message_process` span tagged with the
/// middleware name, so events emitted by handlers further down the chain are
/// grouped per message. Without the `tracing` feature this decorator only
/// forwards.
#[derive(Debug, Clone, Copy)]
pub struct TracingMiddleware {
    name: &'static str,
}

impl TracingMiddleware {
    /// Create a new `TracingMiddleware` with the given span name tag.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl<M: Message> Decorator<M> for TracingMiddleware {
    #[cfg(feature = "tracing")]
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        let name = self.name;
        MessageFunc::new(move |message: M| {
            let next = next.clone();
            let span = ::tracing::info_span!("message_process", middleware = %name);
            async move { next.call(message).await }.instrument(span)
        })
    }

    #[cfg(not(feature = "tracing"))]
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        let _ = self.name;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplex_core::MessageChain;

    #[tokio::test]
    async fn test_tracing_passthrough() {
        let mut chain = MessageChain::new();
        chain.add(TracingMiddleware::new("test_span"));

        let linked = chain.link(MessageFunc::new(|n: u32| async move {
            if n > 10 { Err("too large".into()) } else { Ok(()) }
        }));

        assert!(linked.call(3).await.is_ok());
        assert!(linked.call(11).await.is_err());
    }
}
