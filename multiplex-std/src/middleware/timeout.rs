//! Timeout middleware for time-limited handlers.

use multiplex_core::{Decorator, HandlerError, Message, MessageFunc};
use std::time::Duration;
use tokio::time::timeout;

/// A decorator that fails a handler which runs longer than `duration`.
///
/// The downstream future is dropped when the limit is reached and
/// [`HandlerError::Timeout`] is returned instead.
///
/// # Example
///
/// ```rust,ignore
/// // Give every route five seconds
/// mux.add_middleware(TimeoutMiddleware::secs(5)).await;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeoutMiddleware {
    duration: Duration,
}

impl TimeoutMiddleware {
    /// Create a new `TimeoutMiddleware`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Create a `TimeoutMiddleware` with the limit specified in seconds.
    pub fn secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    /// Create a `TimeoutMiddleware` with the limit specified in milliseconds.
    pub fn millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Get the configured limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<M: Message> Decorator<M> for TimeoutMiddleware {
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        let duration = self.duration;
        MessageFunc::new(move |message: M| {
            let next = next.clone();
            async move {
                match timeout(duration, next.call(message)).await {
                    Ok(result) => result,
                    Err(_) => Err(HandlerError::Timeout(duration).into()),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplex_core::MessageChain;

    fn sleepy(delay: Duration) -> MessageFunc<()> {
        MessageFunc::new(move |_m: ()| async move {
            tokio::time::sleep(delay).await;
            Ok(())
        })
    }

    #[test]
    fn test_timeout_constructors() {
        assert_eq!(TimeoutMiddleware::secs(10).duration(), Duration::from_secs(10));
        assert_eq!(
            TimeoutMiddleware::millis(500).duration(),
            Duration::from_millis(500)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_trigger() {
        let mut chain = MessageChain::new();
        chain.add(TimeoutMiddleware::millis(10));

        let err = chain
            .link(sleepy(Duration::from_millis(50)))
            .call(())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<HandlerError>(),
            Some(&HandlerError::Timeout(Duration::from_millis(10)))
        );
        assert!(err.to_string().contains("10ms"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_success() {
        let mut chain = MessageChain::new();
        chain.add(TimeoutMiddleware::millis(100));

        let result = chain.link(sleepy(Duration::from_millis(5))).call(()).await;
        assert!(result.is_ok());
    }
}
