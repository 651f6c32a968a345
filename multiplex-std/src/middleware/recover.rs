//! Panic recovery middleware.

use futures::FutureExt;
use multiplex_core::{Decorator, HandlerError, Message, MessageFunc};
use std::{any::Any, panic::AssertUnwindSafe};

/// A decorator that turns a panic raised downstream into
/// [`HandlerError::Panic`].
///
/// Place it first in the global chain so it also covers the other middleware.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverMiddleware;

impl<M: Message> Decorator<M> for RecoverMiddleware {
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        MessageFunc::new(move |message: M| {
            let next = next.clone();
            async move {
                match AssertUnwindSafe(next.call(message)).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => {
                        Err(HandlerError::Panic(panic_message(payload.as_ref())).into())
                    }
                }
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplex_core::MessageChain;

    #[tokio::test]
    async fn test_recover_panic() {
        let mut chain = MessageChain::new();
        chain.add(RecoverMiddleware);

        let linked = chain.link(MessageFunc::new(|n: u8| async move {
            if n == 0 {
                panic!("division by zero");
            }
            Ok(())
        }));

        assert!(linked.call(1).await.is_ok());

        let err = linked.call(0).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<HandlerError>(),
            Some(&HandlerError::Panic("division by zero".to_string()))
        );
    }

    #[tokio::test]
    async fn test_recover_formatted_panic() {
        let mut chain = MessageChain::new();
        chain.add(RecoverMiddleware);

        let linked = chain.link(MessageFunc::new(|n: u8| async move {
            if n > 5 {
                panic!("bad input {n}");
            }
            Ok(())
        }));

        let err = linked.call(7).await.unwrap_err();
        assert_eq!(err.to_string(), "handler panicked: bad input 7");
    }
}
