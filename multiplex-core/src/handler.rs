//! # Handler
//!
//! The terminal endpoint of a dispatch: business logic that consumes a
//! message and reports success or failure.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|msg: MyMessage| async move { ...; Ok(()) }`
//! 2. **Struct implementation**: `impl MessageHandler<MyMessage> for MyHandler`
//!
//! Either form is turned into a [`MessageFunc`] when it is registered in a
//! route table or wrapped by a [`Decorator`].
//!
//! [`Decorator`]: crate::Decorator

use crate::{error::BoxError, message::Message};
use futures::future::BoxFuture;
use std::{fmt, future::Future, sync::Arc};

/// The outcome of handling one message.
pub type MessageResult = Result<(), BoxError>;

/// The terminal endpoint of a message dispatch.
///
/// Handlers receive an owned message and perform async business logic.
/// Closures of the shape `Fn(M) -> impl Future<Output = MessageResult>`
/// implement this trait automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle messages of type `{M}`",
    label = "missing `MessageHandler<{M}>` implementation",
    note = "Handlers are `Fn({M}) -> impl Future<Output = MessageResult>` closures or types implementing `call`."
)]
pub trait MessageHandler<M: Message>: Send + Sync + 'static {
    /// Executes the handler logic.
    fn call(&self, message: M) -> impl Future<Output = MessageResult> + Send;
}

// Blanket impl for closures
impl<M, F, Fut> MessageHandler<M> for F
where
    M: Message,
    F: Fn(M) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MessageResult> + Send,
{
    fn call(&self, message: M) -> impl Future<Output = MessageResult> + Send {
        (self)(message)
    }
}

/// Dynamic object-safe version of [`MessageHandler`].
pub trait DynMessageHandler<M: Message>: Send + Sync + 'static {
    /// Executes the handler logic (dynamic dispatch version).
    fn call_dyn(&self, message: M) -> BoxFuture<'_, MessageResult>;
}

// Any type implementing MessageHandler implements DynMessageHandler automatically.
impl<M: Message, H: MessageHandler<M>> DynMessageHandler<M> for H {
    fn call_dyn(&self, message: M) -> BoxFuture<'_, MessageResult> {
        Box::pin(self.call(message))
    }
}

/// A shared, type-erased handler.
///
/// This is the unit decorators consume and produce. Cloning only bumps a
/// reference count.
pub struct MessageFunc<M: Message> {
    inner: Arc<dyn DynMessageHandler<M>>,
}

impl<M: Message> MessageFunc<M> {
    /// Erase a handler into a `MessageFunc`.
    pub fn new<H: MessageHandler<M>>(handler: H) -> Self {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// Invoke the handler with a message.
    pub fn call(&self, message: M) -> BoxFuture<'_, MessageResult> {
        self.inner.call_dyn(message)
    }

    /// Returns `true` if both values point at the same handler instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<M: Message> Clone for MessageFunc<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Message> fmt::Debug for MessageFunc<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFunc").finish_non_exhaustive()
    }
}
