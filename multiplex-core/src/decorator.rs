//! # Decorator
//!
//! A decorator receives the next handler in line and returns a handler that
//! runs extra behavior around it. Cross-cutting concerns such as logging,
//! validation or panic recovery are written once as decorators and applied
//! to a single handler (a local chain) or to every route (global middleware).
//!
//! # Example
//!
//! ```rust,ignore
//! let audit = |next: MessageFunc<Event>| {
//!     MessageFunc::new(move |event: Event| {
//!         let next = next.clone();
//!         async move {
//!             println!("before");
//!             let result = next.call(event).await;
//!             println!("after");
//!             result
//!         }
//!     })
//! };
//! ```

use crate::{handler::MessageFunc, message::Message};
use std::sync::Arc;

/// Wraps a handler to produce a new handler.
///
/// Closures `Fn(MessageFunc<M>) -> MessageFunc<M>` implement this trait
/// automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a decorator for messages of type `{M}`",
    label = "missing `Decorator<{M}>` implementation",
    note = "Decorators are `Fn(MessageFunc<{M}>) -> MessageFunc<{M}>` closures or types implementing `decorate`."
)]
pub trait Decorator<M: Message>: Send + Sync + 'static {
    /// Wrap `next`, returning the decorated handler.
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M>;
}

impl<M, F> Decorator<M> for F
where
    M: Message,
    F: Fn(MessageFunc<M>) -> MessageFunc<M> + Send + Sync + 'static,
{
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        (self)(next)
    }
}

/// A decorator shared between chains.
pub type SharedDecorator<M> = Arc<dyn Decorator<M>>;
