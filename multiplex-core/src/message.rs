//! Marker traits for messages and pattern keys.

use std::fmt::Debug;

/// A marker trait for messages flowing through a dispatcher.
///
/// Messages are opaque to multiplex: they are only inspected through the
/// pattern extractor supplied by the caller. Every `Send + 'static` type is a
/// message, so no implementation is ever required.
///
/// # Example
///
/// ```rust,ignore
/// struct RedisMessage { channel: String, payload: Vec<u8> }
///
/// // RedisMessage is a Message already.
/// let mux = MessageMux::new(|m: &RedisMessage| Ok::<_, BoxError>(m.channel.clone()));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + 'static`",
    note = "Messages are moved into async handlers and must be sendable across tasks."
)]
pub trait Message: Send + 'static {}

impl<T: Send + 'static> Message for T {}

/// A marker trait for route keys extracted from a message.
///
/// Keys are totally ordered so the route table can keep them sorted, and
/// `Debug` so a duplicate registration can name the offending key.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a route pattern",
    label = "must be `Ord + Debug + Send + Sync + 'static`",
    note = "Topic names, channel ids and enum discriminants make good patterns."
)]
pub trait Pattern: Ord + Debug + Send + Sync + 'static {}

impl<T: Ord + Debug + Send + Sync + 'static> Pattern for T {}
