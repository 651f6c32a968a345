//! # Message Multiplexer
//!
//! A route table that maps a pattern key, extracted from each message by a
//! caller-supplied function, to exactly one handler. Every matched handler is
//! wrapped by a global [`MessageChain`] of middleware at dispatch time.
//!
//! # Example
//!
//! ```rust,ignore
//! use multiplex_std::MessageMux;
//!
//! struct RedisMessage { channel: String, payload: Vec<u8> }
//!
//! let mux = MessageMux::new(|m: &RedisMessage| Ok::<_, BoxError>(m.channel.clone()));
//! mux.register_func("hello".to_string(), |m: RedisMessage| async move {
//!         println!("{} bytes on {}", m.payload.len(), m.channel);
//!         Ok(())
//!     })
//!     .await
//!     .add_middleware(LoggingMiddleware::named("redis"))
//!     .await;
//!
//! mux.serve(message).await?;
//! ```
//!
//! # Locking
//!
//! All mutable state sits behind one async read/write lock.
//! [`MessageMux::serve`] holds shared access for the whole dispatch, handler
//! included, so concurrent serves run in parallel while every mutator waits
//! for in-flight serves to finish before it touches the table.
//! [`MessageMux::serve_without_lock`] skips the lock entirely and requires
//! `&mut self` instead.
//!
//! A handler must not mutate the mux that is dispatching to it: the write
//! lock would wait on the read lock held by that very dispatch.

use multiplex_core::{
    BoxError, Decorator, Message, MessageChain, MessageFunc, MessageHandler, MessageResult,
    Pattern, RoutingError, SharedDecorator,
};
use std::{collections::BTreeMap, fmt};
use tokio::sync::RwLock;

type PatternFn<P, M> = Box<dyn Fn(&M) -> Result<P, BoxError> + Send + Sync>;

/// State guarded by the mux lock.
struct MuxState<P: Pattern, M: Message> {
    handler_by_pattern: BTreeMap<P, MessageFunc<M>>,
    chain_by_global: MessageChain<M>,
    not_found_handler: Option<MessageFunc<M>>,
}

impl<P: Pattern, M: Message> MuxState<P, M> {
    /// Pick the handler that should receive `message`.
    ///
    /// Registered handlers come back linked through the global chain; the
    /// not-found fallback is returned as is.
    fn resolve(
        &self,
        get_pattern: &PatternFn<P, M>,
        message: &M,
    ) -> Result<MessageFunc<M>, BoxError> {
        let pattern = get_pattern(message)?;

        match self.handler_by_pattern.get(&pattern) {
            Some(handler) => Ok(self.chain_by_global.link(handler.clone())),
            None => self
                .not_found_handler
                .clone()
                .ok_or_else(|| RoutingError::HandlerNotFound.into()),
        }
    }
}

/// A pattern-keyed message dispatcher with global middleware.
///
/// `P` is the route key, `M` the message type. Pattern keys are unique: a
/// second registration for the same key is a programming error.
///
/// Mutators are `async` because they wait for in-flight dispatches to drain.
pub struct MessageMux<P: Pattern, M: Message> {
    get_pattern: PatternFn<P, M>,
    state: RwLock<MuxState<P, M>>,
}

impl<P: Pattern, M: Message> MessageMux<P, M> {
    /// Create a mux that routes with `get_pattern`.
    ///
    /// Errors returned by `get_pattern` abort routing and reach the caller of
    /// [`serve`](Self::serve) unchanged.
    pub fn new<F, E>(get_pattern: F) -> Self
    where
        F: Fn(&M) -> Result<P, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            get_pattern: Box::new(move |message| get_pattern(message).map_err(Into::into)),
            state: RwLock::new(MuxState {
                handler_by_pattern: BTreeMap::new(),
                chain_by_global: MessageChain::new(),
                not_found_handler: None,
            }),
        }
    }

    /// Dispatch a message to its handler.
    ///
    /// Shared access is held until the handler returns. Returns the
    /// extractor's error, [`RoutingError::HandlerNotFound`] when nothing
    /// matches and no fallback is set, or whatever the linked handler returns.
    pub async fn serve(&self, message: M) -> MessageResult {
        let state = self.state.read().await;
        let handler = state.resolve(&self.get_pattern, &message)?;
        handler.call(message).await
    }

    /// Dispatch a message without taking the lock.
    ///
    /// Intended for callers that already process one stream sequentially and
    /// own the mux outright. Exclusivity against mutation and other serve
    /// calls is guaranteed by the `&mut self` receiver.
    pub async fn serve_without_lock(&mut self, message: M) -> MessageResult {
        let handler = self.state.get_mut().resolve(&self.get_pattern, &message)?;
        handler.call(message).await
    }

    /// Register `handler` for `pattern`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is already registered. Routes are set up once;
    /// a duplicate means the setup code is wrong. Use
    /// [`try_register_func`](Self::try_register_func) to get an error instead.
    pub async fn register_func<H: MessageHandler<M>>(&self, pattern: P, handler: H) -> &Self {
        if let Err(err) = self.try_register_func(pattern, handler).await {
            panic!("message mux: {err}");
        }
        self
    }

    /// Register `handler` for `pattern`, rejecting duplicates.
    ///
    /// The table is left untouched when the pattern is already present.
    pub async fn try_register_func<H: MessageHandler<M>>(
        &self,
        pattern: P,
        handler: H,
    ) -> Result<&Self, RoutingError> {
        let mut state = self.state.write().await;
        if state.handler_by_pattern.contains_key(&pattern) {
            return Err(RoutingError::DuplicatePattern(format!("{pattern:?}")));
        }

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(?pattern, "register message handler");
        }

        state
            .handler_by_pattern
            .insert(pattern, MessageFunc::new(handler));
        Ok(self)
    }

    /// Remove the handler for `pattern`, if any.
    pub async fn remove_func(&self, pattern: &P) {
        let _removed = self
            .state
            .write()
            .await
            .handler_by_pattern
            .remove(pattern)
            .is_some();

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(?pattern, removed = _removed, "remove message handler");
        }
    }

    /// Append a decorator to the global middleware chain.
    pub async fn add_middleware<D: Decorator<M>>(&self, decorator: D) -> &Self {
        self.state.write().await.chain_by_global.add(decorator);
        self
    }

    /// Append several decorators to the global middleware chain, in order.
    pub async fn add_middlewares<I>(&self, decorators: I) -> &Self
    where
        I: IntoIterator<Item = SharedDecorator<M>>,
    {
        self.state.write().await.chain_by_global.add_chain(decorators);
        self
    }

    /// Install or replace the handler used when no pattern matches.
    ///
    /// The fallback is invoked directly, without the global middleware chain.
    pub async fn set_not_found_handler<H: MessageHandler<M>>(&self, handler: H) -> &Self {
        self.state.write().await.not_found_handler = Some(MessageFunc::new(handler));
        self
    }

    /// Returns `true` if a handler is registered for `pattern`.
    pub async fn contains(&self, pattern: &P) -> bool {
        self.state.read().await.handler_by_pattern.contains_key(pattern)
    }

    /// Number of registered patterns.
    pub async fn len(&self) -> usize {
        self.state.read().await.handler_by_pattern.len()
    }

    /// Returns `true` if no pattern is registered.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.handler_by_pattern.is_empty()
    }

    /// Registered patterns in ascending order.
    pub async fn patterns(&self) -> Vec<P>
    where
        P: Clone,
    {
        self.state
            .read()
            .await
            .handler_by_pattern
            .keys()
            .cloned()
            .collect()
    }
}

impl<P: Pattern, M: Message> fmt::Debug for MessageMux<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("MessageMux");
        match self.state.try_read() {
            Ok(state) => debug
                .field("patterns", &state.handler_by_pattern.keys().collect::<Vec<_>>())
                .field("middleware", &state.chain_by_global.len())
                .field("not_found_handler", &state.not_found_handler.is_some())
                .finish(),
            Err(_) => debug.finish_non_exhaustive(),
        }
    }
}
