//! Testing utilities for multiplex.
//!
//! This module provides helpers to make testing routes and middleware easier.
//!
//! # Features
//!
//! - [`RecordingDecorator`]: A decorator that records entry and exit markers
//! - [`CountingHandler`]: A handler that counts invocations
//! - [`RecordingHandler`]: A handler that keeps every message it receives
//! - [`FailingHandler`]: A handler that always fails

use multiplex_core::{Decorator, Message, MessageFunc, MessageHandler, MessageResult};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Decorator
// ============================================================================

/// A decorator that appends `"<label>:before"` and `"<label>:after"` to a
/// shared log around the next handler.
///
/// Several recorders sharing one log make the wrapping order observable.
///
/// # Example
///
/// ```rust,ignore
/// let log = RecordingDecorator::log();
/// mux.add_middleware(RecordingDecorator::new("outer", log.clone()))
///     .await
///     .add_middleware(RecordingDecorator::new("inner", log.clone()))
///     .await;
///
/// mux.serve(message).await?;
/// assert_eq!(RecordingDecorator::entries(&log),
///            ["outer:before", "inner:before", "inner:after", "outer:after"]);
/// ```
#[derive(Clone)]
pub struct RecordingDecorator {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingDecorator {
    /// Create a recorder writing to `log`.
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { label, log }
    }

    /// Create an empty shared log.
    pub fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Get a copy of the entries recorded in `log`.
    pub fn entries(log: &Mutex<Vec<String>>) -> Vec<String> {
        log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

fn record(log: &Mutex<Vec<String>>, entry: String) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(entry);
}

impl<M: Message> Decorator<M> for RecordingDecorator {
    fn decorate(&self, next: MessageFunc<M>) -> MessageFunc<M> {
        let label = self.label;
        let log = self.log.clone();
        MessageFunc::new(move |message: M| {
            let next = next.clone();
            let log = log.clone();
            async move {
                record(&log, format!("{label}:before"));
                let result = next.call(message).await;
                record(&log, format!("{label}:after"));
                result
            }
        })
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// mux.register_func("topic", counter.clone()).await;
///
/// mux.serve(message).await?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<M: Message> MessageHandler<M> for CountingHandler {
    async fn call(&self, _message: M) -> MessageResult {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that keeps a copy of every message it receives.
pub struct RecordingHandler<M> {
    messages: Arc<Mutex<Vec<M>>>,
}

impl<M: Clone> RecordingHandler<M> {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded messages.
    pub fn messages(&self) -> Vec<M> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of recorded messages.
    pub fn count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<M: Clone> Default for RecordingHandler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for RecordingHandler<M> {
    fn clone(&self) -> Self {
        Self {
            messages: self.messages.clone(),
        }
    }
}

impl<M: Message> MessageHandler<M> for RecordingHandler<M> {
    async fn call(&self, message: M) -> MessageResult {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that always fails with the same message.
#[derive(Clone, Debug)]
pub struct FailingHandler {
    reason: &'static str,
}

impl FailingHandler {
    /// Create a handler failing with `reason`.
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl<M: Message> MessageHandler<M> for FailingHandler {
    async fn call(&self, _message: M) -> MessageResult {
        Err(self.reason.into())
    }
}
