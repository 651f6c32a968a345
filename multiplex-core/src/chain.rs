//! # Chain
//!
//! Ordered composition of decorators around a terminal handler.
//!
//! Linking applies the last decorator first, so it sits closest to the
//! terminal handler, and the first decorator last, so it is outermost.
//! Decorators therefore run in list order on the way in and in reverse order
//! on the way out.

use crate::{
    decorator::{Decorator, SharedDecorator},
    handler::MessageFunc,
    message::Message,
};
use std::{fmt, sync::Arc};

/// An ordered list of decorators.
pub struct MessageChain<M: Message> {
    chain_all: Vec<SharedDecorator<M>>,
}

impl<M: Message> MessageChain<M> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            chain_all: Vec::new(),
        }
    }

    /// Wrap `handler` with every decorator in the chain.
    ///
    /// An empty chain returns the handler unchanged.
    pub fn link(&self, handler: MessageFunc<M>) -> MessageFunc<M> {
        link_func_and_chain(handler, &self.chain_all)
    }

    /// Append one decorator.
    pub fn add<D: Decorator<M>>(&mut self, decorator: D) -> &mut Self {
        self.chain_all.push(Arc::new(decorator));
        self
    }

    /// Append decorators, preserving the existing order.
    pub fn add_chain<I>(&mut self, decorators: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedDecorator<M>>,
    {
        self.chain_all.extend(decorators);
        self
    }

    /// Replace the decorator list wholesale.
    pub fn set_chain(&mut self, decorators: Vec<SharedDecorator<M>>) -> &mut Self {
        self.chain_all = decorators;
        self
    }

    /// Number of decorators in the chain.
    pub fn len(&self) -> usize {
        self.chain_all.len()
    }

    /// Returns `true` if the chain has no decorators.
    pub fn is_empty(&self) -> bool {
        self.chain_all.is_empty()
    }
}

impl<M: Message> Default for MessageChain<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message> Clone for MessageChain<M> {
    fn clone(&self) -> Self {
        Self {
            chain_all: self.chain_all.clone(),
        }
    }
}

impl<M: Message> fmt::Debug for MessageChain<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageChain")
            .field("len", &self.chain_all.len())
            .finish()
    }
}

/// Wrap `handler` with `decorators`, the first decorator being outermost.
pub fn link_func_and_chain<M: Message>(
    handler: MessageFunc<M>,
    decorators: &[SharedDecorator<M>],
) -> MessageFunc<M> {
    decorators
        .iter()
        .rev()
        .fold(handler, |next, decorator| decorator.decorate(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn marker(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> SharedDecorator<u8> {
        Arc::new(move |next: MessageFunc<u8>| {
            let log = log.clone();
            MessageFunc::new(move |msg: u8| {
                let next = next.clone();
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(format!("{label}:in"));
                    let result = next.call(msg).await;
                    log.lock().unwrap().push(format!("{label}:out"));
                    result
                }
            })
        })
    }

    fn terminal(log: Arc<Mutex<Vec<String>>>) -> MessageFunc<u8> {
        MessageFunc::new(move |_msg: u8| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push("handler".to_string());
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_link_onion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MessageChain::new();
        chain.add_chain([marker("a", log.clone()), marker("b", log.clone())]);
        chain.add_chain([marker("c", log.clone())]);

        chain.link(terminal(log.clone())).call(1).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:in", "b:in", "c:in", "handler", "c:out", "b:out", "a:out"]
        );
    }

    #[tokio::test]
    async fn test_empty_chain_returns_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = MessageChain::<u8>::default();
        let handler = terminal(log.clone());

        let linked = chain.link(handler.clone());
        assert!(linked.ptr_eq(&handler));

        linked.call(0).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_set_chain_replaces() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MessageChain::new();
        chain
            .add_chain([marker("old", log.clone())])
            .set_chain(vec![marker("new", log.clone())]);
        assert_eq!(chain.len(), 1);

        chain.link(terminal(log.clone())).call(0).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["new:in", "handler", "new:out"]);
    }

    #[tokio::test]
    async fn test_add_closure_decorator() {
        let mut chain = MessageChain::new();
        chain.add(|next: MessageFunc<u8>| {
            MessageFunc::new(move |msg: u8| {
                let next = next.clone();
                async move {
                    if msg == 0 {
                        return Err("zero rejected".into());
                    }
                    next.call(msg).await
                }
            })
        });
        assert!(!chain.is_empty());

        let linked = chain.link(MessageFunc::new(|_msg: u8| async { Ok(()) }));
        assert!(linked.call(7).await.is_ok());
        assert_eq!(linked.call(0).await.unwrap_err().to_string(), "zero rejected");
    }
}
