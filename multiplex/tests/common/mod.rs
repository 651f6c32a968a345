#![allow(dead_code)]

use multiplex::{BoxError, MessageMux};

// ============================================================================
// Test Message Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct TopicMessage {
    pub topic: String,
    pub payload: String,
}

impl TopicMessage {
    pub fn new(topic: &str, payload: &str) -> Self {
        Self {
            topic: topic.to_string(),
            payload: payload.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Subscribe,
    Publish,
    Unsubscribe,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub kind: Option<Kind>,
    pub seq: u64,
}

// ============================================================================
// Mux Builders
// ============================================================================

pub fn topic_mux() -> MessageMux<String, TopicMessage> {
    MessageMux::new(|m: &TopicMessage| Ok::<_, BoxError>(m.topic.clone()))
}

pub fn frame_mux() -> MessageMux<Kind, Frame> {
    MessageMux::new(|f: &Frame| f.kind.ok_or("frame without kind"))
}
