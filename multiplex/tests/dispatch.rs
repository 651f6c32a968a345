mod common;

use common::{Frame, Kind, TopicMessage, frame_mux, topic_mux};
use futures::FutureExt;
use multiplex::testing::{CountingHandler, FailingHandler, RecordingDecorator, RecordingHandler};
use multiplex::{BoxError, MessageFunc, RoutingError, SharedDecorator, is_not_found};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

#[tokio::test]
async fn test_registered_pattern_reaches_handler() {
    let mux = topic_mux();
    let hello = RecordingHandler::new();
    let other = CountingHandler::new();
    mux.register_func("hello".to_string(), hello.clone())
        .await
        .register_func("other".to_string(), other.clone())
        .await;

    let message = TopicMessage::new("hello", r#"{"data":"world"}"#);
    mux.serve(message.clone()).await.unwrap();

    assert_eq!(hello.messages(), vec![message]);
    assert_eq!(other.count(), 0);
}

#[tokio::test]
async fn test_duplicate_registration_keeps_first_handler() {
    let mux = topic_mux();
    let first = CountingHandler::new();
    let second = CountingHandler::new();

    mux.register_func("a".to_string(), first.clone()).await;
    let err = mux
        .try_register_func("a".to_string(), second.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RoutingError::DuplicatePattern(_)));

    mux.serve(TopicMessage::new("a", "")).await.unwrap();
    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 0);
    assert_eq!(mux.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_registration_panics() {
    let mux = topic_mux();
    mux.register_func("a".to_string(), CountingHandler::new())
        .await;

    let result = AssertUnwindSafe(mux.register_func("a".to_string(), CountingHandler::new()))
        .catch_unwind()
        .await;

    assert!(result.is_err());
    assert_eq!(mux.patterns().await, vec!["a".to_string()]);
}

#[tokio::test]
async fn test_unmatched_without_fallback_is_not_found() {
    let mux = topic_mux();
    mux.register_func("a".to_string(), CountingHandler::new())
        .await;

    let err = mux.serve(TopicMessage::new("b", "")).await.unwrap_err();
    assert!(is_not_found(&err));
    assert_eq!(
        err.downcast_ref::<RoutingError>(),
        Some(&RoutingError::HandlerNotFound)
    );
}

#[tokio::test]
async fn test_fallback_receives_original_message() {
    let mux = topic_mux();
    let fallback = RecordingHandler::new();
    mux.set_not_found_handler(fallback.clone()).await;

    let message = TopicMessage::new("unknown", "payload bytes");
    mux.serve(message.clone()).await.unwrap();

    assert_eq!(fallback.messages(), vec![message]);
}

#[tokio::test]
async fn test_fallback_can_be_replaced() {
    let mux = topic_mux();
    let first = CountingHandler::new();
    let second = CountingHandler::new();
    mux.set_not_found_handler(first.clone())
        .await
        .set_not_found_handler(second.clone())
        .await;

    mux.serve(TopicMessage::new("x", "")).await.unwrap();
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
}

#[tokio::test]
async fn test_fallback_bypasses_global_middleware() {
    let log = RecordingDecorator::log();
    let mux = topic_mux();
    mux.add_middleware(RecordingDecorator::new("global", log.clone()))
        .await
        .set_not_found_handler(CountingHandler::new())
        .await;

    mux.serve(TopicMessage::new("x", "")).await.unwrap();
    assert!(RecordingDecorator::entries(&log).is_empty());
}

#[tokio::test]
async fn test_global_middleware_onion_order() {
    let log = RecordingDecorator::log();
    let mux = topic_mux();

    let first: SharedDecorator<TopicMessage> =
        Arc::new(RecordingDecorator::new("first", log.clone()));
    let second: SharedDecorator<TopicMessage> =
        Arc::new(RecordingDecorator::new("second", log.clone()));
    mux.add_middlewares([first, second])
        .await
        .add_middleware(RecordingDecorator::new("third", log.clone()))
        .await;

    let handler_log = log.clone();
    mux.register_func("a".to_string(), move |_m: TopicMessage| {
        let log = handler_log.clone();
        async move {
            log.lock().unwrap().push("handler".to_string());
            Ok(())
        }
    })
    .await;

    mux.serve(TopicMessage::new("a", "")).await.unwrap();

    assert_eq!(
        RecordingDecorator::entries(&log),
        vec![
            "first:before",
            "second:before",
            "third:before",
            "handler",
            "third:after",
            "second:after",
            "first:after",
        ]
    );
}

#[tokio::test]
async fn test_middleware_added_later_applies_to_later_serves() {
    let log = RecordingDecorator::log();
    let mux = topic_mux();
    mux.register_func("a".to_string(), CountingHandler::new())
        .await;

    mux.serve(TopicMessage::new("a", "")).await.unwrap();
    assert!(RecordingDecorator::entries(&log).is_empty());

    mux.add_middleware(RecordingDecorator::new("late", log.clone()))
        .await;
    mux.serve(TopicMessage::new("a", "")).await.unwrap();
    assert_eq!(
        RecordingDecorator::entries(&log),
        vec!["late:before", "late:after"]
    );
}

#[tokio::test]
async fn test_middleware_can_short_circuit() {
    let mux = topic_mux();
    let handler = CountingHandler::new();
    mux.register_func("a".to_string(), handler.clone())
        .await
        .add_middleware(|next: MessageFunc<TopicMessage>| {
            MessageFunc::new(move |m: TopicMessage| {
                let next = next.clone();
                async move {
                    if m.payload.is_empty() {
                        return Err(BoxError::from("empty payload"));
                    }
                    next.call(m).await
                }
            })
        })
        .await;

    let err = mux.serve(TopicMessage::new("a", "")).await.unwrap_err();
    assert_eq!(err.to_string(), "empty payload");
    mux.serve(TopicMessage::new("a", "ok")).await.unwrap();
    assert_eq!(handler.count(), 1);
}

#[tokio::test]
async fn test_remove_then_serve_equals_never_registered() {
    let mux = topic_mux();
    mux.register_func("a".to_string(), CountingHandler::new())
        .await;
    mux.remove_func(&"a".to_string()).await;

    let removed = mux.serve(TopicMessage::new("a", "")).await.unwrap_err();
    let never = mux.serve(TopicMessage::new("z", "")).await.unwrap_err();
    assert!(is_not_found(&removed));
    assert!(is_not_found(&never));
    assert!(!mux.contains(&"a".to_string()).await);

    // The pattern is free again.
    mux.try_register_func("a".to_string(), CountingHandler::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_missing_pattern_is_noop() {
    let mux = topic_mux();
    mux.remove_func(&"ghost".to_string()).await;
    assert!(mux.is_empty().await);
}

#[tokio::test]
async fn test_handler_error_is_returned() {
    let mux = topic_mux();
    mux.register_func("a".to_string(), FailingHandler::new("downstream refused"))
        .await;

    let err = mux.serve(TopicMessage::new("a", "")).await.unwrap_err();
    assert_eq!(err.to_string(), "downstream refused");
}

#[tokio::test]
async fn test_extraction_error_wins_over_fallback() {
    let mux = frame_mux();
    let fallback = CountingHandler::new();
    mux.set_not_found_handler(fallback.clone()).await;

    let err = mux.serve(Frame { kind: None, seq: 1 }).await.unwrap_err();
    assert_eq!(err.to_string(), "frame without kind");
    assert!(!is_not_found(&err));
    assert_eq!(fallback.count(), 0);
}

#[tokio::test]
async fn test_enum_patterns() {
    let mut mux = frame_mux();
    let publish = RecordingHandler::<Frame>::new();
    mux.register_func(Kind::Publish, publish.clone())
        .await
        .register_func(Kind::Subscribe, CountingHandler::new())
        .await;

    for seq in 0..3 {
        mux.serve_without_lock(Frame {
            kind: Some(Kind::Publish),
            seq,
        })
        .await
        .unwrap();
    }

    let seqs: Vec<u64> = publish.messages().iter().map(|f| f.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert_eq!(mux.patterns().await, vec![Kind::Subscribe, Kind::Publish]);

    let err = mux
        .serve_without_lock(Frame {
            kind: Some(Kind::Unsubscribe),
            seq: 9,
        })
        .await
        .unwrap_err();
    assert!(is_not_found(&err));
}
