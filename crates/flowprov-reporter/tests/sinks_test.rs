use flowprov_reporter::{
    BufferedSink, ChannelEventSink, EventKind, JsonLinesSink, SendOptions, SinkError, read_events,
};
use std::sync::Arc;
use test_support::{FailingSink, RecordingSink, record, reporter_with};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn test_jsonl_sink_round_trips_events() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("journal").join("events.jsonl");
    let sink = Arc::new(JsonLinesSink::open(&path).await.expect("open journal"));
    let reporter = reporter_with(sink.clone());

    reporter.receive(&record("ff-1").with_size(42), "http://in").await.expect("receive");
    reporter.fork(&record("ff-1"), &[record("ff-2"), record("ff-3")]).await.expect("fork");
    reporter.send(&record("ff-2"), "sftp://out").await.expect("send");

    let events = read_events(sink.path()).await.expect("read journal");
    let kinds: Vec<EventKind> = events.iter().map(|event| event.kind()).collect();
    assert_eq!(kinds, vec![EventKind::Receive, EventKind::Fork, EventKind::Send]);
    let first = events[0].subjects().records();
    assert_eq!(first[0].size_bytes(), Some(42));
}

#[tokio::test]
async fn test_jsonl_reader_reports_corrupt_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.jsonl");
    let sink = JsonLinesSink::open(&path).await.expect("open journal");
    let reporter = reporter_with(Arc::new(sink));
    reporter.create(&record("ff-1")).await.expect("create");

    let mut file = tokio::fs::OpenOptions::new().append(true).open(&path).await.expect("reopen");
    file.write_all(b"{\"kind\":\"CREATE\"}\n").await.expect("append garbage");
    file.flush().await.expect("flush");

    match read_events(&path).await {
        Err(SinkError::Corrupt { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected corrupt journal, got {other:?}"),
    }
}

#[tokio::test]
async fn test_buffered_sink_commit_forwards_in_order() {
    let inner = Arc::new(RecordingSink::new());
    let buffered = Arc::new(BufferedSink::new(inner.clone()));
    let reporter = reporter_with(buffered.clone());

    reporter.create(&record("a")).await.expect("create");
    reporter.modify_content(&record("a")).await.expect("modify");
    assert_eq!(buffered.pending_len().await, 2);
    assert_eq!(inner.calls(), 0);

    assert_eq!(buffered.commit().await.expect("commit"), 2);
    assert_eq!(buffered.pending_len().await, 0);
    let kinds: Vec<EventKind> = inner.events().await.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![EventKind::Create, EventKind::ModifyContent]);
}

#[tokio::test]
async fn test_buffered_sink_rollback_keeps_forced_sends() {
    let inner = Arc::new(RecordingSink::new());
    let buffered = Arc::new(BufferedSink::new(inner.clone()));
    let reporter = reporter_with(buffered.clone());

    reporter.send(&record("a"), "http://out").await.expect("send");
    reporter
        .send_with(&record("b"), "http://out", SendOptions::new().force(true))
        .await
        .expect("forced send");

    assert_eq!(buffered.rollback().await, 1);
    let events = inner.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].force(), Some(true));
}

#[tokio::test]
async fn test_buffered_sink_keeps_events_when_commit_fails() {
    let inner = Arc::new(FailingSink::new("down"));
    let buffered = Arc::new(BufferedSink::new(inner.clone()));
    let reporter = reporter_with(buffered.clone());
    reporter.create(&record("a")).await.expect("buffered create");

    assert!(matches!(buffered.commit().await, Err(SinkError::Unavailable(_))));
    assert_eq!(buffered.pending_len().await, 1);
    assert_eq!(inner.calls(), 1);
}

#[tokio::test]
async fn test_buffered_sink_partial_commit_keeps_the_rest() {
    let inner = Arc::new(FailingSink::after(2, "disk full"));
    let buffered = Arc::new(BufferedSink::new(inner.clone()));
    let reporter = reporter_with(buffered.clone());
    for id in ["a", "b", "c", "d"] {
        reporter.create(&record(id)).await.expect("buffered create");
    }

    let err = buffered.commit().await.unwrap_err();
    assert!(matches!(err, SinkError::Unavailable(message) if message == "disk full"));
    assert_eq!(inner.calls(), 3);
    assert_eq!(buffered.pending_len().await, 2);

    assert!(buffered.commit().await.is_err());
    assert_eq!(inner.calls(), 4);
    assert_eq!(buffered.pending_len().await, 2);
    assert_eq!(buffered.rollback().await, 2);
}

#[tokio::test]
async fn test_channel_sink_closed_receiver() {
    let (sink, receiver) = ChannelEventSink::channel(4);
    let reporter = reporter_with(Arc::new(sink));
    drop(receiver);

    let err = reporter.create(&record("a")).await.unwrap_err();
    assert!(err.to_string().contains("sink closed"));
}
