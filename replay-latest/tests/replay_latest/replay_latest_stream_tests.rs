// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use replay_core::{sequence, PassthroughSubject, PublisherStreamExt};
use replay_latest::ReplayLatestExt;
use replay_test_utils::{assert_no_element_emitted, assert_stream_ended, unwrap_stream};

#[tokio::test]
async fn late_stream_receives_replay_then_live_items() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, String>::new();
    let replay = subject.clone().replay_latest(2);
    let _warm_up = replay.subscribe_stream(1);
    subject.send(1)?;
    subject.send(2)?;
    subject.send(3)?;

    // Act
    let mut late = replay.subscribe_stream(1);

    // Assert
    assert_eq!(unwrap_stream(&mut late, 500).await, Ok(2));
    assert_eq!(unwrap_stream(&mut late, 500).await, Ok(3));
    assert_no_element_emitted(&mut late, 100).await;

    // Act
    subject.send(4)?;
    subject.finish();

    // Assert
    assert_eq!(unwrap_stream(&mut late, 500).await, Ok(4));
    assert_stream_ended(&mut late, 500).await;

    Ok(())
}

#[tokio::test]
async fn failure_ends_the_stream_with_an_error() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, String>::new();
    let replay = subject.clone().replay_latest(1);
    let mut stream = replay.subscribe_stream(4);

    // Act
    subject.send(1)?;
    subject.fail("disconnected".to_string());

    // Assert
    assert_eq!(unwrap_stream(&mut stream, 500).await, Ok(1));
    assert_eq!(
        unwrap_stream(&mut stream, 500).await,
        Err("disconnected".to_string())
    );
    assert_stream_ended(&mut stream, 500).await;

    Ok(())
}

#[tokio::test]
async fn dropping_a_stream_detaches_its_subscriber() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(1);
    let mut kept = replay.subscribe_stream(1);
    let dropped = replay.subscribe_stream(1);
    assert_eq!(replay.subscriber_count(), 2);

    // Act
    drop(dropped);
    subject.send(7)?;

    // Assert
    assert_eq!(replay.subscriber_count(), 1);
    assert_eq!(unwrap_stream(&mut kept, 500).await, Ok(7));

    Ok(())
}

#[tokio::test]
async fn cold_upstream_is_consumed_once_and_replayed() {
    // Arrange
    let replay = sequence::<_, ()>(1..=5).replay_latest(2);

    // Act
    let first: Vec<_> = replay.subscribe_stream(1).collect().await;
    let second: Vec<_> = replay.subscribe_stream(1).collect().await;

    // Assert
    assert_eq!(first, vec![Ok(1), Ok(2), Ok(3), Ok(4), Ok(5)]);
    assert_eq!(second, vec![Ok(4), Ok(5)]);
}

#[tokio::test]
async fn producer_task_feeds_a_consumer_task() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<u64, ()>::new();
    let replay = subject.clone().replay_latest(8);
    let stream = replay.subscribe_stream(2);

    // Act
    let consumer = tokio::spawn(stream.collect::<Vec<_>>());
    let producer = tokio::spawn(async move {
        for i in 0..100 {
            subject.send(i)?;
            tokio::task::yield_now().await;
        }
        subject.finish();
        Ok::<_, anyhow::Error>(())
    });
    producer.await??;
    let received = consumer.await?;

    // Assert
    assert_eq!(received, (0..100).map(Ok::<u64, ()>).collect::<Vec<_>>());

    Ok(())
}
