// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use replay_core::{Demand, PassthroughSubject, Publisher};
use replay_latest::ReplayLatestExt;
use replay_test_utils::{ManualPublisher, RecordingSubscriber};

#[test]
fn items_wait_until_demand_is_signalled() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::new(Demand::NONE);
    replay.subscribe(subscriber);

    // Act
    subject.send(1)?;
    subject.send(2)?;
    subject.send(3)?;

    // Assert
    assert!(recorder.values().is_empty());

    // Act
    recorder.request(Demand::max(2));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);

    // Act
    recorder.request(Demand::max(5));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);

    Ok(())
}

#[test]
fn backlog_is_not_limited_by_the_replay_capacity() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(1);
    let (subscriber, recorder) = RecordingSubscriber::new(Demand::NONE);
    replay.subscribe(subscriber);

    // Act
    for i in 0..10 {
        subject.send(i)?;
    }
    recorder.request(Demand::UNLIMITED);

    // Assert
    assert_eq!(recorder.values(), (0..10).collect::<Vec<_>>());

    Ok(())
}

#[test]
fn demand_returned_from_on_next_keeps_items_flowing() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::replenishing(Demand::max(1), Demand::max(1));
    replay.subscribe(subscriber);

    // Act
    subject.send(1)?;
    subject.send(2)?;
    subject.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);

    Ok(())
}

#[test]
fn replay_is_paced_by_the_late_subscriber_demand() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(3);
    let (warm_up, _warm_up_recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(warm_up);
    subject.send(1)?;
    subject.send(2)?;
    subject.send(3)?;

    // Act
    let (late, recorder) = RecordingSubscriber::new(Demand::max(1));
    replay.subscribe(late);

    // Assert
    assert_eq!(recorder.values(), vec![1]);

    // Act
    recorder.request(Demand::max(1));
    subject.send(4)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);

    // Act
    recorder.request(Demand::max(2));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3, 4]);

    Ok(())
}

#[test]
fn slow_subscriber_does_not_hold_back_fast_subscriber() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (fast, fast_recorder) = RecordingSubscriber::unlimited();
    let (slow, slow_recorder) = RecordingSubscriber::new(Demand::NONE);
    replay.subscribe(fast);
    replay.subscribe(slow);

    // Act
    subject.send(1)?;
    subject.send(2)?;
    subject.send(3)?;

    // Assert
    assert_eq!(fast_recorder.values(), vec![1, 2, 3]);
    assert!(slow_recorder.values().is_empty());

    // Act
    slow_recorder.request(Demand::UNLIMITED);

    // Assert
    assert_eq!(slow_recorder.values(), vec![1, 2, 3]);

    Ok(())
}

#[test]
fn requests_accumulate_before_items_arrive() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::new(Demand::NONE);
    replay.subscribe(subscriber);

    // Act
    recorder.request(Demand::max(1));
    recorder.request(Demand::max(1));
    recorder.request(Demand::NONE);
    for i in 1..=4 {
        subject.send(i)?;
    }

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);

    Ok(())
}

#[test]
fn upstream_is_requested_unlimited_regardless_of_downstream_demand() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);
    let (subscriber, _recorder) = RecordingSubscriber::new(Demand::max(1));

    // Act
    replay.subscribe(subscriber);

    // Assert
    let subscription = upstream
        .last_subscription()
        .expect("upstream should have been subscribed");
    assert_eq!(subscription.requests(), vec![Demand::UNLIMITED]);
}

#[test]
fn upstream_sink_never_asks_for_more_per_item() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);
    let (subscriber, _recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(subscriber);

    // Act
    let returned = upstream.emit(1);

    // Assert
    assert_eq!(returned, vec![Demand::NONE]);
}
