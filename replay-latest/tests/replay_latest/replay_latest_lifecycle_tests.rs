// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use replay_core::{
    Completion, Demand, PassthroughSubject, Publisher, Subscriber, SubscriptionHandle,
};
use replay_latest::ReplayLatestExt;
use replay_test_utils::{ManualPublisher, RecordingSubscriber};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Never requests anything and raises `dropped` when it is dropped.
struct DropFlag {
    dropped: Arc<AtomicBool>,
}

impl Subscriber<i32, ()> for DropFlag {
    fn on_subscribe(&mut self, _subscription: SubscriptionHandle) {}

    fn on_next(&mut self, _item: i32) -> Demand {
        Demand::NONE
    }

    fn on_complete(&mut self, _completion: Completion<()>) {}
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[test]
fn upstream_is_not_subscribed_before_the_first_subscriber() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();

    // Act
    let replay = upstream.clone().replay_latest(2);

    // Assert
    assert_eq!(upstream.subscribe_count(), 0);
    assert!(!replay.is_connected());
}

#[test]
fn upstream_is_subscribed_exactly_once() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);

    // Act
    let recorders: Vec<_> = (0..3)
        .map(|_| {
            let (subscriber, recorder) = RecordingSubscriber::unlimited();
            replay.clone().subscribe(subscriber);
            recorder
        })
        .collect();

    // Assert
    assert_eq!(upstream.subscribe_count(), 1);
    assert!(replay.is_connected());
    assert!(recorders.iter().all(|r| r.is_subscribed()));
}

#[test]
fn upstream_subscription_is_released_on_completion() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);
    let (subscriber, _recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(subscriber);

    // Act
    upstream.complete(Completion::Finished);

    // Assert
    assert!(replay.is_completed());
    assert!(!replay.is_connected());

    let (late, late_recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(late);
    assert_eq!(upstream.subscribe_count(), 1);
    assert_eq!(late_recorder.completion(), Some(Completion::Finished));
}

#[test]
fn unexpected_second_upstream_subscription_is_cancelled() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(subscriber);
    let original = upstream
        .last_subscription()
        .expect("upstream should have been subscribed");

    // Act
    let duplicate = upstream.resubscribe();
    upstream.emit(1);

    // Assert
    assert!(duplicate.is_cancelled());
    assert!(duplicate.requests().is_empty());
    assert!(!original.is_cancelled());
    assert_eq!(recorder.values(), vec![1]);
}

#[test]
fn cancelling_one_subscriber_leaves_the_others_untouched() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (first, first_recorder) = RecordingSubscriber::unlimited();
    let (second, second_recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(first);
    replay.subscribe(second);
    subject.send(1)?;

    // Act
    first_recorder.cancel();
    subject.send(2)?;
    subject.finish();

    // Assert
    assert_eq!(first_recorder.values(), vec![1]);
    assert_eq!(first_recorder.completion(), None);
    assert_eq!(second_recorder.values(), vec![1, 2]);
    assert_eq!(second_recorder.completion(), Some(Completion::Finished));

    Ok(())
}

#[test]
fn cancel_does_not_touch_the_upstream() {
    // Arrange
    let upstream = ManualPublisher::<i32, ()>::new();
    let replay = upstream.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(subscriber);

    // Act
    recorder.cancel();
    upstream.emit(1);

    // Assert
    let subscription = upstream
        .last_subscription()
        .expect("upstream should have been subscribed");
    assert!(!subscription.is_cancelled());
    assert!(replay.is_connected());
    assert_eq!(replay.subscriber_count(), 0);
    assert_eq!(replay.replay_len(), 1);
}

#[test]
fn cancel_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (first, first_recorder) = RecordingSubscriber::unlimited();
    let (second, second_recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(first);
    replay.subscribe(second);

    // Act
    first_recorder.cancel();
    first_recorder.cancel();
    first_recorder.request(Demand::max(3));
    subject.send(1)?;

    // Assert
    assert_eq!(replay.subscriber_count(), 1);
    assert!(first_recorder.values().is_empty());
    assert_eq!(second_recorder.values(), vec![1]);

    Ok(())
}

#[test]
fn cancel_discards_the_pending_backlog_and_completion() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::new(Demand::NONE);
    replay.subscribe(subscriber);
    subject.send(1)?;
    subject.send(2)?;
    subject.finish();

    // Act
    recorder.cancel();
    recorder.request(Demand::UNLIMITED);

    // Assert
    assert!(recorder.values().is_empty());
    assert_eq!(recorder.completion_count(), 0);

    Ok(())
}

#[test]
fn subscribers_can_attach_after_everyone_cancelled() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (first, first_recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(first);
    subject.send(1)?;
    first_recorder.cancel();
    subject.send(2)?;

    // Act
    let (late, recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(late);
    subject.send(3)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(subject.subscriber_count(), 1);

    Ok(())
}

#[test]
fn dropping_every_handle_keeps_existing_subscribers_alive() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let (subscriber, recorder) = RecordingSubscriber::unlimited();
    replay.subscribe(subscriber);

    // Act
    drop(replay);
    subject.send(1)?;
    subject.finish();

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(recorder.completion(), Some(Completion::Finished));

    Ok(())
}

#[test]
fn completed_upstream_releases_the_shared_state() -> anyhow::Result<()> {
    // Arrange
    let subject = PassthroughSubject::<i32, ()>::new();
    let replay = subject.clone().replay_latest(2);
    let dropped = Arc::new(AtomicBool::new(false));
    replay.subscribe(DropFlag {
        dropped: Arc::clone(&dropped),
    });
    subject.send(1)?;

    // Act
    drop(replay);
    let dropped_before_completion = dropped.load(Ordering::SeqCst);
    subject.finish();

    // Assert
    assert!(!dropped_before_completion);
    assert!(dropped.load(Ordering::SeqCst));

    Ok(())
}
