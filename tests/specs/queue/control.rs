//! Queue control specs
//!
//! Verify pause, resume and cancellation.

use crate::prelude::*;

#[test]
fn pause_holds_the_next_item_until_resume() {
    let world = World::new();
    let queue = world.queue();
    let first = queue.enqueue(job("first")).unwrap();
    let second = queue.enqueue(job("second")).unwrap();

    assert!(queue.pause());
    world.emit("first/done");

    first.resolved_with("first/done");
    second.still_pending();
    assert_eq!(queue.state(), RunState::Paused);
    assert_eq!(queue.in_flight(), None);

    assert!(queue.resume());
    assert_eq!(queue.in_flight(), Some(second.id()));
}

#[test]
fn resume_without_pause_is_a_noop() {
    let world = World::new();
    let queue = world.queue();
    assert!(!queue.resume());
    assert!(queue.pause());
    assert!(!queue.pause());
}

#[test]
fn canceling_in_flight_item_starts_the_next() {
    let world = World::new();
    let queue = world.queue();
    let first = queue.enqueue(job("first")).unwrap();
    let second = queue.enqueue(job("second")).unwrap();

    assert!(first.cancel());

    assert_eq!(queue.state(), RunState::Active);
    assert_eq!(queue.in_flight(), Some(second.id()));
    assert_eq!(world.dispatched(), vec!["first", "second"]);

    world.emit("first/done");
    first.still_pending();
    second.still_pending();
}

#[test]
fn canceling_waiting_item_skips_it() {
    let world = World::new();
    let queue = world.queue();
    queue.enqueue(job("first")).unwrap();
    let skipped = queue.enqueue(job("skipped")).unwrap();
    queue.enqueue(job("last")).unwrap();

    assert!(queue.cancel(skipped.id()));
    assert!(!queue.cancel(skipped.id()));
    world.emit("first/done");

    assert_eq!(world.dispatched(), vec!["first", "first/done", "last"]);
}

#[test]
fn independent_queues_never_block_each_other() {
    let world = World::new();
    let left = world.queue();
    let right = world.queue();

    let left_first = left.enqueue(job("l1")).unwrap();
    left.enqueue(job("l2")).unwrap();
    left.pause();
    let right_first = right.enqueue(job("r1")).unwrap();
    let right_second = right.enqueue(job("r2")).unwrap();

    world.emit("r1/done");
    right_first.resolved_with("r1/done");
    assert_eq!(right.in_flight(), Some(right_second.id()));

    world.emit("l1/done");
    left_first.resolved_with("l1/done");
    assert_eq!(left.in_flight(), None);
    assert_eq!(right.state(), RunState::Active);
}

#[test]
fn dropping_a_queue_releases_its_wait() {
    let world = World::new();
    let queue = world.queue();
    let ticket = queue.enqueue(job("orphan")).unwrap();

    drop(queue);

    assert!(world.hub.registry().is_empty());
    assert!(!ticket.cancel());
}

#[test]
fn host_failure_rejects_the_item() {
    let world = World::new();
    world.host.fail("broken", "no route to host");
    let queue = world.queue();

    let broken = queue.enqueue(job("broken")).unwrap();
    let next = queue.enqueue(job("next")).unwrap();

    let err = broken.outcome().unwrap().unwrap_err();
    assert!(matches!(err, WaitError::Dispatch(_)));
    assert!(err.to_string().contains("no route to host"));
    assert_eq!(queue.in_flight(), Some(next.id()));
}
