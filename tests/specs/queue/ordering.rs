//! Queue ordering specs
//!
//! Verify that items run one at a time, highest priority first.

use crate::prelude::*;

#[test]
fn head_starts_immediately_then_priorities_descend() {
    let world = World::new();
    let queue = world.queue();

    for priority in [4, 1, 3, 2] {
        queue
            .enqueue(job(&format!("p{priority}")).priority(priority))
            .unwrap();
    }
    assert_eq!(world.dispatched(), vec!["p4"]);

    world.emit("p4/done");
    world.emit("p3/done");
    world.emit("p2/done");
    world.emit("p1/done");

    let starts: Vec<String> = world
        .dispatched()
        .into_iter()
        .filter(|t| !t.ends_with("/done"))
        .collect();
    assert_eq!(starts, vec!["p4", "p3", "p2", "p1"]);
    assert!(queue.is_empty());
}

#[test]
fn equal_priorities_keep_enqueue_order() {
    let world = World::new();
    let queue = world.queue();
    queue.pause();

    let tickets: Vec<QueueTicket> = ["a", "b", "c"]
        .into_iter()
        .map(|name| queue.enqueue(job(name).priority(1)).unwrap())
        .collect();

    let expected: Vec<u64> = tickets.iter().map(QueueTicket::id).collect();
    assert_eq!(queue.ids(), expected);
}

#[test]
fn unprioritized_items_go_last() {
    let world = World::new();
    let queue = world.queue();
    queue.pause();

    let plain = queue.enqueue(job("plain")).unwrap();
    let urgent = queue.enqueue(job("urgent").priority(10)).unwrap();
    let later = queue.enqueue(job("later")).unwrap();

    assert_eq!(queue.ids(), vec![plain.id(), urgent.id(), later.id()]);
}

#[test]
fn completion_settles_the_ticket_with_its_event() {
    let world = World::new();
    let queue = world.queue();
    let ticket = queue.enqueue(job("fetch")).unwrap();

    world
        .hub
        .dispatch(Event::new("fetch/done").with_payload(json!({ "rows": 3 })))
        .unwrap();

    ticket.resolved_with("fetch/done");
    assert_eq!(ticket.outcome().unwrap().unwrap().payload, json!({ "rows": 3 }));
}

#[test]
fn failure_settles_the_ticket_and_advances() {
    let world = World::new();
    let queue = world.queue();
    let failing = queue.enqueue(job("first")).unwrap();
    let next = queue.enqueue(job("second")).unwrap();

    world.emit("first/failed");

    failing.rejected_by("first/failed");
    next.still_pending();
    assert_eq!(queue.in_flight(), Some(next.id()));
}

#[test]
fn scripted_host_replies_drive_the_queue() {
    let world = World::new();
    world.host.reply_immediately(true);
    world.host.on("build", Event::new("build/done"));
    world.host.on("deploy", Event::new("deploy/failed"));
    let queue = world.queue();

    let build = queue.enqueue(job("build").priority(2)).unwrap();
    let deploy = queue.enqueue(job("deploy").priority(1)).unwrap();

    build.resolved_with("build/done");
    deploy.rejected_by("deploy/failed");
    assert_eq!(queue.state(), RunState::Waiting);
}

#[tokio::test(start_paused = true)]
async fn item_timeout_moves_the_queue_on() {
    let world = World::new();
    let queue = world.queue();
    let stuck = queue
        .enqueue(job("stuck").timeout(Duration::from_millis(100)))
        .unwrap();
    let next = queue.enqueue(job("next")).unwrap();

    let err = stuck.await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(queue.in_flight(), Some(next.id()));
}
