//! Hub request specs
//!
//! Verify that request events dispatched through a hub yield futures that
//! settle on their correlated responses.

use crate::prelude::*;

fn pending(world: &World, request: impl Into<EventDescriptor>) -> EventFuture {
    world
        .hub
        .dispatch(request)
        .unwrap()
        .into_future()
        .expect("request events yield a pending future")
}

#[test]
fn request_resolves_on_response() {
    let world = World::new();
    let future = pending(
        &world,
        Event::new("user/fetch").with_request(Correlation::new(["user/ok"], ["user/err"])),
    );

    future.still_pending();
    world.emit("user/ok");
    future.resolved_with("user/ok");
}

#[test]
fn request_rejects_on_error_response() {
    let world = World::new();
    let future = pending(
        &world,
        Event::new("user/fetch").with_request(Correlation::new(["user/ok"], ["user/err"])),
    );

    world.emit("user/err");
    future.rejected_by("user/err");
}

#[test]
fn plain_events_are_not_requests() {
    let world = World::new();
    let result = world.hub.dispatch("user/fetch").unwrap();
    assert!(!result.is_pending());
}

#[test]
fn listeners_hear_requests_after_the_host() {
    let world = World::new();
    let heard = world.record(&["user/fetch"]);

    pending(
        &world,
        Event::new("user/fetch").with_request(Correlation::new(["user/ok"], NONE)),
    );

    assert_eq!(world.dispatched(), vec!["user/fetch"]);
    assert_eq!(*heard.lock().unwrap(), vec!["user/fetch"]);
}

#[test]
fn request_factories_stamp_every_event() {
    let world = World::new();
    let fetch_page = request_factory(
        || Event::new("page/fetch").with_payload(json!({ "page": 1 })),
        Correlation::new(["page/ok"], ["page/err"]),
    );

    let first = pending(&world, fetch_page.clone());
    let second = pending(&world, fetch_page);
    world.emit("page/err");

    first.rejected_by("page/err");
    second.rejected_by("page/err");
}

#[test]
fn flushed_host_replies_settle_requests() {
    let world = World::new();
    world.host.on("ping", Event::new("pong"));

    let future = pending(
        &world,
        Event::new("ping").with_request(Correlation::new(["pong"], NONE)),
    );
    assert_eq!(world.host.pending_replies(), 1);

    world.host.flush();
    future.resolved_with("pong");
}

#[test]
fn invalid_request_metadata_is_a_contract_error() {
    let world = World::new();
    let err = world
        .hub
        .dispatch(Event::new("bad").with_request(Correlation::new(NONE, NONE)))
        .unwrap_err();

    assert_eq!(err.to_string(), ContractError::NothingToWait.to_string());
    assert!(world.dispatched().is_empty());
}

#[test]
fn request_events_serialize_with_their_correlation() {
    let request = Event::new("save")
        .with_payload(json!({ "id": 1 }))
        .with_request(Correlation::new(["save/ok"], [500_i64]).with_timeout(Duration::from_secs(2)));

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json,
        json!({
            "type": "save",
            "payload": { "id": 1 },
            "request": { "resolve": ["save/ok"], "reject": [500], "timeout_ms": 2000 }
        })
    );

    let back: Event = serde_json::from_value(json).unwrap();
    assert_eq!(back, request);
}

#[tokio::test(start_paused = true)]
async fn request_timeout_comes_from_metadata() {
    let world = World::new();
    let future = pending(
        &world,
        Event::new("ping").with_request(
            Correlation::new(["pong"], NONE).with_timeout(Duration::from_millis(500)),
        ),
    );

    let err = future.await.unwrap_err();
    assert!(err.is_timeout());
}
