//! Wait timeout specs
//!
//! Verify that timers race event matches and never fire after settlement.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn unanswered_wait_times_out() {
    let world = World::new();
    let future = world
        .hub
        .wait(["pong"], ["error"], Some(Duration::from_millis(200)))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    future.still_pending();

    tokio::time::sleep(Duration::from_millis(100)).await;
    future.timed_out();
    assert_eq!(
        future.outcome().unwrap().unwrap_err().to_string(),
        "Timed out promise"
    );
    assert!(world.hub.registry().is_empty());
}

#[tokio::test(start_paused = true)]
async fn match_before_deadline_wins() {
    let world = World::new();
    let future = world
        .hub
        .wait(["pong"], NONE, Some(Duration::from_millis(200)))
        .unwrap();

    world.emit("pong");
    tokio::time::sleep(Duration::from_secs(5)).await;

    future.resolved_with("pong");
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_message() {
    let world = World::new();
    let future = world
        .hub
        .wait_for(
            WaitSpec::new()
                .reject_on(["offline"])
                .timeout(Duration::from_secs(1))
                .timeout_message("no heartbeat"),
        )
        .unwrap();

    let err = future.await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "no heartbeat");
}

#[tokio::test(start_paused = true)]
async fn canceled_wait_never_times_out() {
    let world = World::new();
    let future = world
        .hub
        .wait(["pong"], NONE, Some(Duration::from_millis(10)))
        .unwrap();

    future.cancel();
    tokio::time::sleep(Duration::from_secs(1)).await;

    future.still_pending();
    assert!(future.is_canceled());
}

#[test]
fn timeout_needs_a_runtime() {
    let world = World::new();
    let err = world
        .hub
        .wait(["pong"], NONE, Some(Duration::from_millis(10)))
        .unwrap_err();
    assert_eq!(err, ContractError::TimerUnavailable);
}
