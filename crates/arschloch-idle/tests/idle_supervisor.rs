//! Integration tests for the idle supervisor.
//!
//! Time is paused and auto-advanced, so deadlines resolve instantly and
//! `Instant::now()` reports exactly how far the clock moved.

use std::time::Duration;

use arschloch_idle::{IdleConfig, IdleSupervisor, IdleVerdict};
use tokio::time::{self, Instant};

fn config() -> IdleConfig {
    IdleConfig::with_timings(Duration::from_secs(10), Duration::from_secs(2))
}

#[tokio::test(start_paused = true)]
async fn test_warn_then_expire() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();
    let start = Instant::now();

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert!(idle.is_warned());

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Expire);
    assert_eq!(start.elapsed(), Duration::from_secs(12));
    assert!(!idle.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_activity_pushes_deadline_back() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();
    let start = Instant::now();

    time::advance(Duration::from_secs(8)).await;
    idle.record_activity();

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
    assert_eq!(start.elapsed(), Duration::from_secs(18));
}

#[tokio::test(start_paused = true)]
async fn test_activity_after_warning_cancels_reset() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
    idle.record_activity();
    assert!(!idle.is_warned());

    // Back to the first stage: the next verdict is another warning.
    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
}

#[tokio::test(start_paused = true)]
async fn test_disarmed_pends_forever() {
    let mut idle = IdleSupervisor::new(config());
    let result = time::timeout(Duration::from_secs(3600), idle.wait_for_verdict()).await;
    assert!(result.is_err(), "disarmed supervisor must never fire");
}

#[tokio::test(start_paused = true)]
async fn test_disarm_stops_pending_warning() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();
    idle.disarm();
    idle.disarm();
    assert!(!idle.is_armed());

    let result = time::timeout(Duration::from_secs(60), idle.wait_for_verdict()).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_activity_ignored_while_disarmed() {
    let mut idle = IdleSupervisor::new(config());
    idle.record_activity();
    assert!(!idle.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_arm_is_idempotent() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();
    let start = Instant::now();
    time::advance(Duration::from_secs(5)).await;
    idle.arm();

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_wait_loses_nothing() {
    let mut idle = IdleSupervisor::new(config());
    idle.arm();

    let early = time::timeout(Duration::from_secs(4), idle.wait_for_verdict()).await;
    assert!(early.is_err());
    assert!(idle.is_armed());
    assert!(!idle.is_warned());

    assert_eq!(idle.wait_for_verdict().await, IdleVerdict::Warn);
}
