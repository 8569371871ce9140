/*
[INPUT]:  Full session lifecycle scenarios through the public driver API
[OUTPUT]: End-to-end verification of countdown, rollover, and cycle counting
[POS]:    Integration test layer - engine behavior under the real ticker
[UPDATE]: When changing rollover rules or driver publish semantics
*/

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;

use pomo_engine::{CountdownDriver, RunState, SessionConfig, SessionError, SessionView, Step};

fn fast_config() -> SessionConfig {
    SessionConfig {
        pomodoro_secs: 1,
        short_break_secs: 1,
        long_break_secs: 1,
        cycles_before_long_break: 2,
        tick_interval_ms: 100,
    }
}

async fn wait_for_rollover(rx: &mut watch::Receiver<SessionView>) -> SessionView {
    loop {
        timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("view published in time")
            .expect("driver alive");
        let view = *rx.borrow_and_update();
        if view.state == RunState::NotStarted {
            return view;
        }
        assert!(view.fraction_remaining >= 0.0 && view.fraction_remaining <= 1.0);
    }
}

/// Drive a full two-cycle session: pomodoro, short break, pomodoro, long
/// break, and verify the cycle counter at every rollover.
#[tokio::test(start_paused = true)]
async fn full_session_cycle_reaches_long_break_and_resets() {
    let mut driver = CountdownDriver::new(fast_config()).expect("driver");
    let mut rx = driver.subscribe();

    driver.start().expect("start first pomodoro");
    let view = wait_for_rollover(&mut rx).await;
    assert_eq!(view.step, Step::ShortBreak);
    assert_eq!(view.completed_cycles, 1);

    driver.start().expect("start short break");
    let view = wait_for_rollover(&mut rx).await;
    assert_eq!(view.step, Step::Pomodoro);
    assert_eq!(view.completed_cycles, 1);

    driver.start().expect("start second pomodoro");
    let view = wait_for_rollover(&mut rx).await;
    assert_eq!(view.step, Step::LongBreak);
    assert_eq!(view.completed_cycles, 2);

    driver.start().expect("start long break");
    let view = wait_for_rollover(&mut rx).await;
    assert_eq!(view.step, Step::Pomodoro);
    assert_eq!(view.completed_cycles, 0);
}

/// Pausing mid-interval stops the countdown where it is; resuming finishes
/// the interval from the preserved remaining time.
#[tokio::test(start_paused = true)]
async fn paused_interval_resumes_from_preserved_remaining() {
    let mut driver = CountdownDriver::new(fast_config()).expect("driver");
    let mut rx = driver.subscribe();

    driver.start().expect("start");

    // Let a few ticks land, then pause.
    for _ in 0..3 {
        timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("view published in time")
            .expect("driver alive");
    }
    driver.pause().expect("pause");

    timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("pause view published")
        .expect("driver alive");
    let paused = *rx.borrow_and_update();
    assert_eq!(paused.state, RunState::Paused);
    assert!(paused.remaining > Duration::ZERO);

    driver.resume().expect("resume");
    let view = wait_for_rollover(&mut rx).await;
    assert_eq!(view.step, Step::ShortBreak);
    assert_eq!(view.completed_cycles, 1);
}

/// Invalid commands surface through the driver unchanged and leave published
/// state untouched.
#[tokio::test]
async fn invalid_commands_propagate_through_driver() {
    let mut driver = CountdownDriver::new(fast_config()).expect("driver");

    let err = driver.resume().expect_err("resume while idle rejected");
    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            state: RunState::NotStarted,
            ..
        }
    ));
    assert_eq!(driver.view().state, RunState::NotStarted);

    driver.start().expect("start");
    driver.start().expect_err("double start rejected");
    driver.stop();
    assert_eq!(driver.view().completed_cycles, 0);
    assert_eq!(driver.view().state, RunState::NotStarted);
}
