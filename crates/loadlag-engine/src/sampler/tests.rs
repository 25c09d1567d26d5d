use std::time::Duration;

use super::*;
use crate::config::FALLBACK_URL;
use crate::error::NavigationError;
use crate::report::Frontend;
use crate::testing::{ManualTimers, ScriptedNavigator};

type Sampler = LagSampler<ScriptedNavigator, ManualTimers, Frontend>;

fn ms(v: u64) -> Duration { Duration::from_millis(v) }

fn sampler(loading_polls: usize) -> Sampler {
    LagSampler::new(
        ScriptedNavigator::loading_for(loading_polls),
        ManualTimers::new(),
        Frontend::new(),
    )
}

fn started(loading_polls: usize) -> Sampler {
    let mut s = sampler(loading_polls);
    s.start(&Target::Fallback).unwrap();
    s
}

/// Lets the most recently armed timer fire `after` it was armed.
fn fire_after(s: &mut Sampler, after: Duration) -> SamplerState {
    let t = s.timers().last_armed().expect("a timer is armed");
    s.timers_mut().advance(after);
    s.on_timer(t.id).unwrap()
}

fn lag_ms(s: &Sampler) -> Vec<u128> {
    s.sink().report().loadlag.iter().map(|d| d.as_millis()).collect()
}

// ── start ─────────────────────────────────────────────────────────────────

#[test]
fn start_navigates_to_instrumented_url() {
    let mut s = sampler(1);
    s.start(&Target::from_flags(true, Some("example.org"))).unwrap();
    assert_eq!(
        s.navigator().loaded(),
        ["http://example.org/startup_test/fennecmark/wikipedia.html"]
    );
    assert_eq!(s.url(), Some("http://example.org/startup_test/fennecmark/wikipedia.html"));
}

#[test]
fn start_navigates_to_fallback_url() {
    let s = started(1);
    assert_eq!(s.navigator().loaded(), [FALLBACK_URL]);
    assert!(matches!(s.state(), SamplerState::Sampling { .. }));
}

#[test]
fn start_twice_is_rejected() {
    let mut s = started(3);
    let before = s.state();
    let err = s.start(&Target::Fallback).unwrap_err();
    assert_eq!(err, SamplerError::AlreadyStarted { state: before });
    assert_eq!(s.navigator().loaded().len(), 1);
    assert_eq!(s.timers().armed().len(), 1);
}

#[test]
fn navigation_failure_propagates_and_arms_nothing() {
    let mut s = LagSampler::new(
        ScriptedNavigator::failing("offline"),
        ManualTimers::new(),
        Frontend::new(),
    );
    let err = s.start(&Target::Fallback).unwrap_err();
    assert_eq!(err, SamplerError::Navigation(NavigationError::new(FALLBACK_URL, "offline")));
    assert_eq!(s.state(), SamplerState::Idle);
    assert!(s.timers().armed().is_empty());
    assert_eq!(s.navigator().polls(), 0);
}

// ── sampling ──────────────────────────────────────────────────────────────

#[test]
fn arms_one_tick_per_loading_poll_then_one_settle() {
    let mut s = started(3);
    for _ in 0..3 {
        fire_after(&mut s, ms(100));
    }
    assert!(matches!(s.state(), SamplerState::Settling { .. }));
    assert_eq!(s.timers().armed_with_delay(ms(100)), 3);
    assert_eq!(s.timers().armed_with_delay(ms(5000)), 1);
    assert_eq!(s.navigator().polls(), 4);

    assert_eq!(fire_after(&mut s, ms(5000)), SamplerState::Done);
    assert_eq!(s.sink().completed().len(), 1);
    assert_eq!(s.timers().armed().len(), 4);
}

#[test]
fn late_tick_records_overshoot_early_tick_does_not() {
    // Loading, loading, then idle.
    let mut s = started(2);
    fire_after(&mut s, ms(130));
    fire_after(&mut s, ms(90));
    assert_eq!(lag_ms(&s), vec![30]);
    assert!(matches!(s.state(), SamplerState::Settling { .. }));
}

#[test]
fn only_strictly_positive_overshoots_are_recorded() {
    let delays = [0, 99, 100, 101, 250, 50];
    let mut s = started(delays.len());
    for d in delays {
        fire_after(&mut s, ms(d));
    }
    assert_eq!(lag_ms(&s), vec![1, 150]);
    assert!(s.sink().report().loadlag.iter().all(|d| !d.is_zero()));
}

#[test]
fn sub_millisecond_overshoot_is_kept() {
    let mut s = started(1);
    fire_after(&mut s, Duration::from_micros(100_500));
    assert_eq!(s.sink().report().loadlag, vec![Duration::from_micros(500)]);
}

#[test]
fn tick_interval_stays_nominal_after_lag() {
    let mut s = started(3);
    fire_after(&mut s, ms(400));
    fire_after(&mut s, ms(250));
    let delays: Vec<Duration> = s.timers().armed().iter().map(|t| t.delay).collect();
    assert_eq!(delays, vec![ms(100), ms(100), ms(100)]);
}

#[test]
fn custom_tick_interval_is_used() {
    let timing = SamplerTiming::default().with_tick_interval(ms(50));
    let mut s = LagSampler::with_timing(
        ScriptedNavigator::loading_for(1),
        ManualTimers::new(),
        Frontend::new(),
        timing,
    );
    s.start(&Target::Fallback).unwrap();
    assert_eq!(s.timers().last_armed().unwrap().delay, ms(50));
    fire_after(&mut s, ms(80));
    assert_eq!(lag_ms(&s), vec![30]);
}

#[test]
fn stale_timer_is_ignored() {
    let mut s = started(3);
    let before = s.state();
    assert_eq!(s.on_timer(TimerId(999)).unwrap(), before);
    assert_eq!(s.timers().armed().len(), 1);
    assert!(s.sink().report().is_empty());
}

// ── settling ──────────────────────────────────────────────────────────────

#[test]
fn settle_timer_armed_when_load_already_done() {
    let s = started(0);
    let armed = s.timers().armed();
    assert_eq!(armed.len(), 1);
    assert_eq!(armed[0].delay, ms(5000));
    assert_eq!(s.state(), SamplerState::Settling { timer: armed[0].id });
}

#[test]
fn settle_delay_counts_from_first_idle_poll() {
    let mut s = started(2);
    fire_after(&mut s, ms(120));
    fire_after(&mut s, ms(100));
    let settle = s.timers().last_armed().unwrap();
    assert_eq!(settle.delay, ms(5000));
    assert_eq!(settle.armed_at, ms(220));
}

#[test]
fn load_time_reported_once() {
    let mut s = started(2);
    fire_after(&mut s, ms(120));
    fire_after(&mut s, ms(100));
    assert_eq!(s.sink().report().load_time, Some(ms(220)));
    fire_after(&mut s, ms(5000));
    assert_eq!(s.sink().completed()[0].load_time, Some(ms(220)));
}

#[test]
fn next_test_called_once_and_loop_ends() {
    let mut s = started(1);
    fire_after(&mut s, ms(100));
    let settle = s.timers().last_armed().unwrap();
    fire_after(&mut s, ms(5000));
    assert_eq!(s.state(), SamplerState::Done);

    // Redelivering the settle handle must not re-arm or re-report.
    assert_eq!(s.on_timer(settle.id).unwrap(), SamplerState::Done);
    assert_eq!(s.timers().armed().len(), 2);
    assert_eq!(s.sink().completed().len(), 1);
}

// ── stop ──────────────────────────────────────────────────────────────────

#[test]
fn stop_while_sampling_clears_pending_timer() {
    let mut s = started(5);
    let pending = s.state().pending_timer().unwrap();
    assert_eq!(s.stop(), SamplerState::Aborted(AbortReason::Stopped));
    assert_eq!(s.timers().cleared(), [pending]);
    assert!(s.sink().completed().is_empty());

    assert_eq!(
        s.on_timer(pending).unwrap(),
        SamplerState::Aborted(AbortReason::Stopped)
    );
    assert_eq!(s.timers().armed().len(), 1);
}

#[test]
fn stop_while_settling_skips_next_test() {
    let mut s = started(0);
    let settle = s.state().pending_timer().unwrap();
    s.stop();
    assert_eq!(s.timers().cleared(), [settle]);
    s.timers_mut().advance(ms(5000));
    s.on_timer(settle).unwrap();
    assert!(s.sink().completed().is_empty());
}

#[test]
fn stop_before_start_aborts() {
    let mut s = sampler(1);
    assert_eq!(
        s.dispatch(SamplerEvent::Stop).unwrap(),
        SamplerState::Aborted(AbortReason::Stopped)
    );
    assert!(s.timers().cleared().is_empty());
    assert!(s.start(&Target::Fallback).is_err());
}

#[test]
fn stop_after_done_is_noop() {
    let mut s = started(0);
    fire_after(&mut s, ms(5000));
    assert_eq!(s.stop(), SamplerState::Done);
    assert!(s.timers().cleared().is_empty());
}

// ── load deadline ─────────────────────────────────────────────────────────

#[test]
fn stuck_load_samples_until_stopped_without_deadline() {
    let mut s = LagSampler::new(ScriptedNavigator::stuck(), ManualTimers::new(), Frontend::new());
    s.start(&Target::Fallback).unwrap();
    for _ in 0..50 {
        fire_after(&mut s, ms(100));
    }
    assert!(matches!(s.state(), SamplerState::Sampling { .. }));
    assert_eq!(s.timers().armed().len(), 51);
}

#[test]
fn load_deadline_aborts_stuck_load() {
    let timing = SamplerTiming::default().with_load_deadline(ms(250));
    let mut s = LagSampler::with_timing(
        ScriptedNavigator::stuck(),
        ManualTimers::new(),
        Frontend::new(),
        timing,
    );
    s.start(&Target::Fallback).unwrap();
    fire_after(&mut s, ms(100));
    fire_after(&mut s, ms(100));
    let state = fire_after(&mut s, ms(100));

    assert_eq!(state, SamplerState::Aborted(AbortReason::LoadDeadline));
    assert_eq!(s.timers().armed_with_delay(ms(100)), 3);
    assert_eq!(s.timers().armed_with_delay(ms(5000)), 0);
    assert!(s.sink().completed().is_empty());
    assert_eq!(s.sink().report().load_time, None);
}
