//! Integration tests for Clock and TaskGate

use heater_control::{Clock, Millis, TaskGate};

/// Polls a gate along a run of real time, feeding it the wrapped 32-bit counter, and returns
/// the real times at which it fired.
fn fire_times(interval_ms: u32, start: u64, duration: u64, poll_step: u64) -> Vec<u64> {
    let mut gate = TaskGate::new(interval_ms).starting_at(Millis(start as u32));
    let mut fired = Vec::new();
    let mut t = start;
    while t < start + duration {
        if gate.should_fire(Millis(t as u32)) {
            fired.push(t);
        }
        t += poll_step;
    }
    fired
}

#[test]
fn consecutive_firings_are_at_least_one_interval_apart() {
    for &(interval, step) in &[(100u32, 1u64), (100, 7), (25, 3), (1000, 13)] {
        let fired = fire_times(interval, 0, 20_000, step);
        assert!(!fired.is_empty());
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= interval as u64, "{:?}", pair);
        }
    }
}

#[test]
fn firing_interval_holds_across_counter_wraparound() {
    let start = u32::MAX as u64 - 1_234;
    for &(interval, step) in &[(100u32, 1u64), (100, 7), (250, 11)] {
        let fired = fire_times(interval, start, 10_000, step);
        // The counter wraps about 1.2 s into the run; firing must continue after it.
        assert!(fired.iter().any(|&t| t > u32::MAX as u64 + 2_000));
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= interval as u64, "{:?}", pair);
        }
    }
}

#[test]
fn gate_keeps_firing_steadily_when_polled_fast() {
    let fired = fire_times(100, 0, 1_001, 1);
    assert_eq!(fired, vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]);
}

#[test]
fn wraparound_costs_at_most_one_long_interval() {
    let start = u32::MAX as u64 - 50;
    let fired = fire_times(100, start, 2_000, 1);
    let long_gaps = fired.windows(2).filter(|pair| pair[1] - pair[0] > 100).count();
    assert!(long_gaps <= 1);
}

#[test]
fn clock_reanchors_when_counter_is_behind_reference() {
    let mut reference = Millis(4_000_000_000);
    assert_eq!(Clock::elapsed(&mut reference, Millis(5)), 0);
    assert_eq!(reference, Millis(5));
}
