use super::*;

#[test]
fn interval_fires_on_multiples() {
    let policy = IntervalSyncPolicy::default();
    assert!(policy.should_flush(10, 0));
    assert!(policy.should_flush(20, 10));
    assert!(!policy.should_flush(9, 0));
    assert!(!policy.should_flush(11, 10));
    assert!(!policy.should_flush(19, 10));
}

#[test]
fn interval_fires_on_divergence() {
    let policy = IntervalSyncPolicy::default();
    // Not a multiple of 10, but 50 ahead of durable state.
    assert!(policy.should_flush(51, 1));
    assert!(policy.should_flush(123, 7));
    assert!(!policy.should_flush(49, 0));
}

#[test]
fn interval_handles_values_below_zero() {
    let policy = IntervalSyncPolicy::default();
    // After a reset to a negative value the modulo rule still fires on
    // multiples of the interval.
    assert!(policy.should_flush(-10, -12));
    assert!(!policy.should_flush(-11, -12));
}

#[test]
fn custom_parameters_are_respected() {
    let policy = IntervalSyncPolicy::new(1_000_000, 50);
    assert!(!policy.should_flush(49, 0));
    assert!(policy.should_flush(50, 0));
}

#[test]
#[should_panic(expected = "interval must be at least 1")]
fn zero_interval_is_rejected() {
    let _ = IntervalSyncPolicy::new(0, 50);
}

#[test]
fn eager_always_fires() {
    let policy = EagerSyncPolicy;
    assert!(policy.should_flush(1, 0));
    assert!(policy.should_flush(-7, 100));
}
