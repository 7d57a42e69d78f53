/// Check whether two floats agree to within a relative tolerance of 5e-5,
/// scaled by the larger magnitude of the two.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($expected:expr, $actual:expr, $msg:expr) => {{
        let expected: f64 = $expected;
        let actual: f64 = $actual;
        let scale = f64::max(expected.abs(), actual.abs());
        assert!(
            (expected - actual).abs() <= 0.00005 * scale,
            "{}: expected {expected}, got {actual}",
            $msg
        );
    }};
}
