/// Check whether two floats differ by at most 5e-5 times the larger magnitude, or by at most 1e-12 when both are near
/// zero.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let diff = (a - b).abs();
        let scale = a.abs().max(b.abs());
        assert!(diff <= 1e-12 || diff <= scale * 0.00005, "{}: {} vs {}", $msg, a, b);
    }};
}
