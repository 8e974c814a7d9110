//! Mathematical utility functions for the melting parameterization
//!
//! Small closed-form building blocks shared by the phase boundaries, the
//! melt fraction regimes and the averaging code.

/// Panic unless `actual` is within `max_percent` of `expected`.
///
/// Used to compare the parameterization against published experimental fits,
/// where agreement is a matter of a few percent. An optional trailing format
/// string labels the failing case.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_percent:expr $(, $($label:tt)+)?) => {{
        let (actual, expected, max_percent): (f64, f64, f64) = ($actual, $expected, $max_percent);
        let percent = $crate::math_utils::deviation(actual, expected);
        if !(percent < max_percent) {
            let label: String = String::new() $(+ &format!($($label)+))?;
            panic!(
                "assertion failed: deviation {percent:.2}% >= {max_percent:.2}% {label}\n  \
                 actual: {actual:?}\n  expected: {expected:?}"
            );
        }
    }};
}

/// Evaluate `c0 + c1·x + c2·x²`
///
/// # Examples
/// ```
/// use peridotite_melt::math_utils::quadratic;
///
/// assert_eq!(quadratic(1.0, 2.0, 3.0, 0.0), 1.0);
/// assert_eq!(quadratic(1.0, 2.0, 3.0, 2.0), 17.0);
/// ```
#[inline]
pub fn quadratic(c0: f64, c1: f64, c2: f64, x: f64) -> f64 {
    c0 + c1 * x + c2 * x * x
}

/// Where `value` sits inside `[a, b]`, clamped to `[0, 1]`.
///
/// A collapsed or inverted range (`b <= a`) is a step at `a`: anything above
/// `a` is 1.0, anything at or below it 0.0.
///
/// # Examples
/// ```
/// use peridotite_melt::math_utils::unit_ratio;
///
/// assert_eq!(unit_ratio(1000.0, 1200.0, 1100.0), 0.5);
/// assert_eq!(unit_ratio(1000.0, 1200.0, 1300.0), 1.0);
/// assert_eq!(unit_ratio(1000.0, 1000.0, 1000.5), 1.0);
/// ```
#[inline]
pub fn unit_ratio(a: f64, b: f64, value: f64) -> f64 {
    if b <= a {
        return if value > a { 1.0 } else { 0.0 };
    }
    clamp_unit((value - a) / (b - a))
}

/// Clamp into `[0, 1]`. NaN maps to 0.0.
///
/// # Examples
/// ```
/// use peridotite_melt::math_utils::clamp_unit;
///
/// assert_eq!(clamp_unit(1.0000000001), 1.0);
/// assert_eq!(clamp_unit(-0.25), 0.0);
/// ```
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value > 1.0 {
        1.0
    } else if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Relative difference from `expected`, in percent.
///
/// A zero reference only matches zero; anything else is infinitely far off.
///
/// ```
/// use peridotite_melt::math_utils::deviation;
///
/// assert_eq!(deviation(1100.0, 1000.0), 10.0);
/// assert_eq!(deviation(0.0, 0.0), 0.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        return if actual == 0.0 { 0.0 } else { f64::INFINITY };
    }
    100.0 * ((actual - expected) / expected).abs()
}
