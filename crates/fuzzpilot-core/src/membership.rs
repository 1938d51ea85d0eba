//! Trapezoidal membership function.

use fuzzpilot_types::Trapezoid;

/// Degree to which `x` belongs to the fuzzy set described by `t`.
///
/// - `0` when `x <= a` or `x >= d`
/// - `1` when `b <= x <= c`
/// - `(x - a) / (b - a)` on the rising edge `(a, b)`
/// - `(d - x) / (d - c)` on the falling edge `(c, d)`
///
/// The result is always in `[0, 1]` for a well-formed trapezoid. A zero
/// width edge can only be reached through the equality checks above, but
/// is still guarded and yields 1.
pub fn membership(x: f64, t: &Trapezoid) -> f64 {
    if x <= t.a || x >= t.d {
        return 0.0;
    }
    if t.b <= x && x <= t.c {
        return 1.0;
    }
    if x < t.b {
        let rise = t.b - t.a;
        if rise <= 0.0 {
            return 1.0;
        }
        return (x - t.a) / rise;
    }
    let fall = t.d - t.c;
    if fall <= 0.0 {
        return 1.0;
    }
    (t.d - x) / fall
}
