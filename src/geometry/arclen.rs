//! Arc-length ↔ parametric-time conversions shared by the satellite
//! model and the offset engine.

use super::seg::PathSeg;
use crate::math::TOLERANCE;

/// Returns the parametric time at which the accumulated arc length from
/// the segment's start equals `a`.
///
/// Degenerate segments and `a <= 0` return 0. Line and circular-arc
/// segments are linearly parameterized by length, so the time is the
/// direct proportion `a / length` (also used as a fast path for queries
/// at or beyond the total length, where it may exceed 1). Cubics are
/// solved by bisection on the accumulated length.
#[must_use]
pub fn time_at_arc_length(a: f64, seg: &PathSeg) -> f64 {
    if a <= 0.0 || seg.is_degenerate() {
        return 0.0;
    }
    let len = seg.length();
    if len < TOLERANCE {
        return 0.0;
    }
    if seg.is_line_segment() || matches!(seg, PathSeg::Arc { .. }) || a >= len {
        return a / len;
    }

    // Cubic: bisection on f(t) = length(portion(0, t)) - a, monotone in t.
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..40 {
        let mid = (lo + hi) * 0.5;
        let s = seg.portion(0.0, mid).length();
        if s < a {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-9 {
            break;
        }
    }
    (lo + hi) * 0.5
}

/// Returns the arc length of the sub-segment `portion(0, t)`.
///
/// Degenerate segments and `t <= 0` return 0. Queries past `t = 1` and
/// line/arc segments use the linear form `t * length`.
#[must_use]
pub fn arc_length_at(t: f64, seg: &PathSeg) -> f64 {
    if t <= 0.0 || seg.is_degenerate() {
        return 0.0;
    }
    let len = seg.length();
    if seg.is_line_segment() || matches!(seg, PathSeg::Arc { .. }) || t > 1.0 {
        return t * len;
    }
    seg.portion(0.0, t).length()
}
