/// 2D cubic Bézier math utilities.
///
/// Control points are `[p0, p1, p2, p3]`; the curve runs from `p0` at
/// `t = 0` to `p3` at `t = 1`.
use super::{Point2, Vector2};

/// Evaluates a point on the cubic at parameter `t` (de Casteljau).
#[must_use]
pub fn point_at(ctrl: &[Point2; 4], t: f64) -> Point2 {
    let a = lerp(ctrl[0], ctrl[1], t);
    let b = lerp(ctrl[1], ctrl[2], t);
    let c = lerp(ctrl[2], ctrl[3], t);
    let ab = lerp(a, b, t);
    let bc = lerp(b, c, t);
    lerp(ab, bc, t)
}

/// Evaluates the first derivative at parameter `t`.
#[must_use]
pub fn derivative_at(ctrl: &[Point2; 4], t: f64) -> Vector2 {
    let u = 1.0 - t;
    let d0 = ctrl[1] - ctrl[0];
    let d1 = ctrl[2] - ctrl[1];
    let d2 = ctrl[3] - ctrl[2];
    (d0 * (u * u) + d1 * (2.0 * u * t) + d2 * (t * t)) * 3.0
}

/// Splits the cubic at `t`, returning the two halves.
#[must_use]
pub fn split(ctrl: &[Point2; 4], t: f64) -> ([Point2; 4], [Point2; 4]) {
    let a = lerp(ctrl[0], ctrl[1], t);
    let b = lerp(ctrl[1], ctrl[2], t);
    let c = lerp(ctrl[2], ctrl[3], t);
    let ab = lerp(a, b, t);
    let bc = lerp(b, c, t);
    let m = lerp(ab, bc, t);
    ([ctrl[0], a, ab, m], [m, bc, c, ctrl[3]])
}

/// Extracts the sub-curve spanning parameter range `[t0, t1]`.
#[must_use]
pub fn portion(ctrl: &[Point2; 4], t0: f64, t1: f64) -> [Point2; 4] {
    let t0 = t0.clamp(0.0, 1.0);
    let t1 = t1.clamp(0.0, 1.0);
    if t1 <= t0 {
        let p = point_at(ctrl, t0);
        return [p, p, p, p];
    }
    let (_, right) = split(ctrl, t0);
    let local = (t1 - t0) / (1.0 - t0);
    let (left, _) = split(&right, local);
    left
}

/// Appends a flattened polyline approximation of the cubic to `out`,
/// excluding the start point.
///
/// `tolerance` bounds the control-net distance from the chord; recursion
/// splits at the midpoint until flat.
pub fn flatten_into(ctrl: &[Point2; 4], tolerance: f64, out: &mut Vec<Point2>) {
    flatten_rec(ctrl, tolerance.max(1e-9), 0, out);
}

fn flatten_rec(ctrl: &[Point2; 4], tolerance: f64, depth: u32, out: &mut Vec<Point2>) {
    const MAX_DEPTH: u32 = 24;
    if depth >= MAX_DEPTH || flatness(ctrl) <= tolerance {
        out.push(ctrl[3]);
        return;
    }
    let (left, right) = split(ctrl, 0.5);
    flatten_rec(&left, tolerance, depth + 1, out);
    flatten_rec(&right, tolerance, depth + 1, out);
}

/// Maximum distance of the interior control points from the chord `p0 → p3`.
fn flatness(ctrl: &[Point2; 4]) -> f64 {
    let chord = ctrl[3] - ctrl[0];
    let len_sq = chord.norm_squared();
    if len_sq < 1e-20 {
        let d1 = (ctrl[1] - ctrl[0]).norm();
        let d2 = (ctrl[2] - ctrl[0]).norm();
        return d1.max(d2);
    }
    let dist = |p: Point2| {
        let v = p - ctrl[0];
        (chord.x * v.y - chord.y * v.x).abs() / len_sq.sqrt()
    };
    dist(ctrl[1]).max(dist(ctrl[2]))
}

/// Computes the arc length by adaptive subdivision.
///
/// Subdivides until the control-polygon length and the chord length agree
/// within `tolerance`.
#[must_use]
pub fn length(ctrl: &[Point2; 4], tolerance: f64) -> f64 {
    length_rec(ctrl, tolerance.max(1e-12), 0)
}

fn length_rec(ctrl: &[Point2; 4], tolerance: f64, depth: u32) -> f64 {
    const MAX_DEPTH: u32 = 24;
    let chord = (ctrl[3] - ctrl[0]).norm();
    let net = (ctrl[1] - ctrl[0]).norm()
        + (ctrl[2] - ctrl[1]).norm()
        + (ctrl[3] - ctrl[2]).norm();
    if depth >= MAX_DEPTH || net - chord <= tolerance {
        return (net + chord) * 0.5;
    }
    let (left, right) = split(ctrl, 0.5);
    length_rec(&left, tolerance * 0.5, depth + 1) + length_rec(&right, tolerance * 0.5, depth + 1)
}

/// Finds the parameter of the point on the cubic nearest to `p`.
///
/// Coarse uniform sampling followed by local ternary refinement; accurate
/// to ~1e-7 in parameter space.
#[must_use]
pub fn nearest_time(ctrl: &[Point2; 4], p: Point2) -> f64 {
    const SAMPLES: u32 = 32;

    let mut best_t = 0.0;
    let mut best_d = f64::MAX;
    for i in 0..=SAMPLES {
        let t = f64::from(i) / f64::from(SAMPLES);
        let d = (point_at(ctrl, t) - p).norm_squared();
        if d < best_d {
            best_d = d;
            best_t = t;
        }
    }

    // Ternary search in the bracketing interval.
    let step = 1.0 / f64::from(SAMPLES);
    let mut lo = (best_t - step).max(0.0);
    let mut hi = (best_t + step).min(1.0);
    for _ in 0..48 {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        let d1 = (point_at(ctrl, m1) - p).norm_squared();
        let d2 = (point_at(ctrl, m2) - p).norm_squared();
        if d1 < d2 {
            hi = m2;
        } else {
            lo = m1;
        }
    }
    (lo + hi) * 0.5
}

fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}
