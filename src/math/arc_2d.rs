/// 2D arc/bulge math utilities.
///
/// Bulge convention: `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::PI;

use super::{Point2, Vector2, TOLERANCE};

/// Center-radius-angle form of a circular arc.
///
/// `sweep` is signed: positive for counter-clockwise, negative for clockwise.
#[derive(Debug, Clone, Copy)]
pub struct ArcGeom {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcGeom {
    /// Converts a bulge-defined arc segment to center-radius-angle form.
    ///
    /// Returns a degenerate arc (zero radius, zero sweep) for zero-length
    /// chords.
    #[must_use]
    pub fn from_bulge(p0: Point2, p1: Point2, bulge: f64) -> Self {
        let chord = p1 - p0;
        let chord_len = chord.norm();

        if chord_len < 1e-12 || bulge.abs() < 1e-12 {
            return Self {
                center: p0,
                radius: 0.0,
                start_angle: 0.0,
                sweep: 0.0,
            };
        }

        // Distance from chord midpoint to center, as a fraction of the
        // half-chord. For positive bulge the center is left of the chord.
        let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
        let mid = Point2::new((p0.x + p1.x) * 0.5, (p0.y + p1.y) * 0.5);
        let normal = Vector2::new(-chord.y / chord_len, chord.x / chord_len);
        let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

        // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
        let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());

        let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
        let sweep = 4.0 * bulge.atan();

        // Normalize sweep to [-2π, 2π].
        let sweep = if sweep > 2.0 * PI {
            sweep - 2.0 * PI
        } else if sweep < -2.0 * PI {
            sweep + 2.0 * PI
        } else {
            sweep
        };

        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Builds a full circle centered at `center`.
    #[must_use]
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius,
            start_angle: -PI,
            sweep: 2.0 * PI,
        }
    }

    /// Returns true when the arc carries no usable geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.radius < 1e-12 || self.sweep.abs() < 1e-12
    }

    /// Evaluates a point on the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Computes the unit tangent direction at parameter `t` in `[0, 1]`.
    ///
    /// The tangent points in the direction of increasing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }

    /// Returns the arc length: `radius * |sweep|`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
    ///
    /// Returns `None` if the angle is not within the arc's angular range.
    #[must_use]
    pub fn time_of_angle(&self, angle: f64) -> Option<f64> {
        let eps = TOLERANCE * 100.0;
        if self.sweep.abs() < TOLERANCE {
            return None;
        }

        // Angular offset from start_angle in the sweep direction.
        let mut delta = angle - self.start_angle;
        if self.sweep > 0.0 {
            while delta < -eps {
                delta += 2.0 * PI;
            }
            while delta > 2.0 * PI + eps {
                delta -= 2.0 * PI;
            }
        } else {
            while delta > eps {
                delta -= 2.0 * PI;
            }
            while delta < -2.0 * PI - eps {
                delta += 2.0 * PI;
            }
        }

        let t = delta / self.sweep;
        if t >= -eps && t <= 1.0 + eps {
            Some(t.clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

/// Computes the bulge for a sub-arc spanning parameter range `[t0, t1]`.
///
/// For near-zero bulges returns 0; otherwise `tan(sub_sweep / 4)` where
/// `sub_sweep = sweep * (t1 - t0)`.
#[must_use]
pub fn sub_bulge(bulge: f64, t0: f64, t1: f64) -> f64 {
    if bulge.abs() < 1e-12 {
        return 0.0;
    }
    let sweep = 4.0 * bulge.atan();
    let sub_sweep = sweep * (t1 - t0);
    (sub_sweep / 4.0).tan()
}

/// Computes the bulge of the arc from `p0` to `p1` whose start tangent is
/// `tangent`.
///
/// The angle between start tangent and chord equals half the arc's sweep,
/// so `bulge = tan(angle / 2)` with the sign of the turn.
#[must_use]
pub fn bulge_from_chord_tangent(tangent: Vector2, chord: Vector2) -> f64 {
    let cross = tangent.x * chord.y - tangent.y * chord.x;
    let dot = tangent.x * chord.x + tangent.y * chord.y;
    if cross.abs() < 1e-12 && dot.abs() < 1e-12 {
        return 0.0;
    }
    let half_sweep = cross.atan2(dot);
    (half_sweep / 2.0).tan()
}

/// Offsets an arc segment defined by endpoints and bulge.
///
/// For an inward offset (toward center), the radius decreases.
/// Returns `None` if the offset radius would be ≤ 0 (arc collapses).
///
/// Returns `(p0', p1', bulge')`.
#[must_use]
pub fn offset_arc_segment(
    p0: Point2,
    p1: Point2,
    bulge: f64,
    distance: f64,
) -> Option<(Point2, Point2, f64)> {
    let arc = ArcGeom::from_bulge(p0, p1, bulge);
    if arc.radius < 1e-12 {
        return None;
    }

    // Positive distance = left offset.
    // For CCW arc (bulge > 0) the center lies left of travel, so a left
    // offset moves toward the center (radius decreases). CW is the mirror.
    let sign = if bulge > 0.0 { -1.0 } else { 1.0 };
    let new_radius = arc.radius + sign * distance;

    if new_radius <= 1e-12 {
        return None;
    }

    // New endpoints: same angles, new radius.
    let end_angle = arc.start_angle + arc.sweep;
    let q0 = Point2::new(
        arc.center.x + new_radius * arc.start_angle.cos(),
        arc.center.y + new_radius * arc.start_angle.sin(),
    );
    let q1 = Point2::new(
        arc.center.x + new_radius * end_angle.cos(),
        arc.center.y + new_radius * end_angle.sin(),
    );

    // Bulge is invariant to radius changes (same sweep angle).
    Some((q0, q1, bulge))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn semicircle_ccw() {
        // CCW semicircle from (0,0) to (2,0), bulge=1.
        // Center at (1,0), radius=1, sweep=+π.
        // Arc goes from angle π → 3π/2 → 2π (through bottom).
        let arc = ArcGeom::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0);
        assert!((arc.center.x - 1.0).abs() < TOL, "cx={}", arc.center.x);
        assert!(arc.center.y.abs() < TOL, "cy={}", arc.center.y);
        assert!((arc.radius - 1.0).abs() < TOL, "r={}", arc.radius);
        assert!((arc.sweep - PI).abs() < TOL, "sweep={}", arc.sweep);

        let p0 = arc.point_at(0.0);
        assert!(p0.x.abs() < TOL, "p0.x={}", p0.x);
        assert!(p0.y.abs() < TOL, "p0.y={}", p0.y);

        let p1 = arc.point_at(1.0);
        assert!((p1.x - 2.0).abs() < TOL, "p1.x={}", p1.x);
        assert!(p1.y.abs() < TOL, "p1.y={}", p1.y);

        // Midpoint at angle 3π/2 → (1, -1) (through bottom for CCW)
        let pm = arc.point_at(0.5);
        assert!((pm.x - 1.0).abs() < TOL, "pm.x={}", pm.x);
        assert!((pm.y + 1.0).abs() < TOL, "pm.y={}", pm.y);
    }

    #[test]
    fn semicircle_cw_goes_through_top() {
        // CW semicircle from (0,0) to (2,0), bulge=-1.
        // Sweep=-π, arc goes π → π/2 → 0 (through top).
        let arc = ArcGeom::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), -1.0);
        assert!((arc.sweep + PI).abs() < TOL, "sweep={}", arc.sweep);

        let pm = arc.point_at(0.5);
        assert!((pm.x - 1.0).abs() < TOL, "pm.x={}", pm.x);
        assert!((pm.y - 1.0).abs() < TOL, "pm.y={}", pm.y);
    }

    #[test]
    fn quarter_circle_ccw() {
        // CCW quarter circle from (1,0) to (0,1), center at origin.
        let bulge = (PI / 8.0).tan();
        let arc = ArcGeom::from_bulge(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), bulge);
        assert!((arc.radius - 1.0).abs() < 1e-6, "r={}", arc.radius);
        assert!(arc.center.x.abs() < 1e-6, "cx={}", arc.center.x);
        assert!(arc.center.y.abs() < 1e-6, "cy={}", arc.center.y);
        assert!((arc.sweep - PI / 2.0).abs() < 1e-6, "sweep={}", arc.sweep);

        // Midpoint at angle π/4.
        let pm = arc.point_at(0.5);
        let expected = (PI / 4.0).cos();
        assert!((pm.x - expected).abs() < 1e-6, "pm.x={}", pm.x);
        assert!((pm.y - expected).abs() < 1e-6, "pm.y={}", pm.y);
    }

    #[test]
    fn arc_tangent_is_unit_and_correct() {
        // CCW semicircle from (0,0) to (2,0): at t=0 the tangent points
        // downward into the bottom semicircle.
        let arc = ArcGeom::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0);
        let t0 = arc.tangent_at(0.0);
        assert!((t0.norm() - 1.0).abs() < TOL, "tangent not unit: len={}", t0.norm());
        assert!(t0.x.abs() < TOL, "tx={}", t0.x);
        assert!((t0.y + 1.0).abs() < TOL, "ty={}", t0.y);
    }

    #[test]
    fn arc_length_semicircle() {
        let arc = ArcGeom::from_bulge(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0);
        assert!((arc.length() - PI).abs() < TOL, "len={}", arc.length());
    }

    #[test]
    fn time_of_angle_in_and_out_of_range() {
        // CCW quarter arc covering [0, π/2].
        let arc = ArcGeom {
            center: Point2::new(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI / 2.0,
        };
        let t = arc.time_of_angle(PI / 4.0).unwrap();
        assert!((t - 0.5).abs() < 1e-9, "t={t}");
        assert!(arc.time_of_angle(PI).is_none());
    }

    #[test]
    fn sub_bulge_halves_sweep() {
        // Semicircle bulge=1 (sweep π); half of it is a quarter arc.
        let b = sub_bulge(1.0, 0.0, 0.5);
        let expected = (PI / 8.0).tan();
        assert!((b - expected).abs() < TOL, "b={b}");
    }

    #[test]
    fn sub_bulge_line_stays_zero() {
        assert!(sub_bulge(0.0, 0.2, 0.8).abs() < TOL);
    }

    #[test]
    fn bulge_from_chord_tangent_quarter_turn() {
        // Start tangent +x, chord at 45° → half sweep = π/4 → bulge = tan(π/8).
        let b = bulge_from_chord_tangent(Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0));
        assert!((b - (PI / 8.0).tan()).abs() < 1e-9, "b={b}");
    }

    #[test]
    fn bulge_from_chord_tangent_straight() {
        let b = bulge_from_chord_tangent(Vector2::new(1.0, 0.0), Vector2::new(2.0, 0.0));
        assert!(b.abs() < TOL, "b={b}");
    }

    #[test]
    fn offset_arc_left_shrinks_ccw() {
        // CCW semicircle from (0,0) to (2,0), radius=1, center=(1,0).
        // Left offset by 0.5 moves toward the center: new radius = 0.5.
        let result = offset_arc_segment(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, 0.5);
        assert!(result.is_some());
        let (q0, q1, b) = result.unwrap();
        assert!((b - 1.0).abs() < TOL, "bulge={b}");
        let arc = ArcGeom::from_bulge(q0, q1, b);
        assert!((arc.radius - 0.5).abs() < 1e-6, "new_r={}", arc.radius);
    }

    #[test]
    fn offset_arc_right_grows_ccw() {
        let result = offset_arc_segment(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, -0.5);
        assert!(result.is_some());
        let (q0, q1, b) = result.unwrap();
        let arc = ArcGeom::from_bulge(q0, q1, b);
        assert!((arc.radius - 1.5).abs() < 1e-6, "new_r={}", arc.radius);
    }

    #[test]
    fn offset_arc_collapse() {
        // CCW semicircle radius=1. Left offset by 1.5 passes the center → collapses.
        let result = offset_arc_segment(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, 1.5);
        assert!(result.is_none());
    }
}
