use super::arc_2d::ArcGeom;
use super::Point2;

/// Returns the minimum distance from point `p` to the line segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: Point2, a: Point2, b: Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the minimum distance from point `p` to a circular arc.
///
/// If the point's angle (relative to the center) falls within the arc
/// range, the distance is `||p - center| - radius|`. Otherwise it is the
/// minimum of the distances to the two arc endpoints.
#[must_use]
pub fn point_to_arc_dist(p: Point2, arc: &ArcGeom) -> f64 {
    let v = p - arc.center;
    let dist_to_center = v.norm();

    let angle = v.y.atan2(v.x);
    if arc.time_of_angle(angle).is_some() {
        return (dist_to_center - arc.radius).abs();
    }

    // Point is outside the arc's angular range: check the endpoints.
    let d0 = (p - arc.point_at(0.0)).norm();
    let d1 = (p - arc.point_at(1.0)).norm();
    d0.min(d1)
}
