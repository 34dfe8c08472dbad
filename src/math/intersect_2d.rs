use super::arc_2d::ArcGeom;
use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: Point2,
    d1: Vector2,
    p2: Point2,
    d2: Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: Point2,
    a1: Point2,
    b0: Point2,
    b1: Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = (dx * db.y - dy * db.x) / cross;
    let u = (dx * da.y - dy * da.x) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        let pt = a0 + da * t_clamped;
        Some((pt, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of a line segment `a0 → a1` with a circular arc.
///
/// Returns a vector of `(point, t_seg, t_arc)` where both parameters are
/// in `[0, 1]`.
#[must_use]
pub fn line_arc_intersect_2d(a0: Point2, a1: Point2, arc: &ArcGeom) -> Vec<(Point2, f64, f64)> {
    let mut results = Vec::new();
    if arc.radius < TOLERANCE || arc.sweep.abs() < TOLERANCE {
        return results;
    }

    let d = a1 - a0;
    let seg_len_sq = d.norm_squared();
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute parametric line into circle equation:
    // (a0 + t*d - c)² = r²
    let f = a0 - arc.center;
    let a = seg_len_sq;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - arc.radius * arc.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let eps = TOLERANCE;
    let t_roots = if disc_sqrt < TOLERANCE * 100.0 {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t_seg in t_roots {
        if t_seg < -eps || t_seg > 1.0 + eps {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);
        let p = a0 + d * t_seg;

        let angle = (p.y - arc.center.y).atan2(p.x - arc.center.x);
        if let Some(t_arc) = arc.time_of_angle(angle) {
            results.push((p, t_seg, t_arc));
        }
    }

    results
}

/// Intersection of two circular arcs in 2D.
///
/// Returns a vector of `(point, t1, t2)` where `t1` and `t2` are arc
/// parameters in `[0, 1]`.
#[must_use]
pub fn arc_arc_intersect_2d(arc1: &ArcGeom, arc2: &ArcGeom) -> Vec<(Point2, f64, f64)> {
    let mut results = Vec::new();
    if arc1.radius < TOLERANCE || arc2.radius < TOLERANCE {
        return results;
    }

    let d = arc2.center - arc1.center;
    let dist_sq = d.norm_squared();
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE {
        // Concentric circles — no intersection points (or infinite if same radius).
        return results;
    }

    // Check if circles intersect.
    let sum = arc1.radius + arc2.radius;
    let diff = (arc1.radius - arc2.radius).abs();
    if dist > sum + TOLERANCE || dist < diff - TOLERANCE {
        return results;
    }

    // Distance from center 1 along the center line to the radical line.
    let a = (arc1.radius * arc1.radius - arc2.radius * arc2.radius + dist_sq) / (2.0 * dist);
    let h_sq = arc1.radius * arc1.radius - a * a;
    if h_sq < -TOLERANCE {
        return results;
    }
    let h = h_sq.max(0.0).sqrt();

    // Midpoint on the radical line.
    let m = arc1.center + d * (a / dist);

    // Perpendicular direction.
    let perp = Vector2::new(-d.y / dist, d.x / dist);

    // Two candidate intersection points (or one if tangent).
    let candidates = if h < TOLERANCE {
        vec![m]
    } else {
        vec![m + perp * h, m - perp * h]
    };

    let eps = TOLERANCE;
    for p in candidates {
        let angle1 = (p.y - arc1.center.y).atan2(p.x - arc1.center.x);
        let angle2 = (p.y - arc2.center.y).atan2(p.x - arc2.center.x);

        let t1 = arc1.time_of_angle(angle1);
        let t2 = arc2.time_of_angle(angle2);

        if let (Some(t1), Some(t2)) = (t1, t2) {
            // Verify the point is close to both arcs.
            let d1 = (p - arc1.center).norm();
            let d2 = (p - arc2.center).norm();
            if (d1 - arc1.radius).abs() < eps && (d2 - arc2.radius).abs() < eps {
                results.push((p, t1, t2));
            }
        }
    }

    results
}

/// Finds the first crossing between two polylines, walking `a` in order.
///
/// Returns the intersection point closest to the start of `a`, or `None`
/// if the polylines do not cross.
#[must_use]
pub fn polyline_first_crossing(a: &[Point2], b: &[Point2]) -> Option<Point2> {
    for wa in a.windows(2) {
        let mut best: Option<(f64, Point2)> = None;
        for wb in b.windows(2) {
            if let Some((p, t, _)) = segment_segment_intersect_2d(wa[0], wa[1], wb[0], wb[1]) {
                match best {
                    Some((bt, _)) if bt <= t => {}
                    _ => best = Some((t, p)),
                }
            }
        }
        if let Some((_, p)) = best {
            return Some(p);
        }
    }
    None
}
