use super::style::{JoinType, OffsetStyle};
use crate::geometry::PathSeg;
use crate::math::arc_2d::{bulge_from_chord_tangent, ArcGeom};
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, line_line_intersect_2d,
};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Builds the connector segments across a gap corner, from the end of
/// `prev` to the start of `next`, according to the join policy.
///
/// `corner` is the original (un-offset) vertex and `distance` the applied
/// left-signed offset. Joins are only meaningful on the side where the
/// offset segments separate; the overlapping side is welded by the caller.
pub(super) fn gap_join(
    prev: &PathSeg,
    next: &PathSeg,
    corner: Point2,
    distance: f64,
    style: &OffsetStyle,
) -> Vec<PathSeg> {
    let a = prev.end();
    let b = next.start();
    if (b - a).norm() < TOLERANCE {
        return Vec::new();
    }
    let da = prev.tangent_at(1.0);
    let db = next.tangent_at(0.0);

    match style.join() {
        JoinType::Bevel => bevel(a, b),
        JoinType::Round => round(a, b, corner),
        JoinType::Miter => match miter_point(a, da, b, db, corner, distance, style) {
            MiterFit::Point(m) => vec![PathSeg::line(a, m), PathSeg::line(m, b)],
            MiterFit::OverLimit(_) | MiterFit::Parallel => bevel(a, b),
        },
        JoinType::MiterClip => match miter_point(a, da, b, db, corner, distance, style) {
            MiterFit::Point(m) => vec![PathSeg::line(a, m), PathSeg::line(m, b)],
            MiterFit::OverLimit(m) => miter_clip(a, da, b, db, corner, m, distance, style),
            MiterFit::Parallel => bevel(a, b),
        },
        JoinType::Extrapolate
        | JoinType::Extrapolate1
        | JoinType::Extrapolate2
        | JoinType::Extrapolate3 => extrapolate(prev, next, a, da, b, db, corner, style),
    }
}

fn bevel(a: Point2, b: Point2) -> Vec<PathSeg> {
    vec![PathSeg::line(a, b)]
}

/// Circular arc centered on the original vertex, through both gap points.
fn round(a: Point2, b: Point2, corner: Point2) -> Vec<PathSeg> {
    let va = a - corner;
    let vb = b - corner;
    if va.norm() < TOLERANCE || vb.norm() < TOLERANCE {
        return bevel(a, b);
    }
    let sweep = (va.x * vb.y - va.y * vb.x).atan2(va.dot(&vb));
    let bulge = (sweep / 4.0).tan();
    if bulge.abs() < TOLERANCE {
        return bevel(a, b);
    }
    vec![PathSeg::arc(a, b, bulge)]
}

enum MiterFit {
    Point(Point2),
    OverLimit(Point2),
    Parallel,
}

/// Intersects the two tangent rays and classifies the miter against the
/// limit.
fn miter_point(
    a: Point2,
    da: Vector2,
    b: Point2,
    db: Vector2,
    corner: Point2,
    distance: f64,
    style: &OffsetStyle,
) -> MiterFit {
    let Some((t, u)) = line_line_intersect_2d(a, da, b, db) else {
        return MiterFit::Parallel;
    };
    // The miter tip lies forward of the incoming end and behind the
    // outgoing start.
    if t < -TOLERANCE || u > TOLERANCE {
        return MiterFit::Parallel;
    }
    let m = a + da * t;
    let limit = style.miter_limit() * distance.abs();
    if (m - corner).norm() > limit {
        MiterFit::OverLimit(m)
    } else {
        MiterFit::Point(m)
    }
}

/// Clips an over-limit miter at the limit line perpendicular to the
/// corner bisector.
#[allow(clippy::too_many_arguments)]
fn miter_clip(
    a: Point2,
    da: Vector2,
    b: Point2,
    db: Vector2,
    corner: Point2,
    m: Point2,
    distance: f64,
    style: &OffsetStyle,
) -> Vec<PathSeg> {
    let dir = m - corner;
    let len = dir.norm();
    if len < TOLERANCE {
        return bevel(a, b);
    }
    let u_dir = dir / len;
    let base = corner + u_dir * (style.miter_limit() * distance.abs());
    let clip_dir = Vector2::new(-u_dir.y, u_dir.x);

    let q1 = line_line_intersect_2d(base, clip_dir, a, da).map(|(_, u)| a + da * u);
    let q2 = line_line_intersect_2d(base, clip_dir, b, db).map(|(_, u)| b + db * u);
    let (Some(q1), Some(q2)) = (q1, q2) else {
        return bevel(a, b);
    };

    let mut out = Vec::with_capacity(3);
    if (q1 - a).norm() > TOLERANCE {
        out.push(PathSeg::line(a, q1));
    }
    if (q2 - q1).norm() > TOLERANCE {
        out.push(PathSeg::line(q1, q2));
    }
    if (b - q2).norm() > TOLERANCE {
        out.push(PathSeg::line(q2, b));
    }
    if out.is_empty() {
        bevel(a, b)
    } else {
        out
    }
}

/// Geometric continuation of an offset segment beyond its endpoint.
enum Continuation {
    Ray(Point2, Vector2),
    Circle(ArcGeom),
}

fn continuation_out(seg: &PathSeg, origin: Point2, dir: Vector2) -> Continuation {
    if let PathSeg::Arc { p0, p1, bulge } = seg {
        let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
        if !arc.is_degenerate() {
            return Continuation::Circle(ArcGeom::circle(arc.center, arc.radius));
        }
    }
    Continuation::Ray(origin, dir)
}

/// Extends the incoming/outgoing offset curves by their own curvature and
/// joins where the continuations cross.
///
/// The variants trade smoothness for robustness: `Extrapolate` blends with
/// arcs on both sides, `Extrapolate1` uses straight tangent legs,
/// `Extrapolate2`/`Extrapolate3` mix an arc on one side with a line on the
/// other. All fall back to a round join when the continuations miss or the
/// crossing exceeds the miter limit.
#[allow(clippy::too_many_arguments)]
fn extrapolate(
    prev: &PathSeg,
    next: &PathSeg,
    a: Point2,
    da: Vector2,
    b: Point2,
    db: Vector2,
    corner: Point2,
    style: &OffsetStyle,
) -> Vec<PathSeg> {
    let cont_a = continuation_out(prev, a, da);
    // The outgoing continuation extends backward from the start.
    let cont_b = continuation_out(next, b, -db);

    let ext = 10.0 * ((b - a).norm() + (a - corner).norm()).max(TOLERANCE);
    let Some(m) = continuation_crossing(&cont_a, &cont_b, a, b, ext) else {
        return round(a, b, corner);
    };

    // Respect the miter limit: an extrapolated tip far from the corner is
    // as spiky as an over-limit miter.
    let limit = style.miter_limit() * (a - corner).norm().max((b - corner).norm());
    if (m - corner).norm() > limit {
        return round(a, b, corner);
    }

    let arc_in = || PathSeg::arc(a, m, bulge_from_chord_tangent(da, m - a));
    let arc_out = || PathSeg::arc(m, b, bulge_to_end_tangent(b - m, db));
    let line_in = || PathSeg::line(a, m);
    let line_out = || PathSeg::line(m, b);

    let segs = match style.join() {
        JoinType::Extrapolate => vec![arc_in(), arc_out()],
        JoinType::Extrapolate1 => vec![line_in(), line_out()],
        JoinType::Extrapolate2 => vec![arc_in(), line_out()],
        _ => vec![line_in(), arc_out()],
    };
    segs.into_iter().filter(|s| !s.is_degenerate()).collect()
}

/// Bulge of the arc over `chord` whose tangent at the *end* is `tangent`.
fn bulge_to_end_tangent(chord: Vector2, tangent: Vector2) -> f64 {
    let cross = chord.x * tangent.y - chord.y * tangent.x;
    let dot = chord.dot(&tangent);
    if cross.abs() < 1e-12 && dot.abs() < 1e-12 {
        return 0.0;
    }
    (cross.atan2(dot) / 2.0).tan()
}

/// Finds the continuation crossing nearest to the gap.
fn continuation_crossing(
    cont_a: &Continuation,
    cont_b: &Continuation,
    a: Point2,
    b: Point2,
    ext: f64,
) -> Option<Point2> {
    let candidates: Vec<Point2> = match (cont_a, cont_b) {
        (Continuation::Ray(p1, d1), Continuation::Ray(p2, d2)) => {
            match line_line_intersect_2d(*p1, *d1, *p2, *d2) {
                Some((t, _)) if t >= -TOLERANCE && t <= ext => vec![p1 + d1 * t],
                _ => Vec::new(),
            }
        }
        (Continuation::Ray(p, d), Continuation::Circle(c))
        | (Continuation::Circle(c), Continuation::Ray(p, d)) => {
            line_arc_intersect_2d(*p, p + d * ext, c)
                .into_iter()
                .map(|(pt, _, _)| pt)
                .collect()
        }
        (Continuation::Circle(c1), Continuation::Circle(c2)) => arc_arc_intersect_2d(c1, c2)
            .into_iter()
            .map(|(pt, _, _)| pt)
            .collect(),
    };

    candidates
        .into_iter()
        .min_by(|p, q| {
            let dp = (p - a).norm() + (p - b).norm();
            let dq = (q - a).norm() + (q - b).norm();
            dp.partial_cmp(&dq).unwrap_or(std::cmp::Ordering::Equal)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::operations::offset::style::FillRule;

    /// Offset geometry of a right-angle corner at (10,0): the bottom edge
    /// offset outward to y=-2 and the right edge offset outward to x=12.
    fn right_angle_gap() -> (PathSeg, PathSeg, Point2) {
        (
            PathSeg::line(Point2::new(0.0, -2.0), Point2::new(10.0, -2.0)),
            PathSeg::line(Point2::new(12.0, 0.0), Point2::new(12.0, 10.0)),
            Point2::new(10.0, 0.0),
        )
    }

    fn style(join: JoinType, limit: f64) -> Result<OffsetStyle> {
        OffsetStyle::new(join, limit, FillRule::NonZero)
    }

    #[test]
    fn bevel_is_single_chord() {
        let (prev, next, corner) = right_angle_gap();
        let segs = gap_join(&prev, &next, corner, -2.0, &style(JoinType::Bevel, 4.0).unwrap());
        assert_eq!(segs.len(), 1);
        assert!(segs[0].is_line_segment());
    }

    #[test]
    fn round_arc_stays_at_offset_radius() {
        let (prev, next, corner) = right_angle_gap();
        let segs = gap_join(&prev, &next, corner, -2.0, &style(JoinType::Round, 4.0).unwrap());
        assert_eq!(segs.len(), 1);
        // Every point of the join arc is at distance 2 from the corner.
        for i in 0..=8 {
            let p = segs[0].point_at(f64::from(i) / 8.0);
            let r = (p - corner).norm();
            assert!((r - 2.0).abs() < 1e-9, "r={r}");
        }
    }

    #[test]
    fn miter_within_limit_is_sharp() {
        let (prev, next, corner) = right_angle_gap();
        // Right angle: miter ratio √2, limit 4 is plenty.
        let segs = gap_join(&prev, &next, corner, -2.0, &style(JoinType::Miter, 4.0).unwrap());
        assert_eq!(segs.len(), 2);
        let tip = segs[0].end();
        assert!((tip - Point2::new(12.0, -2.0)).norm() < 1e-9, "tip={tip:?}");
    }

    #[test]
    fn miter_over_limit_becomes_bevel() {
        let (prev, next, corner) = right_angle_gap();
        // Right-angle miter ratio is √2 ≈ 1.414; a limit of 1.2 rejects it.
        let segs = gap_join(&prev, &next, corner, -2.0, &style(JoinType::Miter, 1.2).unwrap());
        assert_eq!(segs.len(), 1, "expected bevel fallback");
    }

    #[test]
    fn force_join_keeps_sharp_miter() {
        let (prev, next, corner) = right_angle_gap();
        let st = style(JoinType::Miter, 1.2).unwrap().with_force_join(true);
        let segs = gap_join(&prev, &next, corner, -2.0, &st);
        assert_eq!(segs.len(), 2, "force_join must ignore the limit");
    }

    #[test]
    fn miter_clip_truncates_at_limit() {
        let (prev, next, corner) = right_angle_gap();
        let limit = 1.2;
        let segs = gap_join(
            &prev,
            &next,
            corner,
            -2.0,
            &style(JoinType::MiterClip, limit).unwrap(),
        );
        assert!(segs.len() >= 2, "expected clipped corner, got {segs:?}");
        // The clip plane is perpendicular to the corner bisector at
        // `limit * |distance|`; nothing may project past it.
        let bisector = Vector2::new(1.0, -1.0).normalize();
        for seg in &segs {
            for i in 0..=4 {
                let p = seg.point_at(f64::from(i) / 4.0);
                let along = (p - corner).dot(&bisector);
                assert!(along <= limit * 2.0 + 1e-9, "along={along}");
            }
        }
    }

    #[test]
    fn extrapolate_lines_reduces_to_miter() {
        let (prev, next, corner) = right_angle_gap();
        // Straight offset segments have straight continuations.
        let segs = gap_join(
            &prev,
            &next,
            corner,
            -2.0,
            &style(JoinType::Extrapolate1, 4.0).unwrap(),
        );
        assert_eq!(segs.len(), 2);
        let tip = segs[0].end();
        assert!((tip - Point2::new(12.0, -2.0)).norm() < 1e-9, "tip={tip:?}");
    }

    #[test]
    fn extrapolate_continues_arc_curvature() {
        // Incoming offset is a quarter arc of the circle r=2 about the
        // origin ending at (2,0); the outgoing line starts on that same
        // circle at (1.2,1.6), so the curvature continuation reaches it.
        let prev = PathSeg::arc(
            Point2::new(0.0, -2.0),
            Point2::new(2.0, 0.0),
            (std::f64::consts::PI / 8.0).tan(),
        );
        let next = PathSeg::line(Point2::new(1.2, 1.6), Point2::new(-6.0, 1.6));
        let segs = gap_join(
            &prev,
            &next,
            Point2::new(0.0, 0.0),
            -2.0,
            &style(JoinType::Extrapolate, 6.0).unwrap(),
        );
        assert!(!segs.is_empty());
        assert!((segs[0].start() - Point2::new(2.0, 0.0)).norm() < 1e-9);
        assert!((segs[segs.len() - 1].end() - Point2::new(1.2, 1.6)).norm() < 1e-9);
        // The connector follows the incoming circle.
        for seg in &segs {
            for i in 0..=4 {
                let p = seg.point_at(f64::from(i) / 4.0);
                assert!((p.coords.norm() - 2.0).abs() < 1e-6, "p={p:?}");
            }
        }
    }

    #[test]
    fn coincident_gap_points_need_no_join() {
        let p = Point2::new(1.0, 1.0);
        let prev = PathSeg::line(Point2::new(0.0, 1.0), p);
        let next = PathSeg::line(p, Point2::new(2.0, 1.0));
        let segs = gap_join(
            &prev,
            &next,
            Point2::new(1.0, 0.0),
            1.0,
            &style(JoinType::Round, 4.0).unwrap(),
        );
        assert!(segs.is_empty());
    }
}
