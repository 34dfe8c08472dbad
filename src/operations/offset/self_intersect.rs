use crate::geometry::{Path, PathSeg};
use crate::math::arc_2d::ArcGeom;
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::{Point2, TOLERANCE};

/// Parameter slack under which an intersection counts as an endpoint
/// touch rather than a crossing.
const ENDPOINT_EPS: f64 = TOLERANCE * 100.0;

/// One crossing between two non-adjacent segments of a path.
#[derive(Debug, Clone, Copy)]
pub(super) struct SegIntersect {
    pub seg_i: usize,
    pub seg_j: usize,
    pub t_i: f64,
    pub t_j: f64,
    pub point: Point2,
}

/// Finds all crossings between non-adjacent segments of `path`.
///
/// Adjacent segments share an endpoint by construction and are skipped,
/// as are endpoint-to-endpoint touches between distant segments. The
/// result is sorted by position along the path.
pub(super) fn find_all(path: &Path) -> Vec<SegIntersect> {
    let n = path.segs.len();
    if n < 3 {
        return Vec::new();
    }

    let mut found = Vec::new();
    for i in 0..n {
        for j in (i + 2)..n {
            if path.closed && i == 0 && j == n - 1 {
                continue;
            }
            for (point, t_i, t_j) in seg_pair(&path.segs[i], &path.segs[j]) {
                let i_end = t_i < ENDPOINT_EPS || t_i > 1.0 - ENDPOINT_EPS;
                let j_end = t_j < ENDPOINT_EPS || t_j > 1.0 - ENDPOINT_EPS;
                if i_end && j_end {
                    continue;
                }
                found.push(SegIntersect {
                    seg_i: i,
                    seg_j: j,
                    t_i,
                    t_j,
                    point,
                });
            }
        }
    }

    found.sort_by(|a, b| {
        (a.seg_i, a.t_i)
            .partial_cmp(&(b.seg_i, b.t_i))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    found
}

/// Intersections between two individual segments, parameters in `[0, 1]`
/// on each.
fn seg_pair(a: &PathSeg, b: &PathSeg) -> Vec<(Point2, f64, f64)> {
    match (a, b) {
        (PathSeg::Arc { p0, p1, bulge }, _) if bulge.abs() > TOLERANCE => {
            let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
            match b {
                PathSeg::Arc {
                    p0: q0,
                    p1: q1,
                    bulge: b2,
                } if b2.abs() > TOLERANCE => {
                    arc_arc_intersect_2d(&arc, &ArcGeom::from_bulge(*q0, *q1, *b2))
                }
                _ => line_arc_intersect_2d(b.start(), b.end(), &arc)
                    .into_iter()
                    .map(|(p, t_line, t_arc)| (p, t_arc, t_line))
                    .collect(),
            }
        }
        (_, PathSeg::Arc { p0, p1, bulge }) if bulge.abs() > TOLERANCE => {
            let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
            line_arc_intersect_2d(a.start(), a.end(), &arc)
        }
        _ => segment_segment_intersect_2d(a.start(), a.end(), b.start(), b.end())
            .into_iter()
            .collect(),
    }
}
