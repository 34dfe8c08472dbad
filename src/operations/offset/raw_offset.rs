use tracing::trace;

use super::join::gap_join;
use super::style::OffsetStyle;
use crate::error::{OperationError, Result};
use crate::geometry::{Path, PathSeg};
use crate::math::arc_2d::offset_arc_segment;
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{Point2, TOLERANCE};

/// Offset segment paired with the original vertex at its start.
struct OffSeg {
    seg: PathSeg,
    corner: Point2,
}

/// Builds the raw parallel of `path` at the left-signed `distance`.
///
/// Each line and arc segment is shifted individually; arcs whose radius
/// collapses under the shift are dropped. Adjacent offsets that overlap
/// are welded at their tangent intersection, while separated ones are
/// bridged with the style's join. The result may self-intersect; the
/// caller is expected to run the cleanup stages over it.
///
/// # Errors
///
/// Returns an error when every segment collapses under the offset.
pub(super) fn build(path: &Path, distance: f64, style: &OffsetStyle) -> Result<Path> {
    let mut segs: Vec<OffSeg> = Vec::with_capacity(path.segs.len());
    for seg in &path.segs {
        match seg {
            PathSeg::Line { p0, p1 } => {
                let Ok(dir) = segment_direction(*p0, *p1) else {
                    continue;
                };
                let shift = left_normal(dir) * distance;
                segs.push(OffSeg {
                    seg: PathSeg::line(p0 + shift, p1 + shift),
                    corner: *p0,
                });
            }
            PathSeg::Arc { p0, p1, bulge } => {
                match offset_arc_segment(*p0, *p1, *bulge, distance) {
                    Some((q0, q1, b)) => segs.push(OffSeg {
                        seg: PathSeg::arc(q0, q1, b),
                        corner: *p0,
                    }),
                    None => trace!(?p0, ?p1, bulge, "arc collapsed under offset, dropped"),
                }
            }
            // Cubics are flattened before offsetting; shift their chords
            // if one slips through anyway.
            PathSeg::Cubic { p0, p3, .. } => {
                let Ok(dir) = segment_direction(*p0, *p3) else {
                    continue;
                };
                let shift = left_normal(dir) * distance;
                segs.push(OffSeg {
                    seg: PathSeg::line(p0 + shift, p3 + shift),
                    corner: *p0,
                });
            }
        }
    }

    let n = segs.len();
    if n == 0 {
        return Err(
            OperationError::Failed("every segment collapsed under the offset".to_owned()).into(),
        );
    }

    let mut connectors: Vec<Vec<PathSeg>> = vec![Vec::new(); n];
    let first_corner = usize::from(!path.closed);
    for k in first_corner..n {
        let prev = (k + n - 1) % n;
        let a = segs[prev].seg.end();
        let b = segs[k].seg.start();
        let da = segs[prev].seg.tangent_at(1.0);
        let db = segs[k].seg.tangent_at(0.0);
        let corner = segs[k].corner;

        if (b - a).norm() < TOLERANCE * 10.0 {
            // Smooth junction: snap to the shared point.
            let mid = Point2::from((a.coords + b.coords) / 2.0);
            let welded_prev = segs[prev].seg.with_end(mid);
            let welded_cur = segs[k].seg.with_start(mid);
            segs[prev].seg = welded_prev;
            segs[k].seg = welded_cur;
            continue;
        }

        let cross = da.x * db.y - da.y * db.x;
        if cross * distance < -TOLERANCE || (cross.abs() <= TOLERANCE && da.dot(&db) < 0.0) {
            // Offsets separate on this side of the corner.
            connectors[k] = gap_join(&segs[prev].seg, &segs[k].seg, corner, distance, style);
        } else if cross.abs() <= TOLERANCE {
            connectors[k] = vec![PathSeg::line(a, b)];
        } else {
            // Offsets overlap: pull both endpoints to the tangent
            // intersection, trimming the doubled-back portion.
            let m = line_line_intersect_2d(a, da, b, db)
                .map_or_else(|| Point2::from((a.coords + b.coords) / 2.0), |(t, _)| a + da * t);
            let welded_prev = segs[prev].seg.with_end(m);
            let welded_cur = segs[k].seg.with_start(m);
            segs[prev].seg = welded_prev;
            segs[k].seg = welded_cur;
        }
    }

    let mut out: Vec<PathSeg> = Vec::with_capacity(n * 2);
    for (k, off) in segs.into_iter().enumerate() {
        out.extend(connectors[k].drain(..).filter(|s| !s.is_degenerate()));
        if !off.seg.is_degenerate() {
            out.push(off.seg);
        }
    }
    if out.is_empty() {
        return Err(
            OperationError::Failed("offset geometry degenerated completely".to_owned()).into(),
        );
    }
    Ok(Path::new(out, path.closed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::offset::style::JoinType;
    use approx::assert_relative_eq;

    fn square() -> Path {
        Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        )
    }

    #[test]
    fn ccw_square_inset_welds_to_smaller_square() {
        // Left of travel is the interior for a CCW ring.
        let raw = build(&square(), 2.0, &OffsetStyle::default()).unwrap();
        assert_eq!(raw.segs.len(), 4);
        assert_relative_eq!(raw.signed_area(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn ccw_square_outset_inserts_joins() {
        let style = OffsetStyle::new(JoinType::Bevel, 4.0, super::super::style::FillRule::NonZero)
            .unwrap();
        let raw = build(&square(), -2.0, &style).unwrap();
        // Four edges plus four bevel chords.
        assert_eq!(raw.segs.len(), 8);
        // Outset square with chamfered corners: 14*14 - 4 * (2*2/2).
        assert_relative_eq!(raw.signed_area().abs(), 188.0, epsilon = 1e-9);
    }

    #[test]
    fn open_polyline_offsets_one_side_without_caps() {
        let path = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            false,
        );
        let raw = build(&path, 1.0, &OffsetStyle::default()).unwrap();
        assert!(!raw.closed);
        assert_relative_eq!(raw.start().unwrap().y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(raw.end().unwrap().x, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn arc_collapse_leaves_nothing() {
        // Left offset of a CCW semicircle of radius 1 by more than the
        // radius removes the segment entirely.
        let path = Path::new(
            vec![PathSeg::arc(
                Point2::new(-1.0, 0.0),
                Point2::new(1.0, 0.0),
                1.0,
            )],
            false,
        );
        assert!(build(&path, 1.5, &OffsetStyle::default()).is_err());
    }
}
