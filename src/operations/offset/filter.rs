use tracing::trace;

use super::style::FillRule;
use crate::geometry::Path;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Discards slices that do not belong to the offset result.
///
/// A valid slice stays near the offset distance from the source path;
/// doubled-back remnants collapse toward it and are dropped. For closed
/// sources the slice must also sit on the correct side: inside the
/// source (under `fill_rule`) for an inset, outside for an outset.
/// Finally, a slice must bound the region the raw parallel encloses under
/// `fill_rule`: when a self-crossing seals off a ring, the ring's walls
/// have enclosed material on both sides and carry no boundary at all.
pub(super) fn keep(
    slices: Vec<Path>,
    source: &Path,
    raw: &Path,
    distance: f64,
    inset: bool,
    fill_rule: FillRule,
) -> Vec<Path> {
    let threshold = 0.5 * distance.abs();
    // Winding samples are taken a step off the probe on either side; the
    // step must clear the flattening sag of the winding query.
    let step = (0.05 * distance.abs()).max(1e-2);
    slices
        .into_iter()
        .filter(|slice| {
            let Some((mid, tangent)) = probe(slice) else {
                return false;
            };
            let dist = source.distance_to(mid);
            if dist < threshold {
                trace!(?mid, dist, "slice fell back onto the source, dropped");
                return false;
            }
            if source.closed {
                let interior = fill_rule.is_inside(source.winding_at(mid));
                if interior != inset {
                    trace!(?mid, interior, inset, "slice on the wrong side, dropped");
                    return false;
                }
            }
            if raw.closed && tangent.norm() > TOLERANCE {
                let normal = Vector2::new(-tangent.y, tangent.x).normalize() * step;
                let left = fill_rule.is_inside(raw.winding_at(mid + normal));
                let right = fill_rule.is_inside(raw.winding_at(mid - normal));
                if left == right {
                    trace!(?mid, left, "slice bounds no merged region, dropped");
                    return false;
                }
            }
            true
        })
        .collect()
}

/// Midpoint and tangent of the middle segment, the sample least affected
/// by the crossing points at the slice ends.
fn probe(slice: &Path) -> Option<(Point2, Vector2)> {
    let seg = slice.segs.get(slice.segs.len() / 2)?;
    Some((seg.point_at(0.5), seg.tangent_at(0.5)))
}
