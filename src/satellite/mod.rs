//! Per-vertex fillet/chamfer parameters and their geometric conversions.
//!
//! A [`NodeSatellite`] stores an abstract "rounding amount" for one path
//! vertex, either as a normalized curve time or as an arc length. All
//! conversions take the adjoining curve(s) explicitly; the same satellite
//! value means a different spatial position on a different curve.

use crate::geometry::arclen::{arc_length_at, time_at_arc_length};
use crate::geometry::{Path, PathSeg};
use crate::math::intersect_2d::polyline_first_crossing;
use crate::math::polygon_2d::left_normal;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Flattening tolerance for the offset-curve crossing solver.
const SOLVER_TOLERANCE: f64 = 1e-3;

/// The kind of corner transition a satellite describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSatelliteType {
    Fillet,
    InverseFillet,
    Chamfer,
    InverseChamfer,
    #[default]
    Invalid,
}

impl NodeSatelliteType {
    /// Returns the persistence code for this type.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Fillet => "F",
            Self::InverseFillet => "IF",
            Self::Chamfer => "C",
            Self::InverseChamfer => "IC",
            Self::Invalid => "KO",
        }
    }

    /// Parses a persistence code; unknown codes map to `Invalid`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "F" => Self::Fillet,
            "IF" => Self::InverseFillet,
            "C" => Self::Chamfer,
            "IC" => Self::InverseChamfer,
            _ => Self::Invalid,
        }
    }
}

/// Fillet/chamfer parameters attached to one path vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSatellite {
    pub kind: NodeSatelliteType,
    /// When true, `amount` is a normalized curve time in `[0, 1]`;
    /// otherwise it is an arc-length distance.
    pub is_time: bool,
    /// Non-negative; interpreted per `is_time` against a specific curve.
    pub amount: f64,
    pub selected: bool,
    pub has_mirror: bool,
    pub hidden: bool,
    /// Chamfer subdivision count.
    pub steps: u32,
    /// Auxiliary rotation.
    pub angle: f64,
}

impl Default for NodeSatellite {
    fn default() -> Self {
        Self {
            kind: NodeSatelliteType::Invalid,
            is_time: false,
            amount: 0.0,
            selected: false,
            has_mirror: false,
            hidden: false,
            steps: 1,
            angle: 0.0,
        }
    }
}

impl NodeSatellite {
    /// Creates a satellite of the given kind with an arc-length `amount`.
    #[must_use]
    pub fn new(kind: NodeSatelliteType, amount: f64) -> Self {
        Self {
            kind,
            amount,
            ..Self::default()
        }
    }

    /// Resolves the stored `amount` to a parametric time on `seg`,
    /// clamped to `[0, 1]`.
    ///
    /// When `reverse` is true the amount is measured from the segment's
    /// end instead of its start.
    #[must_use]
    pub fn time(&self, seg: &PathSeg, reverse: bool) -> f64 {
        if self.is_time {
            let t = self.amount.clamp(0.0, 1.0);
            if reverse {
                1.0 - t
            } else {
                t
            }
        } else {
            self.time_at(self.amount, reverse, seg)
        }
    }

    /// Resolves an explicit arc length `a` to a parametric time on `seg`.
    ///
    /// When `reverse` is true the query length is reflected
    /// (`length - a`) before solving; a zero length then maps to the
    /// segment's end.
    #[must_use]
    pub fn time_at(&self, a: f64, reverse: bool, seg: &PathSeg) -> f64 {
        if a <= 0.0 {
            return if reverse { 1.0 } else { 0.0 };
        }
        let q = if reverse { seg.length() - a } else { a };
        time_at_arc_length(q.max(0.0), seg).clamp(0.0, 1.0)
    }

    /// Returns the arc-length form of `amount` against `seg`.
    #[must_use]
    pub fn arc_distance(&self, seg: &PathSeg) -> f64 {
        if self.is_time {
            arc_length_at(self.amount, seg)
        } else {
            self.amount
        }
    }

    /// Returns the on-curve point the stored `amount` describes.
    #[must_use]
    pub fn position(&self, seg: &PathSeg, reverse: bool) -> Point2 {
        seg.point_at(self.time(seg, reverse))
    }

    /// Re-derives `amount` from a 2D point, projecting it onto the
    /// (possibly reversed) segment and storing in whichever
    /// representation `is_time` currently selects.
    pub fn set_position(&mut self, p: Point2, seg: &PathSeg, reverse: bool) {
        let oriented = if reverse { seg.reversed() } else { *seg };
        let t = oriented.nearest_time(p);
        self.amount = if self.is_time {
            t
        } else {
            arc_length_at(t, &oriented)
        };
    }

    /// Converts a target rounding-arc radius into an arc length from the
    /// vertex along `curve_out`.
    ///
    /// Both neighbor curves are offset by `radius` along their left
    /// normals; the first crossing of the two offset curves is the center
    /// of the tangent circle. The center is projected back onto
    /// `curve_out` and the arc length to the projection is returned.
    ///
    /// If no crossing is found and `radius > 0`, a single retry with
    /// `-radius` handles the opposite turn direction. Returns 0 when no
    /// usable rounding geometry exists (callers must treat 0 as "no
    /// offset", not as an error).
    #[must_use]
    pub fn radius_to_length(&self, radius: f64, curve_in: &PathSeg, curve_out: &PathSeg) -> f64 {
        if curve_in.is_degenerate() || curve_out.is_degenerate() {
            return 0.0;
        }
        if let Some(len) = offset_crossing_length(radius, curve_in, curve_out) {
            return len;
        }
        // Curvature-direction ambiguity: one retry with the opposite sign,
        // deliberately not a loop.
        if radius > 0.0 {
            if let Some(len) = offset_crossing_length(-radius, curve_in, curve_out) {
                return len;
            }
        }
        0.0
    }

    /// Inverse of [`Self::radius_to_length`]: converts an arc length from
    /// the vertex into the radius of the rounding arc it produces.
    ///
    /// The arc endpoints are located via the time conversions
    /// (`previous` resolves the incoming side), rays are built along the
    /// local tangents (the adjacent control point for cubics, the
    /// endpoint tangent otherwise), and the radius follows from
    /// `half_chord / sin(angle / 2)`. Returns 0 for straight-through
    /// corners where no radius is defined.
    #[must_use]
    pub fn length_to_radius(
        &self,
        length: f64,
        curve_in: &PathSeg,
        curve_out: &PathSeg,
        previous: &NodeSatellite,
    ) -> f64 {
        if curve_in.is_degenerate() || curve_out.is_degenerate() {
            return 0.0;
        }
        let t_in = previous.time_at(length, true, curve_in);
        let t_out = self.time_at(length, false, curve_out);
        let start_arc = curve_in.point_at(t_in);
        let end_arc = curve_out.point_at(t_out);

        let dir_in = vertex_ray_in(curve_in);
        let dir_out = vertex_ray_out(curve_out);
        if dir_in.norm() < TOLERANCE || dir_out.norm() < TOLERANCE {
            return 0.0;
        }

        // Turn orientation from a cross-product test against the chord.
        let to_vertex = curve_in.end() - start_arc;
        let chord = end_arc - start_arc;
        let ccw = to_vertex.x * chord.y - to_vertex.y * chord.x < 0.0;

        let a_in = dir_in.y.atan2(dir_in.x);
        let a_out = dir_out.y.atan2(dir_out.x);
        let angle = if ccw {
            normalize_angle(a_out - a_in)
        } else {
            normalize_angle(a_in - a_out)
        };

        let s = (angle / 2.0).sin();
        if s <= TOLERANCE {
            return 0.0;
        }
        (chord.norm() / 2.0) / s
    }
}

/// Direction of the incoming curve at the vertex: the last control leg for
/// cubics, the endpoint tangent otherwise.
fn vertex_ray_in(curve_in: &PathSeg) -> Vector2 {
    if let PathSeg::Cubic { p2, p3, .. } = curve_in {
        let d = p3 - p2;
        let len = d.norm();
        if len > TOLERANCE {
            return d / len;
        }
    }
    curve_in.tangent_at(1.0)
}

/// Direction of the outgoing curve at the vertex.
fn vertex_ray_out(curve_out: &PathSeg) -> Vector2 {
    if let PathSeg::Cubic { p0, p1, .. } = curve_out {
        let d = p1 - p0;
        let len = d.norm();
        if len > TOLERANCE {
            return d / len;
        }
    }
    curve_out.tangent_at(0.0)
}

/// Normalizes an angle to `[0, 2π)`.
fn normalize_angle(a: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut a = a % two_pi;
    if a < 0.0 {
        a += two_pi;
    }
    a
}

/// Offsets both curves by `radius` along their left normals and returns
/// the arc length on `curve_out` to the projected crossing point.
fn offset_crossing_length(radius: f64, curve_in: &PathSeg, curve_out: &PathSeg) -> Option<f64> {
    let off_in = offset_flattened(curve_in, radius);
    let off_out = offset_flattened(curve_out, radius);
    let center = polyline_first_crossing(&off_in, &off_out)?;
    let t = curve_out.nearest_time(center);
    Some(arc_length_at(t, curve_out))
}

/// Flattens a segment and offsets the polyline along per-vertex averaged
/// left normals.
fn offset_flattened(seg: &PathSeg, d: f64) -> Vec<Point2> {
    let mut pts = vec![seg.start()];
    seg.flatten_into(SOLVER_TOLERANCE, &mut pts);

    let n = pts.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let mut normal = Vector2::zeros();
        if i > 0 {
            let e = pts[i] - pts[i - 1];
            let len = e.norm();
            if len > TOLERANCE {
                normal += left_normal(e / len);
            }
        }
        if i + 1 < n {
            let e = pts[i + 1] - pts[i];
            let len = e.norm();
            if len > TOLERANCE {
                normal += left_normal(e / len);
            }
        }
        let len = normal.norm();
        if len > TOLERANCE {
            out.push(pts[i] + normal * (d / len));
        } else {
            out.push(pts[i]);
        }
    }
    out
}

/// One satellite per path vertex.
#[derive(Debug, Clone, Default)]
pub struct Satellites {
    sats: Vec<NodeSatellite>,
}

impl Satellites {
    /// Creates a collection from explicit satellites.
    #[must_use]
    pub fn new(sats: Vec<NodeSatellite>) -> Self {
        Self { sats }
    }

    /// Seeds one copy of `template` per vertex of `path`.
    ///
    /// Closed paths have one vertex per segment; open paths carry an
    /// extra satellite for the trailing endpoint.
    #[must_use]
    pub fn for_path(path: &Path, template: NodeSatellite) -> Self {
        let count = path.segs.len() + usize::from(!path.closed && !path.segs.is_empty());
        Self {
            sats: vec![template; count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sats.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&NodeSatellite> {
        self.sats.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut NodeSatellite> {
        self.sats.get_mut(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeSatellite> {
        self.sats.iter()
    }
}

impl<'a> IntoIterator for &'a Satellites {
    type Item = &'a NodeSatellite;
    type IntoIter = std::slice::Iter<'a, NodeSatellite>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn type_code_round_trip() {
        for kind in [
            NodeSatelliteType::Fillet,
            NodeSatelliteType::InverseFillet,
            NodeSatelliteType::Chamfer,
            NodeSatelliteType::InverseChamfer,
            NodeSatelliteType::Invalid,
        ] {
            assert_eq!(NodeSatelliteType::from_code(kind.code()), kind);
        }
        assert_eq!(
            NodeSatelliteType::from_code("??"),
            NodeSatelliteType::Invalid
        );
    }

    #[test]
    fn time_clamps_and_reverses() {
        let seg = PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let mut sat = NodeSatellite::new(NodeSatelliteType::Fillet, 2.5);
        assert_relative_eq!(sat.time(&seg, false), 0.25, epsilon = 1e-12);
        assert_relative_eq!(sat.time(&seg, true), 0.75, epsilon = 1e-12);

        sat.is_time = true;
        sat.amount = 0.3;
        assert_relative_eq!(sat.time(&seg, false), 0.3, epsilon = 1e-12);
        assert_relative_eq!(sat.time(&seg, true), 0.7, epsilon = 1e-12);

        // Beyond-range amounts clamp.
        sat.amount = 4.0;
        assert_relative_eq!(sat.time(&seg, false), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn time_at_zero_maps_to_endpoint() {
        let seg = PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let sat = NodeSatellite::default();
        assert_relative_eq!(sat.time_at(0.0, false, &seg), 0.0, epsilon = 1e-12);
        assert_relative_eq!(sat.time_at(0.0, true, &seg), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_distance_both_representations() {
        let seg = PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 3.0);
        assert_relative_eq!(sat.arc_distance(&seg), 3.0, epsilon = 1e-12);

        let timed = NodeSatellite {
            is_time: true,
            amount: 0.3,
            ..sat
        };
        assert_relative_eq!(timed.arc_distance(&seg), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn position_set_position_round_trip() {
        let seg = PathSeg::arc(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0);
        for reverse in [false, true] {
            let mut sat = NodeSatellite::new(NodeSatelliteType::Fillet, 0.8);
            let p = sat.position(&seg, reverse);
            let mut other = NodeSatellite::new(NodeSatelliteType::Fillet, 0.0);
            other.set_position(p, &seg, reverse);
            let q = other.position(&seg, reverse);
            assert!((p - q).norm() < 1e-6, "reverse={reverse} p={p:?} q={q:?}");
        }
    }

    // ── radius/length conversions ──

    fn right_angle_corner() -> (PathSeg, PathSeg) {
        (
            PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            PathSeg::line(Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)),
        )
    }

    #[test]
    fn radius_to_length_right_angle() {
        // For a right-angle corner the tangent length equals the radius.
        let (cin, cout) = right_angle_corner();
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let len = sat.radius_to_length(2.0, &cin, &cout);
        assert_relative_eq!(len, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn radius_to_length_opposite_turn_uses_retry() {
        // Corner turning right instead of left: the +radius offsets miss
        // each other and the negated retry must find the crossing.
        let cin = PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let cout = PathSeg::line(Point2::new(10.0, 0.0), Point2::new(10.0, -10.0));
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let len = sat.radius_to_length(2.0, &cin, &cout);
        assert_relative_eq!(len, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn length_to_radius_right_angle() {
        let (cin, cout) = right_angle_corner();
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let prev = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let r = sat.length_to_radius(2.0, &cin, &cout, &prev);
        assert_relative_eq!(r, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn length_to_radius_straight_through_is_zero() {
        let cin = PathSeg::line(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let cout = PathSeg::line(Point2::new(10.0, 0.0), Point2::new(20.0, 0.0));
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let prev = NodeSatellite::new(NodeSatelliteType::Fillet, 5.0);
        let r = sat.length_to_radius(2.0, &cin, &cout, &prev);
        assert!(r.abs() < 1e-9, "r={r}");
    }

    #[test]
    fn degenerate_neighbors_return_zero() {
        let degen = PathSeg::line(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0));
        let ok = PathSeg::line(Point2::new(1.0, 1.0), Point2::new(5.0, 1.0));
        let sat = NodeSatellite::new(NodeSatelliteType::Fillet, 1.0);
        assert!(sat.radius_to_length(2.0, &degen, &ok).abs() < 1e-12);
        assert!(sat
            .length_to_radius(2.0, &degen, &ok, &sat)
            .abs()
            < 1e-12);
    }

    // ── collection ──

    #[test]
    fn satellites_seeding_counts() {
        let closed = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            true,
        );
        let open = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            false,
        );
        let template = NodeSatellite::new(NodeSatelliteType::Fillet, 0.5);
        assert_eq!(Satellites::for_path(&closed, template).len(), 3);
        assert_eq!(Satellites::for_path(&open, template).len(), 3);
    }
}
