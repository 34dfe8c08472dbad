use super::seg::PathSeg;
use crate::math::polygon_2d::{signed_area_2d, winding_number};
use crate::math::{Point2, TOLERANCE};

/// Flattening tolerance used for winding and area queries.
const QUERY_TOLERANCE: f64 = 1e-3;

/// One subpath: a run of connected segments, optionally closed.
///
/// For closed paths the last segment's end is expected to coincide with
/// the first segment's start; no implicit closing segment is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segs: Vec<PathSeg>,
    pub closed: bool,
}

impl Path {
    /// Creates a path from segments.
    #[must_use]
    pub fn new(segs: Vec<PathSeg>, closed: bool) -> Self {
        Self { segs, closed }
    }

    /// Creates a polyline path from points (line segments only).
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let mut segs = Vec::with_capacity(points.len());
        for w in points.windows(2) {
            segs.push(PathSeg::line(w[0], w[1]));
        }
        if closed && points.len() >= 3 {
            let first = points[0];
            let last = points[points.len() - 1];
            if (last - first).norm() > TOLERANCE {
                segs.push(PathSeg::line(last, first));
            }
        }
        Self { segs, closed }
    }

    /// Returns true when the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Returns the start point of the first segment, if any.
    #[must_use]
    pub fn start(&self) -> Option<Point2> {
        self.segs.first().map(PathSeg::start)
    }

    /// Returns the end point of the last segment, if any.
    #[must_use]
    pub fn end(&self) -> Option<Point2> {
        self.segs.last().map(PathSeg::end)
    }

    /// Returns the segment junction points (each segment's start, plus the
    /// final end for open paths).
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        let mut pts: Vec<Point2> = self.segs.iter().map(PathSeg::start).collect();
        if !self.closed {
            if let Some(p) = self.end() {
                pts.push(p);
            }
        }
        pts
    }

    /// Returns the total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segs.iter().map(PathSeg::length).sum()
    }

    /// Returns the path traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            segs: self.segs.iter().rev().map(PathSeg::reversed).collect(),
            closed: self.closed,
        }
    }

    /// Returns a copy with degenerate (zero-length) segments removed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            segs: self
                .segs
                .iter()
                .filter(|s| !s.is_degenerate())
                .copied()
                .collect(),
            closed: self.closed,
        }
    }

    /// Flattens the path to a polyline.
    #[must_use]
    pub fn flattened(&self, tolerance: f64) -> Vec<Point2> {
        let mut pts = Vec::with_capacity(self.segs.len() * 2);
        if let Some(p) = self.start() {
            pts.push(p);
        }
        for seg in &self.segs {
            seg.flatten_into(tolerance, &mut pts);
        }
        pts
    }

    /// Computes the winding number around `p` (closed paths; open paths
    /// are treated as if closed by a chord).
    #[must_use]
    pub fn winding_at(&self, p: Point2) -> i32 {
        winding_number(&self.flattened(QUERY_TOLERANCE), p)
    }

    /// Computes the signed enclosed area.
    ///
    /// Positive for counter-clockwise orientation.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.flattened(QUERY_TOLERANCE))
    }

    /// Returns the axis-aligned bounding box as `(min, max)`, or `None`
    /// for an empty path.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let pts = self.flattened(QUERY_TOLERANCE);
        let first = pts.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &pts[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    /// Finds the segment index and parameter of the point nearest to `p`.
    #[must_use]
    pub fn nearest_time(&self, p: Point2) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (i, seg) in self.segs.iter().enumerate() {
            let t = seg.nearest_time(p);
            let d = (seg.point_at(t) - p).norm_squared();
            match best {
                Some((_, _, bd)) if bd <= d => {}
                _ => best = Some((i, t, d)),
            }
        }
        best.map(|(i, t, _)| (i, t))
    }

    /// Returns the minimum distance from `p` to the path.
    #[must_use]
    pub fn distance_to(&self, p: Point2) -> f64 {
        self.segs
            .iter()
            .map(|s| s.distance_to(p))
            .fold(f64::MAX, f64::min)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square() -> Path {
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
    fn from_points_closes_the_loop() {
        let sq = unit_square();
        assert_eq!(sq.segs.len(), 4);
        assert!((sq.segs[3].end() - sq.segs[0].start()).norm() < 1e-12);
    }

    #[test]
    fn square_area_and_winding() {
        let sq = unit_square();
        assert!((sq.signed_area() - 100.0).abs() < 1e-9);
        assert_eq!(sq.winding_at(Point2::new(5.0, 5.0)), 1);
        assert_eq!(sq.winding_at(Point2::new(15.0, 5.0)), 0);
    }

    #[test]
    fn circle_area_from_two_semicircles() {
        // Unit circle built from two bulge-1 semicircles.
        let path = Path::new(
            vec![
                PathSeg::arc(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0), -1.0),
                PathSeg::arc(Point2::new(1.0, 0.0), Point2::new(-1.0, 0.0), -1.0),
            ],
            true,
        );
        // CW circle: negative area of magnitude π.
        let area = path.signed_area();
        assert!((area + std::f64::consts::PI).abs() < 0.01, "area={area}");
    }

    #[test]
    fn length_sums_segments() {
        let sq = unit_square();
        assert!((sq.length() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_preserves_geometry() {
        let sq = unit_square();
        let rev = sq.reversed();
        assert!((rev.signed_area() + 100.0).abs() < 1e-9);
        assert!((rev.start().unwrap() - sq.end().unwrap()).norm() < 1e-12);
    }

    #[test]
    fn normalized_drops_degenerate_segments() {
        let p = Point2::new(1.0, 1.0);
        let path = Path::new(
            vec![
                PathSeg::line(Point2::new(0.0, 0.0), p),
                PathSeg::line(p, p),
                PathSeg::line(p, Point2::new(2.0, 0.0)),
            ],
            false,
        );
        assert_eq!(path.normalized().segs.len(), 2);
    }

    #[test]
    fn nearest_time_across_segments() {
        let sq = unit_square();
        // Point near the middle of the right edge (segment 1).
        let (i, t) = sq.nearest_time(Point2::new(11.0, 5.0)).unwrap();
        assert_eq!(i, 1);
        assert!((t - 0.5).abs() < 1e-9, "t={t}");
    }

    #[test]
    fn distance_to_edge() {
        let sq = unit_square();
        let d = sq.distance_to(Point2::new(5.0, -3.0));
        assert!((d - 3.0).abs() < 1e-9, "d={d}");
    }

    #[test]
    fn bounds_of_square() {
        let (min, max) = unit_square().bounds().unwrap();
        assert!((min.x).abs() < 1e-12 && (min.y).abs() < 1e-12);
        assert!((max.x - 10.0).abs() < 1e-12 && (max.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn empty_path_queries() {
        let empty = Path::new(Vec::new(), false);
        assert!(empty.is_empty());
        assert!(empty.bounds().is_none());
        assert!(empty.nearest_time(Point2::new(0.0, 0.0)).is_none());
    }
}
