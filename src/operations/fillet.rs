//! Applies per-vertex fillet/chamfer transitions to a path.

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Path, PathSeg};
use crate::math::arc_2d::bulge_from_chord_tangent;
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::satellite::{NodeSatellite, NodeSatelliteType, Satellites};

/// Replaces path corners with the transitions their satellites describe.
///
/// Each active satellite trims both adjoining segments by its arc-length
/// amount and bridges the cut with an arc (fillet), a mirrored arc
/// (inverse fillet), a straight cut (chamfer) or a polygonal
/// approximation of the mirrored arc (inverse chamfer). Open path
/// endpoints are never touched.
#[derive(Debug, Clone)]
pub struct FilletPath {
    path: Path,
    satellites: Satellites,
}

impl FilletPath {
    #[must_use]
    pub fn new(path: Path, satellites: Satellites) -> Self {
        Self { path, satellites }
    }

    /// Runs the fillet.
    ///
    /// # Errors
    ///
    /// Fails when the satellite count does not match the path's vertex
    /// count.
    pub fn execute(&self) -> Result<Path> {
        let path = self.path.normalized();
        let n = path.segs.len();
        if n == 0 {
            return Ok(path);
        }
        let vertex_count = if path.closed { n } else { n + 1 };
        if self.satellites.len() != vertex_count {
            return Err(OperationError::InvalidInput(format!(
                "expected {vertex_count} satellites, got {}",
                self.satellites.len()
            ))
            .into());
        }
        debug!(segs = n, closed = path.closed, "fillet path");

        // Arc-length trim at each vertex. Endpoints of an open path and
        // inactive satellites keep zero.
        let mut lens = vec![0.0_f64; vertex_count];
        let first_vertex = usize::from(!path.closed);
        for i in first_vertex..n {
            let Some(sat) = self.satellites.get(i) else {
                continue;
            };
            if sat.hidden || sat.kind == NodeSatelliteType::Invalid {
                continue;
            }
            let prev = &path.segs[(i + n - 1) % n];
            let next = &path.segs[i];
            let wanted = sat.arc_distance(next);
            if wanted <= TOLERANCE {
                continue;
            }
            // Half of each neighbor, so adjacent transitions can never
            // overlap.
            lens[i] = wanted
                .min(prev.length() / 2.0)
                .min(next.length() / 2.0)
                .max(0.0);
            trace!(vertex = i, len = lens[i], kind = sat.kind.code(), "fillet vertex");
        }

        // Trim window per segment: its start vertex eats into the front,
        // its end vertex into the back.
        let mut windows = Vec::with_capacity(n);
        for (k, seg) in path.segs.iter().enumerate() {
            let start_vertex = k;
            let end_vertex = if path.closed { (k + 1) % n } else { k + 1 };
            let sat_in = self.satellites.get(start_vertex).copied().unwrap_or_default();
            let sat_out = self.satellites.get(end_vertex).copied().unwrap_or_default();
            let t_in = sat_in.time_at(lens[start_vertex], false, seg);
            let t_out = sat_out.time_at(lens[end_vertex], true, seg);
            windows.push((t_in.min(t_out), t_out.max(t_in)));
        }

        let mut out: Vec<PathSeg> = Vec::with_capacity(n * 2);
        for k in 0..n {
            if path.closed || k > 0 {
                let prev = (k + n - 1) % n;
                let p_in = path.segs[prev].point_at(windows[prev].1);
                let tangent = path.segs[prev].tangent_at(windows[prev].1);
                let p_out = path.segs[k].point_at(windows[k].0);
                if lens[k] > TOLERANCE {
                    if let Some(sat) = self.satellites.get(k) {
                        out.extend(transition(sat, p_in, tangent, p_out));
                    }
                }
            }
            let trimmed = path.segs[k].portion(windows[k].0, windows[k].1);
            if trimmed.length() > TOLERANCE {
                out.push(trimmed);
            }
        }

        Ok(Path::new(out, path.closed))
    }
}

/// Builds the corner transition between the two trimmed curve ends.
fn transition(
    sat: &NodeSatellite,
    p_in: Point2,
    tangent: Vector2,
    p_out: Point2,
) -> Vec<PathSeg> {
    let chord = p_out - p_in;
    if chord.norm() < TOLERANCE {
        return Vec::new();
    }
    let bulge = bulge_from_chord_tangent(tangent, chord);
    match sat.kind {
        NodeSatelliteType::Fillet => vec![PathSeg::arc(p_in, p_out, bulge)],
        NodeSatelliteType::InverseFillet => vec![PathSeg::arc(p_in, p_out, -bulge)],
        NodeSatelliteType::Chamfer => {
            let steps = sat.steps.max(1);
            let mut segs = Vec::new();
            let mut last = p_in;
            for j in 1..=steps {
                let p = p_in + chord * (f64::from(j) / f64::from(steps));
                segs.push(PathSeg::line(last, p));
                last = p;
            }
            segs
        }
        NodeSatelliteType::InverseChamfer => {
            // Straight steps sampled on the mirrored arc.
            let steps = sat.steps.max(1);
            let arc = PathSeg::arc(p_in, p_out, -bulge);
            let mut segs = Vec::new();
            let mut last = p_in;
            for j in 1..=steps {
                let p = arc.point_at(f64::from(j) / f64::from(steps));
                segs.push(PathSeg::line(last, p));
                last = p;
            }
            segs
        }
        NodeSatelliteType::Invalid => Vec::new(),
    }
}
