//! Parallel-curve construction for whole paths.
//!
//! The offset runs as a slice-and-filter pipeline: every segment is
//! shifted individually, corners are welded or joined, the raw result is
//! cut at its self-crossings, and the slices that fell back onto the
//! source or onto the wrong side are discarded before stitching the
//! remainder together.

mod filter;
mod join;
mod raw_offset;
mod self_intersect;
mod slice;
mod stitch;
pub mod style;

pub use style::{FillRule, JoinType, OffsetStyle, Precision};

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::{Path, PathSeg};
use crate::math::{Point2, TOLERANCE};

/// Output of one offset invocation.
#[derive(Debug, Clone)]
pub struct OffsetOutcome {
    /// The cleaned offset paths.
    pub result: Vec<Path>,
    /// The raw parallels before self-intersection cleanup, useful as an
    /// on-canvas hint while dragging.
    pub helper: Vec<Path>,
    /// The flattened working copies of the source paths the offset was
    /// measured from.
    pub mix: Vec<Path>,
}

impl OffsetOutcome {
    /// Distance from `p` to the nearest working source path.
    ///
    /// This is the magnitude a UI would display while the pointer drags
    /// the offset handle.
    #[must_use]
    pub fn offset_amount(&self, p: Point2) -> f64 {
        let nearest = self
            .mix
            .iter()
            .map(|path| path.distance_to(p))
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            nearest
        } else {
            0.0
        }
    }
}

/// Offsets a set of subpaths by a common distance.
///
/// For closed subpaths a positive distance grows the shape and a negative
/// one shrinks it, unless a reference point is supplied, in which case
/// the side is derived from the winding parity at that point. Open
/// subpaths are offset to one side; `with_outside` picks which.
#[derive(Debug, Clone)]
pub struct OffsetPath {
    paths: Vec<Path>,
    distance: f64,
    style: OffsetStyle,
    outside: Option<bool>,
    reference: Option<Point2>,
}

impl OffsetPath {
    #[must_use]
    pub fn new(paths: Vec<Path>, distance: f64, style: OffsetStyle) -> Self {
        Self {
            paths,
            distance,
            style,
            outside: None,
            reference: None,
        }
    }

    /// Forces the side for open subpaths: `true` offsets outward (the
    /// side away from the reference point, or the left of travel without
    /// one).
    #[must_use]
    pub fn with_outside(mut self, outside: bool) -> Self {
        self.outside = Some(outside);
        self
    }

    /// Supplies the pointer position the drag started from; it resolves
    /// which side counts as the inside.
    #[must_use]
    pub fn with_reference(mut self, reference: Point2) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Runs the offset.
    ///
    /// A distance that swallows the geometry entirely is not a failure:
    /// the result set comes back empty while `mix` still carries the
    /// working copies, so a drag readout keeps working past the
    /// in-radius.
    ///
    /// # Errors
    ///
    /// Fails when the offset distance is not a finite number.
    pub fn execute(&self) -> Result<OffsetOutcome> {
        if !self.distance.is_finite() {
            return Err(OperationError::InvalidInput(
                "offset distance must be finite".to_owned(),
            )
            .into());
        }
        let tolerance = self.style.precision().tolerance();
        debug!(
            distance = self.distance,
            tolerance,
            subpaths = self.paths.len(),
            "path offset"
        );

        if self.paths.iter().all(Path::is_empty) {
            return Ok(OffsetOutcome {
                result: self.paths.clone(),
                helper: Vec::new(),
                mix: Vec::new(),
            });
        }
        if self.distance.abs() < TOLERANCE {
            let normalized: Vec<Path> = self.paths.iter().map(Path::normalized).collect();
            return Ok(OffsetOutcome {
                result: normalized.clone(),
                helper: Vec::new(),
                mix: normalized,
            });
        }

        let mut result = Vec::new();
        let mut helper = Vec::new();
        let mut mix = Vec::new();

        for path in &self.paths {
            let working = flatten_cubics(&path.normalized(), tolerance);
            if working.is_empty() {
                continue;
            }
            let (left_d, inset) = self.resolve_side(&working);
            trace!(left_d, inset, segs = working.segs.len(), "offset subpath");

            let raw = match raw_offset::build(&working, left_d, &self.style) {
                Ok(raw) => raw,
                Err(err) => {
                    debug!(%err, "subpath collapsed under the offset");
                    mix.push(working);
                    continue;
                }
            };
            helper.push(raw.clone());

            let crossings = self_intersect::find_all(&raw);
            let candidates = if crossings.is_empty() {
                vec![raw]
            } else {
                trace!(crossings = crossings.len(), "cleaning raw offset");
                let slices = slice::cut(&raw, &crossings);
                let kept = filter::keep(
                    slices,
                    &working,
                    &raw,
                    self.distance,
                    inset,
                    self.style.fill_rule(),
                );
                stitch::connect(kept, raw.closed)
            };

            // An offset loop keeps the orientation of its source; a ring
            // that came out flipped is an inverted remnant.
            let source_ccw = working.signed_area() >= 0.0;
            for candidate in candidates {
                if candidate.closed && working.closed {
                    let ccw = candidate.signed_area() >= 0.0;
                    if ccw != source_ccw {
                        trace!("dropped inverted offset loop");
                        continue;
                    }
                }
                result.push(candidate);
            }
            mix.push(working);
        }

        if result.is_empty() {
            // A distance past the in-radius swallows the shape; the drag
            // keeps running against the working copies in `mix`.
            debug!("offset swallowed every subpath");
        }
        Ok(OffsetOutcome {
            result,
            helper,
            mix,
        })
    }

    /// Resolves the left-signed offset distance and whether this is an
    /// inset, for one working subpath.
    fn resolve_side(&self, working: &Path) -> (f64, bool) {
        let magnitude = self.distance.abs();
        if working.closed {
            let inset = match self.reference {
                // Odd winding parity puts the reference inside the shape:
                // dragging from inside shrinks it.
                Some(reference) => self.total_winding(reference) % 2 != 0,
                None => self.distance < 0.0,
            };
            let ccw = working.signed_area() >= 0.0;
            // The interior lies to the left of travel on a CCW ring.
            let left_d = if inset == ccw { magnitude } else { -magnitude };
            (left_d, inset)
        } else {
            let left_is_out = self
                .reference
                .map_or(true, |reference| !left_of(working, reference));
            let want_out = self.outside.unwrap_or(self.distance >= 0.0);
            let left_d = if want_out == left_is_out {
                magnitude
            } else {
                -magnitude
            };
            (left_d, !want_out)
        }
    }

    /// Total winding of every input subpath around `p`.
    fn total_winding(&self, p: Point2) -> i32 {
        self.paths.iter().map(|path| path.winding_at(p)).sum()
    }
}

/// True when `p` lies on the left of the path at its nearest point.
fn left_of(path: &Path, p: Point2) -> bool {
    let Some((i, t)) = path.nearest_time(p) else {
        return true;
    };
    let tangent = path.segs[i].tangent_at(t);
    let v = p - path.segs[i].point_at(t);
    tangent.x * v.y - tangent.y * v.x >= 0.0
}

/// Replaces cubic segments with line chains within `tolerance`; lines and
/// arcs offset exactly and pass through untouched.
fn flatten_cubics(path: &Path, tolerance: f64) -> Path {
    if !path
        .segs
        .iter()
        .any(|seg| matches!(seg, PathSeg::Cubic { .. }))
    {
        return path.clone();
    }
    let mut segs = Vec::with_capacity(path.segs.len() * 4);
    for seg in &path.segs {
        if let PathSeg::Cubic { p0, .. } = seg {
            let mut pts = vec![*p0];
            seg.flatten_into(tolerance, &mut pts);
            for w in pts.windows(2) {
                if (w[1] - w[0]).norm() > TOLERANCE {
                    segs.push(PathSeg::line(w[0], w[1]));
                }
            }
        } else {
            segs.push(*seg);
        }
    }
    Path::new(segs, path.closed)
}
