use crate::math::arc_2d::{sub_bulge, ArcGeom};
use crate::math::{cubic_2d, distance_2d, Point2, Vector2, TOLERANCE};

/// A single parametric path segment.
///
/// Arcs use the bulge convention (`bulge = tan(sweep / 4)`, positive =
/// counter-clockwise). All variants are evaluated over `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    Line {
        p0: Point2,
        p1: Point2,
    },
    Arc {
        p0: Point2,
        p1: Point2,
        bulge: f64,
    },
    Cubic {
        p0: Point2,
        p1: Point2,
        p2: Point2,
        p3: Point2,
    },
}

impl PathSeg {
    /// Creates a line segment.
    #[must_use]
    pub fn line(p0: Point2, p1: Point2) -> Self {
        Self::Line { p0, p1 }
    }

    /// Creates a bulge-encoded arc segment. A zero bulge degrades to a line.
    #[must_use]
    pub fn arc(p0: Point2, p1: Point2, bulge: f64) -> Self {
        if bulge.abs() < 1e-12 {
            Self::Line { p0, p1 }
        } else {
            Self::Arc { p0, p1, bulge }
        }
    }

    /// Creates a cubic Bézier segment.
    #[must_use]
    pub fn cubic(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self::Cubic { p0, p1, p2, p3 }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Line { p0, .. } | Self::Arc { p0, .. } | Self::Cubic { p0, .. } => *p0,
        }
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Line { p1, .. } | Self::Arc { p1, .. } => *p1,
            Self::Cubic { p3, .. } => *p3,
        }
    }

    /// Returns true if this segment is a straight line.
    #[must_use]
    pub fn is_line_segment(&self) -> bool {
        matches!(self, Self::Line { .. })
    }

    /// Returns true if this segment carries no usable geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let chord = (self.end() - self.start()).norm();
        match self {
            Self::Line { .. } | Self::Arc { .. } => chord < TOLERANCE,
            Self::Cubic { p0, p1, p2, .. } => {
                chord < TOLERANCE
                    && (p1 - p0).norm() < TOLERANCE
                    && (p2 - p0).norm() < TOLERANCE
            }
        }
    }

    /// Evaluates the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Line { p0, p1 } => p0 + (p1 - p0) * t,
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    p0 + (p1 - p0) * t
                } else {
                    arc.point_at(t)
                }
            }
            Self::Cubic { p0, p1, p2, p3 } => cubic_2d::point_at(&[*p0, *p1, *p2, *p3], t),
        }
    }

    /// Returns the unit tangent at parameter `t`.
    ///
    /// Degenerate segments return the zero vector. Cubic cusps fall back
    /// to the secant through nearby parameters.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Line { p0, p1 } => {
                let d = p1 - p0;
                let len = d.norm();
                if len < TOLERANCE {
                    Vector2::zeros()
                } else {
                    d / len
                }
            }
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    Vector2::zeros()
                } else {
                    arc.tangent_at(t)
                }
            }
            Self::Cubic { p0, p1, p2, p3 } => {
                let ctrl = [*p0, *p1, *p2, *p3];
                let d = cubic_2d::derivative_at(&ctrl, t);
                let len = d.norm();
                if len > TOLERANCE {
                    return d / len;
                }
                // Cusp: secant through a small parameter step.
                let h = 1e-4;
                let a = cubic_2d::point_at(&ctrl, (t - h).max(0.0));
                let b = cubic_2d::point_at(&ctrl, (t + h).min(1.0));
                let s = b - a;
                let slen = s.norm();
                if slen < TOLERANCE {
                    Vector2::zeros()
                } else {
                    s / slen
                }
            }
        }
    }

    /// Returns the arc length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line { p0, p1 } => (p1 - p0).norm(),
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    (p1 - p0).norm()
                } else {
                    arc.length()
                }
            }
            Self::Cubic { p0, p1, p2, p3 } => cubic_2d::length(&[*p0, *p1, *p2, *p3], 1e-9),
        }
    }

    /// Extracts the sub-segment spanning parameter range `[t0, t1]`.
    #[must_use]
    pub fn portion(&self, t0: f64, t1: f64) -> Self {
        let t0 = t0.clamp(0.0, 1.0);
        let t1 = t1.clamp(0.0, 1.0);
        match self {
            Self::Line { .. } => Self::Line {
                p0: self.point_at(t0),
                p1: self.point_at(t1),
            },
            Self::Arc { bulge, .. } => Self::arc(
                self.point_at(t0),
                self.point_at(t1),
                sub_bulge(*bulge, t0, t1),
            ),
            Self::Cubic { p0, p1, p2, p3 } => {
                let sub = cubic_2d::portion(&[*p0, *p1, *p2, *p3], t0, t1);
                Self::Cubic {
                    p0: sub[0],
                    p1: sub[1],
                    p2: sub[2],
                    p3: sub[3],
                }
            }
        }
    }

    /// Returns the segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line { p0, p1 } => Self::Line { p0: *p1, p1: *p0 },
            Self::Arc { p0, p1, bulge } => Self::Arc {
                p0: *p1,
                p1: *p0,
                bulge: -bulge,
            },
            Self::Cubic { p0, p1, p2, p3 } => Self::Cubic {
                p0: *p3,
                p1: *p2,
                p2: *p1,
                p3: *p0,
            },
        }
    }

    /// Finds the parameter of the point on the segment nearest to `p`.
    #[must_use]
    pub fn nearest_time(&self, p: Point2) -> f64 {
        match self {
            Self::Line { p0, p1 } => {
                let d = p1 - p0;
                let len_sq = d.norm_squared();
                if len_sq < 1e-20 {
                    0.0
                } else {
                    ((p - p0).dot(&d) / len_sq).clamp(0.0, 1.0)
                }
            }
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    return 0.0;
                }
                let v = p - arc.center;
                let angle = v.y.atan2(v.x);
                if let Some(t) = arc.time_of_angle(angle) {
                    t
                } else if (p - *p0).norm_squared() <= (p - *p1).norm_squared() {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Cubic { p0, p1, p2, p3 } => cubic_2d::nearest_time(&[*p0, *p1, *p2, *p3], p),
        }
    }

    /// Returns the minimum distance from `p` to the segment.
    #[must_use]
    pub fn distance_to(&self, p: Point2) -> f64 {
        match self {
            Self::Line { p0, p1 } => distance_2d::point_to_segment_dist(p, *p0, *p1),
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    distance_2d::point_to_segment_dist(p, *p0, *p1)
                } else {
                    distance_2d::point_to_arc_dist(p, &arc)
                }
            }
            Self::Cubic { .. } => (self.point_at(self.nearest_time(p)) - p).norm(),
        }
    }

    /// Appends a flattened polyline approximation to `out`, excluding the
    /// start point.
    ///
    /// `tolerance` bounds the deviation between the segment and its chord
    /// approximation.
    pub fn flatten_into(&self, tolerance: f64, out: &mut Vec<Point2>) {
        match self {
            Self::Line { p1, .. } => out.push(*p1),
            Self::Arc { p0, p1, bulge } => {
                let arc = ArcGeom::from_bulge(*p0, *p1, *bulge);
                if arc.is_degenerate() {
                    out.push(*p1);
                    return;
                }
                let n = arc_subdivision_count(arc.radius, arc.sweep.abs(), tolerance);
                for j in 1..n {
                    let t = f64::from(j) / f64::from(n);
                    out.push(arc.point_at(t));
                }
                out.push(*p1);
            }
            Self::Cubic { p0, p1, p2, p3 } => {
                cubic_2d::flatten_into(&[*p0, *p1, *p2, *p3], tolerance, out);
            }
        }
    }

    /// Returns a copy with the start point moved to `p`.
    ///
    /// Arcs keep their bulge, cubics keep their interior control points; the
    /// adjustment is meant for small corner-welding moves.
    #[must_use]
    pub fn with_start(&self, p: Point2) -> Self {
        match self {
            Self::Line { p1, .. } => Self::Line { p0: p, p1: *p1 },
            Self::Arc { p1, bulge, .. } => Self::Arc {
                p0: p,
                p1: *p1,
                bulge: *bulge,
            },
            Self::Cubic { p1, p2, p3, .. } => Self::Cubic {
                p0: p,
                p1: *p1,
                p2: *p2,
                p3: *p3,
            },
        }
    }

    /// Returns a copy with the end point moved to `p`.
    #[must_use]
    pub fn with_end(&self, p: Point2) -> Self {
        match self {
            Self::Line { p0, .. } => Self::Line { p0: *p0, p1: p },
            Self::Arc { p0, bulge, .. } => Self::Arc {
                p0: *p0,
                p1: p,
                bulge: *bulge,
            },
            Self::Cubic { p0, p1, p2, .. } => Self::Cubic {
                p0: *p0,
                p1: *p1,
                p2: *p2,
                p3: p,
            },
        }
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    // For a given tolerance: θ = 2 * acos(1 - tolerance/r)
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}
