use super::self_intersect::SegIntersect;
use crate::geometry::{Path, PathSeg};
use crate::math::TOLERANCE;

/// Parameter slack for merging split points that fall on top of each
/// other.
const SPLIT_EPS: f64 = 1e-9;

/// Cuts `path` into open slices at every crossing point.
///
/// Each crossing contributes a split on both segments involved. Closed
/// paths wrap around, so the slice count equals the split count; open
/// paths gain virtual splits at their two ends.
pub(super) fn cut(path: &Path, crossings: &[SegIntersect]) -> Vec<Path> {
    let n = path.segs.len();
    if n == 0 || crossings.is_empty() {
        return vec![path.clone()];
    }

    let mut splits: Vec<(usize, f64)> = Vec::with_capacity(crossings.len() * 2 + 2);
    for c in crossings {
        splits.push((c.seg_i, c.t_i));
        splits.push((c.seg_j, c.t_j));
    }
    if !path.closed {
        splits.push((0, 0.0));
        splits.push((n - 1, 1.0));
    }
    splits.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    splits.dedup_by(|a, b| a.0 == b.0 && (a.1 - b.1).abs() < SPLIT_EPS);

    if splits.len() < 2 {
        return vec![path.clone()];
    }

    let mut slices = Vec::with_capacity(splits.len());
    let last = splits.len() - 1;
    for (k, &from) in splits.iter().enumerate() {
        let to = if k == last {
            if !path.closed {
                break;
            }
            splits[0]
        } else {
            splits[k + 1]
        };
        // The wrap slice runs off the end of the segment list and back in
        // at the front.
        let wraps = k == last;
        if let Some(slice) = build_slice(path, from, to, wraps) {
            slices.push(slice);
        }
    }
    slices
}

/// Extracts the open subpath between two split positions.
fn build_slice(
    path: &Path,
    (s0, t0): (usize, f64),
    (s1, t1): (usize, f64),
    wraps: bool,
) -> Option<Path> {
    let n = path.segs.len();
    let mut segs: Vec<PathSeg> = Vec::new();
    let mut push = |seg: PathSeg| {
        if seg.length() > TOLERANCE {
            segs.push(seg);
        }
    };

    if s0 == s1 && !wraps {
        if t1 - t0 > SPLIT_EPS {
            push(path.segs[s0].portion(t0, t1));
        }
    } else {
        push(path.segs[s0].portion(t0, 1.0));
        let mut i = (s0 + 1) % n;
        while i != s1 {
            push(path.segs[i]);
            i = (i + 1) % n;
        }
        push(path.segs[s1].portion(0.0, t1));
    }

    if segs.is_empty() {
        None
    } else {
        Some(Path::new(segs, false))
    }
}
