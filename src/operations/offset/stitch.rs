use tracing::trace;

use crate::geometry::{Path, PathSeg};

/// Positional tolerance for matching slice endpoints. Slices produced by
/// the same crossing share the exact split point, so this only has to
/// absorb rounding.
const STITCH_TOL: f64 = 1e-6;

/// Chains the surviving slices back into contiguous paths.
///
/// Slices keep the traversal direction of the raw offset, so chaining
/// only ever matches an end to a start. A chain whose endpoints meet is
/// emitted closed.
pub(super) fn connect(slices: Vec<Path>, closed_input: bool) -> Vec<Path> {
    let mut out: Vec<Path> = Vec::new();
    let mut used = vec![false; slices.len()];

    for i in 0..slices.len() {
        if used[i] || slices[i].is_empty() {
            continue;
        }
        used[i] = true;
        let mut segs: Vec<PathSeg> = slices[i].segs.clone();

        loop {
            let Some(last) = segs.last() else { break };
            let end = last.end();
            let next = slices.iter().enumerate().find(|(j, s)| {
                !used[*j]
                    && !s.is_empty()
                    && s.start().is_some_and(|p| (p - end).norm() < STITCH_TOL)
            });
            match next {
                Some((j, _)) => {
                    used[j] = true;
                    segs.extend(slices[j].segs.iter().copied());
                }
                None => break,
            }
        }

        let closed = match (segs.first(), segs.last()) {
            (Some(first), Some(last)) => (last.end() - first.start()).norm() < STITCH_TOL,
            _ => false,
        };
        if closed && segs.len() < 2 {
            trace!("dropped degenerate closed chain of one segment");
            continue;
        }
        if !closed && closed_input {
            trace!(segs = segs.len(), "chain did not close on a closed input");
        }
        out.push(Path::new(segs, closed));
    }
    out
}
