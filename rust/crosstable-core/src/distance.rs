//! Layered breadth-first distance field over the level graph.

use crate::graph::{LevelGraph, NodeId};
use crate::progress::Progress;

/// Hop-count sentinel for nodes the pass never reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Fills `distances` with the shortest hop count from `start` to every
/// node, `UNREACHABLE` where no path exists. Nodes flagged in
/// `excluded` are never stepped into and keep the sentinel.
///
/// The search runs layer by layer with two alternating frontiers; the
/// layer counter is the distance written for every node of the current
/// frontier, so a distance is written exactly once and never lowered.
/// `queued` is transient per-layer bookkeeping (a neighbor shared by
/// two frontier nodes must enter the next frontier only once); flags
/// are dropped one layer later, once their nodes have been settled.
/// Progress is the fraction of nodes settled so far.
pub fn fill_distances<G, P>(
    level: &G,
    start: NodeId,
    excluded: &[bool],
    distances: &mut [u32],
    progress: &mut P,
) where
    G: LevelGraph,
    P: Progress + ?Sized,
{
    let count = level.node_count() as usize;
    debug_assert_eq!(distances.len(), count);
    debug_assert_eq!(excluded.len(), count);

    for entry in distances.iter_mut() {
        *entry = UNREACHABLE;
    }

    let mut curr: Vec<NodeId> = Vec::new();
    let mut next: Vec<NodeId> = Vec::new();
    let mut queued = vec![false; count];
    let mut layer: u32 = 0;
    let mut settled: usize = 0;

    curr.push(start);
    progress.fraction(0.0);

    while !curr.is_empty() {
        for &node in &curr {
            distances[node as usize] = layer;
            for target in level.links(node) {
                if !level.is_valid(target) {
                    continue;
                }
                let i = target as usize;
                if excluded[i] || queued[i] {
                    continue;
                }
                // Still at the sentinel, or written in this very layer
                // by a sibling; strictly-greater filters both.
                if distances[i] > layer {
                    queued[i] = true;
                    next.push(target);
                }
            }
        }
        for &node in &curr {
            queued[node as usize] = false;
        }

        settled += curr.len();
        std::mem::swap(&mut curr, &mut next);
        next.clear();
        layer += 1;
        progress.fraction(settled as f32 / count as f32);
    }
}
