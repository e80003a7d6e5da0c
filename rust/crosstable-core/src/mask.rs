//! Connectivity masking: restricts the distance passes to the region
//! reachable from at least one waypoint anchor.

use crate::graph::{LevelGraph, NodeId};

/// Flood-fills from every anchor and returns the exclusion mask:
/// `true` for nodes never reached, which the distance passes treat as
/// permanently visited. The mask is immutable after this point.
///
/// Links are traversed in both directions; a one-way link still makes
/// its endpoints mutually reachable here. The fill uses an explicit
/// stack, graphs can run to hundreds of thousands of nodes.
pub fn exclusion_mask<G: LevelGraph>(level: &G, anchors: &[NodeId]) -> Vec<bool> {
    let count = level.node_count() as usize;

    let mut undirected: Vec<Vec<NodeId>> = vec![Vec::new(); count];
    for node in 0..count as NodeId {
        for target in level.links(node) {
            if level.is_valid(target) {
                undirected[node as usize].push(target);
                undirected[target as usize].push(node);
            }
        }
    }

    let mut reached = vec![false; count];
    let mut stack: Vec<NodeId> = Vec::with_capacity(8192);
    for &anchor in anchors {
        if !level.is_valid(anchor) || reached[anchor as usize] {
            continue;
        }
        reached[anchor as usize] = true;
        stack.push(anchor);
        while let Some(node) = stack.pop() {
            for &next in &undirected[node as usize] {
                if !reached[next as usize] {
                    reached[next as usize] = true;
                    stack.push(next);
                }
            }
        }
    }

    for flag in reached.iter_mut() {
        *flag = !*flag;
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryLevelGraph, INVALID_NODE, LINKS_PER_NODE};
    use uuid::Uuid;

    fn graph(links: Vec<[NodeId; LINKS_PER_NODE]>) -> MemoryLevelGraph {
        MemoryLevelGraph::new(Uuid::nil(), 1.0, links).unwrap()
    }

    fn slot(target: NodeId) -> [NodeId; LINKS_PER_NODE] {
        [target, INVALID_NODE, INVALID_NODE, INVALID_NODE]
    }

    #[test]
    fn isolated_node_is_excluded() {
        // 0 <-> 1, 2 floating
        let g = graph(vec![slot(1), slot(0), slot(INVALID_NODE)]);
        let mask = exclusion_mask(&g, &[0]);
        assert_eq!(mask, vec![false, false, true]);
    }

    #[test]
    fn one_way_link_is_traversed_backwards() {
        // Only 0 -> 1 is declared; reachability must still be symmetric.
        let g = graph(vec![slot(1), slot(INVALID_NODE)]);
        let from_source = exclusion_mask(&g, &[0]);
        let from_target = exclusion_mask(&g, &[1]);
        assert_eq!(from_source, vec![false, false]);
        assert_eq!(from_target, from_source);
    }

    #[test]
    fn multiple_anchors_union_their_regions() {
        // Two components: {0, 1} and {2, 3}.
        let g = graph(vec![slot(1), slot(0), slot(3), slot(2)]);
        assert_eq!(exclusion_mask(&g, &[0]), vec![false, false, true, true]);
        assert_eq!(exclusion_mask(&g, &[0, 2]), vec![false, false, false, false]);
    }

    #[test]
    fn no_anchors_excludes_everything() {
        let g = graph(vec![slot(1), slot(0)]);
        assert_eq!(exclusion_mask(&g, &[]), vec![true, true]);
    }

    #[test]
    fn anchor_order_does_not_change_the_mask() {
        let g = graph(vec![slot(1), slot(2), slot(0), slot(INVALID_NODE)]);
        assert_eq!(exclusion_mask(&g, &[0, 3]), exclusion_mask(&g, &[3, 0]));
    }
}
