//! Connectivity post-pass
//!
//! After growth stops, leaves of different trees whose ends are close
//! together are joined by connector segments. Connectors never grow.

use glam::Vec2;

use crate::forest::SegmentForest;
use crate::segment::SegmentId;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Join every pair of leaves from different trees within `threshold`
///
/// Leaves are taken before any connector is added, so connectors never
/// chain. Each unordered pair is joined once, from the lower-index leaf to
/// the higher. Returns the new connector IDs in creation order.
pub fn connect_leaves(forest: &mut SegmentForest, threshold: f32) -> Vec<SegmentId> {
    let leaves = forest.leaves();
    let pairs = leaf_pairs(forest, &leaves, threshold);
    pairs
        .into_iter()
        .map(|(from, to)| forest.connect(from, to))
        .collect()
}

/// Pairs of leaf IDs from different trees with ends within `threshold`
///
/// Pairs are `(lower, higher)` and sorted, so the result is independent of
/// how candidates are found.
pub fn leaf_pairs(
    forest: &SegmentForest,
    leaves: &[SegmentId],
    threshold: f32,
) -> Vec<(SegmentId, SegmentId)> {
    if leaves.len() < 2 {
        return Vec::new();
    }
    let ends: Vec<Vec2> = leaves.iter().map(|&id| forest[id].end).collect();
    let threshold_sq = threshold * threshold;
    let joinable = |i: usize, j: usize| {
        forest[leaves[i]].root != forest[leaves[j]].root
            && ends[i].distance_squared(ends[j]) <= threshold_sq
    };

    let mut pairs = Vec::new();

    #[cfg(feature = "spatial-index")]
    {
        let index = SpatialIndex::new(&ends);
        for (i, &end) in ends.iter().enumerate() {
            for j in index.within(end, threshold) {
                if j > i && joinable(i, j) {
                    pairs.push((leaves[i], leaves[j]));
                }
            }
        }
    }

    #[cfg(not(feature = "spatial-index"))]
    {
        for i in 0..ends.len() {
            for j in (i + 1)..ends.len() {
                if joinable(i, j) {
                    pairs.push((leaves[i], leaves[j]));
                }
            }
        }
    }

    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentTag;

    /// Two trees whose tips meet near x = 0, plus a far third tree
    fn three_trees() -> (SegmentForest, [SegmentId; 3]) {
        let mut forest = SegmentForest::new();
        let r1 = forest.add_root(Vec2::new(-20.0, 0.0));
        let r2 = forest.add_root(Vec2::new(20.0, 0.0));
        let r3 = forest.add_root(Vec2::new(500.0, 500.0));
        let a = forest.attach(r1, Vec2::new(-4.0, 0.0));
        let b = forest.attach(r2, Vec2::new(4.0, 0.0));
        (forest, [a, b, r3])
    }

    #[test]
    fn test_connects_leaves_of_different_trees() {
        let (mut forest, [a, b, r3]) = three_trees();

        let connectors = connect_leaves(&mut forest, 10.0);

        assert_eq!(connectors.len(), 1);
        let c = connectors[0];
        assert_eq!(forest[c].tag, SegmentTag::Connector);
        assert_eq!(forest[c].start, forest[a].end);
        assert_eq!(forest[c].end, forest[b].end);
        assert_eq!(forest[a].children, vec![c]);
        assert_eq!(forest[b].children, vec![c]);
        assert!(forest[r3].children.is_empty());
    }

    #[test]
    fn test_threshold_excludes_distant_leaves() {
        let (mut forest, _) = three_trees();
        assert!(connect_leaves(&mut forest, 7.9).is_empty());
    }

    #[test]
    fn test_same_tree_leaves_are_not_joined() {
        let mut forest = SegmentForest::new();
        let root = forest.add_root(Vec2::ZERO);
        forest.attach(root, Vec2::new(5.0, 0.0));
        forest.attach(root, Vec2::new(0.0, 5.0));

        assert!(connect_leaves(&mut forest, 100.0).is_empty());
    }

    #[test]
    fn test_each_pair_joined_once() {
        let mut forest = SegmentForest::new();
        let roots: Vec<SegmentId> = (0..4)
            .map(|i| forest.add_root(Vec2::new(i as f32, 0.0)))
            .collect();

        let connectors = connect_leaves(&mut forest, 10.0);

        // 4 single-segment trees, all within range: 6 unordered pairs
        assert_eq!(connectors.len(), 6);
        for &root in &roots {
            assert_eq!(forest[root].children.len(), 3);
        }
        let mut listed = 0;
        for seg in forest.segments() {
            listed += seg.children.iter().filter(|c| connectors.contains(c)).count();
        }
        assert_eq!(listed, 2 * connectors.len());
    }

    #[test]
    fn test_no_pairs_for_single_leaf() {
        let mut forest = SegmentForest::new();
        forest.add_root(Vec2::ZERO);
        assert!(connect_leaves(&mut forest, 10.0).is_empty());
    }
}
