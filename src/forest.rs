//! Segment arena
//!
//! The forest owns every segment. Parent, root, and child links are
//! [`SegmentId`]s into the same arena, so no segment ever borrows another.

use std::ops::Index;

use glam::Vec2;
use rand::Rng;

use crate::attraction::AttractionField;
use crate::error::{NetworkError, Result};
use crate::segment::{Segment, SegmentId, SegmentTag};

/// Record of a post-pass connector and the two leaves it joins
///
/// The connector's own `parent` is `from`; `to` is the second attachment,
/// which the growth-tree links don't represent.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub segment: SegmentId,
    pub from: SegmentId,
    pub to: SegmentId,
}

/// Arena of all segments across every growth tree
#[derive(Debug, Clone, Default)]
pub struct SegmentForest {
    segments: Vec<Segment>,
    roots: Vec<SegmentId>,
    connectors: Vec<Connector>,
}

impl SegmentForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-length root segment at `location`
    pub fn add_root(&mut self, location: Vec2) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments
            .push(Segment::new(location, location, None, id, SegmentTag::Root));
        self.roots.push(id);
        id
    }

    /// Seed `root_count` roots on randomly chosen attraction points
    ///
    /// Points are drawn with replacement, so two roots may share a location.
    /// Returns the chosen locations in seeding order. An empty field seeds
    /// nothing.
    pub fn seed_roots<R: Rng>(
        &mut self,
        field: &AttractionField,
        root_count: usize,
        rng: &mut R,
    ) -> Vec<Vec2> {
        if field.is_empty() {
            return Vec::new();
        }
        (0..root_count)
            .map(|_| {
                let location = field.points()[rng.gen_range(0..field.len())].location;
                self.add_root(location);
                location
            })
            .collect()
    }

    /// Grow a new segment from `parent`'s end to `new_end`
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this forest.
    pub fn attach(&mut self, parent: SegmentId, new_end: Vec2) -> SegmentId {
        let id = SegmentId(self.segments.len());
        let (start, root) = {
            let p = &self[parent];
            (p.end, p.root)
        };
        self.segments
            .push(Segment::new(start, new_end, Some(parent), root, SegmentTag::Grown));
        self.segments[parent.0].children.push(id);
        id
    }

    /// Join the ends of two leaves with a connector segment
    ///
    /// The connector starts at `from`'s end, belongs to `from`'s tree, and is
    /// listed in the children of both leaves.
    ///
    /// # Panics
    ///
    /// Panics if either id was not issued by this forest.
    pub fn connect(&mut self, from: SegmentId, to: SegmentId) -> SegmentId {
        let id = SegmentId(self.segments.len());
        let (start, root) = {
            let f = &self[from];
            (f.end, f.root)
        };
        let end = self[to].end;
        self.segments
            .push(Segment::new(start, end, Some(from), root, SegmentTag::Connector));
        self.segments[from.0].children.push(id);
        self.segments[to.0].children.push(id);
        self.connectors.push(Connector { segment: id, from, to });
        id
    }

    /// All segments with no children, in creation order
    pub fn leaves(&self) -> Vec<SegmentId> {
        self.iter()
            .filter(|(_, s)| s.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Get a segment by ID
    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Get a segment by raw index
    ///
    /// # Errors
    ///
    /// Returns `SegmentNotFound` if no segment has that index
    pub fn segment(&self, index: usize) -> Result<&Segment> {
        self.segments
            .get(index)
            .ok_or(NetworkError::SegmentNotFound(index))
    }

    pub(crate) fn get_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in creation order
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (SegmentId(i), s))
    }

    /// IDs of every segment in creation order
    pub fn ids(&self) -> impl Iterator<Item = SegmentId> {
        (0..self.segments.len()).map(SegmentId)
    }

    #[inline]
    pub fn roots(&self) -> &[SegmentId] {
        &self.roots
    }

    #[inline]
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Number of parent links between a segment and its root
    pub fn depth(&self, id: SegmentId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self[current].parent {
            current = parent;
            depth += 1;
        }
        depth
    }

    /// Follow parent links up to the tree's origin
    pub fn walk_to_root(&self, id: SegmentId) -> SegmentId {
        let mut current = id;
        while let Some(parent) = self[current].parent {
            current = parent;
        }
        current
    }
}

impl Index<SegmentId> for SegmentForest {
    type Output = Segment;

    fn index(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attraction::AttractionPoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_root_is_its_own_root() {
        let mut forest = SegmentForest::new();
        let root = forest.add_root(Vec2::new(5.0, 5.0));

        assert_eq!(forest[root].root, root);
        assert_eq!(forest[root].start, forest[root].end);
        assert_eq!(forest.roots(), &[root]);
        assert_eq!(forest[root].tag, SegmentTag::Root);
    }

    #[test]
    fn test_attach_links_parent_and_child() {
        let mut forest = SegmentForest::new();
        let root = forest.add_root(Vec2::ZERO);
        let a = forest.attach(root, Vec2::new(10.0, 0.0));
        let b = forest.attach(a, Vec2::new(20.0, 0.0));

        assert_eq!(forest[a].start, forest[root].end);
        assert_eq!(forest[b].start, forest[a].end);
        assert_eq!(forest[a].parent, Some(root));
        assert_eq!(forest[b].root, root);
        assert_eq!(forest[root].children, vec![a]);
        assert_eq!(forest[a].children, vec![b]);
        assert_eq!(forest.depth(b), 2);
        assert_eq!(forest.walk_to_root(b), root);
    }

    #[test]
    fn test_leaves() {
        let mut forest = SegmentForest::new();
        let r1 = forest.add_root(Vec2::ZERO);
        let r2 = forest.add_root(Vec2::new(100.0, 0.0));
        let a = forest.attach(r1, Vec2::new(10.0, 0.0));
        let b = forest.attach(r1, Vec2::new(0.0, 10.0));

        assert_eq!(forest.leaves(), vec![r2, a, b]);
    }

    #[test]
    fn test_connect_attaches_to_both_leaves() {
        let mut forest = SegmentForest::new();
        let r1 = forest.add_root(Vec2::ZERO);
        let r2 = forest.add_root(Vec2::new(30.0, 0.0));
        let a = forest.attach(r1, Vec2::new(10.0, 0.0));
        let b = forest.attach(r2, Vec2::new(20.0, 0.0));

        let c = forest.connect(a, b);

        assert_eq!(forest[c].tag, SegmentTag::Connector);
        assert_eq!(forest[c].start, forest[a].end);
        assert_eq!(forest[c].end, forest[b].end);
        assert_eq!(forest[c].parent, Some(a));
        assert_eq!(forest[c].root, r1);
        assert!(forest[a].children.contains(&c));
        assert!(forest[b].children.contains(&c));
        assert_eq!(forest.connectors(), &[Connector { segment: c, from: a, to: b }]);
    }

    #[test]
    fn test_seed_roots_uses_attraction_locations() {
        let field = AttractionField::from_points(vec![
            AttractionPoint::new(Vec2::new(1.0, 1.0), 1.0),
            AttractionPoint::new(Vec2::new(2.0, 2.0), 1.0),
        ]);
        let mut forest = SegmentForest::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let locations = forest.seed_roots(&field, 8, &mut rng);

        assert_eq!(locations.len(), 8);
        assert_eq!(forest.len(), 8);
        for (id, seg) in forest.iter() {
            assert_eq!(seg.root, id);
            assert!(field.points().iter().any(|p| p.location == seg.end));
        }
    }

    #[test]
    fn test_seed_roots_on_empty_field() {
        let mut forest = SegmentForest::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(forest.seed_roots(&AttractionField::default(), 4, &mut rng).is_empty());
        assert!(forest.is_empty());
    }

    #[test]
    fn test_segment_lookup() {
        let mut forest = SegmentForest::new();
        forest.add_root(Vec2::ZERO);
        assert!(forest.segment(0).is_ok());
        assert_eq!(forest.segment(1).unwrap_err(), NetworkError::SegmentNotFound(1));
        assert!(forest.get(SegmentId(5)).is_none());
    }
}
