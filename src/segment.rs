//! Road Segment Structure
//!
//! A segment is one straight piece of road. Segments live in a
//! [`SegmentForest`](crate::forest::SegmentForest) and refer to each other
//! by [`SegmentId`].

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable index of a segment inside its forest
///
/// IDs are handed out in creation order and never reused, since segments
/// are never deleted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    /// Position of the segment in the forest's creation order
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Display classification of a segment
///
/// Tags have no effect on generation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentTag {
    /// Zero-length origin of a growth tree
    Root,
    /// Segment emitted by the growth cycle
    Grown,
    /// Post-pass segment joining leaves of two different trees
    Connector,
}

/// A single road segment
///
/// # Invariants
///
/// - A non-root segment's `start` equals its parent's `end`.
/// - Following `parent` links ends at `root` within the tree depth.
/// - A grown segment appears in exactly its parent's `children`; a connector
///   appears in the `children` of both leaves it joins.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Point the segment was grown from
    pub start: Vec2,

    /// Point growth continues from
    pub end: Vec2,

    /// Segment this one grew out of, `None` for a root
    pub parent: Option<SegmentId>,

    /// Origin segment of this segment's growth tree
    pub root: SegmentId,

    /// Segments grown from this one, plus any connectors attached to it
    pub children: Vec<SegmentId>,

    /// Display classification
    pub tag: SegmentTag,

    /// Weighted pull directions accumulated during the current round
    pub(crate) influence: Vec<Vec2>,

    /// Whether any attraction point claimed this segment this round
    pub(crate) attracted_this_round: bool,
}

impl Segment {
    pub(crate) fn new(
        start: Vec2,
        end: Vec2,
        parent: Option<SegmentId>,
        root: SegmentId,
        tag: SegmentTag,
    ) -> Self {
        Self {
            start,
            end,
            parent,
            root,
            children: Vec::new(),
            tag,
            influence: Vec::new(),
            attracted_this_round: false,
        }
    }

    /// Check if this segment is the origin of its tree
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if nothing has been attached to this segment
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Influence vectors accumulated so far this round
    #[inline]
    pub fn influence(&self) -> &[Vec2] {
        &self.influence
    }

    #[inline]
    pub fn attracted_this_round(&self) -> bool {
        self.attracted_this_round
    }

    pub(crate) fn push_influence(&mut self, pull: Vec2) {
        self.influence.push(pull);
        self.attracted_this_round = true;
    }

    pub(crate) fn clear_influence(&mut self) {
        self.influence.clear();
        self.attracted_this_round = false;
    }
}

/// Renderable view of a segment: endpoints plus display tag
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLine {
    pub start: Vec2,
    pub end: Vec2,
    pub tag: SegmentTag,
}

impl From<&Segment> for SegmentLine {
    fn from(segment: &Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            tag: segment.tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_segment() {
        let id = SegmentId(0);
        let root = Segment::new(Vec2::ONE, Vec2::ONE, None, id, SegmentTag::Root);
        assert!(root.is_root());
        assert!(root.is_leaf());
        assert_eq!(root.length(), 0.0);
        assert_eq!(root.root, id);
    }

    #[test]
    fn test_influence_marks_attraction() {
        let mut seg = Segment::new(Vec2::ZERO, Vec2::X, Some(SegmentId(0)), SegmentId(0), SegmentTag::Grown);
        assert!(!seg.attracted_this_round());

        seg.push_influence(Vec2::Y);
        assert!(seg.attracted_this_round());
        assert_eq!(seg.influence(), &[Vec2::Y]);

        seg.clear_influence();
        assert!(!seg.attracted_this_round());
        assert!(seg.influence().is_empty());
    }

    #[test]
    fn test_segment_line_from_segment() {
        let seg = Segment::new(Vec2::ZERO, Vec2::new(3.0, 4.0), Some(SegmentId(0)), SegmentId(0), SegmentTag::Grown);
        let line = SegmentLine::from(&seg);
        assert_eq!(line.start, Vec2::ZERO);
        assert_eq!(line.end, Vec2::new(3.0, 4.0));
        assert_eq!(line.tag, SegmentTag::Grown);
        assert_eq!(seg.length(), 5.0);
    }
}
