//! Color mapping for segment tags

use crate::segment::SegmentTag;

/// RGBA color type
pub type MeshColor = [f32; 4];

/// Trait for mapping network elements to colors
pub trait ColorMapper {
    /// Map a segment tag to an RGBA color
    fn segment_color(&self, tag: SegmentTag) -> MeshColor;

    /// Color for attraction point quads
    fn point_color(&self) -> MeshColor {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Default color mapper: blue roots, red roads, green connectors, black points
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper for BasicColorMapper {
    fn segment_color(&self, tag: SegmentTag) -> MeshColor {
        match tag {
            SegmentTag::Root => [0.0, 0.0, 1.0, 1.0],      // Blue
            SegmentTag::Grown => [1.0, 0.0, 0.0, 1.0],     // Red
            SegmentTag::Connector => [0.0, 1.0, 0.0, 1.0], // Green
        }
    }
}

/// Custom color mapper that allows setting colors for each tag
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub root: MeshColor,
    pub grown: MeshColor,
    pub connector: MeshColor,
    pub point: MeshColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            root: [0.0, 0.0, 1.0, 1.0],
            grown: [1.0, 0.0, 0.0, 1.0],
            connector: [0.0, 1.0, 0.0, 1.0],
            point: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl ColorMapper for CustomColorMapper {
    fn segment_color(&self, tag: SegmentTag) -> MeshColor {
        match tag {
            SegmentTag::Root => self.root,
            SegmentTag::Grown => self.grown,
            SegmentTag::Connector => self.connector,
        }
    }

    fn point_color(&self) -> MeshColor {
        self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_colors() {
        assert_eq!(BasicColorMapper.segment_color(SegmentTag::Grown), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(BasicColorMapper.segment_color(SegmentTag::Connector), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(BasicColorMapper.point_color(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_custom_defaults_match_basic() {
        let custom = CustomColorMapper::default();
        for tag in [SegmentTag::Root, SegmentTag::Grown, SegmentTag::Connector] {
            assert_eq!(custom.segment_color(tag), BasicColorMapper.segment_color(tag));
        }
        assert_eq!(custom.point_color(), BasicColorMapper.point_color());
    }
}
