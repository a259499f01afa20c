//! RoadNetwork main structure

use glam::Vec2;

use crate::attraction::{AttractionField, AttractionPoint};
use crate::config::NetworkConfig;
use crate::diagnostics::{GenerationSummary, NoopReporter, Reporter};
use crate::error::Result;
use crate::forest::{Connector, SegmentForest};
use crate::generation::GrowthEngine;
use crate::segment::{Segment, SegmentId, SegmentLine};
use crate::terrain::{TerrainQuery, UniformTerrain};

/// A finished road network
///
/// Holds every generated segment, the attraction points growth never
/// reached, and the root locations growth started from. The network is
/// read-only once generated.
///
/// # Examples
///
/// ```
/// use road_network_sca::*;
///
/// let config = NetworkConfigBuilder::new()
///     .seed(42)
///     .bounds(Bounds::from_size(200.0, 200.0))
///     .unwrap()
///     .density(PointDensity::Custom(300))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let network = RoadNetwork::generate(config).unwrap();
/// println!("Generated {} segments", network.segment_count());
///
/// for line in network.segment_lines() {
///     // upload line.start / line.end to a line-list buffer
///     let _ = (line.start, line.end, line.tag);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    /// Configuration used to generate this network
    config: NetworkConfig,

    /// Every segment, in creation order
    forest: SegmentForest,

    /// Attraction points left when growth stopped
    remaining: AttractionField,

    /// Locations of the root segments, in seeding order
    starting_locations: Vec<Vec2>,

    summary: GenerationSummary,
}

impl RoadNetwork {
    /// Generate a network over fully passable, uniform terrain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails validation
    pub fn generate(config: NetworkConfig) -> Result<Self> {
        Self::generate_with_terrain(config, &UniformTerrain::default())
    }

    /// Generate a network over custom terrain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration, or
    /// `TerrainExhausted` if too few passable locations were found
    pub fn generate_with_terrain<T>(config: NetworkConfig, terrain: &T) -> Result<Self>
    where
        T: TerrainQuery + ?Sized,
    {
        Self::generate_with_reporter(config, terrain, &mut NoopReporter)
    }

    /// Generate a network, reporting progress to `reporter`
    ///
    /// # Example
    ///
    /// ```
    /// use road_network_sca::*;
    ///
    /// let config = NetworkConfigBuilder::new()
    ///     .seed(3)
    ///     .density(PointDensity::Custom(200))
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// let mut reporter = TimingReporter::new();
    ///
    /// let network =
    ///     RoadNetwork::generate_with_reporter(config, &UniformTerrain::default(), &mut reporter)
    ///         .unwrap();
    ///
    /// assert_eq!(reporter.remaining_history().len(), network.summary().rounds);
    /// ```
    pub fn generate_with_reporter<T, R>(
        config: NetworkConfig,
        terrain: &T,
        reporter: &mut R,
    ) -> Result<Self>
    where
        T: TerrainQuery + ?Sized,
        R: Reporter,
    {
        let engine = GrowthEngine::new(config, terrain, reporter)?;
        Ok(engine.run(reporter))
    }

    pub(crate) fn from_parts(
        config: NetworkConfig,
        forest: SegmentForest,
        remaining: AttractionField,
        starting_locations: Vec<Vec2>,
        summary: GenerationSummary,
    ) -> Self {
        Self {
            config,
            forest,
            remaining,
            starting_locations,
            summary,
        }
    }

    /// Get the configuration used for generation
    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// The segment arena, for link traversal
    #[inline]
    pub fn forest(&self) -> &SegmentForest {
        &self.forest
    }

    /// Get all segments, in creation order
    ///
    /// A segment's index in this slice equals its [`SegmentId::index`].
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        self.forest.segments()
    }

    /// Get the total number of segments, including roots and connectors
    ///
    /// # Example
    ///
    /// ```
    /// use road_network_sca::*;
    ///
    /// let config = NetworkConfigBuilder::new()
    ///     .seed(7)
    ///     .density(PointDensity::Custom(200))
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// let network = RoadNetwork::generate(config).unwrap();
    ///
    /// assert_eq!(network.segment_count(), network.segments().len());
    /// assert!(network.segment_count() >= config.starting_segment_count);
    /// ```
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.forest.len()
    }

    /// Get the number of connectors added by the post-pass
    #[inline]
    pub fn connector_count(&self) -> usize {
        self.forest.connectors().len()
    }

    /// Get a segment by ID
    ///
    /// Returns `None` if no segment has that ID.
    #[inline]
    pub fn get_segment(&self, id: SegmentId) -> Option<&Segment> {
        self.forest.get(id)
    }

    /// Every segment as `(start, end, tag)`, in creation order
    pub fn segment_lines(&self) -> Vec<SegmentLine> {
        self.forest.segments().iter().map(SegmentLine::from).collect()
    }

    /// Root locations, in seeding order
    #[inline]
    pub fn starting_locations(&self) -> &[Vec2] {
        &self.starting_locations
    }

    /// Attraction points never reached
    #[inline]
    pub fn remaining_points(&self) -> &[AttractionPoint] {
        self.remaining.points()
    }

    /// Get run totals and the reason growth stopped
    #[inline]
    pub fn summary(&self) -> &GenerationSummary {
        &self.summary
    }

    /// Segments with nothing attached to them
    pub fn leaves(&self) -> Vec<SegmentId> {
        self.forest.leaves()
    }

    /// Get the connector table, recording both leaves of each connector
    #[inline]
    pub fn connectors(&self) -> &[Connector] {
        self.forest.connectors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, NetworkConfigBuilder, PointDensity};
    use crate::diagnostics::TimingReporter;
    use crate::error::NetworkError;
    use crate::segment::SegmentTag;
    use crate::terrain::{RasterTerrain, RoadClass};

    fn small_config(seed: u32) -> NetworkConfig {
        NetworkConfigBuilder::new()
            .seed(seed)
            .bounds(Bounds::from_size(200.0, 200.0))
            .unwrap()
            .density(PointDensity::Custom(400))
            .unwrap()
            .starting_segment_count(4)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_network_generation() {
        let config = small_config(42);
        let network = RoadNetwork::generate(config).unwrap();

        assert!(network.segment_count() > config.starting_segment_count);
        assert_eq!(network.starting_locations().len(), config.starting_segment_count);
        assert_eq!(network.summary().total_segments, network.segment_count());
        assert_eq!(network.summary().connectors, network.connector_count());
        assert_eq!(network.summary().remaining_points, network.remaining_points().len());
    }

    #[test]
    fn test_deterministic_generation() {
        let a = RoadNetwork::generate(small_config(9)).unwrap();
        let b = RoadNetwork::generate(small_config(9)).unwrap();

        assert_eq!(a.segment_lines(), b.segment_lines());
        assert_eq!(a.summary(), b.summary());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = RoadNetwork::generate(small_config(1)).unwrap();
        let b = RoadNetwork::generate(small_config(2)).unwrap();
        assert_ne!(a.starting_locations(), b.starting_locations());
    }

    #[test]
    fn test_segment_tags() {
        let network = RoadNetwork::generate(small_config(5)).unwrap();
        let lines = network.segment_lines();

        let roots = lines.iter().filter(|l| l.tag == SegmentTag::Root).count();
        let connectors = lines.iter().filter(|l| l.tag == SegmentTag::Connector).count();
        assert_eq!(roots, 4);
        assert_eq!(connectors, network.connector_count());
        assert_eq!(
            lines.len(),
            roots + connectors + network.summary().grown_segments
        );
    }

    #[test]
    fn test_roots_sit_on_starting_locations() {
        let network = RoadNetwork::generate(small_config(11)).unwrap();
        for (&root, &location) in network.forest().roots().iter().zip(network.starting_locations()) {
            let seg = network.get_segment(root).unwrap();
            assert_eq!(seg.start, location);
            assert_eq!(seg.end, location);
        }
    }

    #[test]
    fn test_generation_with_raster_terrain() {
        // Impassable column down the middle of a 20x20 grid of 10-unit cells
        let classes: Vec<RoadClass> = (0..400)
            .map(|i| if i % 20 == 10 { RoadClass::Impassable } else { RoadClass::Major })
            .collect();
        let terrain = RasterTerrain::from_classes(20, 20, classes)
            .unwrap()
            .with_cell_size(10.0);
        let config = small_config(21);

        let network = RoadNetwork::generate_with_terrain(config, &terrain).unwrap();

        for point in network.remaining_points() {
            assert!(terrain.is_passable(point.location));
        }
        for seg in network.segments().iter().filter(|s| s.tag == SegmentTag::Grown) {
            // Every grown step was scaled by the Major-Major accessibility
            let expected = config.segment_length * RoadClass::Major.accessibility();
            assert!((seg.length() - expected).abs() < 1e-3, "length {}", seg.length());
        }
    }

    #[test]
    fn test_exhausted_terrain_fails_fast() {
        let terrain = RasterTerrain::from_classes(1, 1, vec![RoadClass::Impassable]).unwrap();
        let config = NetworkConfigBuilder::new()
            .seed(1)
            .density(PointDensity::Custom(10))
            .unwrap()
            .max_sampling_attempts(100)
            .build()
            .unwrap();

        let result = RoadNetwork::generate_with_terrain(config, &terrain);
        assert!(matches!(result, Err(NetworkError::TerrainExhausted { .. })));
    }

    #[test]
    fn test_reporter_sees_every_round() {
        let mut reporter = TimingReporter::new();
        let network =
            RoadNetwork::generate_with_reporter(small_config(4), &UniformTerrain::default(), &mut reporter)
                .unwrap();

        assert_eq!(reporter.remaining_history().len(), network.summary().rounds);
        assert_eq!(reporter.summary(), Some(network.summary()));
        for pair in reporter.remaining_history().windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }
}
