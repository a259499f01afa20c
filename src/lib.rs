//! Space-colonization road network generation
//!
//! A standalone library for growing 2-D road networks toward scattered
//! attraction points, over terrain that can slow or block growth. The output
//! is a forest of line segments suitable for any renderer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use road_network_sca::*;
//!
//! // Generate a network
//! let config = NetworkConfigBuilder::new()
//!     .seed(42)
//!     .density(PointDensity::Medium).unwrap()
//!     .starting_segment_count(8).unwrap()
//!     .build().unwrap();
//!
//! let network = RoadNetwork::generate(config).unwrap();
//!
//! // Generate meshes for rendering
//! let roads = generate_segment_mesh(&network, &BasicColorMapper);
//! let points = generate_point_mesh(network.remaining_points(), &BasicColorMapper);
//! println!("{} lines, {} point quads", roads.primitive_count(), points.primitive_count() / 2);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Uses a KD-tree to find nearby leaves in the connectivity post-pass
//! - `serde`: Enables serialization support for configuration and diagnostics

// Modules
pub mod error;
pub mod config;
pub mod terrain;
pub mod attraction;
pub mod segment;
pub mod forest;
pub mod generation;
pub mod diagnostics;
pub mod network;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{NetworkError, Result};
pub use config::{Bounds, NetworkConfig, NetworkConfigBuilder, PointDensity};
pub use terrain::{RasterTerrain, RoadClass, TerrainQuery, UniformTerrain};
pub use attraction::{AttractionField, AttractionPoint};
pub use segment::{Segment, SegmentId, SegmentLine, SegmentTag};
pub use forest::{Connector, SegmentForest};
pub use generation::{growth_direction, GrowthEngine, MIN_STEP_LENGTH};
pub use diagnostics::{
    GenerationSummary, NoopReporter, Phase, PhaseTimings, Reporter, RoundStats, Termination,
    TimingReporter,
};
pub use network::RoadNetwork;
pub use mesh::{
    generate_point_mesh, generate_segment_mesh, BasicColorMapper, ColorMapper, CustomColorMapper,
    MeshColor, MeshData, Primitive,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
