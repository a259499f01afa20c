//! Terrain queries and road classification
//!
//! Growth never reads terrain data directly. It asks a [`TerrainQuery`] whether
//! a location is passable, how strongly a location should attract roads, and
//! how much a step between two locations is slowed down.

pub mod raster;

pub use raster::RasterTerrain;

use glam::Vec2;

/// Road classification of a terrain location
///
/// Classes are ordered from "no road" to the fastest road, with the special
/// `Impassable` class excluded from sampling and growth entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadClass {
    /// Open ground with no existing road
    #[default]
    None,
    /// Private access road
    Driveway,
    /// Minor street
    Minor,
    /// Major arterial road
    Major,
    /// Motorway
    Motorway,
    /// Water, cliffs, or anything else roads can't cross
    Impassable,
}

/// Travel cost of the cheapest class, used to normalize accessibility
const MIN_TRAVEL_COST: f32 = 1.0;

impl RoadClass {
    /// Travel cost of this class, or `None` if impassable
    ///
    /// Lower is better: a motorway costs 1, open ground costs 5.
    pub fn travel_cost(self) -> Option<f32> {
        match self {
            RoadClass::Motorway => Some(1.0),
            RoadClass::Major => Some(2.0),
            RoadClass::Minor => Some(3.0),
            RoadClass::Driveway => Some(4.0),
            RoadClass::None => Some(5.0),
            RoadClass::Impassable => None,
        }
    }

    /// Check if roads may be placed or grown through this class
    #[inline]
    pub fn is_passable(self) -> bool {
        self != RoadClass::Impassable
    }

    /// Accessibility weight in (0, 1], or 0 for impassable
    pub fn accessibility(self) -> f32 {
        self.travel_cost()
            .map(|cost| MIN_TRAVEL_COST / cost)
            .unwrap_or(0.0)
    }

    /// Combined accessibility of a step between two classified locations
    ///
    /// The endpoint costs are summed and mapped back into (0, 1], so a step
    /// between two motorway locations is 1.0 and a step between two open
    /// ground locations is 0.2. Any impassable endpoint yields 0.
    pub fn combined_accessibility(self, other: RoadClass) -> f32 {
        match (self.travel_cost(), other.travel_cost()) {
            (Some(a), Some(b)) => (2.0 * MIN_TRAVEL_COST) / (a + b),
            _ => 0.0,
        }
    }
}

/// Trait for querying terrain during network generation
///
/// Implementations are expected to be pure in-memory lookups. All
/// accessibility values are in (0, 1] for passable locations.
pub trait TerrainQuery {
    /// Check whether an attraction point may be placed at `point`
    fn is_passable(&self, point: Vec2) -> bool;

    /// Attraction weight for a point placed at `point`
    fn accessibility_at(&self, point: Vec2) -> f32;

    /// Multiplicative step-length factor for growing from `from` to `to`
    fn accessibility_between(&self, from: Vec2, to: Vec2) -> f32;
}

/// Terrain that is passable everywhere with constant accessibility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformTerrain {
    /// Accessibility returned for every location and step
    pub accessibility: f32,
}

impl UniformTerrain {
    /// Create uniform terrain with the given accessibility, clamped into (0, 1]
    pub fn new(accessibility: f32) -> Self {
        Self {
            accessibility: accessibility.clamp(f32::EPSILON, 1.0),
        }
    }
}

impl Default for UniformTerrain {
    fn default() -> Self {
        Self { accessibility: 1.0 }
    }
}

impl TerrainQuery for UniformTerrain {
    fn is_passable(&self, _point: Vec2) -> bool {
        true
    }

    fn accessibility_at(&self, _point: Vec2) -> f32 {
        self.accessibility
    }

    fn accessibility_between(&self, _from: Vec2, _to: Vec2) -> f32 {
        self.accessibility
    }
}
