//! Road Network Configuration and Builder
//!
//! This module provides configuration types for deterministic road network generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::error::{NetworkError, Result};

/// Attraction point density presets
///
/// Each preset maps to a fixed attraction point count. Denser fields produce
/// finer networks at the cost of generation time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointDensity {
    /// Sparse field: 4,000 attraction points (default)
    Sparse,
    /// Medium field: 7,000 attraction points
    Medium,
    /// Dense field: 10,000 attraction points
    Dense,
    /// Custom attraction point count
    Custom(usize),
}

impl PointDensity {
    /// Get the number of attraction points for this preset
    pub fn point_count(self) -> usize {
        match self {
            PointDensity::Sparse => 4_000,
            PointDensity::Medium => 7_000,
            PointDensity::Dense => 10_000,
            PointDensity::Custom(count) => count,
        }
    }

    /// Get a human-readable name for this preset
    pub fn name(self) -> &'static str {
        match self {
            PointDensity::Sparse => "Sparse",
            PointDensity::Medium => "Medium",
            PointDensity::Dense => "Dense",
            PointDensity::Custom(_) => "Custom",
        }
    }
}

impl Default for PointDensity {
    fn default() -> Self {
        PointDensity::Sparse
    }
}

/// Axis-aligned rectangle the network is generated inside
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner (inclusive)
    pub min: Vec2,
    /// Upper-right corner (exclusive)
    pub max: Vec2,
}

impl Bounds {
    /// Create bounds from two corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds spanning `[0, width) x [0, height)`
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether a point lies inside the bounds
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Check that the bounds enclose a non-empty, finite area
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.width().is_finite()
            && self.height().is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::from_size(1024.0, 768.0)
    }
}

/// Configuration for deterministic road network generation
///
/// The same configuration and terrain will always produce the identical network.
///
/// # Example
///
/// ```rust
/// use road_network_sca::*;
///
/// let config = NetworkConfigBuilder::new()
///     .seed(42)
///     .density(PointDensity::Custom(500))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.attraction_point_count, 500);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkConfig {
    /// Random seed for point sampling and root selection
    pub seed: u32,

    /// Region attraction points are sampled inside
    pub bounds: Bounds,

    /// Number of attraction points sampled at initialization
    pub attraction_point_count: usize,

    /// Nominal length of a grown segment, before terrain scaling
    pub segment_length: f32,

    /// Distance at which an attraction point counts as satisfied
    ///
    /// Must be below `segment_length`; values above half of it risk
    /// points that are overshot every round.
    pub kill_distance: f32,

    /// Number of zero-length root segments seeded on attraction points
    pub starting_segment_count: usize,

    /// Maximum endpoint distance for inter-segment attraction
    ///
    /// `None` disables the mechanism.
    pub inter_segment_attraction_threshold: Option<f32>,

    /// Maximum distance between leaf endpoints of different trees for the
    /// connectivity post-pass to join them
    pub segment_connection_threshold: f32,

    /// Consecutive rounds without point reduction before growth stops
    pub stagnation_bound: usize,

    /// Total samples drawn before initialization gives up on the terrain
    pub max_sampling_attempts: usize,
}

impl NetworkConfig {
    /// Re-check every constraint the builder enforces
    ///
    /// Used by the engine so that configurations built as struct literals
    /// are rejected before any generation work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_valid() {
            return Err(invalid(format!(
                "bounds must enclose a positive area (got {:?} to {:?})",
                self.bounds.min, self.bounds.max
            )));
        }
        check_point_count(self.attraction_point_count)?;
        check_positive("segment length", self.segment_length)?;
        check_positive("kill distance", self.kill_distance)?;
        if self.kill_distance >= self.segment_length {
            return Err(invalid(format!(
                "kill distance must be less than segment length (got {} >= {})",
                self.kill_distance, self.segment_length
            )));
        }
        if self.starting_segment_count == 0 {
            return Err(invalid("starting segment count must be at least 1".to_string()));
        }
        if let Some(threshold) = self.inter_segment_attraction_threshold {
            check_positive("inter-segment attraction threshold", threshold)?;
        }
        if !(self.segment_connection_threshold >= 0.0) || !self.segment_connection_threshold.is_finite() {
            return Err(invalid(format!(
                "segment connection threshold must be >= 0 (got {})",
                self.segment_connection_threshold
            )));
        }
        if self.stagnation_bound == 0 {
            return Err(invalid("stagnation bound must be at least 1".to_string()));
        }
        if self.max_sampling_attempts < self.attraction_point_count {
            return Err(invalid(format!(
                "sampling attempts ({}) cannot be fewer than attraction points ({})",
                self.max_sampling_attempts, self.attraction_point_count
            )));
        }
        Ok(())
    }

    /// True when the kill distance is large enough to risk overshoot loops
    #[inline]
    pub fn kill_distance_is_risky(&self) -> bool {
        self.kill_distance > 0.5 * self.segment_length
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfigBuilder::new().seed(0).build_unchecked()
    }
}

/// Builder for creating NetworkConfig with validation
///
/// # Example
///
/// ```rust
/// use road_network_sca::*;
///
/// let config = NetworkConfigBuilder::new()
///     .seed(7)
///     .segment_length(8.0)
///     .unwrap()
///     .kill_distance(4.0)
///     .unwrap()
///     .starting_segment_count(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.segment_length, 8.0);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    seed: Option<u32>,
    bounds: Bounds,
    density: PointDensity,
    segment_length: f32,
    kill_distance: f32,
    starting_segment_count: usize,
    inter_segment_attraction_threshold: Option<f32>,
    segment_connection_threshold: f32,
    stagnation_bound: usize,
    max_sampling_attempts: Option<usize>,
}

impl NetworkConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - bounds: 1024 x 768 from the origin
    /// - density: Sparse (4,000 points)
    /// - segment_length: 10.0
    /// - kill_distance: 5.0
    /// - starting_segment_count: 8
    /// - inter_segment_attraction_threshold: None (disabled)
    /// - segment_connection_threshold: 10.0
    /// - stagnation_bound: 20
    /// - max_sampling_attempts: 100 per attraction point
    pub fn new() -> Self {
        Self {
            seed: None,
            bounds: Bounds::default(),
            density: PointDensity::default(),
            segment_length: 10.0,
            kill_distance: 5.0,
            starting_segment_count: 8,
            inter_segment_attraction_threshold: None,
            segment_connection_threshold: 10.0,
            stagnation_bound: 20,
            max_sampling_attempts: None,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the generation bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the bounds do not enclose a positive area
    pub fn bounds(mut self, bounds: Bounds) -> Result<Self> {
        if !bounds.is_valid() {
            return Err(invalid(format!(
                "bounds must enclose a positive area (got {:?} to {:?})",
                bounds.min, bounds.max
            )));
        }
        self.bounds = bounds;
        Ok(self)
    }

    /// Set the attraction point density
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a custom count of zero
    pub fn density(mut self, density: PointDensity) -> Result<Self> {
        check_point_count(density.point_count())?;
        self.density = density;
        Ok(self)
    }

    /// Set the nominal segment length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if length <= 0.0
    pub fn segment_length(mut self, length: f32) -> Result<Self> {
        check_positive("segment length", length)?;
        self.segment_length = length;
        Ok(self)
    }

    /// Set the kill distance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if distance <= 0.0. The comparison against
    /// segment length happens in [`build`](Self::build).
    pub fn kill_distance(mut self, distance: f32) -> Result<Self> {
        check_positive("kill distance", distance)?;
        self.kill_distance = distance;
        Ok(self)
    }

    /// Set the number of starting root segments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is zero
    pub fn starting_segment_count(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(invalid("starting segment count must be at least 1".to_string()));
        }
        self.starting_segment_count = count;
        Ok(self)
    }

    /// Enable inter-segment attraction within the given endpoint distance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold <= 0.0
    pub fn inter_segment_attraction(mut self, threshold: f32) -> Result<Self> {
        check_positive("inter-segment attraction threshold", threshold)?;
        self.inter_segment_attraction_threshold = Some(threshold);
        Ok(self)
    }

    /// Set the leaf connection distance for the post-pass
    ///
    /// A threshold of 0.0 only joins leaves with coincident endpoints.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn segment_connection_threshold(mut self, threshold: f32) -> Result<Self> {
        if !(threshold >= 0.0) || !threshold.is_finite() {
            return Err(invalid(format!(
                "segment connection threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.segment_connection_threshold = threshold;
        Ok(self)
    }

    /// Set the stagnation bound
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if rounds is zero
    pub fn stagnation_bound(mut self, rounds: usize) -> Result<Self> {
        if rounds == 0 {
            return Err(invalid("stagnation bound must be at least 1".to_string()));
        }
        self.stagnation_bound = rounds;
        Ok(self)
    }

    /// Cap the number of samples drawn during initialization
    pub fn max_sampling_attempts(mut self, attempts: usize) -> Self {
        self.max_sampling_attempts = Some(attempts);
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the kill distance is not below the segment
    /// length, or the sampling cap is smaller than the point count.
    pub fn build(self) -> Result<NetworkConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        if config.kill_distance_is_risky() {
            tracing::warn!(
                target: "road_network::config",
                kill_distance = config.kill_distance,
                segment_length = config.segment_length,
                "kill distance exceeds half the segment length; growth may stall"
            );
        }
        Ok(config)
    }

    fn build_unchecked(self) -> NetworkConfig {
        let seed = self.seed.unwrap_or_else(|| rand::random());
        let attraction_point_count = self.density.point_count();
        let max_sampling_attempts = self
            .max_sampling_attempts
            .unwrap_or_else(|| attraction_point_count.saturating_mul(100));

        NetworkConfig {
            seed,
            bounds: self.bounds,
            attraction_point_count,
            segment_length: self.segment_length,
            kill_distance: self.kill_distance,
            starting_segment_count: self.starting_segment_count,
            inter_segment_attraction_threshold: self.inter_segment_attraction_threshold,
            segment_connection_threshold: self.segment_connection_threshold,
            stagnation_bound: self.stagnation_bound,
            max_sampling_attempts,
        }
    }
}

impl Default for NetworkConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(msg: String) -> NetworkError {
    NetworkError::InvalidConfig(msg)
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(invalid(format!("{} must be positive (got {})", name, value)));
    }
    Ok(())
}

fn check_point_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(invalid("attraction point count must be at least 1".to_string()));
    }
    Ok(())
}
