//! Raster-backed terrain
//!
//! A row-major grid of road classes, optionally paired with a height grid
//! whose local slope can make cells impassable. Decoding map images is left
//! to the caller; this type only holds the decoded samples.

use glam::Vec2;

use super::{RoadClass, TerrainQuery};
use crate::error::{NetworkError, Result};

/// Terrain backed by a classified raster map
///
/// # Example
///
/// ```
/// use road_network_sca::{RasterTerrain, RoadClass, TerrainQuery};
/// use glam::Vec2;
///
/// let classes = vec![
///     RoadClass::Motorway, RoadClass::None,
///     RoadClass::Impassable, RoadClass::Minor,
/// ];
/// let terrain = RasterTerrain::from_classes(2, 2, classes).unwrap();
///
/// assert!(terrain.is_passable(Vec2::new(0.5, 0.5)));
/// assert!(!terrain.is_passable(Vec2::new(0.5, 1.5)));
/// assert_eq!(terrain.accessibility_at(Vec2::new(0.5, 0.5)), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct RasterTerrain {
    width: usize,
    height: usize,
    /// World-space size of one raster cell
    cell_size: f32,
    /// World-space position of cell (0, 0)'s lower corner
    origin: Vec2,
    classes: Vec<RoadClass>,
    heights: Option<Vec<f32>>,
    max_slope: f32,
}

impl RasterTerrain {
    /// Build terrain from a row-major grid of classes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the grid is empty or its length doesn't
    /// match `width * height`
    pub fn from_classes(width: usize, height: usize, classes: Vec<RoadClass>) -> Result<Self> {
        check_dimensions(width, height, classes.len(), "class")?;
        Ok(Self {
            width,
            height,
            cell_size: 1.0,
            origin: Vec2::ZERO,
            classes,
            heights: None,
            max_slope: f32::INFINITY,
        })
    }

    /// Build terrain from RGBA8 pixels with a caller-provided classifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `pixels.len() != width * height * 4`
    pub fn from_rgba_with<F>(width: usize, height: usize, pixels: &[u8], classify: F) -> Result<Self>
    where
        F: Fn([u8; 4]) -> RoadClass,
    {
        if pixels.len() != width * height * 4 {
            return Err(NetworkError::InvalidConfig(format!(
                "expected {} RGBA bytes for a {}x{} raster (got {})",
                width * height * 4,
                width,
                height,
                pixels.len()
            )));
        }
        let classes = pixels
            .chunks_exact(4)
            .map(|px| classify([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::from_classes(width, height, classes)
    }

    /// Build terrain where transparent pixels are impassable and everything
    /// else is open ground
    pub fn from_rgba_alpha(width: usize, height: usize, pixels: &[u8]) -> Result<Self> {
        Self::from_rgba_with(width, height, pixels, alpha_walkable)
    }

    /// Attach a row-major height grid; cells steeper than `max_slope` become impassable
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on a size mismatch or a negative slope limit
    pub fn with_heights(mut self, heights: Vec<f32>, max_slope: f32) -> Result<Self> {
        check_dimensions(self.width, self.height, heights.len(), "height")?;
        if !(max_slope >= 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "max slope must be >= 0 (got {})",
                max_slope
            )));
        }
        self.heights = Some(heights);
        self.max_slope = max_slope;
        Ok(self)
    }

    /// Set the world-space size of one raster cell
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the world-space position of the raster's lower corner
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raster cell containing a world-space point, if any
    pub fn cell_at(&self, point: Vec2) -> Option<(usize, usize)> {
        let local = (point - self.origin) / self.cell_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (x, y) = (local.x as usize, local.y as usize);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Largest absolute height difference to the 4-neighbourhood
    ///
    /// Returns 0 when no height grid is attached. Edge cells compare against
    /// themselves on the missing side.
    pub fn max_slope(&self, x: usize, y: usize) -> f32 {
        let Some(heights) = &self.heights else {
            return 0.0;
        };
        let idx = |x: usize, y: usize| y * self.width + x;
        let here = heights[idx(x, y)];
        let neighbours = [
            (x.saturating_sub(1), y),
            ((x + 1).min(self.width - 1), y),
            (x, y.saturating_sub(1)),
            (x, (y + 1).min(self.height - 1)),
        ];
        neighbours
            .iter()
            .map(|&(nx, ny)| (here - heights[idx(nx, ny)]).abs())
            .fold(0.0, f32::max)
    }

    /// Road class at a world-space point
    ///
    /// Points outside the raster, and cells steeper than the slope limit,
    /// are impassable.
    pub fn class_at(&self, point: Vec2) -> RoadClass {
        let Some((x, y)) = self.cell_at(point) else {
            return RoadClass::Impassable;
        };
        if self.max_slope(x, y) > self.max_slope {
            return RoadClass::Impassable;
        }
        self.classes[y * self.width + x]
    }
}

impl TerrainQuery for RasterTerrain {
    fn is_passable(&self, point: Vec2) -> bool {
        self.class_at(point).is_passable()
    }

    fn accessibility_at(&self, point: Vec2) -> f32 {
        self.class_at(point).accessibility()
    }

    fn accessibility_between(&self, from: Vec2, to: Vec2) -> f32 {
        self.class_at(from).combined_accessibility(self.class_at(to))
    }
}

/// Transparent pixels are impassable, everything else is open ground
pub fn alpha_walkable(pixel: [u8; 4]) -> RoadClass {
    if pixel[3] > 0 {
        RoadClass::None
    } else {
        RoadClass::Impassable
    }
}

fn check_dimensions(width: usize, height: usize, len: usize, what: &str) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(NetworkError::InvalidConfig(format!(
            "raster must be non-empty (got {}x{})",
            width, height
        )));
    }
    if len != width * height {
        return Err(NetworkError::InvalidConfig(format!(
            "{} grid has {} samples, expected {}x{}",
            what, len, width, height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> RasterTerrain {
        RasterTerrain::from_classes(
            2,
            2,
            vec![
                RoadClass::Motorway,
                RoadClass::None,
                RoadClass::Impassable,
                RoadClass::Minor,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_class_lookup() {
        let terrain = two_by_two();
        assert_eq!(terrain.class_at(Vec2::new(0.2, 0.2)), RoadClass::Motorway);
        assert_eq!(terrain.class_at(Vec2::new(1.7, 0.2)), RoadClass::None);
        assert_eq!(terrain.class_at(Vec2::new(0.2, 1.7)), RoadClass::Impassable);
        assert_eq!(terrain.class_at(Vec2::new(1.7, 1.7)), RoadClass::Minor);
    }

    #[test]
    fn test_out_of_bounds_is_impassable() {
        let terrain = two_by_two();
        assert_eq!(terrain.class_at(Vec2::new(-0.1, 0.5)), RoadClass::Impassable);
        assert_eq!(terrain.class_at(Vec2::new(2.0, 0.5)), RoadClass::Impassable);
        assert_eq!(terrain.class_at(Vec2::new(f32::NAN, 0.5)), RoadClass::Impassable);
        assert_eq!(terrain.accessibility_between(Vec2::new(0.5, 0.5), Vec2::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_cell_size_and_origin() {
        let terrain = two_by_two()
            .with_cell_size(10.0)
            .with_origin(Vec2::new(100.0, 100.0));
        assert_eq!(terrain.cell_at(Vec2::new(105.0, 115.0)), Some((0, 1)));
        assert_eq!(terrain.class_at(Vec2::new(115.0, 115.0)), RoadClass::Minor);
        assert_eq!(terrain.cell_at(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_accessibility_between_sums_costs() {
        let terrain = two_by_two();
        let motorway = Vec2::new(0.5, 0.5);
        let open = Vec2::new(1.5, 0.5);
        // costs 1 + 5 = 6, mapped to 2 / 6
        let expected = 2.0 / 6.0;
        assert!((terrain.accessibility_between(motorway, open) - expected).abs() < 1e-6);
        assert_eq!(terrain.accessibility_between(motorway, motorway), 1.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(RasterTerrain::from_classes(2, 2, vec![RoadClass::None; 3]).is_err());
        assert!(RasterTerrain::from_classes(0, 2, vec![]).is_err());
        assert!(RasterTerrain::from_rgba_alpha(2, 2, &[255; 15]).is_err());
    }

    #[test]
    fn test_rgba_alpha_classifier() {
        let pixels = [
            0, 0, 0, 255, // walkable
            0, 0, 0, 0, // transparent
        ];
        let terrain = RasterTerrain::from_rgba_alpha(2, 1, &pixels).unwrap();
        assert!(terrain.is_passable(Vec2::new(0.5, 0.5)));
        assert!(!terrain.is_passable(Vec2::new(1.5, 0.5)));
    }

    #[test]
    fn test_slope_limit() {
        let heights = vec![
            0.0, 0.0, 0.0, //
            0.0, 0.5, 10.0, //
            0.0, 0.0, 0.0,
        ];
        let terrain = RasterTerrain::from_classes(3, 3, vec![RoadClass::None; 9])
            .unwrap()
            .with_heights(heights, 2.0)
            .unwrap();

        assert_eq!(terrain.max_slope(0, 0), 0.0);
        assert_eq!(terrain.max_slope(1, 1), 9.5);
        assert!(terrain.is_passable(Vec2::new(0.5, 0.5)));
        // Centre and right-middle cells both touch the 10.0 spike
        assert!(!terrain.is_passable(Vec2::new(1.5, 1.5)));
        assert!(!terrain.is_passable(Vec2::new(2.5, 1.5)));
    }

    #[test]
    fn test_negative_slope_limit_rejected() {
        let result = RasterTerrain::from_classes(1, 1, vec![RoadClass::None])
            .unwrap()
            .with_heights(vec![0.0], -1.0);
        assert!(result.is_err());
    }
}
