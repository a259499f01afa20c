//! Spatial indexing for fast endpoint lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec2;

/// Wrapper around a 2-D KD-tree over segment endpoints
///
/// Items are indices into the slice the index was built from.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    /// `None` for an empty point set
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
    points: Vec<Vec2>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build an index over `points`
    ///
    /// # Example
    ///
    /// ```
    /// use road_network_sca::SpatialIndex;
    /// use glam::Vec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let points = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
    /// let index = SpatialIndex::new(&points);
    /// assert_eq!(index.find_nearest(Vec2::new(9.0, 1.0)), Some(1));
    /// # }
    /// ```
    pub fn new(points: &[Vec2]) -> Self {
        let coords: Vec<[f32; 2]> = points.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords)),
            points: points.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point nearest to `position`, or `None` for an empty index
    pub fn find_nearest(&self, position: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }

    /// Indices of all points within `radius` of `position`, ascending
    ///
    /// The boundary is inclusive.
    pub fn within(&self, position: Vec2, radius: f32) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let radius_sq = radius * radius;
        // Widen the tree query slightly and apply the exact test ourselves
        let query_sq = radius_sq * (1.0 + 1e-4) + f32::EPSILON;
        let mut found: Vec<usize> = tree
            .within_unsorted::<SquaredEuclidean>(&[position.x, position.y], query_sq)
            .into_iter()
            .map(|nn| nn.item as usize)
            .filter(|&i| self.points[i].distance_squared(position) <= radius_sq)
            .collect();
        found.sort_unstable();
        found
    }
}
