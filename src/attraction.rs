//! Attraction point field
//!
//! Attraction points are the demand locations the network grows toward.
//! The field only ever shrinks: points are removed once a segment end comes
//! within the kill distance.

use glam::Vec2;
use rand::Rng;

use crate::config::Bounds;
use crate::error::{NetworkError, Result};
use crate::forest::SegmentForest;
use crate::segment::SegmentId;
use crate::terrain::TerrainQuery;

/// A demand location pulling growth toward itself
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractionPoint {
    /// Fixed location of the point
    pub location: Vec2,
    /// Pull strength in (0, 1], taken from terrain accessibility at creation
    pub weight: f32,
    /// Segment whose end is currently nearest, once one has been assigned
    pub closest: Option<SegmentId>,
}

impl AttractionPoint {
    pub fn new(location: Vec2, weight: f32) -> Self {
        Self {
            location,
            weight,
            closest: None,
        }
    }
}

/// The set of attraction points still waiting to be reached
#[derive(Debug, Clone, Default)]
pub struct AttractionField {
    points: Vec<AttractionPoint>,
}

impl AttractionField {
    /// Wrap an explicit list of points
    pub fn from_points(points: Vec<AttractionPoint>) -> Self {
        Self { points }
    }

    /// Sample `count` passable points uniformly inside `bounds`
    ///
    /// Rejected samples count toward `max_attempts`. Each accepted point is
    /// weighted by the terrain's accessibility at its location.
    ///
    /// # Errors
    ///
    /// Returns `TerrainExhausted` if fewer than `count` points were accepted
    /// after `max_attempts` samples
    pub fn initialize<T, R>(
        count: usize,
        bounds: &Bounds,
        terrain: &T,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self>
    where
        T: TerrainQuery + ?Sized,
        R: Rng,
    {
        let mut points = Vec::with_capacity(count);
        let mut attempts = 0;

        while points.len() < count {
            if attempts >= max_attempts {
                return Err(NetworkError::TerrainExhausted {
                    requested: count,
                    accepted: points.len(),
                    attempts,
                });
            }
            attempts += 1;

            let location = Vec2::new(
                rng.gen_range(bounds.min.x..bounds.max.x),
                rng.gen_range(bounds.min.y..bounds.max.y),
            );
            if terrain.is_passable(location) {
                points.push(AttractionPoint::new(location, terrain.accessibility_at(location)));
            }
        }

        Ok(Self { points })
    }

    /// Remove every point whose closest segment end is within `kill_distance`
    ///
    /// Points without an assigned segment are kept. Returns the number of
    /// points removed.
    pub fn cull_near(&mut self, forest: &SegmentForest, kill_distance: f32) -> usize {
        let before = self.points.len();
        let kill_sq = kill_distance * kill_distance;
        self.points.retain(|point| match point.closest {
            Some(id) => point.location.distance_squared(forest[id].end) > kill_sq,
            None => true,
        });
        before - self.points.len()
    }

    #[inline]
    pub fn points(&self) -> &[AttractionPoint] {
        &self.points
    }

    #[inline]
    pub(crate) fn points_mut(&mut self) -> &mut [AttractionPoint] {
        &mut self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Locations of every remaining point
    pub fn locations(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.location).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{RasterTerrain, RoadClass, UniformTerrain};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct NeverPassable;

    impl TerrainQuery for NeverPassable {
        fn is_passable(&self, _point: Vec2) -> bool {
            false
        }
        fn accessibility_at(&self, _point: Vec2) -> f32 {
            1.0
        }
        fn accessibility_between(&self, _from: Vec2, _to: Vec2) -> f32 {
            1.0
        }
    }

    #[test]
    fn test_initialize_samples_inside_bounds() {
        let bounds = Bounds::new(Vec2::new(-50.0, 10.0), Vec2::new(50.0, 20.0));
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let field =
            AttractionField::initialize(500, &bounds, &UniformTerrain::default(), 500, &mut rng)
                .unwrap();

        assert_eq!(field.len(), 500);
        for p in field.points() {
            assert!(bounds.contains(p.location));
            assert_eq!(p.weight, 1.0);
            assert!(p.closest.is_none());
        }
    }

    #[test]
    fn test_initialize_skips_impassable_cells() {
        // Left half impassable, right half minor road
        let classes = vec![RoadClass::Impassable, RoadClass::Minor];
        let terrain = RasterTerrain::from_classes(2, 1, classes)
            .unwrap()
            .with_cell_size(10.0);
        let bounds = Bounds::from_size(20.0, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let field = AttractionField::initialize(200, &bounds, &terrain, 10_000, &mut rng).unwrap();

        assert_eq!(field.len(), 200);
        for p in field.points() {
            assert!(p.location.x >= 10.0);
            assert_eq!(p.weight, RoadClass::Minor.accessibility());
        }
    }

    #[test]
    fn test_initialize_fails_on_exhausted_terrain() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result =
            AttractionField::initialize(10, &Bounds::default(), &NeverPassable, 1_000, &mut rng);

        assert_eq!(
            result.unwrap_err(),
            NetworkError::TerrainExhausted {
                requested: 10,
                accepted: 0,
                attempts: 1_000,
            }
        );
    }

    #[test]
    fn test_initialize_is_deterministic() {
        let bounds = Bounds::default();
        let terrain = UniformTerrain::default();
        let a = AttractionField::initialize(50, &bounds, &terrain, 50, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        let b = AttractionField::initialize(50, &bounds, &terrain, 50, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a.locations(), b.locations());
    }

    #[test]
    fn test_cull_near() {
        let mut forest = SegmentForest::new();
        let root = forest.add_root(Vec2::ZERO);

        let mut near = AttractionPoint::new(Vec2::new(3.0, 0.0), 1.0);
        near.closest = Some(root);
        let mut edge = AttractionPoint::new(Vec2::new(0.0, 5.0), 1.0);
        edge.closest = Some(root);
        let mut far = AttractionPoint::new(Vec2::new(30.0, 0.0), 1.0);
        far.closest = Some(root);
        let unassigned = AttractionPoint::new(Vec2::new(1.0, 0.0), 1.0);

        let mut field = AttractionField::from_points(vec![near, edge, far, unassigned]);
        let removed = field.cull_near(&forest, 5.0);

        assert_eq!(removed, 2);
        assert_eq!(field.locations(), vec![Vec2::new(30.0, 0.0), Vec2::new(1.0, 0.0)]);
    }
}
