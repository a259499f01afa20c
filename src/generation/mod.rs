//! Growth cycle
//!
//! Grows segment trees toward attraction points in rounds. Each round:
//!
//! 1. Points compare their closest segment against the segments added in the
//!    previous round and pull on whichever end is nearest.
//! 2. Points within kill distance of their closest end are removed.
//! 3. Every pulled segment emits one child along its combined pull,
//!    shortened by terrain accessibility.
//! 4. Round bookkeeping updates the stagnation counter.
//!
//! Growth stops when fewer than two points remain or the point count hasn't
//! dropped for `stagnation_bound` consecutive rounds. The connectivity
//! post-pass in [`connect`] then joins nearby leaves of different trees.
//!
//! Closeness is incremental: a point never rescans segments older than the
//! previous round. This is an approximation of true nearest-segment
//! tracking and is kept deliberately, since it shapes the output.

pub mod connect;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::attraction::AttractionField;
use crate::config::NetworkConfig;
use crate::diagnostics::{GenerationSummary, Phase, Reporter, RoundStats, Termination};
use crate::error::Result;
use crate::forest::SegmentForest;
use crate::network::RoadNetwork;
use crate::segment::{SegmentId, SegmentTag};
use crate::terrain::TerrainQuery;

/// Shortest step a segment may grow; terrain-scaled steps below this are dropped
pub const MIN_STEP_LENGTH: f32 = 0.1;

/// Combined pulls shorter than this are treated as cancelled out
const CANCELLATION_THRESHOLD: f32 = 1.0;

/// Combine a segment's accumulated pulls into a unit growth direction
///
/// When the pulls nearly cancel (summed length below 1), the first pull
/// alone decides the direction. Returns `None` if there are no pulls or the
/// chosen vector has zero length.
pub fn growth_direction(influence: &[Vec2]) -> Option<Vec2> {
    let first = *influence.first()?;
    let sum: Vec2 = influence.iter().copied().sum();
    let combined = if sum.length() < CANCELLATION_THRESHOLD {
        first
    } else {
        sum
    };
    combined.try_normalize()
}

/// Round-by-round growth state over one attraction field and forest
pub struct GrowthEngine<'t, T: ?Sized> {
    config: NetworkConfig,
    terrain: &'t T,
    field: AttractionField,
    forest: SegmentForest,
    starting_locations: Vec<Vec2>,
    /// Segments emitted last round; the only closeness candidates this round
    previous_additions: Vec<SegmentId>,
    round: usize,
    stagnant_rounds: usize,
}

impl<'t, T: TerrainQuery + ?Sized> GrowthEngine<'t, T> {
    /// Validate the configuration, sample attraction points, and seed roots
    ///
    /// Sampling and root selection draw from a ChaCha8 stream seeded with
    /// `config.seed`, so the same inputs always give the same start state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration, or
    /// `TerrainExhausted` if the terrain rejects too many samples
    pub fn new<R: Reporter>(config: NetworkConfig, terrain: &'t T, reporter: &mut R) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);

        reporter.phase_started(Phase::Sampling);
        let field = AttractionField::initialize(
            config.attraction_point_count,
            &config.bounds,
            terrain,
            config.max_sampling_attempts,
            &mut rng,
        );
        reporter.phase_finished(Phase::Sampling);
        let field = field?;

        reporter.phase_started(Phase::Seeding);
        let mut forest = SegmentForest::new();
        let starting_locations = forest.seed_roots(&field, config.starting_segment_count, &mut rng);
        reporter.phase_finished(Phase::Seeding);

        tracing::debug!(
            target: "road_network::generation",
            seed = config.seed,
            points = field.len(),
            roots = starting_locations.len(),
            "initialized growth"
        );

        let previous_additions = forest.roots().to_vec();
        Ok(Self {
            config,
            terrain,
            field,
            forest,
            starting_locations,
            previous_additions,
            round: 0,
            stagnant_rounds: 0,
        })
    }

    /// Start growth from an explicit field and forest
    ///
    /// Every segment already in the forest is a closeness candidate for the
    /// first round. Starting locations are the ends of the forest's roots.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration
    pub fn from_parts(
        config: NetworkConfig,
        terrain: &'t T,
        field: AttractionField,
        forest: SegmentForest,
    ) -> Result<Self> {
        config.validate()?;
        let starting_locations = forest.roots().iter().map(|&id| forest[id].end).collect();
        let previous_additions = forest.ids().collect();
        Ok(Self {
            config,
            terrain,
            field,
            forest,
            starting_locations,
            previous_additions,
            round: 0,
            stagnant_rounds: 0,
        })
    }

    /// Configuration the engine was built with
    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Attraction points not yet culled
    #[inline]
    pub fn field(&self) -> &AttractionField {
        &self.field
    }

    /// Segments grown so far
    #[inline]
    pub fn forest(&self) -> &SegmentForest {
        &self.forest
    }

    /// Rounds completed so far
    #[inline]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Consecutive rounds without a culled point
    #[inline]
    pub fn stagnant_rounds(&self) -> usize {
        self.stagnant_rounds
    }

    /// Root locations, in seeding order
    #[inline]
    pub fn starting_locations(&self) -> &[Vec2] {
        &self.starting_locations
    }

    /// Why growth has stopped, or `None` while it should continue
    pub fn termination(&self) -> Option<Termination> {
        if self.field.len() < 2 {
            Some(Termination::Satisfied)
        } else if self.stagnant_rounds >= self.config.stagnation_bound {
            Some(Termination::Stagnated)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.termination().is_some()
    }

    /// Run one growth round
    ///
    /// Stepping a finished engine still runs a round; callers driving the
    /// engine manually should check [`is_finished`](Self::is_finished).
    pub fn step<R: Reporter>(&mut self, reporter: &mut R) -> RoundStats {
        let before = self.field.len();

        reporter.phase_started(Phase::Closeness);
        self.update_closeness();
        self.apply_inter_segment_attraction();
        reporter.phase_finished(Phase::Closeness);

        reporter.phase_started(Phase::Culling);
        let culled = self.field.cull_near(&self.forest, self.config.kill_distance);
        reporter.phase_finished(Phase::Culling);

        reporter.phase_started(Phase::Emission);
        let (added, suppressed) = self.emit();
        reporter.phase_finished(Phase::Emission);

        self.round += 1;
        if self.field.len() == before {
            self.stagnant_rounds += 1;
        } else {
            self.stagnant_rounds = 0;
        }

        let stats = RoundStats {
            round: self.round,
            added: added.len(),
            suppressed,
            culled,
            total_segments: self.forest.len(),
            remaining_points: self.field.len(),
            stagnant_rounds: self.stagnant_rounds,
        };
        self.previous_additions = added;

        tracing::debug!(
            target: "road_network::generation",
            round = stats.round,
            added = stats.added,
            total_segments = stats.total_segments,
            remaining_points = stats.remaining_points,
            "growth round"
        );
        reporter.round_completed(&stats);
        stats
    }

    /// Grow until termination, join leaves, and return the finished network
    pub fn run<R: Reporter>(mut self, reporter: &mut R) -> RoadNetwork {
        let termination = loop {
            if let Some(termination) = self.termination() {
                break termination;
            }
            self.step(reporter);
        };

        if termination == Termination::Stagnated {
            tracing::warn!(
                target: "road_network::generation",
                remaining_points = self.field.len(),
                rounds = self.round,
                "growth stagnated with attraction points unreached"
            );
        }

        reporter.phase_started(Phase::Connection);
        let connectors =
            connect::connect_leaves(&mut self.forest, self.config.segment_connection_threshold);
        reporter.phase_finished(Phase::Connection);

        let grown_segments = self
            .forest
            .segments()
            .iter()
            .filter(|s| s.tag == SegmentTag::Grown)
            .count();
        let summary = GenerationSummary {
            rounds: self.round,
            total_segments: self.forest.len(),
            grown_segments,
            connectors: connectors.len(),
            remaining_points: self.field.len(),
            termination,
        };

        tracing::info!(
            target: "road_network::generation",
            rounds = summary.rounds,
            segments = summary.total_segments,
            connectors = summary.connectors,
            remaining_points = summary.remaining_points,
            termination = ?summary.termination,
            "generation finished"
        );
        reporter.generation_finished(&summary);

        RoadNetwork::from_parts(
            self.config,
            self.forest,
            self.field,
            self.starting_locations,
            summary,
        )
    }

    /// Point each attraction point at its nearest candidate and record its pull
    ///
    /// Ties keep the existing assignment. Points already within kill distance
    /// are culled this round and don't pull.
    fn update_closeness(&mut self) {
        let kill_sq = self.config.kill_distance * self.config.kill_distance;
        let forest = &mut self.forest;
        let candidates = &self.previous_additions;

        for point in self.field.points_mut() {
            let mut best = point
                .closest
                .map(|id| (id, point.location.distance_squared(forest[id].end)));
            for &candidate in candidates {
                let d_sq = point.location.distance_squared(forest[candidate].end);
                if best.map_or(true, |(_, best_sq)| d_sq < best_sq) {
                    best = Some((candidate, d_sq));
                }
            }

            let Some((closest, d_sq)) = best else {
                continue;
            };
            point.closest = Some(closest);
            if d_sq > kill_sq {
                let pull = (point.location - forest[closest].end).normalize() * point.weight;
                forest.get_mut(closest).push_influence(pull);
            }
        }
    }

    /// Pull newly added, attracted segments of different trees toward each other
    fn apply_inter_segment_attraction(&mut self) {
        let Some(threshold) = self.config.inter_segment_attraction_threshold else {
            return;
        };
        let threshold_sq = threshold * threshold;
        let eligible: Vec<SegmentId> = self
            .previous_additions
            .iter()
            .copied()
            .filter(|&id| self.forest[id].attracted_this_round())
            .collect();

        let mut pulls = Vec::new();
        for &a in &eligible {
            for &b in &eligible {
                let (sa, sb) = (&self.forest[a], &self.forest[b]);
                if sa.root == sb.root {
                    continue;
                }
                let d_sq = sa.end.distance_squared(sb.end);
                if d_sq > 0.0 && d_sq <= threshold_sq {
                    pulls.push((a, (sb.end - sa.end).normalize()));
                }
            }
        }

        for (id, pull) in pulls {
            self.forest.get_mut(id).push_influence(pull);
        }
    }

    /// Grow one child from every pulled segment
    ///
    /// Returns the new segments and the number of emissions blocked by terrain.
    fn emit(&mut self) -> (Vec<SegmentId>, usize) {
        let length = self.config.segment_length;
        let influenced: Vec<SegmentId> = self
            .forest
            .iter()
            .filter(|(_, s)| !s.influence().is_empty())
            .map(|(id, _)| id)
            .collect();

        let mut added = Vec::with_capacity(influenced.len());
        let mut suppressed = 0;
        for id in influenced {
            let segment = self.forest.get_mut(id);
            let direction = growth_direction(segment.influence());
            let origin = segment.end;
            segment.clear_influence();

            let Some(direction) = direction else {
                continue;
            };
            let candidate = origin + direction * length;
            let step = self.terrain.accessibility_between(origin, candidate) * length;
            // NaN from a misbehaving terrain also lands here
            if !(step >= MIN_STEP_LENGTH) {
                suppressed += 1;
                continue;
            }
            added.push(self.forest.attach(id, origin + direction * step));
        }
        (added, suppressed)
    }
}
