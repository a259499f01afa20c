//! Generation diagnostics
//!
//! The growth engine never reads a clock. It reports phase boundaries and
//! per-round statistics to a [`Reporter`]; whatever the reporter does with
//! them (timing, progress output) has no effect on the generated network.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distinct stages of a generation run
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Rejection-sampling the initial attraction points
    Sampling,
    /// Choosing root segments
    Seeding,
    /// Updating each point's closest segment and accumulating influence
    Closeness,
    /// Removing satisfied attraction points
    Culling,
    /// Growing new segments from accumulated influence
    Emission,
    /// Joining leaves of different trees after growth stops
    Connection,
}

impl Phase {
    /// Every phase, in the order a run enters them
    pub const ALL: [Phase; 6] = [
        Phase::Sampling,
        Phase::Seeding,
        Phase::Closeness,
        Phase::Culling,
        Phase::Emission,
        Phase::Connection,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// Lowercase name for log and report output
    pub fn name(self) -> &'static str {
        match self {
            Phase::Sampling => "sampling",
            Phase::Seeding => "seeding",
            Phase::Closeness => "closeness",
            Phase::Culling => "culling",
            Phase::Emission => "emission",
            Phase::Connection => "connection",
        }
    }
}

/// Statistics for one completed growth round
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundStats {
    /// 1-based round number
    pub round: usize,
    /// Segments emitted this round
    pub added: usize,
    /// Emissions blocked by terrain this round
    pub suppressed: usize,
    /// Attraction points removed this round
    pub culled: usize,
    /// Segments in the forest after this round
    pub total_segments: usize,
    /// Attraction points left after this round
    pub remaining_points: usize,
    /// Consecutive rounds without a reduction in remaining points
    pub stagnant_rounds: usize,
}

/// Why the growth cycle stopped
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Fewer than two attraction points remained
    Satisfied,
    /// The stagnation bound was reached with points still unconnected
    Stagnated,
}

/// Totals for a finished generation run
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Growth rounds run
    pub rounds: usize,
    /// All segments, including roots and connectors
    pub total_segments: usize,
    /// Segments emitted by the growth cycle
    pub grown_segments: usize,
    /// Connector segments added by the post-pass
    pub connectors: usize,
    /// Attraction points never reached
    pub remaining_points: usize,
    pub termination: Termination,
}

/// Receiver for generation progress
///
/// Every method defaults to doing nothing.
pub trait Reporter {
    fn phase_started(&mut self, _phase: Phase) {}

    fn phase_finished(&mut self, _phase: Phase) {}

    fn round_completed(&mut self, _stats: &RoundStats) {}

    fn generation_finished(&mut self, _summary: &GenerationSummary) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn phase_started(&mut self, phase: Phase) {
        (**self).phase_started(phase)
    }

    fn phase_finished(&mut self, phase: Phase) {
        (**self).phase_finished(phase)
    }

    fn round_completed(&mut self, stats: &RoundStats) {
        (**self).round_completed(stats)
    }

    fn generation_finished(&mut self, summary: &GenerationSummary) {
        (**self).generation_finished(summary)
    }
}

/// Reporter that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Accumulated wall-clock time per phase
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseTimings {
    durations: [Duration; 6],
}

impl PhaseTimings {
    /// Total time spent in `phase`
    #[inline]
    pub fn get(&self, phase: Phase) -> Duration {
        self.durations[phase.slot()]
    }

    /// Sum over all phases
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Each phase with its accumulated time, in [`Phase::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, Duration)> + '_ {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    fn add(&mut self, phase: Phase, elapsed: Duration) {
        self.durations[phase.slot()] += elapsed;
    }
}

/// Reporter that times each phase and keeps the round history
///
/// Round progress is also logged at debug level.
#[derive(Debug, Clone, Default)]
pub struct TimingReporter {
    timings: PhaseTimings,
    started: [Option<Instant>; 6],
    remaining_history: Vec<usize>,
    summary: Option<GenerationSummary>,
}

impl TimingReporter {
    /// Create a reporter with zeroed timings and empty history
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    /// Remaining attraction points after each round, in round order
    #[inline]
    pub fn remaining_history(&self) -> &[usize] {
        &self.remaining_history
    }

    #[inline]
    pub fn summary(&self) -> Option<&GenerationSummary> {
        self.summary.as_ref()
    }
}

impl Reporter for TimingReporter {
    fn phase_started(&mut self, phase: Phase) {
        self.started[phase.slot()] = Some(Instant::now());
    }

    fn phase_finished(&mut self, phase: Phase) {
        if let Some(start) = self.started[phase.slot()].take() {
            self.timings.add(phase, start.elapsed());
        }
    }

    fn round_completed(&mut self, stats: &RoundStats) {
        self.remaining_history.push(stats.remaining_points);
        tracing::debug!(
            target: "road_network::diagnostics",
            round = stats.round,
            added = stats.added,
            total_segments = stats.total_segments,
            remaining_points = stats.remaining_points,
            "round completed"
        );
    }

    fn generation_finished(&mut self, summary: &GenerationSummary) {
        self.summary = Some(*summary);
        for (phase, elapsed) in self.timings.iter() {
            tracing::info!(
                target: "road_network::diagnostics",
                phase = phase.name(),
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "phase timing"
            );
        }
    }
}
