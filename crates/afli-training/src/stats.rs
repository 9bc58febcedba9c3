//! Per-generation statistics.
//!
//! A [`GenerationRecord`] is taken right before a generation is replaced, while
//! its agents still carry their final scores and death causes.

use afli_engine::{Agent, DeathCause, SimulationWorld, Wall};
use serde::{Deserialize, Serialize};

/// Summary of agent survival scores in one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
}

impl ScoreStats {
    /// Computes statistics over unsorted scores.
    ///
    /// Returns `None` for an empty input.
    ///
    /// ```
    /// # use afli_training::stats::ScoreStats;
    /// let stats = ScoreStats::new([30, 10, 20, 40]).unwrap();
    /// assert_eq!(stats.min, 10);
    /// assert_eq!(stats.max, 40);
    /// assert_eq!(stats.mean, 25.0);
    /// assert_eq!(stats.median, 25.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_unstable();
        let (&min, &max) = (scores.first()?, scores.last()?);
        let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;
        let mid = scores.len() / 2;
        let median = if scores.len() % 2 == 0 {
            (scores[mid - 1] as f64 + scores[mid] as f64) / 2.0
        } else {
            scores[mid] as f64
        };
        Some(Self {
            min,
            max,
            mean,
            median,
        })
    }
}

/// How many agents each hazard killed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathCounts {
    pub top: usize,
    pub bottom: usize,
    pub left_side: usize,
    pub right_side: usize,
    /// Agents still alive when the generation was cut short.
    pub survived: usize,
}

impl DeathCounts {
    #[must_use]
    pub fn tally<'a, I>(agents: I) -> Self
    where
        I: IntoIterator<Item = &'a Agent>,
    {
        let mut counts = Self::default();
        for agent in agents {
            match agent.death_cause() {
                Some(DeathCause::TopHazard) => counts.top += 1,
                Some(DeathCause::BottomHazard) => counts.bottom += 1,
                Some(DeathCause::SideHazard(Wall::Left)) => counts.left_side += 1,
                Some(DeathCause::SideHazard(Wall::Right)) => counts.right_side += 1,
                None => counts.survived += 1,
            }
        }
        counts
    }
}

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum GenerationEnd {
    /// Every agent died.
    Extinct,
    /// The per-generation tick limit was reached.
    TickLimit,
    /// A manual restart was requested.
    Restart,
}

/// What one finished generation achieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u64,
    pub end: GenerationEnd,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Bounce waves completed by the population.
    pub bounce_score: u64,
    pub scores: ScoreStats,
    /// Index of the longest-surviving agent (first one on ties).
    pub best_agent: usize,
    pub deaths: DeathCounts,
}

impl GenerationRecord {
    /// Captures the state of the current generation of `world`.
    #[must_use]
    pub fn capture(world: &SimulationWorld, end: GenerationEnd) -> Self {
        let agents = world.population().agents();
        let scores = ScoreStats::new(agents.iter().map(Agent::score)).unwrap_or(ScoreStats {
            min: 0,
            max: 0,
            mean: 0.0,
            median: 0.0,
        });
        let best_agent = agents
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, a)| a.score())
            .map_or(0, |(i, _)| i);
        Self {
            generation: world.generation(),
            end,
            ticks: world.ticks(),
            bounce_score: world.score(),
            scores,
            best_agent,
            deaths: DeathCounts::tally(agents),
        }
    }
}

#[cfg(test)]
mod tests {
    use afli_brain::NeuralController;
    use afli_engine::WorldConfig;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_score_stats_odd_count() {
        let stats = ScoreStats::new([5, 1, 3]).unwrap();
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!(ScoreStats::new(Vec::new()).is_none());
    }

    #[test]
    fn test_death_counts() {
        let config = WorldConfig::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut agents: Vec<Agent> = (0..5)
            .map(|_| Agent::new(NeuralController::random(&mut rng), &config))
            .collect();
        agents[0].kill(DeathCause::TopHazard);
        agents[1].kill(DeathCause::SideHazard(Wall::Left));
        agents[2].kill(DeathCause::SideHazard(Wall::Left));
        agents[3].kill(DeathCause::BottomHazard);
        let counts = DeathCounts::tally(&agents);
        assert_eq!(
            counts,
            DeathCounts {
                top: 1,
                bottom: 1,
                left_side: 2,
                right_side: 0,
                survived: 1,
            }
        );
    }

    #[test]
    fn test_generation_end_serializes_snake_case() {
        let json = serde_json::to_string(&GenerationEnd::TickLimit).unwrap();
        assert_eq!(json, r#""tick_limit""#);
    }
}
