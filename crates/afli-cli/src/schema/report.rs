use afli_engine::Seed;
use afli_training::{stats::GenerationRecord, training_loop::TrainingConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON summary of one `afli train` run.
///
/// Holds everything needed to replay the run (`config` carries the seed) but
/// no genomes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingReport {
    pub seed: Seed,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Whether the run was cut short by the time limit.
    pub stopped_early: bool,
    pub config: TrainingConfig,
    pub generations: Vec<GenerationRecord>,
}

impl TrainingReport {
    /// The generation whose best agent survived longest (earliest on ties).
    pub fn best_generation(&self) -> Option<&GenerationRecord> {
        self.generations
            .iter()
            .rev()
            .max_by_key(|record| record.scores.max)
    }
}
