use std::{path::PathBuf, thread, time::Duration};

use afli_engine::SimulationWorld;
use afli_training::{
    stats::GenerationRecord,
    training_loop::{RunLimits, StepOutcome, TrainingConfig, TrainingLoop, TrainingMode},
};
use chrono::Utc;

use crate::{command::ConfigSource, schema::report::TrainingReport, util};

const DEFAULT_GENERATIONS: u64 = 100;
const DEFAULT_MAX_TICKS: u64 = 100_000;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    pub(crate) source: ConfigSource,
    /// Number of generations to evolve [default: 100]
    #[arg(long)]
    generations: Option<u64>,
    /// Tick limit per generation [default: 100000]
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Stop after this many seconds, keeping finished generations
    #[arg(long)]
    time_limit: Option<u64>,
    /// Log a world snapshot at debug level every N ticks
    #[arg(long)]
    snapshot_every: Option<u64>,
    /// Report output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        source,
        generations,
        max_ticks,
        time_limit,
        snapshot_every,
        output,
    } = arg;

    let config = source.load()?;
    let limits = RunLimits {
        max_generations: Some(generations.unwrap_or(DEFAULT_GENERATIONS)),
        max_ticks_per_generation: Some(max_ticks.unwrap_or(DEFAULT_MAX_TICKS)),
    };
    let mut training =
        TrainingLoop::new(config.clone(), TrainingMode::Training)?.with_limits(limits);
    let seed = training.seed();

    eprintln!("Training {} agents", config.world.population_size);
    eprintln!("  Seed: {seed}");
    eprintln!(
        "  Mutation: probability {}, scale {}",
        config.mutation.probability, config.mutation.scale
    );

    if let Some(secs) = *time_limit {
        let stop = training.stop_handle();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            stop.stop();
        });
    }

    let started_at = Utc::now();
    let end = training.run(|outcome, world| {
        if let StepOutcome::GenerationEnded(record) = outcome {
            print_generation(record);
        }
        if let Some(every) = *snapshot_every {
            log_snapshot(world, every);
        }
    })?;
    let finished_at = Utc::now();

    let report = TrainingReport {
        seed,
        started_at,
        finished_at,
        stopped_early: end.is_stopped(),
        config: TrainingConfig {
            seed: Some(seed),
            ..config
        },
        generations: training.history().to_vec(),
    };

    eprintln!();
    eprintln!("Training completed ({end:?})");
    eprintln!("  Generations: {}", report.generations.len());
    eprintln!(
        "  Elapsed: {}ms",
        (finished_at - started_at).num_milliseconds()
    );
    if let Some(best) = report.best_generation() {
        eprintln!(
            "  Best: generation #{} agent #{} survived {} ticks",
            best.generation, best.best_agent, best.scores.max
        );
    }

    util::save_json(&report, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("  Report: {}", path.display());
    }

    Ok(())
}

fn print_generation(record: &GenerationRecord) {
    let GenerationRecord {
        generation,
        end,
        ticks,
        bounce_score,
        scores,
        best_agent,
        deaths,
    } = record;
    eprintln!("Generation #{generation} ({end:?}, {ticks} ticks):");
    eprintln!("  Bounce score: {bounce_score}");
    eprintln!("  Score Stats:");
    eprintln!("    Min:    {}", scores.min);
    eprintln!("    Max:    {} (agent #{best_agent})", scores.max);
    eprintln!("    Mean:   {:.3}", scores.mean);
    eprintln!("    Median: {:.1}", scores.median);
    eprintln!(
        "  Deaths: top {}, bottom {}, left {}, right {}, survived {}",
        deaths.top, deaths.bottom, deaths.left_side, deaths.right_side, deaths.survived
    );
}

fn log_snapshot(world: &SimulationWorld, every: u64) {
    if every == 0
        || !world.ticks().is_multiple_of(every)
        || !log::log_enabled!(log::Level::Debug)
    {
        return;
    }
    match serde_json::to_string(&world.snapshot()) {
        Ok(json) => log::debug!("snapshot: {json}"),
        Err(err) => log::warn!("failed to serialize snapshot: {err}"),
    }
}
