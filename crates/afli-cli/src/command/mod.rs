use std::path::PathBuf;

use afli_engine::Seed;
use afli_training::training_loop::TrainingConfig;
use clap::{Parser, Subcommand};

use crate::util;

use self::{config::ConfigArg, train::TrainArg};

mod config;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve agents headlessly and write a JSON report
    Train(#[clap(flatten)] TrainArg),
    /// Print the effective training configuration as JSON
    Config(#[clap(flatten)] ConfigArg),
}

/// Configuration sources shared by every subcommand.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigSource {
    /// JSON training configuration file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of agents per generation
    #[arg(long)]
    population: Option<usize>,
    /// Override the run seed (up to 32 hex digits)
    #[arg(long)]
    seed: Option<Seed>,
}

impl ConfigSource {
    pub(crate) fn load(&self) -> anyhow::Result<TrainingConfig> {
        let config = match &self.config {
            Some(path) => util::read_training_config(path)?,
            None => TrainingConfig::default(),
        };
        Ok(self.apply_overrides(config))
    }

    fn apply_overrides(&self, mut config: TrainingConfig) -> TrainingConfig {
        if let Some(population) = self.population {
            config.world.population_size = population;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Config(arg) => config::run(&arg)?,
    }
    Ok(())
}
