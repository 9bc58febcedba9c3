//! The outer loop: tick the world, turn generations over on extinction.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use afli_brain::{MutationParams, MutationParamsError, NetworkShape, ShapeError};
use afli_engine::{ConfigError, Seed, SimulationWorld, TickOutcome, WorldConfig, WorldSnapshot};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    evolution::{EvolutionEngine, EvolutionError, EvolutionState},
    stats::{GenerationEnd, GenerationRecord},
};

/// A training run could not start or continue.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid world configuration: {_0}")]
    Config(ConfigError),
    #[display("controller topology mismatch: {_0}")]
    Shape(ShapeError),
    #[display("invalid mutation parameters: {_0}")]
    Mutation(MutationParamsError),
    #[display("evolution failed: {_0}")]
    Evolution(EvolutionError),
}

/// Everything a run is configured with. Fixed once the loop is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub world: WorldConfig,
    pub network: NetworkShape,
    pub mutation: MutationParams,
    /// Seed for every random draw of the run; drawn at startup when absent.
    pub seed: Option<Seed>,
}

/// Whether the loop is training unattended or driven by a player.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum TrainingMode {
    #[default]
    Training,
    /// Manual restarts are honored.
    Play,
}

/// Cloneable flag that asks a [`TrainingLoop`] to stop at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional caps on how long a run goes on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// Stop after this many finished generations.
    pub max_generations: Option<u64>,
    /// End a generation after this many ticks even if agents survive.
    pub max_ticks_per_generation: Option<u64>,
}

/// Result of a single [`TrainingLoop::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The world advanced one tick and the generation goes on.
    Ticked(TickOutcome),
    /// The generation ended and has already been replaced.
    GenerationEnded(GenerationRecord),
    /// The stop handle was triggered; nothing changed.
    Stopped,
}

/// Why [`TrainingLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RunEnd {
    Stopped,
    GenerationLimit,
}

/// Drives a [`SimulationWorld`] and an [`EvolutionEngine`] generation after
/// generation.
///
/// Between two calls to [`TrainingLoop::step`] the world is always in a
/// consistent state: the caller may stop at any step and inspect or render it.
#[derive(Debug)]
pub struct TrainingLoop {
    mode: TrainingMode,
    seed: Seed,
    limits: RunLimits,
    world: SimulationWorld,
    engine: EvolutionEngine,
    stop: StopHandle,
    restart_requested: bool,
    history: Vec<GenerationRecord>,
}

impl TrainingLoop {
    /// Validates `config` and builds generation 0.
    ///
    /// Nothing is ticked if the configuration is invalid.
    pub fn new(config: TrainingConfig, mode: TrainingMode) -> Result<Self, TrainingError> {
        let TrainingConfig {
            world: world_config,
            network,
            mutation,
            seed,
        } = config;
        world_config.validate()?;
        network.validate()?;
        mutation.validate()?;

        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut master = seed.rng();
        let world_rng = Pcg32::from_rng(&mut master);
        let engine_rng = Pcg32::from_rng(&mut master);

        let mut engine = EvolutionEngine::new(mutation, engine_rng)?;
        let population = engine.random_population(&world_config)?;
        let world = SimulationWorld::new(world_config, population, world_rng)?;
        log::info!(
            "training started with {} agents, seed {seed}",
            world.population().len()
        );

        Ok(Self {
            mode,
            seed,
            limits: RunLimits::default(),
            world,
            engine,
            stop: StopHandle::default(),
            restart_requested: false,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    /// The seed the run was started from. Passing it back reproduces the run.
    #[must_use]
    pub fn seed(&self) -> Seed {
        self.seed
    }

    #[must_use]
    pub fn limits(&self) -> RunLimits {
        self.limits
    }

    #[must_use]
    pub fn world(&self) -> &SimulationWorld {
        &self.world
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.world.generation()
    }

    /// Records of every finished generation, oldest first.
    #[must_use]
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Ends the current generation at the next step without waiting for
    /// extinction. Ignored while training.
    pub fn request_restart(&mut self) {
        if self.mode.is_training() {
            log::info!("manual restart ignored in training mode");
            return;
        }
        self.restart_requested = true;
    }

    /// Advances by one tick, turning the generation over if it ends.
    pub fn step(&mut self) -> Result<StepOutcome, TrainingError> {
        if self.stop.is_stopped() {
            return Ok(StepOutcome::Stopped);
        }
        if std::mem::take(&mut self.restart_requested) {
            return self.end_generation(GenerationEnd::Restart);
        }

        let outcome = self.world.tick();

        if EvolutionState::of(self.world.population()).is_extinct() {
            return self.end_generation(GenerationEnd::Extinct);
        }
        if self
            .limits
            .max_ticks_per_generation
            .is_some_and(|max| self.world.ticks() >= max)
        {
            return self.end_generation(GenerationEnd::TickLimit);
        }
        Ok(StepOutcome::Ticked(outcome))
    }

    /// Steps until stopped or until the generation limit is reached.
    ///
    /// `observe` sees every step outcome together with the world as it is
    /// after that step.
    pub fn run<F>(&mut self, mut observe: F) -> Result<RunEnd, TrainingError>
    where
        F: FnMut(&StepOutcome, &SimulationWorld),
    {
        loop {
            if self
                .limits
                .max_generations
                .is_some_and(|max| self.history.len() as u64 >= max)
            {
                return Ok(RunEnd::GenerationLimit);
            }
            let outcome = self.step()?;
            observe(&outcome, &self.world);
            if matches!(outcome, StepOutcome::Stopped) {
                log::info!("training stopped at generation {}", self.generation());
                return Ok(RunEnd::Stopped);
            }
        }
    }

    fn end_generation(&mut self, end: GenerationEnd) -> Result<StepOutcome, TrainingError> {
        let record = GenerationRecord::capture(&self.world, end);
        log::info!(
            "generation {} ended ({:?}) after {} ticks: best score {}, bounce score {}",
            record.generation,
            record.end,
            record.ticks,
            record.scores.max,
            record.bounce_score
        );
        if self.world.ticks() == 0 {
            // Nobody has scored yet, so there is nothing to select on.
            self.world.respawn_generation();
            log::info!("generation {} respawned without breeding", self.generation());
        } else {
            self.engine.evolve(&mut self.world)?;
        }
        self.history.push(record.clone());
        Ok(StepOutcome::GenerationEnded(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(population_size: usize, seed: u128) -> TrainingConfig {
        TrainingConfig {
            world: WorldConfig {
                population_size,
                ..WorldConfig::default()
            },
            seed: Some(Seed::new(seed)),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_aborts_startup() {
        let err = TrainingLoop::new(config(0, 1), TrainingMode::Training).unwrap_err();
        assert_eq!(err, TrainingError::Config(ConfigError::EmptyPopulation));

        let mut bad_mutation = config(3, 1);
        bad_mutation.mutation.scale = -1.0;
        let err = TrainingLoop::new(bad_mutation, TrainingMode::Training).unwrap_err();
        assert!(matches!(err, TrainingError::Mutation(_)));

        let mut bad_shape = config(3, 1);
        bad_shape.network.hidden = 16;
        let err = TrainingLoop::new(bad_shape, TrainingMode::Training).unwrap_err();
        assert_eq!(
            err.to_string(),
            "controller topology mismatch: hidden layer has size 16, expected 8"
        );
    }

    #[test]
    fn test_seed_is_drawn_when_missing() {
        let mut cfg = config(2, 0);
        cfg.seed = None;
        let a = TrainingLoop::new(cfg.clone(), TrainingMode::Training).unwrap();
        let replay = TrainingLoop::new(
            TrainingConfig {
                seed: Some(a.seed()),
                ..cfg
            },
            TrainingMode::Training,
        )
        .unwrap();
        assert_eq!(a.snapshot(), replay.snapshot());
    }

    #[test]
    fn test_generation_limit_and_size_invariant() {
        let mut training = TrainingLoop::new(config(8, 7), TrainingMode::Training)
            .unwrap()
            .with_limits(RunLimits {
                max_generations: Some(3),
                max_ticks_per_generation: Some(500),
            });
        let mut sizes = Vec::new();
        let end = training
            .run(|outcome, world| {
                if let StepOutcome::GenerationEnded(_) = outcome {
                    sizes.push(world.population().len());
                }
            })
            .unwrap();
        assert!(end.is_generation_limit());
        assert_eq!(training.generation(), 3);
        assert_eq!(training.history().len(), 3);
        assert_eq!(sizes, vec![8, 8, 8]);
        for (i, record) in training.history().iter().enumerate() {
            assert_eq!(record.generation, i as u64);
            assert!(record.ticks <= 500);
        }
    }

    #[test]
    fn test_tick_limit_forces_turnover() {
        let mut training = TrainingLoop::new(config(4, 3), TrainingMode::Training)
            .unwrap()
            .with_limits(RunLimits {
                max_generations: None,
                max_ticks_per_generation: Some(1),
            });
        let outcome = training.step().unwrap();
        let StepOutcome::GenerationEnded(record) = outcome else {
            panic!("expected the generation to end, got {outcome:?}");
        };
        assert!(record.end.is_tick_limit());
        assert_eq!(record.ticks, 1);
        assert_eq!(record.deaths.survived, 4);
        assert_eq!(training.generation(), 1);
    }

    #[test]
    fn test_restart_only_in_play_mode() {
        let mut training = TrainingLoop::new(config(3, 5), TrainingMode::Training).unwrap();
        training.request_restart();
        assert!(matches!(training.step().unwrap(), StepOutcome::Ticked(_)));
        assert_eq!(training.generation(), 0);

        let mut play = TrainingLoop::new(config(3, 5), TrainingMode::Play).unwrap();
        play.step().unwrap();
        play.request_restart();
        let StepOutcome::GenerationEnded(record) = play.step().unwrap() else {
            panic!("restart was not honored");
        };
        assert!(record.end.is_restart());
        assert_eq!(record.ticks, 1);
        assert_eq!(play.generation(), 1);
        assert_eq!(play.world().ticks(), 0);
    }

    #[test]
    fn test_restart_before_first_tick_respawns() {
        let mut play = TrainingLoop::new(config(3, 6), TrainingMode::Play).unwrap();
        let controllers: Vec<_> = play
            .world()
            .population()
            .agents()
            .iter()
            .map(|a| a.controller().clone())
            .collect();

        for generation in 1..=2 {
            play.request_restart();
            let StepOutcome::GenerationEnded(record) = play.step().unwrap() else {
                panic!("restart at tick 0 was not honored");
            };
            assert!(record.end.is_restart());
            assert_eq!(record.ticks, 0);
            assert_eq!(play.generation(), generation);
        }

        let world = play.world();
        assert_eq!(world.ticks(), 0);
        assert_eq!(world.population().alive_count(), 3);
        for (agent, controller) in world.population().agents().iter().zip(&controllers) {
            assert_eq!(agent.controller(), controller);
        }
        assert!(matches!(play.step().unwrap(), StepOutcome::Ticked(_)));
    }

    #[test]
    fn test_stop_handle_stops_run() {
        let mut training = TrainingLoop::new(config(5, 9), TrainingMode::Training).unwrap();
        let stop = training.stop_handle();
        let mut steps = 0;
        let end = training
            .run(|_, world| {
                steps += 1;
                if world.ticks() == 3 {
                    stop.stop();
                }
            })
            .unwrap();
        assert!(end.is_stopped());
        assert_eq!(training.world().ticks(), 3);
        assert_eq!(steps, 4);
        assert!(matches!(training.step().unwrap(), StepOutcome::Stopped));
    }

    #[test]
    fn test_config_json_defaults() {
        let cfg: TrainingConfig =
            serde_json::from_str(r#"{"seed": "ff", "mutation": {"probability": 0.2}}"#).unwrap();
        assert_eq!(cfg.seed, Some(Seed::new(0xff)));
        assert_eq!(cfg.mutation.probability, 0.2);
        assert_eq!(cfg.mutation.scale, 0.5);
        assert_eq!(cfg.world, WorldConfig::default());
        assert_eq!(cfg.network, NetworkShape::default());
    }
}
