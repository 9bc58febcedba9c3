//! Neuroevolution of the reflex agents running the course.
//!
//! This crate closes the loop between the course simulation (`afli-engine`)
//! and the controllers (`afli-brain`): it ticks a world until every agent is
//! dead, scores the generation, and breeds the next one from the survivors'
//! genomes.
//!
//! # How Training Works
//!
//! 1. **Population** - Generation 0 gets uniformly random genomes
//! 2. **Simulation** - The world ticks; each agent's controller decides when to jump
//! 3. **Fitness** - On extinction, every agent's squared survival score is normalized
//! 4. **Selection** - Roulette-wheel draws pick one parent per slot
//! 5. **Reproduction** - The parent's genome is duplicated and mutated
//! 6. **Repeat** - The course resets and the new generation starts ticking
//!
//! # Architecture
//!
//! ```text
//! TrainingLoop
//!     ↓ ticks
//! SimulationWorld (afli-engine)
//!     ↓ on extinction
//! EvolutionEngine
//!     ↓ replaces
//! Population
//! ```
//!
//! - [`training_loop`] - [`TrainingLoop`](training_loop::TrainingLoop), stop and restart signals, run limits
//! - [`evolution`] - Fitness normalization, roulette selection and generation replacement
//! - [`stats`] - Per-generation records kept by the loop
//!
//! # Determinism
//!
//! A run is fully determined by its [`Seed`](afli_engine::Seed). The loop
//! splits it into two independent streams: one for hazard gap placement, one
//! for genomes, selection and mutation.
//!
//! # Example
//!
//! ```
//! use afli_engine::{Seed, WorldConfig};
//! use afli_training::training_loop::{RunLimits, TrainingConfig, TrainingLoop, TrainingMode};
//!
//! let config = TrainingConfig {
//!     world: WorldConfig {
//!         population_size: 10,
//!         ..WorldConfig::default()
//!     },
//!     seed: Some(Seed::new(1)),
//!     ..TrainingConfig::default()
//! };
//! let mut training = TrainingLoop::new(config, TrainingMode::Training)?
//!     .with_limits(RunLimits {
//!         max_generations: Some(2),
//!         max_ticks_per_generation: Some(2_000),
//!     });
//! training.run(|_, _| {})?;
//!
//! for record in training.history() {
//!     println!("generation {}: best {}", record.generation, record.scores.max);
//! }
//! # Ok::<(), afli_training::training_loop::TrainingError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Single-threaded**: agents are simulated one after another
//! - **No elitism or crossover**: every child is a mutated copy of one roulette-selected parent
//! - **No persistence**: trained genomes live only as long as the process

pub mod evolution;
pub mod stats;
pub mod training_loop;
