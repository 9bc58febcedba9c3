//! Simulation state and the per-tick update.
//!
//! - [`Agent`] - One reflex agent: kinematics, life state, score and controller
//! - [`HazardField`] - Static top/bottom hazards and the movable side pairs
//! - [`Population`] - Fixed-size generation of agents
//! - [`SimulationWorld`] - Walls, hazards and population advanced tick by tick
//! - [`WorldSnapshot`] - Serializable read-only view for renderers
//!
//! # Tick Flow
//!
//! 1. Every living agent senses the course and decides whether to jump
//! 2. Agents move; those touching a wall turn around
//! 3. Agents touching a hazard die
//! 4. Once all survivors have turned, the hazard gap moves to the next wall
//!
//! Generation turnover (selection and mutation) lives outside this crate and
//! swaps agents in with [`SimulationWorld::replace_generation`].
//!
//! # Example
//!
//! ```
//! use afli_engine::{Population, Seed, SimulationWorld, WorldConfig};
//!
//! let config = WorldConfig {
//!     population_size: 4,
//!     ..WorldConfig::default()
//! };
//! let mut rng = Seed::new(42).rng();
//! let population = Population::random(&config, &mut rng).unwrap();
//! let mut world = SimulationWorld::new(config, population, rng).unwrap();
//!
//! while !world.population().all_dead() && world.ticks() < 10_000 {
//!     world.tick();
//! }
//! println!("bounce score: {}", world.score());
//! ```

pub use self::{agent::*, hazard_field::*, population::*, snapshot::*, world::*};

mod agent;
mod hazard_field;
mod population;
mod snapshot;
mod world;
