//! Course simulation for neuroevolved reflex agents.
//!
//! A population of agents runs back and forth between two walls. Each wall
//! carries a pair of hazard pieces with a gap between them; agents must pass
//! through the gap when they reach the wall and avoid the hazard strips along
//! the top and bottom edges the rest of the time. Every agent decides once
//! per tick whether to jump, using a controller from [`afli_brain`].
//!
//! - [`core`] - Geometry, configuration and seeding
//! - [`engine`] - Agents, hazards, population and the tick loop
//!
//! The simulation is deterministic: given the same [`WorldConfig`],
//! controllers and random number generator, every tick produces the same
//! state.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
