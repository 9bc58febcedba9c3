use afli_brain::SensorVector;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        ConfigError, HasBoundingBox, HasPosition, Position, Rect, Wall, WorldConfig, collides,
    },
    engine::{Agent, AgentView, HazardField, Population, PopulationSizeError, WorldSnapshot},
};

/// One of the two bouncing side walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBody {
    pub wall: Wall,
    pub rect: Rect,
}

impl HasPosition for WallBody {
    fn position(&self) -> Position {
        self.rect.position()
    }
}

impl HasBoundingBox for WallBody {
    fn bounding_box(&self) -> Rect {
        self.rect
    }
}

/// What happened during one [`SimulationWorld::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Agents that sensed, acted and moved this tick.
    pub active: usize,
    pub jumps: usize,
    pub bounces: usize,
    pub deaths: usize,
    /// Positions pulled back inside the playfield.
    pub drift_corrections: usize,
    /// Whether a completed bounce wave moved the hazard gap.
    pub reconfigured: bool,
}

/// The course: walls, hazards and the population running through it.
///
/// # Tick Protocol
///
/// [`SimulationWorld::tick`] visits every living agent in population order
/// and, for each one:
///
/// 1. computes its [`SensorVector`] (see [`SimulationWorld::sense`])
/// 2. lets its controller decide whether to jump
/// 3. advances its physics
/// 4. bounces it off any wall it now overlaps
/// 5. kills it if it overlaps any hazard
///
/// After the pass, if a bounce happened and every surviving agent travels in
/// the same direction, the bounce score goes up by one and the hazard gap is
/// redrawn on the wall they are now heading for. Bounces of a single wave can
/// straddle several ticks; the gap moves once per wave.
///
/// All agents in one tick see the same hazard layout.
#[derive(Debug, Clone)]
pub struct SimulationWorld {
    config: WorldConfig,
    walls: [WallBody; 2],
    hazard_field: HazardField,
    population: Population,
    rng: Pcg32,
    score: u64,
    ticks: u64,
    wave_pending: bool,
}

impl SimulationWorld {
    /// Builds the course around `population`.
    ///
    /// `rng` drives gap placement only. The hazard field starts from its
    /// default placement and is reconfigured once for the first wave.
    pub fn new(
        config: WorldConfig,
        population: Population,
        rng: Pcg32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if population.len() != config.population_size {
            return Err(ConfigError::PopulationMismatch {
                expected: config.population_size,
                actual: population.len(),
            });
        }
        let walls = Wall::ALL.map(|wall| {
            let x = match wall {
                Wall::Left => 0.0,
                Wall::Right => config.playfield_width - config.wall_width,
            };
            WallBody {
                wall,
                rect: Rect::new(x, 0.0, config.wall_width, config.playfield_height),
            }
        });
        let hazard_field = HazardField::new(&config);
        let mut this = Self {
            config,
            walls,
            hazard_field,
            population,
            rng,
            score: 0,
            ticks: 0,
            wave_pending: false,
        };
        this.reset_course();
        Ok(this)
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    #[must_use]
    pub fn hazard_field(&self) -> &HazardField {
        &self.hazard_field
    }

    #[must_use]
    pub fn wall(&self, wall: Wall) -> &WallBody {
        &self.walls[wall.index()]
    }

    /// Completed bounce waves in the current generation.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Ticks elapsed in the current generation.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.population.generation()
    }

    /// Builds the sensor vector for `agent` against the current layout.
    ///
    /// The five readings are, in order:
    ///
    /// 0. distance from the agent's leading edge to the wall it is heading for
    ///    (negative once they overlap)
    /// 1. distance from the agent's top edge to the static top hazard
    /// 2. distance from the agent's bottom edge to the static bottom hazard
    /// 3. distance from the agent's top edge to the tip of the approached
    ///    wall's upper side piece
    /// 4. distance from the agent's bottom edge to the tip of the approached
    ///    wall's lower side piece
    #[must_use]
    pub fn sense(&self, agent: &Agent) -> SensorVector {
        sense(agent, &self.walls, &self.hazard_field)
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        let Self {
            config,
            walls,
            hazard_field,
            population,
            ..
        } = self;
        let mut outcome = TickOutcome::default();

        for (index, agent) in population.agents_mut().iter_mut().enumerate() {
            if !agent.is_alive() {
                continue;
            }
            outcome.active += 1;

            let sensors = sense(agent, walls, hazard_field);
            if agent.think(&sensors).is_jump() {
                outcome.jumps += 1;
            }
            agent.advance(config);
            if agent.clamp_to_playfield(config) {
                log::warn!("agent {index} drifted outside the playfield; clamped");
                outcome.drift_corrections += 1;
            }

            for wall in walls.iter() {
                if collides(&*agent, wall) && agent.bounce(wall.wall) {
                    outcome.bounces += 1;
                }
            }

            if let Some(hazard) = hazard_field.hazards().find(|h| collides(&*agent, h)) {
                agent.kill(hazard.kind.death_cause());
                outcome.deaths += 1;
            }
        }
        self.ticks += 1;

        if outcome.bounces > 0 {
            self.wave_pending = true;
        }
        if self.wave_pending
            && let Some(direction) = self.population.consensus_direction()
        {
            self.wave_pending = false;
            self.score += 1;
            outcome.reconfigured = self.hazard_field.reconfigure(
                self.score,
                Some(direction.approaching_wall()),
                &mut self.rng,
            );
            log::debug!(
                "generation {} tick {}: wave complete, score {}",
                self.generation(),
                self.ticks,
                self.score
            );
        }

        outcome
    }

    /// Swaps in the next generation and resets the course for it.
    pub fn replace_generation(&mut self, agents: Vec<Agent>) -> Result<(), PopulationSizeError> {
        self.population.replace(agents)?;
        self.reset_course();
        Ok(())
    }

    /// Starts the next generation with the current controllers respawned.
    pub fn respawn_generation(&mut self) {
        self.population.respawn(&self.config);
        self.reset_course();
    }

    /// Resets score, tick counter and hazards to the start-of-generation state.
    pub fn reset_course(&mut self) {
        self.score = 0;
        self.ticks = 0;
        self.wave_pending = false;
        self.hazard_field.reset_to_default();
        let approaching = self
            .population
            .first_alive()
            .map(|a| a.direction().approaching_wall());
        self.hazard_field.reconfigure(0, approaching, &mut self.rng);
    }

    /// Read-only view of the current state for renderers.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            generation: self.generation(),
            tick: self.ticks,
            score: self.score,
            agents: self
                .population
                .agents()
                .iter()
                .map(AgentView::from)
                .collect(),
            hazards: self.hazard_field.hazards().collect(),
            walls: self.walls.to_vec(),
        }
    }
}

fn sense(agent: &Agent, walls: &[WallBody; 2], field: &HazardField) -> SensorVector {
    let bbox = agent.bounding_box();
    let wall = agent.direction().approaching_wall();
    let wall_rect = walls[wall.index()].rect;
    let wall_distance = match wall {
        Wall::Left => bbox.left() - wall_rect.right(),
        Wall::Right => wall_rect.left() - bbox.right(),
    };
    [
        wall_distance,
        bbox.top() - field.static_top().rect.bottom(),
        field.static_bottom().rect.top() - bbox.bottom(),
        bbox.top() - field.side_upper(wall).rect.bottom(),
        field.side_lower(wall).rect.top() - bbox.bottom(),
    ]
}
