use afli_brain::NeuralController;
use rand::Rng;

use crate::{
    core::{ConfigError, Direction, WorldConfig},
    engine::Agent,
};

/// A replacement generation did not have the same size as the one it replaces.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("replacement generation has {actual} agents, expected {expected}")]
pub struct PopulationSizeError {
    pub expected: usize,
    pub actual: usize,
}

/// Fixed-size, ordered set of agents making up one generation.
///
/// The size is set when the population is created and never changes;
/// [`Population::replace`] swaps in a whole new generation at once and bumps
/// the generation counter.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    generation: u64,
}

impl Population {
    /// Creates generation 0 with one random controller per agent.
    pub fn random<R>(config: &WorldConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        let agents = (0..config.population_size)
            .map(|_| Agent::new(NeuralController::random(rng), config))
            .collect();
        Self::from_agents(agents)
    }

    /// Creates generation 0 from existing agents.
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self, ConfigError> {
        if agents.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        Ok(Self {
            agents,
            generation: 0,
        })
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of extinction events so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn all_dead(&self) -> bool {
        !self.agents.iter().any(Agent::is_alive)
    }

    #[must_use]
    pub fn first_alive(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_alive())
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// The direction every living agent shares, or `None` if they disagree
    /// or nobody is alive.
    #[must_use]
    pub fn consensus_direction(&self) -> Option<Direction> {
        let mut alive = self.agents.iter().filter(|a| a.is_alive());
        let direction = alive.next()?.direction();
        alive
            .all(|a| a.direction() == direction)
            .then_some(direction)
    }

    /// Replaces every agent with the next generation.
    ///
    /// The old agents are dropped; the generation counter advances by one.
    pub fn replace(&mut self, agents: Vec<Agent>) -> Result<(), PopulationSizeError> {
        if agents.len() != self.agents.len() {
            return Err(PopulationSizeError {
                expected: self.agents.len(),
                actual: agents.len(),
            });
        }
        self.agents = agents;
        self.generation += 1;
        Ok(())
    }

    /// Starts the next generation with the same controllers.
    ///
    /// Every agent goes back to its spawn state; the generation counter
    /// advances by one.
    pub fn respawn(&mut self, config: &WorldConfig) {
        for agent in &mut self.agents {
            agent.respawn(config);
        }
        self.generation += 1;
    }
}
