//! Generation turnover: fitness, roulette selection and mutation.
//!
//! When every agent in a generation is dead the population is *extinct* and
//! [`EvolutionEngine::evolve`] builds its replacement:
//!
//! 1. **Normalize fitness** - `fitness_i = score_i² / Σ score²`
//! 2. **Select** - one roulette draw per slot, weighted by fitness
//! 3. **Reproduce** - duplicate the parent's genome and mutate the copy
//! 4. **Replace** - swap the new agents in, advance the generation counter and
//!    reset the hazard field
//!
//! Squaring the survival score sharpens selection pressure towards agents
//! that lasted longer. There is no elitism and no crossover: every child has
//! exactly one parent and every slot is refilled by selection.

use afli_brain::{MutationParams, MutationParamsError, NeuralController};
use afli_engine::{
    Agent, ConfigError, Population, PopulationSizeError, SimulationWorld, WorldConfig,
};
use rand::Rng;
use rand_pcg::Pcg32;

/// Evolution could not produce a next generation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("total squared score of the population is zero; selection is undefined")]
    DegenerateFitness,
    #[display("cannot evolve an empty population")]
    EmptyPopulation,
    #[display("{_0}")]
    #[from]
    PopulationSize(PopulationSizeError),
}

/// Whether a generation is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EvolutionState {
    /// At least one agent is alive.
    Running,
    /// Every agent is dead; the generation must be replaced.
    Extinct,
}

impl EvolutionState {
    #[must_use]
    pub fn of(population: &Population) -> Self {
        if population.all_dead() {
            Self::Extinct
        } else {
            Self::Running
        }
    }
}

/// Sets every agent's fitness to its share of the total squared score.
///
/// Afterwards the fitness values sum to 1.
pub fn normalize_fitness(agents: &mut [Agent]) -> Result<(), EvolutionError> {
    if agents.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    let total: f64 = agents.iter().map(squared_score).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(EvolutionError::DegenerateFitness);
    }
    for agent in agents {
        let fitness = squared_score(agent) / total;
        agent.set_fitness(fitness);
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn squared_score(agent: &Agent) -> f64 {
    let score = agent.score() as f64;
    score * score
}

/// Picks one agent index with probability equal to its fitness.
///
/// Draws `r ~ U[0, 1)` and walks the agents in order, subtracting each
/// fitness until `r <= 0`. If rounding leaves `r` positive after the last
/// agent, the last agent is chosen.
pub fn roulette_select<R>(agents: &[Agent], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut r: f64 = rng.random();
    for (index, agent) in agents.iter().enumerate() {
        r -= agent.fitness();
        if r <= 0.0 {
            return index;
        }
    }
    log::debug!("roulette draw ran past the last agent with {r:e} left; clamping");
    agents.len().saturating_sub(1)
}

/// Owns the evolutionary random stream and mutation settings.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    params: MutationParams,
    rng: Pcg32,
}

impl EvolutionEngine {
    /// Creates an engine drawing genomes, selections and mutations from `rng`.
    pub fn new(params: MutationParams, rng: Pcg32) -> Result<Self, MutationParamsError> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    #[must_use]
    pub fn params(&self) -> &MutationParams {
        &self.params
    }

    /// Creates generation 0 with uniformly random genomes.
    pub fn random_population(&mut self, config: &WorldConfig) -> Result<Population, ConfigError> {
        Population::random(config, &mut self.rng)
    }

    /// Builds a full set of offspring from `agents`.
    ///
    /// Fitness is normalized in place first. The returned agents are at their
    /// spawn state and there are exactly as many of them as parents.
    pub fn offspring(
        &mut self,
        agents: &mut [Agent],
        config: &WorldConfig,
    ) -> Result<Vec<Agent>, EvolutionError> {
        normalize_fitness(agents)?;
        let agents = &*agents;
        let offspring = (0..agents.len())
            .map(|_| {
                let parent = &agents[roulette_select(agents, &mut self.rng)];
                let genome = parent
                    .controller()
                    .genome()
                    .duplicate()
                    .mutate(&self.params, &mut self.rng);
                Agent::new(NeuralController::new(genome), config)
            })
            .collect();
        Ok(offspring)
    }

    /// Replaces the world's population with the next generation.
    ///
    /// Callers decide when a generation is over; this does not check that
    /// every agent is dead.
    pub fn evolve(&mut self, world: &mut SimulationWorld) -> Result<(), EvolutionError> {
        let config = world.config().clone();
        let next = self.offspring(world.population_mut().agents_mut(), &config)?;
        world.replace_generation(next)?;
        log::info!(
            "generation {} spawned with {} agents",
            world.generation(),
            world.population().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use afli_engine::{DeathCause, HasPosition as _};
    use rand::SeedableRng as _;

    use super::*;

    fn agents_with_scores(scores: &[u64]) -> Vec<Agent> {
        let config = WorldConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        scores
            .iter()
            .map(|&score| {
                let mut agent = Agent::new(NeuralController::random(&mut rng), &config);
                for _ in 0..score {
                    agent.advance(&config);
                }
                agent.kill(DeathCause::BottomHazard);
                agent
            })
            .collect()
    }

    fn agents_with_fitness(fitness: &[f64]) -> Vec<Agent> {
        let mut agents = agents_with_scores(&vec![1; fitness.len()]);
        for (agent, &f) in agents.iter_mut().zip(fitness) {
            agent.set_fitness(f);
        }
        agents
    }

    #[test]
    fn test_normalize_fitness_squares_scores() {
        let mut agents = agents_with_scores(&[1, 2, 3]);
        normalize_fitness(&mut agents).unwrap();
        let fitness: Vec<f64> = agents.iter().map(Agent::fitness).collect();
        assert!((fitness[0] - 1.0 / 14.0).abs() < 1e-12);
        assert!((fitness[1] - 4.0 / 14.0).abs() < 1e-12);
        assert!((fitness[2] - 9.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_fitness_sums_to_one() {
        let mut agents = agents_with_scores(&[3, 17, 1, 250, 42, 9, 9, 1000]);
        normalize_fitness(&mut agents).unwrap();
        let total: f64 = agents.iter().map(Agent::fitness).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_scores_are_degenerate() {
        let mut agents = agents_with_scores(&[0, 0]);
        assert_eq!(
            normalize_fitness(&mut agents),
            Err(EvolutionError::DegenerateFitness)
        );
        assert_eq!(
            normalize_fitness(&mut []),
            Err(EvolutionError::EmptyPopulation)
        );
    }

    #[test]
    fn test_roulette_skips_zero_fitness() {
        let agents = agents_with_fitness(&[0.0, 1.0, 0.0]);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..1000 {
            let index = roulette_select(&agents, &mut rng);
            // r == 0.0 exactly would pick index 0; the odds are negligible
            assert_eq!(index, 1);
        }
    }

    #[test]
    fn test_roulette_clamps_to_last_agent() {
        // Cumulative fitness never reaches r, so the walk falls off the end.
        let agents = agents_with_fitness(&[0.0, 0.0, 0.0]);
        let mut rng = Pcg32::seed_from_u64(6);
        let picks: Vec<usize> = (0..100)
            .map(|_| roulette_select(&agents, &mut rng))
            .collect();
        assert!(picks.iter().all(|&i| i == 2));
    }

    #[test]
    fn test_roulette_frequencies_match_fitness() {
        const DRAWS: usize = 100_000;
        // Critical value of χ² with 4 degrees of freedom at p = 0.001.
        const CRITICAL: f64 = 18.467;

        let fitness = [0.1, 0.2, 0.3, 0.15, 0.25];
        let agents = agents_with_fitness(&fitness);
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut counts = [0_usize; 5];
        for _ in 0..DRAWS {
            counts[roulette_select(&agents, &mut rng)] += 1;
        }

        #[expect(clippy::cast_precision_loss)]
        let chi_squared: f64 = counts
            .iter()
            .zip(fitness)
            .map(|(&observed, p)| {
                let expected = p * DRAWS as f64;
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();
        assert!(chi_squared < CRITICAL, "χ² = {chi_squared}, counts = {counts:?}");
    }

    #[test]
    fn test_offspring_keeps_size_and_spawn_state() {
        let config = WorldConfig::default();
        let mut engine = EvolutionEngine::new(MutationParams::default(), Pcg32::seed_from_u64(1))
            .unwrap();
        let mut parents = agents_with_scores(&[5, 1, 30, 2]);
        let children = engine.offspring(&mut parents, &config).unwrap();
        assert_eq!(children.len(), 4);
        for child in &children {
            assert!(child.is_alive());
            assert_eq!(child.score(), 0);
            assert_eq!(child.fitness(), 0.0);
            assert_eq!(child.position(), config.spawn_position());
        }
    }

    #[test]
    fn test_offspring_without_mutation_copies_parents() {
        let config = WorldConfig::default();
        let mut engine =
            EvolutionEngine::new(MutationParams::NONE, Pcg32::seed_from_u64(2)).unwrap();
        let mut parents = agents_with_scores(&[0, 10, 0]);
        let children = engine.offspring(&mut parents, &config).unwrap();
        for child in &children {
            assert_eq!(child.controller(), parents[1].controller());
        }
    }

    #[test]
    fn test_invalid_mutation_params_are_rejected() {
        let params = MutationParams {
            probability: 1.5,
            ..MutationParams::default()
        };
        assert!(EvolutionEngine::new(params, Pcg32::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_evolve_replaces_generation() {
        let config = WorldConfig {
            population_size: 6,
            ..WorldConfig::default()
        };
        let mut engine =
            EvolutionEngine::new(MutationParams::default(), Pcg32::seed_from_u64(3)).unwrap();
        let population = engine.random_population(&config).unwrap();
        let mut world = SimulationWorld::new(config, population, Pcg32::seed_from_u64(4)).unwrap();

        assert!(EvolutionState::of(world.population()).is_running());
        while EvolutionState::of(world.population()).is_running() && world.ticks() < 10_000 {
            world.tick();
        }
        engine.evolve(&mut world).unwrap();

        assert_eq!(world.generation(), 1);
        assert_eq!(world.population().len(), 6);
        assert_eq!(world.population().alive_count(), 6);
        assert_eq!(world.ticks(), 0);
    }
}
