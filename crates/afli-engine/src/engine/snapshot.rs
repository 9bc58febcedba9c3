use serde::{Deserialize, Serialize};

use crate::{
    core::{Direction, HasPosition as _, Position},
    engine::{Agent, DeathCause, Hazard, WallBody},
};

/// What a renderer needs to draw one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub position: Position,
    pub direction: Direction,
    pub alive: bool,
    pub death_cause: Option<DeathCause>,
    pub score: u64,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position(),
            direction: agent.direction(),
            alive: agent.is_alive(),
            death_cause: agent.death_cause(),
            score: agent.score(),
        }
    }
}

/// Read-only picture of the world after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub generation: u64,
    pub tick: u64,
    /// Bounce score of the current generation.
    pub score: u64,
    pub agents: Vec<AgentView>,
    pub hazards: Vec<Hazard>,
    pub walls: Vec<WallBody>,
}

impl WorldSnapshot {
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use afli_brain::NeuralController;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::WorldConfig;

    #[test]
    fn test_agent_view_of_dead_agent() {
        let config = WorldConfig::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut agent = Agent::new(NeuralController::random(&mut rng), &config);
        agent.kill(DeathCause::BottomHazard);
        let view = AgentView::from(&agent);
        assert!(!view.alive);
        assert_eq!(view.death_cause, Some(DeathCause::BottomHazard));
        assert_eq!(view.position, config.spawn_position());
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = WorldSnapshot {
            generation: 2,
            tick: 10,
            score: 1,
            agents: Vec::new(),
            hazards: Vec::new(),
            walls: Vec::new(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["generation"], 2);
        assert_eq!(json["tick"], 10);
        assert_eq!(snapshot.alive_count(), 0);
    }
}
