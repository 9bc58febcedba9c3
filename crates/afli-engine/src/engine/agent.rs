use afli_brain::{Action, NeuralController, SensorVector};
use serde::{Deserialize, Serialize};

use crate::core::{Direction, HasBoundingBox, HasPosition, Position, Rect, Wall, WorldConfig};

/// What killed an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    TopHazard,
    BottomHazard,
    SideHazard(Wall),
}

/// Life cycle of an agent within one generation.
///
/// `Alive → Dead` is one-way; only a respawn at the generation boundary
/// brings an agent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum AgentState {
    Alive,
    Dead(DeathCause),
}

/// One simulated reflex agent.
///
/// # Per-tick Physics
///
/// While alive, [`Agent::advance`] applies, in order:
///
/// 1. `x += direction * horizontal_speed`
/// 2. `score += 1`
/// 3. `y -= mass * velocity`
/// 4. `velocity -= 1`
/// 5. if a jump was requested: `velocity = jump_velocity`, clear the request
///
/// Velocity is an integer decremented once per tick, so the trajectory does
/// not depend on wall-clock frame rate.
#[derive(Debug, Clone)]
pub struct Agent {
    position: Position,
    size: (f64, f64),
    direction: Direction,
    velocity: i32,
    state: AgentState,
    jump_requested: bool,
    score: u64,
    fitness: f64,
    controller: NeuralController,
}

impl Agent {
    /// Creates an agent at the spawn state.
    #[must_use]
    pub fn new(controller: NeuralController, config: &WorldConfig) -> Self {
        Self {
            position: config.spawn_position(),
            size: (config.agent_width, config.agent_height),
            direction: Direction::Right,
            velocity: config.jump_velocity,
            state: AgentState::Alive,
            jump_requested: false,
            score: 0,
            fitness: 0.0,
            controller,
        }
    }

    /// Resets every field except the controller back to the spawn state.
    pub fn respawn(&mut self, config: &WorldConfig) {
        self.position = config.spawn_position();
        self.size = (config.agent_width, config.agent_height);
        if self.direction.is_left() {
            self.direction = Direction::Right;
        }
        self.velocity = config.jump_velocity;
        self.state = AgentState::Alive;
        self.jump_requested = false;
        self.score = 0;
        self.fitness = 0.0;
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    #[must_use]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    #[must_use]
    pub fn death_cause(&self) -> Option<DeathCause> {
        match self.state {
            AgentState::Alive => None,
            AgentState::Dead(cause) => Some(cause),
        }
    }

    #[must_use]
    pub fn is_jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Ticks survived in the current generation.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Normalized fitness share; only meaningful after fitness normalization.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    #[must_use]
    pub fn controller(&self) -> &NeuralController {
        &self.controller
    }

    /// Asks the controller for this tick's decision and records a jump request.
    pub fn think(&mut self, sensors: &SensorVector) -> Action {
        let action = self.controller.decide(sensors);
        if action.is_jump() {
            self.jump_requested = true;
        }
        action
    }

    #[cfg(test)]
    pub(crate) fn request_jump(&mut self) {
        if self.is_alive() {
            self.jump_requested = true;
        }
    }

    /// Advances the agent by one tick. Dead agents do not move or score.
    pub fn advance(&mut self, config: &WorldConfig) {
        if !self.is_alive() {
            return;
        }
        self.position.x += self.direction.sign() * config.horizontal_speed;
        self.score += 1;
        let force = config.mass.saturating_mul(self.velocity);
        self.position.y -= f64::from(force);
        self.velocity = self.velocity.saturating_sub(1);
        if self.jump_requested {
            self.velocity = config.jump_velocity;
            self.jump_requested = false;
        }
    }

    /// Turns the agent around after touching `wall`.
    ///
    /// Returns `false` without changing anything if the agent is not moving
    /// towards that wall (already rebounded, or dead).
    pub fn bounce(&mut self, wall: Wall) -> bool {
        if !self.is_alive() || self.direction.approaching_wall() != wall {
            return false;
        }
        self.direction = wall.rebound_direction();
        true
    }

    /// Marks the agent dead. Has no effect on an already dead agent.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.is_alive() {
            self.state = AgentState::Dead(cause);
            self.jump_requested = false;
        }
    }

    /// Pulls the agent back inside the playfield if it drifted out.
    ///
    /// Returns `true` if the position had to be corrected.
    pub fn clamp_to_playfield(&mut self, config: &WorldConfig) -> bool {
        let max_x = config.playfield_width - self.size.0;
        let max_y = config.playfield_height - self.size.1;
        let clamped = Position::new(
            self.position.x.clamp(0.0, max_x),
            self.position.y.clamp(0.0, max_y),
        );
        let drifted = clamped != self.position;
        self.position = clamped;
        drifted
    }

    /// Centers the agent vertically on `center_y` and cancels its velocity.
    #[cfg(test)]
    pub(crate) fn hold_at_height(&mut self, center_y: f64) {
        self.position.y = center_y - self.size.1 / 2.0;
        self.velocity = 0;
    }

    #[cfg(test)]
    pub(crate) fn shift_x(&mut self, dx: f64) {
        self.position.x += dx;
    }
}

impl HasPosition for Agent {
    fn position(&self) -> Position {
        self.position
    }
}

impl HasBoundingBox for Agent {
    fn bounding_box(&self) -> Rect {
        Rect::at(self.position, self.size.0, self.size.1)
    }
}

#[cfg(test)]
mod tests {
    use afli_brain::{Genome, HIDDEN_SIZE, Matrix};

    use super::*;

    fn controller_with_output_bias(b2: [f64; 2]) -> NeuralController {
        NeuralController::new(Genome::new(
            Matrix::ZERO,
            Matrix::ZERO,
            [0.0; HIDDEN_SIZE],
            b2,
        ))
    }

    fn agent() -> Agent {
        Agent::new(
            controller_with_output_bias([0.0, 1.0]),
            &WorldConfig::default(),
        )
    }

    #[test]
    fn test_spawn_state() {
        let a = agent();
        let config = WorldConfig::default();
        assert!(a.is_alive());
        assert_eq!(a.position(), config.spawn_position());
        assert_eq!(a.direction(), Direction::Right);
        assert_eq!(a.velocity(), 8);
        assert_eq!(a.score(), 0);
        assert_eq!(a.fitness(), 0.0);
    }

    #[test]
    fn test_free_fall_trace() {
        let config = WorldConfig::default();
        let mut a = agent();
        let y0 = a.position().y;
        let mut expected = y0;
        for tick in 0..10 {
            a.advance(&config);
            expected -= f64::from(2 * (8 - tick));
            assert_eq!(a.position().y, expected);
        }
        assert_eq!(a.score(), 10);
        assert_eq!(a.position().x, config.spawn_position().x + 100.0);
        // 16 + 14 + ... + -2 = 70
        assert_eq!(a.position().y, y0 - 70.0);
    }

    #[test]
    fn test_jump_resets_velocity_after_moving() {
        let config = WorldConfig::default();
        let mut a = agent();
        let y0 = a.position().y;
        a.request_jump();
        a.advance(&config);
        assert_eq!(a.position().y, y0 - 16.0);
        assert_eq!(a.velocity(), 8);
        assert!(!a.is_jump_requested());
    }

    #[test]
    fn test_think_records_jump() {
        let config = WorldConfig::default();
        let mut jumper = Agent::new(controller_with_output_bias([1.0, 0.0]), &config);
        assert!(jumper.think(&[0.0; 5]).is_jump());
        assert!(jumper.is_jump_requested());

        let mut glider = agent();
        assert!(glider.think(&[0.0; 5]).is_glide());
        assert!(!glider.is_jump_requested());
    }

    #[test]
    fn test_bounce_only_towards_wall() {
        let mut a = agent();
        assert!(!a.bounce(Wall::Left));
        assert!(a.bounce(Wall::Right));
        assert_eq!(a.direction(), Direction::Left);
        assert!(!a.bounce(Wall::Right));
    }

    #[test]
    fn test_dead_agent_is_frozen() {
        let config = WorldConfig::default();
        let mut a = agent();
        a.advance(&config);
        a.kill(DeathCause::TopHazard);
        a.kill(DeathCause::BottomHazard);
        let before = a.position();
        a.request_jump();
        a.advance(&config);
        assert_eq!(a.position(), before);
        assert_eq!(a.score(), 1);
        assert_eq!(a.death_cause(), Some(DeathCause::TopHazard));
        assert!(!a.bounce(Wall::Right));
    }

    #[test]
    fn test_respawn_keeps_controller() {
        let config = WorldConfig::default();
        let mut a = Agent::new(controller_with_output_bias([1.0, 0.0]), &config);
        let controller = a.controller().clone();
        a.advance(&config);
        a.bounce(Wall::Right);
        a.kill(DeathCause::SideHazard(Wall::Right));
        a.set_fitness(0.3);
        a.respawn(&config);
        assert!(a.is_alive());
        assert_eq!(a.direction(), Direction::Right);
        assert_eq!(a.score(), 0);
        assert_eq!(a.fitness(), 0.0);
        assert_eq!(a.controller(), &controller);
    }

    #[test]
    fn test_long_fall_saturates() {
        let config = WorldConfig {
            mass: i32::MAX,
            jump_velocity: 1,
            ..WorldConfig::default()
        };
        let mut a = Agent::new(controller_with_output_bias([0.0, 1.0]), &config);
        for _ in 0..4 {
            a.advance(&config);
            a.clamp_to_playfield(&config);
        }
        assert_eq!(a.velocity(), -3);
        assert_eq!(a.bounding_box().bottom(), config.playfield_height);
    }

    #[test]
    fn test_clamp_to_playfield() {
        let config = WorldConfig::default();
        let mut a = agent();
        assert!(!a.clamp_to_playfield(&config));
        for _ in 0..200 {
            a.advance(&config);
        }
        assert!(a.clamp_to_playfield(&config));
        let bbox = a.bounding_box();
        assert!(bbox.right() <= config.playfield_width);
        assert!(bbox.bottom() <= config.playfield_height);
    }
}
