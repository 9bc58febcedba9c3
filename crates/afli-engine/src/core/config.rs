use serde::{Deserialize, Serialize};

use super::geometry::Position;

/// The course configuration is unusable.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[display("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[display("playfield {axis} of {available} is too small, need more than {required}")]
    PlayfieldTooSmall {
        axis: &'static str,
        required: f64,
        available: f64,
    },
    #[display(
        "hazard gap placement needs a playfield height of at least {required}, got {available}"
    )]
    GapPlacement { required: f64, available: f64 },
    #[display("horizontal speed {speed} exceeds side hazard width {width}")]
    SpeedExceedsHazardWidth { speed: f64, width: f64 },
    #[display("mass {mass} times jump velocity {jump_velocity} does not fit in a vertical step")]
    VerticalStepOverflow { mass: i32, jump_velocity: i32 },
    #[display("population has {actual} agents but the configuration asks for {expected}")]
    PopulationMismatch { expected: usize, actual: usize },
}

/// Physical constants of the course.
///
/// Fixed for the lifetime of a run; nothing reads it back from disk after
/// startup. Missing fields fall back to [`WorldConfig::default`] when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of agents in every generation.
    pub population_size: usize,
    pub playfield_width: f64,
    pub playfield_height: f64,
    /// Width of each side wall.
    pub wall_width: f64,
    /// Height of the static hazard strips along the top and bottom edges.
    pub static_hazard_height: f64,
    pub agent_width: f64,
    pub agent_height: f64,
    /// How far a side hazard protrudes from its wall.
    pub hazard_piece_width: f64,
    /// Height of the spiked tip of each side hazard piece.
    pub hazard_piece_height: f64,
    /// Horizontal distance travelled per tick.
    pub horizontal_speed: f64,
    /// Multiplier turning vertical velocity into displacement.
    pub mass: i32,
    /// Velocity an agent is reset to when it jumps, and spawns with.
    pub jump_velocity: i32,
    /// Gap shrink per bounce score point.
    pub gap_shrink_per_point: f64,
    /// Minimum gap as a multiple of the agent height.
    pub gap_min_factor: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            playfield_width: 1080.0,
            playfield_height: 900.0,
            wall_width: 20.0,
            static_hazard_height: 40.0,
            agent_width: 100.0,
            agent_height: 65.0,
            hazard_piece_width: 40.0,
            hazard_piece_height: 100.0,
            horizontal_speed: 10.0,
            mass: 2,
            jump_velocity: 8,
            gap_shrink_per_point: 10.0,
            gap_min_factor: 2.5,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn half_height(&self) -> f64 {
        self.playfield_height / 2.0
    }

    /// Smallest gap the side hazards may ever leave open.
    #[must_use]
    pub fn gap_min(&self) -> f64 {
        self.agent_height * self.gap_min_factor
    }

    /// Where agents appear: centered horizontally and vertically.
    #[must_use]
    pub fn spawn_position(&self) -> Position {
        Position::new(
            (self.playfield_width - self.agent_width) / 2.0,
            (self.playfield_height - self.agent_height) / 2.0,
        )
    }

    /// Checks every constraint the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("agent_width", self.agent_width),
            ("agent_height", self.agent_height),
            ("hazard_piece_width", self.hazard_piece_width),
            ("hazard_piece_height", self.hazard_piece_height),
            ("horizontal_speed", self.horizontal_speed),
            ("static_hazard_height", self.static_hazard_height),
            ("mass", f64::from(self.mass)),
            ("jump_velocity", f64::from(self.jump_velocity)),
            ("gap_min_factor", self.gap_min_factor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("wall_width", self.wall_width),
            ("gap_shrink_per_point", self.gap_shrink_per_point),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.mass.checked_mul(self.jump_velocity).is_none() {
            return Err(ConfigError::VerticalStepOverflow {
                mass: self.mass,
                jump_velocity: self.jump_velocity,
            });
        }

        let required_width =
            2.0 * (self.wall_width + self.hazard_piece_width) + self.agent_width;
        if self.playfield_width <= required_width {
            return Err(ConfigError::PlayfieldTooSmall {
                axis: "width",
                required: required_width,
                available: self.playfield_width,
            });
        }
        let required_height = 2.0 * self.static_hazard_height + self.agent_height;
        if self.playfield_height <= required_height {
            return Err(ConfigError::PlayfieldTooSmall {
                axis: "height",
                required: required_height,
                available: self.playfield_height,
            });
        }

        // The random gap top is drawn from [2h, H - gap - 2h]; that range must
        // be non-empty for the largest gap ever requested.
        let largest_gap = f64::max(self.gap_min(), self.half_height());
        let required = 4.0 * self.hazard_piece_height + largest_gap;
        if self.playfield_height < required {
            return Err(ConfigError::GapPlacement {
                required,
                available: self.playfield_height,
            });
        }

        if self.horizontal_speed > self.hazard_piece_width {
            return Err(ConfigError::SpeedExceedsHazardWidth {
                speed: self.horizontal_speed,
                width: self.hazard_piece_width,
            });
        }

        Ok(())
    }
}
