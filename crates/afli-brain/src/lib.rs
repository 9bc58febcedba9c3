//! Fixed-topology neural controllers and their heritable genomes.
//!
//! Every agent on the course is driven by a tiny feed-forward network that
//! maps five sensor readings to a binary action (jump or glide). This crate
//! provides the network, the weight data it is built from, and the genetic
//! operators the trainer applies to that data.
//!
//! # Topology
//!
//! ```text
//! sensors (5) ──W1·x + b1──▶ sigmoid ──▶ hidden (8) ──W2·h + b2──▶ sigmoid ──▶ outputs (2)
//! ```
//!
//! The shape is fixed at compile time ([`INPUT_SIZE`], [`HIDDEN_SIZE`],
//! [`OUTPUT_SIZE`]); there is no way to build a controller of another shape.
//! A [`NetworkShape`] read from configuration is checked against it and
//! rejected with [`ShapeError`].
//!
//! # Key Components
//!
//! - [`Matrix`] - Small dense row-major matrix with elementwise `map` and matrix-vector product
//! - [`Genome`] - The `(W1, W2, b1, b2)` tuple; unit of inheritance and mutation
//! - [`NeuralController`] - Pure prediction over a genome
//! - [`MutationParams`] - Per-entry Gaussian perturbation settings
//!
//! # Example
//!
//! ```
//! use afli_brain::{Genome, NeuralController, MutationParams};
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
//! let parent = NeuralController::new(Genome::random(&mut rng));
//!
//! let child_genome = parent.genome().duplicate().mutate(&MutationParams::default(), &mut rng);
//! let child = NeuralController::new(child_genome);
//!
//! let action = child.decide(&[120.0, 300.0, 280.0, 150.0, 90.0]);
//! assert!(action.is_jump() || action.is_glide());
//! ```

use serde::{Deserialize, Serialize};

pub use self::{controller::*, genome::*, matrix::*, mutation::*};

mod controller;
mod genome;
mod matrix;
mod mutation;

/// Number of sensor readings fed to a controller.
pub const INPUT_SIZE: usize = 5;
/// Number of hidden units.
pub const HIDDEN_SIZE: usize = 8;
/// Number of output units. Output 0 votes for jumping, output 1 against.
pub const OUTPUT_SIZE: usize = 2;

/// Sensor vector consumed by [`NeuralController::predict`].
pub type SensorVector = [f64; INPUT_SIZE];

/// Raw output activations produced by [`NeuralController::predict`].
pub type ActionVector = [f64; OUTPUT_SIZE];

/// A requested layer size does not match the fixed controller topology.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{what} has size {actual}, expected {expected}")]
pub struct ShapeError {
    pub what: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl ShapeError {
    pub(crate) fn check(what: &'static str, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self {
                what,
                expected,
                actual,
            })
        }
    }
}

/// Layer sizes requested by a run configuration.
///
/// Only the compiled-in topology is supported; anything else is a
/// configuration error at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkShape {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Default for NetworkShape {
    fn default() -> Self {
        Self {
            inputs: INPUT_SIZE,
            hidden: HIDDEN_SIZE,
            outputs: OUTPUT_SIZE,
        }
    }
}

impl NetworkShape {
    pub fn validate(&self) -> Result<(), ShapeError> {
        ShapeError::check("sensor vector", INPUT_SIZE, self.inputs)?;
        ShapeError::check("hidden layer", HIDDEN_SIZE, self.hidden)?;
        ShapeError::check("action vector", OUTPUT_SIZE, self.outputs)?;
        Ok(())
    }
}
