//! Gaussian point mutation of controller weights.
//!
//! Mutation visits every weight and bias independently. With probability
//! [`MutationParams::probability`] the entry is replaced by
//! `value + N(0, 1) * scale`; otherwise it is kept as-is. Values are not
//! clamped, so weights are free to drift outside the `[0, 1)` range they are
//! initialized in.
//!
//! Used by [`Genome::mutate`](crate::Genome::mutate).

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Mutation parameters were outside their valid range.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MutationParamsError {
    #[display("mutation probability {value} is outside [0, 1]")]
    Probability { value: f64 },
    #[display("mutation scale {value} is not a finite non-negative number")]
    Scale { value: f64 },
}

/// Controls how strongly offspring differ from their parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationParams {
    /// Probability of perturbing each individual weight or bias.
    pub probability: f64,
    /// Multiplier applied to the standard normal perturbation.
    pub scale: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            probability: 0.1,
            scale: 0.5,
        }
    }
}

impl MutationParams {
    /// Parameters under which mutation is the identity transform.
    pub const NONE: Self = Self {
        probability: 0.0,
        scale: 0.0,
    };

    pub fn validate(&self) -> Result<(), MutationParamsError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(MutationParamsError::Probability {
                value: self.probability,
            });
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(MutationParamsError::Scale { value: self.scale });
        }
        Ok(())
    }

    /// Mutates a single value.
    ///
    /// Out-of-range probabilities are clamped into `[0, 1]` rather than
    /// panicking; [`Self::validate`] is where they get rejected.
    pub fn perturb<R>(&self, value: f64, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(self.probability.clamp(0.0, 1.0)) {
            let noise: f64 = rng.sample(StandardNormal);
            value + noise * self.scale
        } else {
            value
        }
    }
}
