use rand::Rng;

use crate::{
    ActionVector, Genome, SensorVector,
    matrix::{add_vec, map_vec},
};

/// Logistic activation `1 / (1 + e^-x)`.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Binary decision produced by a controller for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Action {
    Jump,
    Glide,
}

impl Action {
    /// Interprets raw output activations: jump iff `output[0] > output[1]`.
    #[must_use]
    pub fn from_outputs(outputs: &ActionVector) -> Self {
        if outputs[0] > outputs[1] {
            Self::Jump
        } else {
            Self::Glide
        }
    }
}

/// Feed-forward controller with one sigmoid hidden layer.
///
/// Prediction is a pure function of the genome and the sensor vector.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralController {
    genome: Genome,
}

impl From<Genome> for NeuralController {
    fn from(genome: Genome) -> Self {
        Self::new(genome)
    }
}

impl NeuralController {
    #[must_use]
    pub const fn new(genome: Genome) -> Self {
        Self { genome }
    }

    /// Creates a controller with uniformly random weights in `[0, 1)`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(Genome::random(rng))
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    #[must_use]
    pub fn into_genome(self) -> Genome {
        self.genome
    }

    /// Computes `sigmoid(W2 · sigmoid(W1 · x + b1) + b2)`.
    #[must_use]
    pub fn predict(&self, sensors: &SensorVector) -> ActionVector {
        let g = &self.genome;
        let hidden = map_vec(
            &add_vec(&g.input_hidden().mul_vec(sensors), g.hidden_bias()),
            sigmoid,
        );
        map_vec(
            &add_vec(&g.hidden_output().mul_vec(&hidden), g.output_bias()),
            sigmoid,
        )
    }

    #[must_use]
    pub fn decide(&self, sensors: &SensorVector) -> Action {
        Action::from_outputs(&self.predict(sensors))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{HIDDEN_SIZE, Matrix, OUTPUT_SIZE};

    fn constant_genome(w1: f64, w2: f64, b1: f64, b2: [f64; OUTPUT_SIZE]) -> Genome {
        Genome::new(
            Matrix::from_fn(|_, _| w1),
            Matrix::from_fn(|_, _| w2),
            [b1; HIDDEN_SIZE],
            b2,
        )
    }

    #[test]
    fn test_sigmoid_values() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
    }

    #[test]
    fn test_zero_weights_yield_half_activations() {
        let controller = NeuralController::new(constant_genome(0.0, 0.0, 0.0, [0.0, 0.0]));
        let out = controller.predict(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((out[0] - 0.5).abs() < 1e-12);
        assert!((out[1] - 0.5).abs() < 1e-12);
        // ties never jump
        assert!(controller.decide(&[0.0; 5]).is_glide());
    }

    #[test]
    fn test_predict_uses_dot_product() {
        // hidden_i = sigmoid(sum(x) * 1.0) for all i; sum(x) = 0 => hidden = 0.5
        // output_j = sigmoid(8 * 0.5 * 1.0 + b2_j)
        let controller = NeuralController::new(constant_genome(1.0, 1.0, 0.0, [0.0, -4.0]));
        let out = controller.predict(&[1.0, -1.0, 2.0, -2.0, 0.0]);
        assert!((out[0] - sigmoid(4.0)).abs() < 1e-12);
        assert!((out[1] - sigmoid(0.0)).abs() < 1e-12);
        assert!(controller.decide(&[1.0, -1.0, 2.0, -2.0, 0.0]).is_jump());
    }

    #[test]
    fn test_output_bias_forces_decision() {
        let jumper = NeuralController::new(constant_genome(0.0, 0.0, 0.0, [1.0, 0.0]));
        let glider = NeuralController::new(constant_genome(0.0, 0.0, 0.0, [0.0, 1.0]));
        for sensors in [[0.0; 5], [500.0, -30.0, 12.0, 8.0, 1e6]] {
            assert_eq!(jumper.decide(&sensors), Action::Jump);
            assert_eq!(glider.decide(&sensors), Action::Glide);
        }
    }

    #[test]
    fn test_predict_is_pure() {
        let controller = NeuralController::random(&mut Pcg32::seed_from_u64(4));
        let sensors = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(controller.predict(&sensors), controller.predict(&sensors));
    }
}
