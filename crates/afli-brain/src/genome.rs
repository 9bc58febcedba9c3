use rand::Rng;

use crate::{HIDDEN_SIZE, INPUT_SIZE, Matrix, MutationParams, OUTPUT_SIZE};

/// Input-to-hidden weights, one row per hidden unit.
pub type InputHiddenWeights = Matrix<HIDDEN_SIZE, INPUT_SIZE>;
/// Hidden-to-output weights, one row per output unit.
pub type HiddenOutputWeights = Matrix<OUTPUT_SIZE, HIDDEN_SIZE>;

/// Heritable weight and bias data of a [`NeuralController`](crate::NeuralController).
///
/// All storage is inline, so every copy of a genome owns its own values:
/// [`Self::duplicate`] and [`Self::mutate`] can never alias their source.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    input_hidden: InputHiddenWeights,
    hidden_output: HiddenOutputWeights,
    hidden_bias: [f64; HIDDEN_SIZE],
    output_bias: [f64; OUTPUT_SIZE],
}

impl Genome {
    /// Total number of weights and biases in a genome.
    pub const PARAMETER_COUNT: usize =
        HIDDEN_SIZE * INPUT_SIZE + OUTPUT_SIZE * HIDDEN_SIZE + HIDDEN_SIZE + OUTPUT_SIZE;

    #[must_use]
    pub const fn new(
        input_hidden: InputHiddenWeights,
        hidden_output: HiddenOutputWeights,
        hidden_bias: [f64; HIDDEN_SIZE],
        output_bias: [f64; OUTPUT_SIZE],
    ) -> Self {
        Self {
            input_hidden,
            hidden_output,
            hidden_bias,
            output_bias,
        }
    }

    /// Creates a genome with every entry drawn independently from `U[0, 1)`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            input_hidden: Matrix::from_fn(|_, _| rng.random()),
            hidden_output: Matrix::from_fn(|_, _| rng.random()),
            hidden_bias: std::array::from_fn(|_| rng.random()),
            output_bias: std::array::from_fn(|_| rng.random()),
        }
    }

    #[must_use]
    pub fn input_hidden(&self) -> &InputHiddenWeights {
        &self.input_hidden
    }

    #[must_use]
    pub fn hidden_output(&self) -> &HiddenOutputWeights {
        &self.hidden_output
    }

    #[must_use]
    pub fn hidden_bias(&self) -> &[f64; HIDDEN_SIZE] {
        &self.hidden_bias
    }

    #[must_use]
    pub fn output_bias(&self) -> &[f64; OUTPUT_SIZE] {
        &self.output_bias
    }

    /// Returns an independent copy of this genome.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Returns a mutated copy of this genome, leaving `self` untouched.
    ///
    /// Entries are visited in a fixed order (W1, W2, b1, b2, each row-major),
    /// so a seeded RNG gives reproducible offspring.
    #[must_use]
    pub fn mutate<R>(&self, params: &MutationParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            input_hidden: self.input_hidden.map(|v| params.perturb(v, rng)),
            hidden_output: self.hidden_output.map(|v| params.perturb(v, rng)),
            hidden_bias: self.hidden_bias.map(|v| params.perturb(v, rng)),
            output_bias: self.output_bias.map(|v| params.perturb(v, rng)),
        }
    }

    /// Iterates over every parameter in mutation order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.input_hidden
            .values()
            .chain(self.hidden_output.values())
            .chain(self.hidden_bias.iter().copied())
            .chain(self.output_bias.iter().copied())
    }
}
