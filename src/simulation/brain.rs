//! Neural network implementation for agent brains.
//!
//! A fixed-topology feedforward network (inputs -> hidden -> output) with
//! tanh hidden activation and a sigmoid output. Supports the two genetic
//! operators used by the evolution step: deep copy (via [`Clone`]) and
//! per-parameter Gaussian mutation.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single dense layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    /// Creates a new layer with weights and biases uniform in [-1, 1].
    pub fn new_random(input_size: usize, output_size: usize, rng: &mut impl Rng) -> Self {
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new_inclusive(-1.0, 1.0),
                rng,
            ),
            biases: Array1::random_using(output_size, Uniform::new_inclusive(-1.0, 1.0), rng),
        }
    }

    /// Weighted sum plus bias, no activation.
    #[inline]
    fn affine(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output
    }

    /// Perturbs each weight and bias independently with probability `rate`
    /// by a zero-mean Gaussian scaled by `amount`. No parameter is exempt.
    pub fn mutate(&mut self, rng: &mut impl Rng, rate: f32, amount: f32) {
        for weight in &mut self.weights {
            if rng.gen_range(0.0..1.0f32) < rate {
                *weight += gaussian(rng) * amount;
            }
        }
        for bias in &mut self.biases {
            if rng.gen_range(0.0..1.0f32) < rate {
                *bias += gaussian(rng) * amount;
            }
        }
    }
}

/// The genome of one agent: the full parameter set of its network, plus a
/// cache of the most recent activations.
///
/// The cache is written by [`Brain::predict`] and read only through
/// [`Brain::snapshot`]; the algorithm itself never consumes it. Cloning a
/// brain duplicates all backing storage, so a clone and its source can be
/// mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    /// Input -> hidden layer (tanh activation).
    pub hidden: Layer,
    /// Hidden -> output layer (sigmoid activation).
    pub output: Layer,
    last_inputs: Array1<f32>,
    last_hidden: Array1<f32>,
    last_outputs: Array1<f32>,
}

impl Brain {
    /// Creates a brain with every weight and bias uniform in [-1, 1].
    pub fn new(
        input_count: usize,
        hidden_count: usize,
        output_count: usize,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            hidden: Layer::new_random(input_count, hidden_count, rng),
            output: Layer::new_random(hidden_count, output_count, rng),
            last_inputs: Array1::zeros(input_count),
            last_hidden: Array1::zeros(hidden_count),
            last_outputs: Array1::zeros(output_count),
        }
    }

    /// Runs a forward pass and returns the output activations.
    ///
    /// Pure in the network parameters and input, except for refreshing the
    /// introspection cache.
    pub fn predict(&mut self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut hidden = self.hidden.affine(inputs);
        hidden.mapv_inplace(f32::tanh);

        let mut output = self.output.affine(&hidden);
        output.mapv_inplace(sigmoid);

        self.last_inputs.clone_from(inputs);
        self.last_hidden = hidden;
        self.last_outputs = output.clone();
        output
    }

    /// Mutates all layers.
    pub fn mutate(&mut self, rng: &mut impl Rng, rate: f32, amount: f32) {
        self.hidden.mutate(rng, rate, amount);
        self.output.mutate(rng, rate, amount);
    }

    /// Returns an immutable copy of the parameters and last activations,
    /// decoupled from the live brain.
    pub fn snapshot(&self) -> BrainSnapshot {
        BrainSnapshot {
            hidden_weights: self.hidden.weights.clone(),
            hidden_biases: self.hidden.biases.clone(),
            output_weights: self.output.weights.clone(),
            output_biases: self.output.biases.clone(),
            last_inputs: self.last_inputs.clone(),
            last_hidden: self.last_hidden.clone(),
            last_outputs: self.last_outputs.clone(),
        }
    }
}

/// A frozen view of one brain, handed to visualization collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainSnapshot {
    /// Input -> hidden weights (`hidden_count` × `input_count`).
    pub hidden_weights: Array2<f32>,
    /// Hidden biases.
    pub hidden_biases: Array1<f32>,
    /// Hidden -> output weights (`output_count` × `hidden_count`).
    pub output_weights: Array2<f32>,
    /// Output biases.
    pub output_biases: Array1<f32>,
    /// Input vector of the most recent forward pass.
    pub last_inputs: Array1<f32>,
    /// Hidden activations of the most recent forward pass.
    pub last_hidden: Array1<f32>,
    /// Output activations of the most recent forward pass.
    pub last_outputs: Array1<f32>,
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Standard Gaussian sample via the Box-Muller transform.
///
/// u and v are uniform in (0, 1]; a zero draw is rejected and redrawn.
fn gaussian(rng: &mut impl Rng) -> f32 {
    let u = loop {
        let draw: f32 = rng.gen_range(0.0..1.0);
        if draw > 0.0 {
            break draw;
        }
    };
    let v = loop {
        let draw: f32 = rng.gen_range(0.0..1.0);
        if draw > 0.0 {
            break draw;
        }
    };
    (-2.0 * u.ln()).sqrt() * (2.0 * std::f32::consts::PI * v).cos()
}
