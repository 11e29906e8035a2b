//! Neural network brains that drive the cars.
//!
//! A brain is a stack of dense [`Layer`]s. It reads the seven sensor
//! distances, scaled towards `[0, 1]`, and scores the four actions.

use ndarray::Array1;

pub mod layer;

pub use layer::Layer;

use super::controller::{Controller, Observations};

/// Feed-forward genome evolved by [`super::evolution::EvolutionEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    /// Layers from sensors to action scores.
    pub layers: Vec<Layer>,
    /// Multiplier applied to raw sensor distances.
    pub input_scale: f32,
}

impl Brain {
    /// Random brain with the given layer widths, input first.
    ///
    /// `input_scale` is usually `1 / sensor_range`.
    pub fn new(layer_sizes: &[usize], scale: f32, input_scale: f32) -> Self {
        Self {
            layers: layer_sizes
                .windows(2)
                .map(|w| Layer::random(w[0], w[1], scale))
                .collect(),
            input_scale,
        }
    }

    /// Forward pass through every layer.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        self.layers
            .iter()
            .fold(inputs.clone(), |activations, layer| layer.forward(&activations))
    }

    /// Child whose parameters are `weight1 · parent1 + (1 - weight1) · parent2`.
    ///
    /// Parents of different shapes cannot be blended; the child is then a
    /// copy of `parent1`.
    pub fn crossover(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        if parent1.layer_sizes() != parent2.layer_sizes() {
            return parent1.clone();
        }
        Self {
            layers: parent1
                .layers
                .iter()
                .zip(&parent2.layers)
                .map(|(a, b)| Layer::blend(a, b, weight1))
                .collect(),
            input_scale: parent1.input_scale,
        }
    }

    /// Adds uniform noise of amplitude `mutation_scale` to every parameter.
    pub fn mutate(&mut self, mutation_scale: f32) {
        self.layers
            .iter_mut()
            .for_each(|layer| layer.perturb(mutation_scale));
    }

    /// Layer widths, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers
            .first()
            .map(Layer::inputs)
            .into_iter()
            .chain(self.layers.iter().map(Layer::outputs))
            .collect()
    }
}

impl Controller for Brain {
    fn act(&self, observations: &Observations) -> Vec<f32> {
        let inputs = Array1::from_iter(observations.iter().map(|&d| d as f32 * self.input_scale));
        self.think(&inputs).to_vec()
    }
}
