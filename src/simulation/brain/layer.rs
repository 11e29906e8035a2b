//! Fully connected tanh layer.

use ndarray::{Array, Array1, Array2, Dimension, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

/// Uniform noise in `[-amplitude, amplitude)` with the given shape.
fn noise<D: Dimension>(shape: D, amplitude: f32) -> Array<f32, D> {
    Array::random(shape, Uniform::new(-amplitude, amplitude))
}

/// `weight_a · a + (1 - weight_a) · b`, element-wise.
fn lerp<D: Dimension>(a: &Array<f32, D>, b: &Array<f32, D>, weight_a: f32) -> Array<f32, D> {
    let weight_b = 1.0 - weight_a;
    let mut mixed = a.clone();
    Zip::from(&mut mixed)
        .and(b)
        .for_each(|x, &y| *x = *x * weight_a + y * weight_b);
    mixed
}

/// One dense layer: `tanh(W·x + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Rows map to outputs, columns to inputs.
    pub weights: Array2<f32>,
    /// One bias per output.
    pub biases: Array1<f32>,
}

impl Layer {
    /// Draws every parameter from `[-scale, scale)`.
    pub fn random(inputs: usize, outputs: usize, scale: f32) -> Self {
        Self {
            weights: noise(ndarray::Ix2(outputs, inputs), scale),
            biases: noise(ndarray::Ix1(outputs), scale),
        }
    }

    /// Width of the input vector.
    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Width of the output vector.
    pub fn outputs(&self) -> usize {
        self.weights.nrows()
    }

    /// Activations for `x`.
    #[inline]
    pub fn forward(&self, x: &Array1<f32>) -> Array1<f32> {
        (self.weights.dot(x) + &self.biases).mapv(f32::tanh)
    }

    /// Perturbs every parameter by uniform noise of the given amplitude.
    pub fn perturb(&mut self, amplitude: f32) {
        if amplitude <= 0.0 {
            return;
        }
        self.weights += &noise(self.weights.raw_dim(), amplitude);
        self.biases += &noise(self.biases.raw_dim(), amplitude);
    }

    /// Element-wise blend of two layers of equal shape.
    pub fn blend(a: &Layer, b: &Layer, weight_a: f32) -> Self {
        Self {
            weights: lerp(&a.weights, &b.weights, weight_a),
            biases: lerp(&a.biases, &b.biases, weight_a),
        }
    }
}
