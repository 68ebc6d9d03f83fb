use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;

const EPSILON: f32 = 1e-7;

/// Categorical cross-entropy over one-hot targets, averaged over the batch.
///
/// Expects `y_pred` to hold probabilities, predictions are clipped to
/// `[EPSILON, 1 - EPSILON]` before taking logarithms.
#[derive(Default, Clone, Copy)]
pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    /// Returns a new `CategoricalCrossEntropy`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for CategoricalCrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let rows = y_pred.nrows().max(1) as f32;
        let total = Zip::from(&y_pred)
            .and(&y)
            .fold(0.0, |acc, &p, &t| acc - t * clip(p).ln());

        total / rows
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let rows = y_pred.nrows().max(1) as f32;

        Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&p, &t| -t / (clip(p) * rows))
    }
}

fn clip(p: f32) -> f32 {
    p.clamp(EPSILON, 1. - EPSILON)
}
