use ndarray::{Array2, ArrayView2};

/// A differentiable measure of how far a batch of predictions is from its targets.
pub trait LossFn {
    /// The loss of a batch, both arguments hold one sample per row.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;

    /// The derivative of `loss` with respect to every prediction.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;
}
