use ndarray::ArrayView2;

use super::{Model, layers::Layer, loss::LossFn};
use crate::{MlErr, Result, metrics::MetricTally, optimization::Optimizer, specs::ModelSpec};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Returns the specification this model can be rebuilt from.
    pub fn spec(&self) -> ModelSpec {
        ModelSpec::Sequential {
            layers: self.layers.iter().map(Layer::spec).collect(),
        }
    }

    fn check_size(&self, what: &'static str, got: usize) -> Result<()> {
        let expected = self.size();

        if got != expected {
            return Err(MlErr::SizeMismatch {
                what,
                got,
                expected,
            });
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn forward<'a>(
        &'a mut self,
        params: &[f32],
        mut x: ArrayView2<'a, f32>,
    ) -> Result<ArrayView2<'a, f32>> {
        self.check_size("parameters", params.len())?;
        let mut rest = params;

        for layer in self.layers.iter_mut() {
            let (head, tail) = rest.split_at(layer.size());
            rest = tail;
            x = layer.forward(head, x)?;
        }

        Ok(x)
    }

    // NOTE: the epoch loss is approximated by averaging the loss of each batch, it is not
    // recomputed with the final parameters.
    fn backprop<'a, L, O, I>(
        &mut self,
        params: &mut [f32],
        grad: &mut [f32],
        loss_fn: &L,
        optimizer: &mut O,
        metrics: &mut [MetricTally],
        batches: I,
    ) -> Result<f32>
    where
        L: LossFn + ?Sized,
        O: Optimizer + ?Sized,
        I: Iterator<Item = (ArrayView2<'a, f32>, ArrayView2<'a, f32>)>,
    {
        self.check_size("gradient", grad.len())?;
        let mut total_loss = 0.0;
        let mut num_batches = 0;

        for (x, y) in batches {
            let y_pred = self.forward(params, x)?;
            if y_pred.dim() != y.dim() {
                return Err(MlErr::SizeMismatch {
                    what: "targets",
                    got: y.ncols(),
                    expected: y_pred.ncols(),
                });
            }

            total_loss += loss_fn.loss(y_pred, y);
            num_batches += 1;
            metrics.iter_mut().for_each(|m| m.update(y_pred, y));

            let mut d_last = loss_fn.loss_prime(y_pred, y);
            let mut d = d_last.view_mut();
            let mut end = grad.len();

            for layer in self.layers.iter_mut().rev() {
                let start = end - layer.size();
                d = layer.backward(&params[start..end], &mut grad[start..end], d)?;
                end = start;
            }

            optimizer.update_params(params, grad)?;
        }

        Ok(total_loss / num_batches.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use ndarray::array;

    use super::*;
    use crate::{
        arch::{activations::ActFn, loss::Mse},
        dataset::Dataset,
        optimization::GradientDescent,
        specs::MetricSpec,
    };

    #[test]
    fn forward_chains_layers() {
        let mut model = Sequential::new([Layer::dense((2, 1), None), Layer::dense((1, 1), None)]);
        // first: w = [1, 1], b = 0; second: w = [2], b = 1
        let params = [1., 1., 0., 2., 1.];
        let x = array![[1., 2.]];

        let y = model.forward(&params, x.view()).unwrap();

        assert_eq!(y, array![[7.]]);
    }

    #[test]
    fn wrong_parameter_count_is_an_error() {
        let mut model = Sequential::new([Layer::dense((2, 1), None)]);
        let x = array![[1., 2.]];

        assert!(model.forward(&[1., 1.], x.view()).is_err());
    }

    #[test]
    fn learns_the_and_gate() {
        #[rustfmt::skip]
        let and2 = vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,
            1.0, 1.0, 1.0,
        ];
        let dataset = Dataset::new(and2, 2, 1).unwrap();

        let mut model = Sequential::new([
            Layer::dense((2, 3), Some(ActFn::sigmoid(1.))),
            Layer::dense((3, 1), Some(ActFn::sigmoid(1.))),
        ]);
        let mut params: Vec<f32> = (0..model.size()).map(|i| (i as f32 * 0.37).sin()).collect();
        let mut grad = vec![0.; model.size()];
        let mut optimizer = GradientDescent::new(2.);
        let mut metrics = [MetricTally::new(MetricSpec::Accuracy)];
        let batch_size = NonZeroUsize::new(4).unwrap();

        let mut first = None;
        let mut last = 0.;
        let mut accuracy = 0.;
        for _ in 0..5000 {
            let batches = dataset.batches(batch_size).unwrap();
            last = model
                .backprop(&mut params, &mut grad, &Mse, &mut optimizer, &mut metrics, batches)
                .unwrap();
            first.get_or_insert(last);
            accuracy = metrics[0].take();
        }

        assert!(last < first.unwrap() / 10., "{first:?} -> {last}");
        assert_eq!(accuracy, 1.0);
    }
}
