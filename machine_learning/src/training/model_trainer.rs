use std::num::NonZeroUsize;

use log::debug;
use rand::Rng;

use super::{EpochStats, History, Trainer};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn},
    dataset::Dataset,
    descriptor::Network,
    metrics::MetricTally,
    optimization::Optimizer,
};

/// A model `Trainer`. Contains the relevant components needed for training a model, except for
/// the model itself.
pub struct ModelTrainer<O, L, R>
where
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    optimizer: O,
    loss_fn: L,
    metrics: Vec<MetricTally>,
    grad: Vec<f32>,

    epochs: NonZeroUsize,
    batch_size: NonZeroUsize,
    shuffle: bool,
    rng: R,
}

impl<O, L, R> ModelTrainer<O, L, R>
where
    O: Optimizer,
    L: LossFn,
    R: Rng,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `num_params` - The amount of parameters of the models it will train.
    /// * `optimizer` - The optimizer used to update the parameters after each batch.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `metrics` - The metrics to track on every epoch.
    /// * `epochs` - The amount of passes over the dataset per `fit` call.
    /// * `batch_size` - The maximum amount of samples per batch.
    /// * `shuffle` - Whether to shuffle the dataset before every epoch.
    /// * `rng` - A random number generator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_params: usize,
        optimizer: O,
        loss_fn: L,
        metrics: Vec<MetricTally>,
        epochs: NonZeroUsize,
        batch_size: NonZeroUsize,
        shuffle: bool,
        rng: R,
    ) -> Self {
        Self {
            optimizer,
            loss_fn,
            metrics,
            grad: vec![0.0; num_params],
            epochs,
            batch_size,
            shuffle,
            rng,
        }
    }

    fn check_shapes(&self, network: &Network, dataset: &Dataset) -> Result<()> {
        if dataset.x_size() != network.input_size() {
            return Err(MlErr::SizeMismatch {
                what: "features",
                got: dataset.x_size(),
                expected: network.input_size(),
            });
        }

        if dataset.y_size() != network.output_size() {
            return Err(MlErr::SizeMismatch {
                what: "labels",
                got: dataset.y_size(),
                expected: network.output_size(),
            });
        }

        Ok(())
    }
}

impl<O, L, R> Trainer for ModelTrainer<O, L, R>
where
    O: Optimizer + Send,
    L: LossFn + Send,
    R: Rng + Send,
{
    fn fit(&mut self, network: &mut Network, dataset: &mut Dataset) -> Result<History> {
        if dataset.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        self.check_shapes(network, dataset)?;

        let (model, params) = network.parts_mut();
        let mut history = History::default();

        for epoch in 1..=self.epochs.get() {
            if self.shuffle {
                dataset.shuffle(&mut self.rng);
            }

            let batches = dataset.batches(self.batch_size)?;
            let loss = model.backprop(
                params,
                &mut self.grad,
                &self.loss_fn,
                &mut self.optimizer,
                &mut self.metrics,
                batches,
            )?;

            let metrics = self
                .metrics
                .iter_mut()
                .map(|m| (m.name().to_string(), m.take()))
                .collect();

            debug!(epoch = epoch, loss = loss; "epoch finished");

            history.push(EpochStats {
                epoch,
                loss,
                metrics,
                samples: dataset.len(),
            });
        }

        Ok(history)
    }
}
