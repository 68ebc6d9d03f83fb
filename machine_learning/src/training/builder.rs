use rand::{SeedableRng, rngs::StdRng};

use super::{ModelTrainer, Trainer};
use crate::{
    MlErr, Result,
    arch::loss::{CategoricalCrossEntropy, LossFn, Mse},
    metrics::MetricTally,
    optimization::{Adam, GradientDescent, GradientDescentWithMomentum, Optimizer, RmsProp},
    specs::{CompileSpec, LossFnSpec, OptimizerSpec},
};

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Trainer` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The compile settings for the trainer.
    /// * `num_params` - The amount of parameters of the network it will fit.
    /// * `seed` - Seed for shuffling the dataset, OS randomness is used if absent.
    ///
    /// # Errors
    /// Returns `MlErr::InvalidHyperparameter` if any of the optimizer's values are out of range.
    pub fn build(
        &self,
        spec: &CompileSpec,
        num_params: usize,
        seed: Option<u64>,
    ) -> Result<Box<dyn Trainer>> {
        self.resolve_optimizer(spec, num_params, seed)
    }

    fn resolve_optimizer(
        &self,
        spec: &CompileSpec,
        num_params: usize,
        seed: Option<u64>,
    ) -> Result<Box<dyn Trainer>> {
        match spec.optimizer {
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => {
                check_learning_rate(learning_rate)?;
                check_unit("beta1", beta1)?;
                check_unit("beta2", beta2)?;
                check_positive("epsilon", epsilon)?;
                let optimizer = Adam::new(num_params, learning_rate, beta1, beta2, epsilon);
                self.resolve_loss(spec, num_params, seed, optimizer)
            }
            OptimizerSpec::GradientDescent { learning_rate } => {
                check_learning_rate(learning_rate)?;
                let optimizer = GradientDescent::new(learning_rate);
                self.resolve_loss(spec, num_params, seed, optimizer)
            }
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate,
                momentum,
            } => {
                check_learning_rate(learning_rate)?;
                check_unit("momentum", momentum)?;
                let optimizer =
                    GradientDescentWithMomentum::new(num_params, learning_rate, momentum);
                self.resolve_loss(spec, num_params, seed, optimizer)
            }
            OptimizerSpec::RmsProp {
                learning_rate,
                rho,
                epsilon,
            } => {
                check_learning_rate(learning_rate)?;
                check_unit("rho", rho)?;
                check_positive("epsilon", epsilon)?;
                let optimizer = RmsProp::new(num_params, learning_rate, rho, epsilon);
                self.resolve_loss(spec, num_params, seed, optimizer)
            }
        }
    }

    fn resolve_loss<O>(
        &self,
        spec: &CompileSpec,
        num_params: usize,
        seed: Option<u64>,
        optimizer: O,
    ) -> Result<Box<dyn Trainer>>
    where
        O: Optimizer + Send + 'static,
    {
        match spec.loss {
            LossFnSpec::Mse => {
                let loss = Mse::new();
                Ok(self.terminate_build(spec, num_params, seed, optimizer, loss))
            }
            LossFnSpec::CategoricalCrossEntropy => {
                let loss = CategoricalCrossEntropy::new();
                Ok(self.terminate_build(spec, num_params, seed, optimizer, loss))
            }
        }
    }

    fn terminate_build<O, L>(
        &self,
        spec: &CompileSpec,
        num_params: usize,
        seed: Option<u64>,
        optimizer: O,
        loss: L,
    ) -> Box<dyn Trainer>
    where
        O: Optimizer + Send + 'static,
        L: LossFn + Send + 'static,
    {
        let metrics = spec.metrics.iter().copied().map(MetricTally::new).collect();
        let rng = self.generate_rng(seed);

        let trainer = ModelTrainer::new(
            num_params,
            optimizer,
            loss,
            metrics,
            spec.epochs,
            spec.batch_size,
            spec.shuffle,
            rng,
        );

        Box::new(trainer)
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn check_learning_rate(value: f32) -> Result<()> {
    check_positive("learning_rate", value)
}

fn check_positive(what: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MlErr::InvalidHyperparameter { what, value });
    }

    Ok(())
}

/// Checks `value` lies in `[0, 1)`.
fn check_unit(what: &'static str, value: f32) -> Result<()> {
    if !(0.0..1.0).contains(&value) {
        return Err(MlErr::InvalidHyperparameter { what, value });
    }

    Ok(())
}
