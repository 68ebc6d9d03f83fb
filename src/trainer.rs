use std::sync::Arc;

use dataframe::DataFrame;
use log::info;
use machine_learning::{ModelDescriptor, Network};

use crate::{
    EnsembleErr, Result,
    config::{EnsembleConfig, InitialWeights},
    result::TrainingResult,
    worker::EnsembleWorker,
};

/// Fits something on a dataframe.
pub trait Trainer {
    type Output;

    fn train(&self, df: &DataFrame) -> Result<Self::Output>;
}

/// Trains `num_models` independent replicas of a model, one per partition of the data.
///
/// No averaging nor ranking happens here, combining the replicas is up to the caller.
#[derive(Debug, Clone)]
pub struct EnsembleTrainer {
    descriptor: Arc<str>,
    config: EnsembleConfig,
}

impl EnsembleTrainer {
    /// Creates a new `EnsembleTrainer` for `network`.
    ///
    /// Under `InitialWeights::PerReplica` only the architecture is shipped to the workers.
    pub fn new(network: &Network, config: EnsembleConfig) -> Result<Self> {
        let descriptor = match config.initial_weights {
            InitialWeights::PerReplica => network.architecture_json(),
            InitialWeights::Shared => network.to_json(),
        }
        .map_err(EnsembleErr::Descriptor)?;

        Self::from_descriptor(descriptor, config)
    }

    /// Creates a new `EnsembleTrainer` from an already serialized model.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the descriptor can't be parsed.
    pub fn from_descriptor(descriptor: impl Into<Arc<str>>, config: EnsembleConfig) -> Result<Self> {
        config.validate()?;

        let descriptor = descriptor.into();
        ModelDescriptor::from_json(&descriptor).map_err(EnsembleErr::Descriptor)?;

        Ok(Self { descriptor, config })
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }
}

impl Trainer for EnsembleTrainer {
    type Output = Vec<TrainingResult>;

    /// Repartitions `df` into `num_models` shards and trains a replica on each, blocking until
    /// all of them are done.
    ///
    /// # Errors
    /// * `EnsembleErr::EmptyDataset` if `df` has no rows.
    /// * `EnsembleErr::InvalidConfig` if there are fewer rows than replicas.
    /// * `EnsembleErr::TaskFailed` as soon as one replica runs out of attempts, no partial
    ///   results are returned.
    fn train(&self, df: &DataFrame) -> Result<Vec<TrainingResult>> {
        let num_models = self.config.num_models;
        let count = df.count();

        if count == 0 {
            return Err(EnsembleErr::EmptyDataset);
        }

        if count < num_models.get() {
            return Err(EnsembleErr::InvalidConfig(format!(
                "{count} record(s) can't feed {num_models} replicas"
            )));
        }

        info!(replicas = num_models.get(), records = count; "training ensemble");

        let shards = df.repartition(num_models);
        let worker = EnsembleWorker::new(Arc::clone(&self.descriptor), &self.config);
        let results = shards.run_job(|partition| worker.train(partition))?;

        info!(replicas = results.len(); "ensemble trained");
        Ok(results)
    }
}
