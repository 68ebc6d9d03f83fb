use std::num::NonZeroUsize;

use dataframe::EngineConfig;
use machine_learning::specs::{CompileSpec, ModelSpec};
use serde::{Deserialize, Serialize};

use crate::{EnsembleErr, Result, ingest::MalformedPolicy};

const DEFAULT_NUM_MODELS: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// Where the replicas' initial weights come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialWeights {
    /// Only the architecture is shipped, each replica initializes its own weights.
    #[default]
    PerReplica,
    /// Every replica starts from the controller's weights.
    Shared,
}

/// The configuration of an `EnsembleTrainer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Amount of replicas, and so of partitions, to train.
    pub num_models: NonZeroUsize,
    pub features_col: String,
    pub label_col: String,
    pub compile: CompileSpec,
    pub on_malformed: MalformedPolicy,
    pub initial_weights: InitialWeights,
    /// Base seed, replica `i` uses `seed + i`. OS randomness is used if absent.
    pub seed: Option<u64>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            num_models: DEFAULT_NUM_MODELS,
            features_col: "features".to_string(),
            label_col: "label".to_string(),
            compile: CompileSpec::default(),
            on_malformed: MalformedPolicy::default(),
            initial_weights: InitialWeights::default(),
            seed: None,
        }
    }
}

impl EnsembleConfig {
    pub fn new(num_models: NonZeroUsize) -> Self {
        Self {
            num_models,
            ..Default::default()
        }
    }

    /// Checks the configuration makes sense before anything gets dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.features_col.is_empty() || self.label_col.is_empty() {
            return Err(EnsembleErr::InvalidConfig(
                "feature and label columns must be named".into(),
            ));
        }

        if self.features_col == self.label_col {
            return Err(EnsembleErr::InvalidConfig(format!(
                "features and labels can't both come from {:?}",
                self.features_col
            )));
        }

        Ok(())
    }

    /// The seed for a given replica.
    pub fn replica_seed(&self, partition: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(partition as u64))
    }
}

/// Label vectorization applied before training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizeConfig {
    pub input_col: String,
    pub output_col: String,
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            input_col: crate::transformer::DEFAULT_LABEL_COL.to_string(),
            output_col: crate::transformer::DEFAULT_VECTORIZED_COL.to_string(),
        }
    }
}

/// Everything the `ensemble` binary needs to run a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub model: ModelSpec,
    #[serde(default)]
    pub ensemble: EnsembleConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    /// When present, labels are one-hot encoded first and training reads `output_col`.
    #[serde(default)]
    pub vectorize: Option<VectorizeConfig>,
}

impl JobConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EnsembleErr::InvalidConfig(e.to_string()))
    }
}
