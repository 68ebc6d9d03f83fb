use machine_learning::{History, Network};
use serde::{Deserialize, Serialize};

use crate::{EnsembleErr, Result, ingest::IngestReport};

/// What a replica's training produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// The partition the replica was trained on.
    pub partition: usize,
    pub history: History,
    /// The trained model's full descriptor, weights included.
    pub model: String,
    pub ingest: IngestReport,
}

impl TrainingResult {
    /// Decodes the trained model.
    pub fn decode(&self) -> Result<Network> {
        Network::from_json(&self.model, None).map_err(EnsembleErr::Descriptor)
    }
}
