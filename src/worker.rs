use std::sync::Arc;

use dataframe::{Partition, Row, Value};
use log::{debug, info};
use machine_learning::{Dataset, Network, TrainerBuilder};

use crate::{
    EnsembleErr, Result,
    config::EnsembleConfig,
    ingest::IngestReport,
    result::TrainingResult,
    vectorize::to_vector,
};

/// Trains one model replica on one partition.
///
/// The worker holds no state across partitions: every call to `train` decodes its own copy of
/// the model.
#[derive(Debug, Clone)]
pub struct EnsembleWorker {
    descriptor: Arc<str>,
    config: EnsembleConfig,
}

/// A partition's records, flattened into parallel feature and label buffers.
struct Columns {
    x: Vec<f32>,
    y: Vec<f32>,
    x_size: usize,
    y_size: usize,
}

impl EnsembleWorker {
    /// Creates a new `EnsembleWorker`.
    ///
    /// # Arguments
    /// * `descriptor` - The shared initial model descriptor.
    /// * `config` - The ensemble's configuration.
    pub fn new(descriptor: Arc<str>, config: &EnsembleConfig) -> Self {
        Self {
            descriptor,
            config: config.clone(),
        }
    }

    /// Decodes the model, fits it on the partition and serializes the result.
    ///
    /// # Errors
    /// * `EnsembleErr::Descriptor` if the model can't be decoded or encoded back.
    /// * `EnsembleErr::MalformedRecord` on a bad record under `MalformedPolicy::Fail`.
    /// * `EnsembleErr::EmptyPartition` if no record is usable.
    /// * `EnsembleErr::Fit` if training fails.
    pub fn train(&self, partition: &Partition) -> Result<TrainingResult> {
        let seed = self.config.replica_seed(partition.id());
        let mut network =
            Network::from_json(&self.descriptor, seed).map_err(EnsembleErr::Descriptor)?;

        let (columns, ingest) =
            self.drain(partition, network.input_size(), network.output_size())?;
        debug!(
            partition = partition.id(),
            ingested = ingest.ingested,
            skipped = ingest.skipped_count();
            "partition drained"
        );

        let mut dataset = Dataset::from_columns(
            &columns.x,
            &columns.y,
            columns.x_size,
            columns.y_size,
        )
        .map_err(EnsembleErr::Fit)?;

        let mut trainer = TrainerBuilder::new()
            .build(&self.config.compile, network.spec().size(), seed)
            .map_err(EnsembleErr::Fit)?;

        let history = trainer
            .fit(&mut network, &mut dataset)
            .map_err(EnsembleErr::Fit)?;

        let model = network.to_json().map_err(EnsembleErr::Descriptor)?;

        info!(
            partition = partition.id(),
            samples = dataset.len(),
            loss = history.last().map_or(f32::NAN, |e| e.loss);
            "replica trained"
        );

        Ok(TrainingResult {
            partition: partition.id(),
            history,
            model,
            ingest,
        })
    }

    /// Collects every usable record of the partition.
    ///
    /// A record is usable when its widths match the model's input and output sizes.
    fn drain(
        &self,
        partition: &Partition,
        x_size: usize,
        y_size: usize,
    ) -> Result<(Columns, IngestReport)> {
        let mut report = IngestReport::default();
        let mut columns = Columns {
            x: Vec::new(),
            y: Vec::new(),
            x_size,
            y_size,
        };

        for (position, row) in partition.rows().iter().enumerate() {
            let reason = match self.extract(row, y_size) {
                Ok((x, y)) if x.len() == x_size && y.len() == y_size => {
                    columns.push(&x, &y);
                    report.ingested += 1;
                    continue;
                }
                Ok((x, y)) => format!(
                    "expected {x_size} features and {y_size} labels, got {} and {}",
                    x.len(),
                    y.len()
                ),
                Err(reason) => reason,
            };

            self.config
                .on_malformed
                .handle(&mut report, partition.id(), position, reason)?;
        }

        if report.ingested == 0 {
            return Err(EnsembleErr::EmptyPartition(partition.id()));
        }

        Ok((columns, report))
    }

    /// Reads the features and labels of a record.
    ///
    /// Labels may be stored as a vector or as a class index, which gets one-hot encoded.
    fn extract(
        &self,
        row: &Row,
        n_classes: usize,
    ) -> std::result::Result<(Vec<f64>, Vec<f64>), String> {
        let field = |name: &str| {
            row.get(name)
                .ok_or_else(|| format!("missing field {name:?}"))
        };

        let features = match field(&self.config.features_col)? {
            Value::Vector(v) if !v.is_empty() => v.clone(),
            other => {
                return Err(format!(
                    "field {:?} must be a non empty vector, got {}",
                    self.config.features_col,
                    other.type_name()
                ));
            }
        };

        let labels = match field(&self.config.label_col)? {
            Value::Vector(v) if !v.is_empty() => v.clone(),
            other => {
                let index = other.as_index().ok_or_else(|| {
                    format!(
                        "field {:?} must be a vector or a class index, got {}",
                        self.config.label_col,
                        other.type_name()
                    )
                })?;
                to_vector(index, n_classes).map_err(|e| e.to_string())?
            }
        };

        Ok((features, labels))
    }
}

impl Columns {
    fn push(&mut self, x: &[f64], y: &[f64]) {
        self.x.extend(x.iter().map(|&v| v as f32));
        self.y.extend(y.iter().map(|&v| v as f32));
    }
}
