use dataframe::{DataFrame, Partition, Row, Value};
use log::{debug, trace};

use crate::{
    Result,
    ingest::{IngestReport, MalformedPolicy},
    vectorize::to_vector,
};

pub const DEFAULT_LABEL_COL: &str = "label";
pub const DEFAULT_VECTORIZED_COL: &str = "label_vectorized";

/// Maps a dataframe into another one.
pub trait Transformer {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;
}

/// A `Transformer` that also knows how to produce predictions for a dataframe.
pub trait Predictor: Transformer {
    fn predict(&self, df: &DataFrame) -> Result<DataFrame>;
}

/// Appends the one-hot encoding of a class index column.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVectorTransformer {
    output_dim: usize,
    input_col: String,
    output_col: String,
    on_malformed: MalformedPolicy,
}

impl LabelVectorTransformer {
    /// Creates a new `LabelVectorTransformer` reading `label` and writing `label_vectorized`.
    ///
    /// # Arguments
    /// * `output_dim` - The amount of classes.
    pub fn new(output_dim: usize) -> Self {
        Self {
            output_dim,
            input_col: DEFAULT_LABEL_COL.to_string(),
            output_col: DEFAULT_VECTORIZED_COL.to_string(),
            on_malformed: MalformedPolicy::default(),
        }
    }

    pub fn with_input_col(mut self, input_col: impl Into<String>) -> Self {
        self.input_col = input_col.into();
        self
    }

    pub fn with_output_col(mut self, output_col: impl Into<String>) -> Self {
        self.output_col = output_col.into();
        self
    }

    pub fn with_policy(mut self, on_malformed: MalformedPolicy) -> Self {
        self.on_malformed = on_malformed;
        self
    }

    pub fn output_col(&self) -> &str {
        &self.output_col
    }

    /// Same as `transform`, but also returns which records were skipped.
    ///
    /// # Errors
    /// Under `MalformedPolicy::Fail` the first malformed record fails its partition and with it
    /// the whole transform.
    pub fn transform_with_report(&self, df: &DataFrame) -> Result<(DataFrame, IngestReport)> {
        let outputs = df.run_job(|partition| self.transform_partition(partition))?;

        let mut report = IngestReport::default();
        let mut partitions = Vec::with_capacity(outputs.len());

        for (id, (rows, partial)) in outputs.into_iter().enumerate() {
            report.merge(partial);
            partitions.push(Partition::new(id, rows));
        }

        debug!(
            ingested = report.ingested,
            skipped = report.skipped_count();
            "labels vectorized"
        );

        Ok((DataFrame::from_partitions(df.context(), partitions), report))
    }

    fn transform_partition(&self, partition: &Partition) -> Result<(Vec<Row>, IngestReport)> {
        let mut report = IngestReport::default();
        let mut rows = Vec::with_capacity(partition.len());

        for (position, row) in partition.rows().iter().enumerate() {
            match self.transform_row(row) {
                Ok(row) => {
                    trace!(partition = partition.id(), position = position; "{row:?}");
                    report.ingested += 1;
                    rows.push(row);
                }
                Err(reason) => {
                    self.on_malformed
                        .handle(&mut report, partition.id(), position, reason)?
                }
            }
        }

        Ok((rows, report))
    }

    fn transform_row(&self, row: &Row) -> std::result::Result<Row, String> {
        if row.contains(&self.output_col) {
            return Err(format!("field {:?} already exists", self.output_col));
        }

        let value = row
            .get(&self.input_col)
            .ok_or_else(|| format!("missing field {:?}", self.input_col))?;

        let index = value
            .as_index()
            .ok_or_else(|| format!("expected a class index, got {}", value.type_name()))?;

        let vector = to_vector(index, self.output_dim).map_err(|e| e.to_string())?;
        Ok(row.with_field(self.output_col.as_str(), Value::Vector(vector)))
    }
}

impl Transformer for LabelVectorTransformer {
    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.transform_with_report(df).map(|(df, _)| df)
    }
}
