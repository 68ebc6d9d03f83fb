pub mod config;
pub mod error;
pub mod ingest;
pub mod result;
pub mod trainer;
pub mod transformer;
pub mod vectorize;
pub mod worker;

pub use config::{EnsembleConfig, InitialWeights, JobConfig};
pub use error::{EnsembleErr, Result};
pub use ingest::{IngestReport, MalformedPolicy, SkippedRecord};
pub use result::TrainingResult;
pub use trainer::{EnsembleTrainer, Trainer};
pub use transformer::{LabelVectorTransformer, Predictor, Transformer};
pub use vectorize::to_vector;
pub use worker::EnsembleWorker;
