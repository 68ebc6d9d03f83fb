pub mod arch;
pub mod dataset;
pub mod descriptor;
pub mod error;
pub mod initialization;
pub mod metrics;
pub mod optimization;
pub mod specs;
pub mod training;

pub use dataset::Dataset;
pub use descriptor::{ModelDescriptor, Network};
pub use error::{MlErr, Result};
pub use training::{History, Trainer, TrainerBuilder};
