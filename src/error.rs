use std::{
    error::Error,
    fmt::{self, Display},
};

use dataframe::EngineErr;
use machine_learning::MlErr;

/// The ensemble module's result type.
pub type Result<T> = std::result::Result<T, EnsembleErr>;

/// Failures of the ensemble orchestration.
#[derive(Debug)]
pub enum EnsembleErr {
    MalformedRecord {
        partition: usize,
        position: usize,
        reason: String,
    },
    LabelOutOfRange {
        index: usize,
        n_dim: usize,
    },
    Descriptor(MlErr),
    Fit(MlErr),
    EmptyPartition(usize),
    EmptyDataset,
    InvalidConfig(String),
    TaskFailed {
        partition: usize,
        attempts: usize,
        source: Box<EnsembleErr>,
    },
    Engine(EngineErr),
}

impl Display for EnsembleErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleErr::MalformedRecord {
                partition,
                position,
                reason,
            } => write!(
                f,
                "malformed record {position} in partition {partition}: {reason}"
            ),
            EnsembleErr::LabelOutOfRange { index, n_dim } => {
                write!(f, "label {index} is out of range for {n_dim} classes")
            }
            EnsembleErr::Descriptor(e) => write!(f, "model descriptor error: {e}"),
            EnsembleErr::Fit(e) => write!(f, "fitting error: {e}"),
            EnsembleErr::EmptyPartition(partition) => {
                write!(f, "partition {partition} has no usable records")
            }
            EnsembleErr::EmptyDataset => write!(f, "cannot train an ensemble on an empty dataset"),
            EnsembleErr::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            EnsembleErr::TaskFailed {
                partition,
                attempts,
                source,
            } => write!(
                f,
                "task for partition {partition} failed after {attempts} attempt(s): {source}"
            ),
            EnsembleErr::Engine(e) => write!(f, "engine error: {e}"),
        }
    }
}

impl Error for EnsembleErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnsembleErr::Descriptor(e) | EnsembleErr::Fit(e) => Some(e),
            EnsembleErr::TaskFailed { source, .. } => Some(source.as_ref()),
            EnsembleErr::Engine(e) => Some(e),
            _ => None,
        }
    }
}

/// Task failures caused by this crate are unwrapped so callers can match on the original error.
impl From<EngineErr> for EnsembleErr {
    fn from(value: EngineErr) -> Self {
        match value {
            EngineErr::TaskFailed {
                partition,
                attempts,
                cause,
            } => match cause.downcast::<EnsembleErr>() {
                Ok(source) => Self::TaskFailed {
                    partition,
                    attempts,
                    source,
                },
                Err(cause) => Self::Engine(EngineErr::TaskFailed {
                    partition,
                    attempts,
                    cause,
                }),
            },
            other => Self::Engine(other),
        }
    }
}

impl EnsembleErr {
    /// The error that caused a task to fail, or `self` otherwise.
    pub fn root(&self) -> &EnsembleErr {
        match self {
            EnsembleErr::TaskFailed { source, .. } => source.root(),
            other => other,
        }
    }
}
