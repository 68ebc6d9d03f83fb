use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidLayout {
        layer: usize,
        got: usize,
        expected: usize,
    },
    EmptyModel,
    EmptyDataset,
    InvalidHyperparameter {
        what: &'static str,
        value: f32,
    },
    Distribution(String),
    Shape(ShapeError),
    InvalidDescriptor(serde_json::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch in {what}, got {got} and expected {expected}"
            ),
            MlErr::InvalidLayout {
                layer,
                got,
                expected,
            } => write!(
                f,
                "Layer {layer} takes {got} inputs but the previous layer outputs {expected}"
            ),
            MlErr::EmptyModel => write!(f, "The model must have at least one layer"),
            MlErr::EmptyDataset => write!(f, "Cannot fit a model on an empty dataset"),
            MlErr::InvalidHyperparameter { what, value } => {
                write!(f, "Invalid value {value} for hyperparameter {what}")
            }
            MlErr::Distribution(msg) => write!(f, "Invalid weight distribution: {msg}"),
            MlErr::Shape(e) => write!(f, "Shape error: {e}"),
            MlErr::InvalidDescriptor(e) => write!(f, "Invalid model descriptor: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::InvalidDescriptor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidDescriptor(value)
    }
}
