use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(32).unwrap();

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Tanh,
    Relu,
}

/// The specification for the initial values of a layer's weights.
///
/// Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const {
        value: f32,
    },
    Uniform {
        low: f32,
        high: f32,
    },
    #[default]
    XavierUniform,
    Normal {
        mean: f32,
        std_dev: f32,
    },
    Kaiming,
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        dim: (usize, usize),
        act_fn: Option<ActFnSpec>,
        #[serde(default)]
        init: InitSpec,
    },
    Softmax {
        dim: usize,
    },
}

impl LayerSpec {
    /// The amount of inputs this layer takes.
    pub fn input_size(&self) -> usize {
        match *self {
            LayerSpec::Dense { dim: (n, _), .. } => n,
            LayerSpec::Softmax { dim } => dim,
        }
    }

    /// The amount of outputs this layer produces.
    pub fn output_size(&self) -> usize {
        match *self {
            LayerSpec::Dense { dim: (_, m), .. } => m,
            LayerSpec::Softmax { dim } => dim,
        }
    }

    /// The amount of parameters this layer holds.
    pub fn size(&self) -> usize {
        match *self {
            LayerSpec::Dense { dim: (n, m), .. } => (n + 1) * m,
            LayerSpec::Softmax { .. } => 0,
        }
    }
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

impl ModelSpec {
    /// The layers of the model, in forward order.
    pub fn layers(&self) -> &[LayerSpec] {
        match self {
            ModelSpec::Sequential { layers } => layers,
        }
    }

    /// The total amount of parameters of the model.
    pub fn size(&self) -> usize {
        self.layers().iter().map(LayerSpec::size).sum()
    }
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
    GradientDescentWithMomentum {
        learning_rate: f32,
        momentum: f32,
    },
    RmsProp {
        learning_rate: f32,
        rho: f32,
        epsilon: f32,
    },
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self::RmsProp {
            learning_rate: 0.001,
            rho: 0.9,
            epsilon: 1e-7,
        }
    }
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    Mse,
    #[default]
    CategoricalCrossEntropy,
}

/// The specification for the metrics tracked while fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSpec {
    Accuracy,
}

/// Everything needed to turn a model into a trainable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSpec {
    pub loss: LossFnSpec,
    pub optimizer: OptimizerSpec,
    pub metrics: Vec<MetricSpec>,
    pub epochs: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub shuffle: bool,
}

impl Default for CompileSpec {
    fn default() -> Self {
        Self {
            loss: LossFnSpec::default(),
            optimizer: OptimizerSpec::default(),
            metrics: vec![MetricSpec::Accuracy],
            epochs: NonZeroUsize::MIN,
            batch_size: DEFAULT_BATCH_SIZE,
            shuffle: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_spec_defaults_fill_missing_fields() {
        let spec: CompileSpec = serde_json::from_str(r#"{ "epochs": 3 }"#).unwrap();

        assert_eq!(spec.epochs.get(), 3);
        assert_eq!(spec.batch_size.get(), 32);
        assert_eq!(spec.loss, LossFnSpec::CategoricalCrossEntropy);
        assert_eq!(spec.metrics, [MetricSpec::Accuracy]);
        assert!(matches!(spec.optimizer, OptimizerSpec::RmsProp { .. }));
    }

    #[test]
    fn zero_epochs_are_rejected() {
        let res = serde_json::from_str::<CompileSpec>(r#"{ "epochs": 0 }"#);
        assert!(res.is_err());
    }

    #[test]
    fn layer_sizes() {
        let dense = LayerSpec::Dense {
            dim: (3, 2),
            act_fn: None,
            init: InitSpec::default(),
        };
        let softmax = LayerSpec::Softmax { dim: 2 };

        assert_eq!(dense.size(), 8);
        assert_eq!(softmax.size(), 0);

        let model = ModelSpec::Sequential {
            layers: vec![dense, softmax],
        };
        assert_eq!(model.size(), 8);
    }
}
