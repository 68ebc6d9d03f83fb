use ndarray::{ArrayView2, ArrayViewMut2};

use super::{Dense, Softmax};
use crate::{Result, arch::activations::ActFn, specs::LayerSpec};

#[derive(Clone, Debug)]
pub enum Layer {
    Dense(Dense),
    Softmax(Softmax),
}
use Layer::*;

impl Layer {
    pub fn dense(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self::Dense(Dense::new(dim, act_fn, Default::default()))
    }

    pub fn softmax(dim: usize) -> Self {
        Self::Softmax(Softmax::new(dim))
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        match self {
            Dense(l) => l.size(),
            Softmax(_) => 0,
        }
    }

    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>> {
        match self {
            Dense(l) => l.forward(params, x),
            Softmax(l) => l.forward(x),
        }
    }

    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayViewMut2<f32>,
    ) -> Result<ArrayViewMut2<'_, f32>> {
        match self {
            Dense(l) => l.backward(params, grad, d),
            Softmax(l) => l.backward(d),
        }
    }

    /// Returns the specification this layer can be rebuilt from.
    pub fn spec(&self) -> LayerSpec {
        match self {
            Dense(l) => LayerSpec::Dense {
                dim: l.dim(),
                act_fn: l.act_fn().map(ActFn::spec),
                init: l.init(),
            },
            Softmax(l) => LayerSpec::Softmax { dim: l.dim() },
        }
    }
}

impl From<LayerSpec> for Layer {
    fn from(spec: LayerSpec) -> Self {
        match spec {
            LayerSpec::Dense { dim, act_fn, init } => {
                Self::Dense(Dense::new(dim, act_fn.map(ActFn::from), init))
            }
            LayerSpec::Softmax { dim } => Self::softmax(dim),
        }
    }
}
