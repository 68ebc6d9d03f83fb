use super::{Relu, Sigmoid, Tanh};
use crate::specs::ActFnSpec;

/// An element-wise activation function.
#[derive(Clone, Debug)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    Relu(Relu),
}

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn tanh() -> Self {
        Self::Tanh(Tanh)
    }

    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.f(x),
            Self::Tanh(a) => a.f(x),
            Self::Relu(a) => a.f(x),
        }
    }

    pub fn df(&self, x: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.df(x),
            Self::Tanh(a) => a.df(x),
            Self::Relu(a) => a.df(x),
        }
    }

    /// Returns the specification this activation was built from.
    pub fn spec(&self) -> ActFnSpec {
        match self {
            Self::Sigmoid(a) => ActFnSpec::Sigmoid { amp: a.amp() },
            Self::Tanh(_) => ActFnSpec::Tanh,
            Self::Relu(_) => ActFnSpec::Relu,
        }
    }
}

impl From<ActFnSpec> for ActFn {
    fn from(spec: ActFnSpec) -> Self {
        match spec {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Tanh => ActFn::tanh(),
            ActFnSpec::Relu => ActFn::relu(),
        }
    }
}
