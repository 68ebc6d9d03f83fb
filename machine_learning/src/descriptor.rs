use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, build_model},
    initialization::init_params,
    specs::ModelSpec,
};

/// The textual form of a model.
///
/// When `weights` is absent the descriptor only carries the architecture and whoever decodes it
/// has to initialize the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub architecture: ModelSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f32>>,
}

impl ModelDescriptor {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A model together with its parameters.
#[derive(Debug, Clone)]
pub struct Network {
    spec: ModelSpec,
    model: Sequential,
    params: Vec<f32>,
}

impl Network {
    /// Creates a new `Network` with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `spec` - The architecture of the network.
    /// * `rng` - The random number generator used to initialize the weights.
    ///
    /// # Errors
    /// Fails if the architecture is invalid or one of its initializers can't be sampled.
    pub fn new<R: Rng + ?Sized>(spec: ModelSpec, rng: &mut R) -> Result<Self> {
        let model = build_model(&spec)?;
        let params = init_params(&spec, rng)?;

        Ok(Self {
            spec,
            model,
            params,
        })
    }

    /// Creates a new `Network` with the given parameters.
    ///
    /// # Errors
    /// Fails if the architecture is invalid or `params` doesn't have exactly one value per parameter.
    pub fn with_params(spec: ModelSpec, params: Vec<f32>) -> Result<Self> {
        let model = build_model(&spec)?;

        if params.len() != model.size() {
            return Err(MlErr::SizeMismatch {
                what: "descriptor weights",
                got: params.len(),
                expected: model.size(),
            });
        }

        Ok(Self {
            spec,
            model,
            params,
        })
    }

    /// Rebuilds a network from a descriptor.
    ///
    /// # Arguments
    /// * `descriptor` - The architecture and, optionally, the weights.
    /// * `seed` - Seed for the weights when the descriptor has none, OS randomness is used otherwise.
    pub fn from_descriptor(descriptor: ModelDescriptor, seed: Option<u64>) -> Result<Self> {
        let ModelDescriptor {
            architecture,
            weights,
        } = descriptor;

        match weights {
            Some(params) => Self::with_params(architecture, params),
            None => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };

                Self::new(architecture, &mut rng)
            }
        }
    }

    /// Decodes a network from its JSON descriptor.
    pub fn from_json(text: &str, seed: Option<u64>) -> Result<Self> {
        Self::from_descriptor(ModelDescriptor::from_json(text)?, seed)
    }

    /// The full descriptor of this network, weights included.
    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            architecture: self.spec.clone(),
            weights: Some(self.params.clone()),
        }
    }

    /// Serializes the architecture and the weights.
    pub fn to_json(&self) -> Result<String> {
        self.descriptor().to_json()
    }

    /// Serializes only the architecture.
    pub fn architecture_json(&self) -> Result<String> {
        let descriptor = ModelDescriptor {
            architecture: self.spec.clone(),
            weights: None,
        };

        descriptor.to_json()
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// The amount of features the network expects per sample.
    pub fn input_size(&self) -> usize {
        self.spec
            .layers()
            .first()
            .map(|layer| layer.input_size())
            .unwrap_or_default()
    }

    /// The amount of values the network outputs per sample.
    pub fn output_size(&self) -> usize {
        self.spec
            .layers()
            .last()
            .map(|layer| layer.output_size())
            .unwrap_or_default()
    }

    /// Computes the network's output for a batch of samples, one per row.
    pub fn predict(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.input_size() {
            return Err(MlErr::SizeMismatch {
                what: "prediction input",
                got: x.ncols(),
                expected: self.input_size(),
            });
        }

        let y = self.model.forward(&self.params, x)?;
        Ok(y.to_owned())
    }

    /// Splits the network so a trainer can update the parameters in place.
    pub(crate) fn parts_mut(&mut self) -> (&mut Sequential, &mut [f32]) {
        (&mut self.model, &mut self.params)
    }
}
