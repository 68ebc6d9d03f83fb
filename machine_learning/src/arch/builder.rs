use super::{Sequential, layers::Layer};
use crate::{MlErr, Result, specs::ModelSpec};

/// Builds a model following a spec, checking adjacent layers fit together.
///
/// # Errors
/// Returns `MlErr::EmptyModel` if there are no layers, or `MlErr::InvalidLayout` if a layer's
/// input size doesn't match the previous layer's output size.
pub fn build_model(spec: &ModelSpec) -> Result<Sequential> {
    let layers = spec.layers();

    if layers.is_empty() {
        return Err(MlErr::EmptyModel);
    }

    for (i, layer) in layers.iter().enumerate() {
        if layer.input_size() == 0 || layer.output_size() == 0 {
            return Err(MlErr::InvalidLayout {
                layer: i,
                got: layer.input_size(),
                expected: layer.output_size(),
            });
        }
    }

    for (i, pair) in layers.windows(2).enumerate() {
        let (prev, curr) = (pair[0].output_size(), pair[1].input_size());

        if prev != curr {
            return Err(MlErr::InvalidLayout {
                layer: i + 1,
                got: curr,
                expected: prev,
            });
        }
    }

    Ok(Sequential::new(layers.iter().copied().map(Layer::from)))
}
