use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::{
    MlErr, Result,
    specs::{InitSpec, LayerSpec, ModelSpec},
};

/// Generates a fresh set of parameters for a model, layer by layer.
///
/// Each dense layer's weights are sampled following its `InitSpec`, its biases start at zero.
///
/// # Arguments
/// * `spec` - The architecture of the model.
/// * `rng` - A random number generator.
///
/// # Returns
/// The flat parameter vector, in the same layout the layers expect.
pub fn init_params<R: Rng + ?Sized>(spec: &ModelSpec, rng: &mut R) -> Result<Vec<f32>> {
    let mut params = Vec::with_capacity(spec.size());

    for layer in spec.layers() {
        let LayerSpec::Dense {
            dim: (n, m), init, ..
        } = *layer
        else {
            continue;
        };

        sample_weights(init, n, m, rng, &mut params)?;
        params.extend(std::iter::repeat_n(0., m));
    }

    Ok(params)
}

fn sample_weights<R: Rng + ?Sized>(
    init: InitSpec,
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
    out: &mut Vec<f32>,
) -> Result<()> {
    let n = fan_in * fan_out;

    match init {
        InitSpec::Const { value } => out.extend(std::iter::repeat_n(value, n)),
        InitSpec::Uniform { low, high } => {
            let dist = Uniform::new(low, high).map_err(|e| MlErr::Distribution(e.to_string()))?;
            extend_from(dist, n, rng, out);
        }
        InitSpec::XavierUniform => {
            let range = (6. / (fan_in + fan_out) as f32).sqrt();
            let dist =
                Uniform::new(-range, range).map_err(|e| MlErr::Distribution(e.to_string()))?;
            extend_from(dist, n, rng, out);
        }
        InitSpec::Normal { mean, std_dev } => {
            let dist = Normal::new(mean, std_dev).map_err(|e| MlErr::Distribution(e.to_string()))?;
            extend_from(dist, n, rng, out);
        }
        InitSpec::Kaiming => {
            let std_dev = (2. / fan_in as f32).sqrt();
            let dist = Normal::new(0., std_dev).map_err(|e| MlErr::Distribution(e.to_string()))?;
            extend_from(dist, n, rng, out);
        }
    }

    Ok(())
}

fn extend_from<D, R>(dist: D, n: usize, rng: &mut R, out: &mut Vec<f32>)
where
    D: Distribution<f32>,
    R: Rng + ?Sized,
{
    out.extend(dist.sample_iter(rng).take(n));
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn dense(dim: (usize, usize), init: InitSpec) -> LayerSpec {
        LayerSpec::Dense {
            dim,
            act_fn: None,
            init,
        }
    }

    #[test]
    fn biases_start_at_zero() {
        let spec = ModelSpec::Sequential {
            layers: vec![
                dense((2, 3), InitSpec::Const { value: 0.5 }),
                LayerSpec::Softmax { dim: 3 },
            ],
        };
        let mut rng = StdRng::seed_from_u64(0);

        let params = init_params(&spec, &mut rng).unwrap();

        assert_eq!(params, [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0., 0., 0.]);
    }

    #[test]
    fn xavier_stays_within_range() {
        let spec = ModelSpec::Sequential {
            layers: vec![dense((4, 2), InitSpec::XavierUniform)],
        };
        let mut rng = StdRng::seed_from_u64(1);
        let range = (6f32 / 6.).sqrt();

        let params = init_params(&spec, &mut rng).unwrap();

        assert_eq!(params.len(), spec.size());
        assert!(params[..8].iter().all(|w| w.abs() <= range));
    }

    #[test]
    fn same_seed_same_params() {
        let spec = ModelSpec::Sequential {
            layers: vec![dense((3, 3), InitSpec::Kaiming)],
        };

        let a = init_params(&spec, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = init_params(&spec, &mut StdRng::seed_from_u64(9)).unwrap();
        let c = init_params(&spec, &mut StdRng::seed_from_u64(10)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn invalid_range_is_an_error() {
        let spec = ModelSpec::Sequential {
            layers: vec![dense((1, 1), InitSpec::Uniform { low: 1., high: 0. })],
        };

        let res = init_params(&spec, &mut StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(MlErr::Distribution(_))));
    }
}
