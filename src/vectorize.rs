use crate::{EnsembleErr, Result};

/// Builds the one-hot encoding of a class index.
///
/// # Arguments
/// * `index` - The position of the `1.0`.
/// * `n_dim` - The length of the vector.
///
/// # Errors
/// Returns `EnsembleErr::LabelOutOfRange` if `index >= n_dim`.
pub fn to_vector(index: usize, n_dim: usize) -> Result<Vec<f64>> {
    if index >= n_dim {
        return Err(EnsembleErr::LabelOutOfRange { index, n_dim });
    }

    let mut vector = vec![0.0; n_dim];
    vector[index] = 1.0;
    Ok(vector)
}
