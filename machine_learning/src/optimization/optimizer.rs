use crate::{MlErr, Result};

pub trait Optimizer {
    /// Takes one step over `params` following `grad`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()>;
}

/// Fails if the parameters and the gradient differ in length.
pub(super) fn check_sizes(params: &[f32], grad: &[f32]) -> Result<()> {
    if params.len() != grad.len() {
        return Err(MlErr::SizeMismatch {
            what: "gradient",
            got: grad.len(),
            expected: params.len(),
        });
    }

    Ok(())
}
