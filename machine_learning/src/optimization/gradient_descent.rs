use super::{Optimizer, optimizer::check_sizes};
use crate::Result;

/// Plain gradient descent: `w -= lr * g`.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        check_sizes(params, grad)?;

        params
            .iter_mut()
            .zip(grad)
            .for_each(|(w, g)| *w -= self.learning_rate * g);

        Ok(())
    }
}
