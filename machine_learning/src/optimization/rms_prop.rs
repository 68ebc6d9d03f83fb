use super::{Optimizer, optimizer::check_sizes};
use crate::Result;

/// RMSprop: divides each step by a running average of the squared gradient.
#[derive(Debug)]
pub struct RmsProp {
    learning_rate: f32,
    rho: f32,
    epsilon: f32,
    avg: Box<[f32]>,
}

impl RmsProp {
    /// Creates a new `RmsProp` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The base step size.
    /// * `rho` - Decay of the squared gradient average.
    /// * `epsilon` - Added to the denominator for numerical stability.
    pub fn new(len: usize, learning_rate: f32, rho: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            rho,
            epsilon,
            avg: vec![0.; len].into_boxed_slice(),
        }
    }
}

impl Optimizer for RmsProp {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) -> Result<()> {
        check_sizes(params, grad)?;
        check_sizes(&self.avg, grad)?;

        let Self {
            learning_rate: lr,
            rho,
            epsilon: eps,
            ..
        } = *self;

        params
            .iter_mut()
            .zip(grad)
            .zip(self.avg.iter_mut())
            .for_each(|((p, g), s)| {
                *s = rho * *s + (1. - rho) * g.powi(2);
                *p -= lr * g / (s.sqrt() + eps);
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Adam, GradientDescent, GradientDescentWithMomentum};
    use super::*;

    // f(x, y) = x^2 + 3y^2
    fn grad(p: &[f32]) -> Vec<f32> {
        vec![2. * p[0], 6. * p[1]]
    }

    fn minimize<O: Optimizer>(mut optimizer: O, steps: usize) -> Vec<f32> {
        let mut params = vec![1.5, -2.0];

        for _ in 0..steps {
            let g = grad(&params);
            optimizer.update_params(&mut params, &g).unwrap();
        }

        params
    }

    fn assert_near_origin(params: &[f32]) {
        assert!(params.iter().all(|p| p.abs() < 0.1), "{params:?}");
    }

    #[test]
    fn every_optimizer_minimizes_a_quadratic() {
        assert_near_origin(&minimize(GradientDescent::new(0.1), 200));
        assert_near_origin(&minimize(GradientDescentWithMomentum::new(2, 0.05, 0.9), 300));
        assert_near_origin(&minimize(Adam::new(2, 0.05, 0.9, 0.999, 1e-8), 1000));
        assert_near_origin(&minimize(RmsProp::new(2, 0.01, 0.9, 1e-7), 1000));
    }

    #[test]
    fn mismatched_gradient_is_an_error() {
        let mut optimizer = RmsProp::new(2, 0.01, 0.9, 1e-7);
        let mut params = vec![0.; 2];

        assert!(optimizer.update_params(&mut params, &[1.]).is_err());
    }
}
