use ndarray::prelude::*;

use crate::{MlErr, Result};

/// Row-wise softmax. Has no parameters.
#[derive(Clone, Debug)]
pub struct Softmax {
    dim: usize,
    a: Array2<f32>,
    d: Array2<f32>,
}

impl Softmax {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            a: Array2::zeros((0, 0)),
            d: Array2::zeros((0, 0)),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn forward(&mut self, x: ArrayView2<f32>) -> Result<ArrayView2<'_, f32>> {
        self.check_width(x.ncols())?;
        self.a = x.to_owned();

        for mut row in self.a.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|v| v / sum);
        }

        Ok(self.a.view())
    }

    /// Applies the softmax jacobian to `d`: `a_i * (d_i - Σ_j d_j * a_j)` per row.
    pub fn backward(&mut self, d: ArrayViewMut2<f32>) -> Result<ArrayViewMut2<'_, f32>> {
        self.check_width(d.ncols())?;
        self.d = d.to_owned();

        for (mut d_row, a_row) in self.d.rows_mut().into_iter().zip(self.a.rows()) {
            let dot = d_row.dot(&a_row);
            d_row.zip_mut_with(&a_row, |d, &a| *d = a * (*d - dot));
        }

        Ok(self.d.view_mut())
    }

    fn check_width(&self, got: usize) -> Result<()> {
        if got != self.dim {
            return Err(MlErr::SizeMismatch {
                what: "softmax input",
                got,
                expected: self.dim,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_sum_to_one() {
        let mut softmax = Softmax::new(3);
        let x = array![[1., 2., 3.], [1000., 1000., 1000.]];

        let a = softmax.forward(x.view()).unwrap();

        for row in a.rows() {
            assert!((row.sum() - 1.).abs() < 1e-6);
        }
        assert!(a[[0, 2]] > a[[0, 1]] && a[[0, 1]] > a[[0, 0]]);
        assert!((a[[1, 0]] - 1. / 3.).abs() < 1e-6);
    }

    #[test]
    fn wrong_width_is_an_error() {
        let mut softmax = Softmax::new(2);
        let x = array![[1., 2., 3.]];

        assert!(softmax.forward(x.view()).is_err());
    }
}
