use std::num::NonZeroUsize;

use ndarray::{ArrayView2, Axis};
use rand::Rng;

use crate::{MlErr, Result};

/// An in-memory supervised dataset.
///
/// Samples are stored row-major, each row being the `x_size` features followed
/// by the `y_size` targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    data: Vec<f32>,
    x_size: usize,
    y_size: usize,
    len: usize,
}

impl Dataset {
    /// Creates a new `Dataset` from interleaved rows.
    ///
    /// # Errors
    /// Returns `MlErr::SizeMismatch` if `data` is not a whole amount of rows.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self> {
        let row = x_size + y_size;

        if row == 0 || data.len() % row != 0 {
            return Err(MlErr::SizeMismatch {
                what: "dataset rows",
                got: data.len(),
                expected: row * (data.len() / row.max(1)),
            });
        }

        Ok(Self {
            len: data.len() / row,
            data,
            x_size,
            y_size,
        })
    }

    /// Creates a new `Dataset` from separate feature and target buffers, pairing them by position.
    ///
    /// # Errors
    /// Returns `MlErr::SizeMismatch` if both buffers don't hold the same amount of rows.
    pub fn from_columns(x: &[f32], y: &[f32], x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 || x.len() % x_size != 0 || y.len() % y_size != 0 {
            return Err(MlErr::SizeMismatch {
                what: "dataset columns",
                got: x.len() + y.len(),
                expected: x_size + y_size,
            });
        }

        let len = x.len() / x_size;
        if y.len() / y_size != len {
            return Err(MlErr::SizeMismatch {
                what: "dataset targets",
                got: y.len() / y_size,
                expected: len,
            });
        }

        let mut data = Vec::with_capacity(x.len() + y.len());
        for (xs, ys) in x.chunks_exact(x_size).zip(y.chunks_exact(y_size)) {
            data.extend_from_slice(xs);
            data.extend_from_slice(ys);
        }

        Ok(Self {
            data,
            x_size,
            y_size,
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Shuffles the rows in place (Fisher-Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let row = self.x_size + self.y_size;

        for i in (1..self.len).rev() {
            let j = rng.random_range(0..=i);
            if i == j {
                continue;
            }

            let (head, tail) = self.data.split_at_mut(i * row);
            head[j * row..(j + 1) * row].swap_with_slice(&mut tail[..row]);
        }
    }

    /// Splits the dataset into consecutive batches of at most `batch_size` rows.
    ///
    /// # Returns
    /// An iterator of `(x, y)` views, one pair per batch.
    pub fn batches(
        &self,
        batch_size: NonZeroUsize,
    ) -> Result<impl Iterator<Item = (ArrayView2<'_, f32>, ArrayView2<'_, f32>)>> {
        let x_size = self.x_size;
        let mut rest = ArrayView2::from_shape((self.len, x_size + self.y_size), &self.data)?;

        let batches = std::iter::from_fn(move || {
            if rest.nrows() == 0 {
                return None;
            }

            let n = batch_size.get().min(rest.nrows());
            let (batch, tail) = rest.clone().split_at(Axis(0), n);
            rest = tail;

            Some(batch.split_at(Axis(1), x_size))
        });

        Ok(batches)
    }

    /// A view of every feature row.
    pub fn x(&self) -> Result<ArrayView2<'_, f32>> {
        let full = ArrayView2::from_shape((self.len, self.x_size + self.y_size), &self.data)?;
        Ok(full.split_at(Axis(1), self.x_size).0)
    }

    /// A view of every target row.
    pub fn y(&self) -> Result<ArrayView2<'_, f32>> {
        let full = ArrayView2::from_shape((self.len, self.x_size + self.y_size), &self.data)?;
        Ok(full.split_at(Axis(1), self.x_size).1)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn dataset() -> Dataset {
        #[rustfmt::skip]
        let data = vec![
            0.0, 1.0, 10.0,
            2.0, 3.0, 11.0,
            4.0, 5.0, 12.0,
            6.0, 7.0, 13.0,
            8.0, 9.0, 14.0,
        ];

        Dataset::new(data, 2, 1).unwrap()
    }

    #[test]
    fn rejects_partial_rows() {
        assert!(Dataset::new(vec![1.0, 2.0, 3.0, 4.0], 2, 1).is_err());
        assert!(Dataset::new(vec![], 0, 0).is_err());
    }

    #[test]
    fn from_columns_interleaves_rows() {
        let ds = Dataset::from_columns(&[1., 2., 3., 4.], &[5., 6.], 2, 1).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.data, [1., 2., 5., 3., 4., 6.]);
    }

    #[test]
    fn from_columns_rejects_unpaired_rows() {
        assert!(Dataset::from_columns(&[1., 2., 3., 4.], &[5.], 2, 1).is_err());
    }

    #[test]
    fn batches_cover_every_row() {
        let ds = dataset();
        let sizes: Vec<_> = ds
            .batches(NonZeroUsize::new(2).unwrap())
            .unwrap()
            .map(|(x, y)| {
                assert_eq!(x.ncols(), 2);
                assert_eq!(y.ncols(), 1);
                x.nrows()
            })
            .collect();

        assert_eq!(sizes, [2, 2, 1]);
    }

    #[test]
    fn shuffle_keeps_rows_paired() {
        let mut ds = dataset();
        let mut rng = StdRng::seed_from_u64(7);
        ds.shuffle(&mut rng);

        let x = ds.x().unwrap();
        let y = ds.y().unwrap();
        let mut targets: Vec<f32> = y.iter().copied().collect();

        for (xr, yr) in x.rows().into_iter().zip(y.rows()) {
            assert_eq!(xr[1], xr[0] + 1.0);
            assert_eq!(yr[0], 10.0 + xr[0] / 2.0);
        }

        targets.sort_by(f32::total_cmp);
        assert_eq!(targets, [10.0, 11.0, 12.0, 13.0, 14.0]);
    }
}
