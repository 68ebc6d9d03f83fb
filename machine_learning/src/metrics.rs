use ndarray::{ArrayView1, ArrayView2, Axis};

use crate::specs::MetricSpec;

/// Running tally of a metric over an epoch.
#[derive(Debug, Clone)]
pub struct MetricTally {
    metric: MetricSpec,
    hits: usize,
    seen: usize,
}

impl MetricTally {
    pub fn new(metric: MetricSpec) -> Self {
        Self {
            metric,
            hits: 0,
            seen: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.metric {
            MetricSpec::Accuracy => "accuracy",
        }
    }

    /// Accumulates the metric for a batch of predictions.
    pub fn update(&mut self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) {
        match self.metric {
            MetricSpec::Accuracy => {
                self.hits += accurate_rows(y_pred, y);
                self.seen += y.nrows();
            }
        }
    }

    /// Returns the metric's value so far and starts over.
    pub fn take(&mut self) -> f32 {
        let value = if self.seen == 0 {
            0.0
        } else {
            self.hits as f32 / self.seen as f32
        };

        self.hits = 0;
        self.seen = 0;
        value
    }
}

/// Counts the rows whose predicted class matches the target class.
///
/// Single column outputs are treated as binary and thresholded at 0.5.
pub fn accurate_rows(y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> usize {
    if y.ncols() == 1 {
        return y_pred
            .iter()
            .zip(y.iter())
            .filter(|&(&p, &t)| (p >= 0.5) == (t >= 0.5))
            .count();
    }

    y_pred
        .axis_iter(Axis(0))
        .zip(y.axis_iter(Axis(0)))
        .filter(|(p, t)| argmax(p.view()) == argmax(t.view()))
        .count()
}

/// Index of the largest value of a row, the first one on ties.
pub fn argmax(row: ArrayView1<f32>) -> Option<usize> {
    row.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
