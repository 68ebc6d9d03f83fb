use super::History;
use crate::{Result, dataset::Dataset, descriptor::Network};

/// A compiled training procedure: it knows how to fit a network but doesn't own one.
pub trait Trainer: Send {
    /// Fits `network` on `dataset`, updating its parameters in place.
    ///
    /// # Arguments
    /// * `network` - The network to train.
    /// * `dataset` - The training data, it may get shuffled.
    ///
    /// # Returns
    /// The loss and metrics of every epoch.
    fn fit(&mut self, network: &mut Network, dataset: &mut Dataset) -> Result<History>;
}
