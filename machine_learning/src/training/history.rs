use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistics of a single training epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Average of the batch losses.
    pub loss: f32,
    pub metrics: BTreeMap<String, f32>,
    /// Amount of samples seen during the epoch.
    pub samples: usize,
}

/// The training history of a fit call, one entry per epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub epochs: Vec<EpochStats>,
}

impl History {
    pub fn push(&mut self, stats: EpochStats) {
        self.epochs.push(stats);
    }

    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }

    pub fn losses(&self) -> Vec<f32> {
        self.epochs.iter().map(|e| e.loss).collect()
    }

    /// The values a metric took over the epochs, if it was tracked.
    pub fn metric(&self, name: &str) -> Option<Vec<f32>> {
        self.epochs
            .iter()
            .map(|e| e.metrics.get(name).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(epoch: usize, loss: f32, accuracy: f32) -> EpochStats {
        EpochStats {
            epoch,
            loss,
            metrics: BTreeMap::from([("accuracy".to_string(), accuracy)]),
            samples: 10,
        }
    }

    #[test]
    fn series_follow_epochs() {
        let mut history = History::default();
        history.push(stats(1, 0.9, 0.5));
        history.push(stats(2, 0.4, 0.8));

        assert_eq!(history.losses(), [0.9, 0.4]);
        assert_eq!(history.metric("accuracy"), Some(vec![0.5, 0.8]));
        assert_eq!(history.metric("recall"), None);
        assert_eq!(history.last().map(|e| e.epoch), Some(2));
    }

    #[test]
    fn serializes_as_json() {
        let mut history = History::default();
        history.push(stats(1, 0.25, 1.0));

        let text = serde_json::to_string(&history).unwrap();
        let decoded: History = serde_json::from_str(&text).unwrap();

        assert_eq!(decoded, history);
        assert!(text.contains(r#""accuracy":1.0"#));
    }
}
