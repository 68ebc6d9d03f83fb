use log::warn;
use serde::{Deserialize, Serialize};

use crate::{EnsembleErr, Result};

/// What to do with a record that can't be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Fail the whole partition.
    #[default]
    Fail,
    /// Leave the record out and report it.
    Skip,
}

/// A record left out under `MalformedPolicy::Skip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub partition: usize,
    /// Position of the record inside its partition.
    pub position: usize,
    pub reason: String,
}

/// How many records made it through a pass over the data, and which ones didn't.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl IngestReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: IngestReport) {
        self.ingested += other.ingested;
        self.skipped.extend(other.skipped);
    }
}

impl MalformedPolicy {
    /// Applies the policy to a malformed record.
    ///
    /// # Returns
    /// `Ok` if the record was skipped, the `EnsembleErr::MalformedRecord` error otherwise.
    pub fn handle(
        self,
        report: &mut IngestReport,
        partition: usize,
        position: usize,
        reason: String,
    ) -> Result<()> {
        match self {
            MalformedPolicy::Fail => Err(EnsembleErr::MalformedRecord {
                partition,
                position,
                reason,
            }),
            MalformedPolicy::Skip => {
                warn!(partition = partition, position = position; "skipping record: {reason}");
                report.skipped.push(SkippedRecord {
                    partition,
                    position,
                    reason,
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_records_the_reason() {
        let mut report = IngestReport::default();

        MalformedPolicy::Skip
            .handle(&mut report, 2, 7, "missing field".to_string())
            .unwrap();

        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].position, 7);
    }

    #[test]
    fn fail_is_an_error() {
        let mut report = IngestReport::default();
        let res = MalformedPolicy::Fail.handle(&mut report, 0, 1, "bad".to_string());

        assert!(matches!(
            res,
            Err(EnsembleErr::MalformedRecord { position: 1, .. })
        ));
        assert_eq!(report.skipped_count(), 0);
    }

    #[test]
    fn merge_adds_up() {
        let mut a = IngestReport {
            ingested: 3,
            skipped: vec![],
        };
        let b = IngestReport {
            ingested: 2,
            skipped: vec![SkippedRecord {
                partition: 1,
                position: 0,
                reason: "x".to_string(),
            }],
        };

        a.merge(b);
        assert_eq!(a.ingested, 5);
        assert_eq!(a.skipped_count(), 1);
    }
}
