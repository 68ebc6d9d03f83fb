use std::num::NonZeroUsize;

use log::debug;

use crate::{Context, Partition, Result, Row, TaskError};

/// A partitioned collection of rows.
#[derive(Debug, Clone)]
pub struct DataFrame {
    context: Context,
    partitions: Vec<Partition>,
}

impl DataFrame {
    /// Creates a new `DataFrame` spreading `rows` over one partition per engine thread.
    ///
    /// Consecutive rows land in the same partition.
    pub fn from_rows(context: &Context, rows: Vec<Row>) -> Self {
        let n = context.parallelism().max(1);
        let chunk = rows.len().div_ceil(n).max(1);

        let mut partitions = Vec::with_capacity(n);
        let mut rows = rows.into_iter().peekable();

        while rows.peek().is_some() {
            let id = partitions.len();
            partitions.push(Partition::new(id, rows.by_ref().take(chunk).collect()));
        }

        if partitions.is_empty() {
            partitions.push(Partition::new(0, Vec::new()));
        }

        Self::from_partitions(context, partitions)
    }

    /// Creates a new `DataFrame` with the given partitions, renumbering them by position.
    pub fn from_partitions(context: &Context, partitions: Vec<Partition>) -> Self {
        let partitions = partitions
            .into_iter()
            .enumerate()
            .map(|(id, p)| Partition::new(id, p.into_rows()))
            .collect();

        Self {
            context: context.clone(),
            partitions,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// The total amount of rows.
    pub fn count(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Redistributes every row into exactly `n` partitions, round-robin.
    ///
    /// Partition sizes differ by at most one row.
    pub fn repartition(&self, n: NonZeroUsize) -> Self {
        let n = n.get();
        let mut buckets: Vec<Vec<Row>> = vec![Vec::new(); n];

        for (i, row) in self.rows().enumerate() {
            buckets[i % n].push(row.clone());
        }

        let partitions = buckets
            .into_iter()
            .enumerate()
            .map(|(id, rows)| Partition::new(id, rows))
            .collect();

        debug!(from = self.num_partitions(), to = n; "repartitioned");

        Self {
            context: self.context.clone(),
            partitions,
        }
    }

    /// Replaces each partition by the rows `f` produces for it.
    ///
    /// # Errors
    /// Returns `EngineErr::TaskFailed` if `f` fails on a partition more times than allowed.
    pub fn map_partitions<E, F>(&self, f: F) -> Result<Self>
    where
        E: Into<TaskError>,
        F: Fn(&Partition) -> std::result::Result<Vec<Row>, E> + Sync,
    {
        let outputs = self.run_job(f)?;

        let partitions = outputs
            .into_iter()
            .enumerate()
            .map(|(id, rows)| Partition::new(id, rows))
            .collect();

        Ok(Self {
            context: self.context.clone(),
            partitions,
        })
    }

    /// Runs `task` on every partition and collects one output per partition.
    pub fn run_job<T, E, F>(&self, task: F) -> Result<Vec<T>>
    where
        T: Send,
        E: Into<TaskError>,
        F: Fn(&Partition) -> std::result::Result<T, E> + Sync,
    {
        self.context.run_job(&self.partitions, task)
    }

    /// Iterates over every row, partition by partition.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.partitions.iter().flat_map(Partition::rows)
    }

    /// Gathers every row into a single vector.
    pub fn collect(&self) -> Vec<Row> {
        self.rows().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, Value};

    fn context(threads: usize) -> Context {
        let config = EngineConfig {
            parallelism: NonZeroUsize::new(threads),
            ..Default::default()
        };

        Context::new(config).unwrap()
    }

    fn rows(n: i64) -> Vec<Row> {
        (0..n).map(|i| Row::new([("id", Value::Int(i))])).collect()
    }

    #[test]
    fn from_rows_keeps_order() {
        let df = DataFrame::from_rows(&context(3), rows(10));

        assert_eq!(df.num_partitions(), 3);
        assert_eq!(df.count(), 10);

        let ids: Vec<_> = df.rows().filter_map(|r| r.get("id")?.as_index()).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn from_rows_with_no_rows_has_one_empty_partition() {
        let df = DataFrame::from_rows(&context(2), vec![]);

        assert_eq!(df.num_partitions(), 1);
        assert!(df.is_empty());
    }

    #[test]
    fn repartition_balances_sizes() {
        let df = DataFrame::from_rows(&context(2), rows(10));
        let df = df.repartition(NonZeroUsize::new(4).unwrap());

        let sizes: Vec<_> = df.partitions().iter().map(Partition::len).collect();
        assert_eq!(sizes, [3, 3, 2, 2]);

        let ids: Vec<_> = df.partitions().iter().map(Partition::id).collect();
        assert_eq!(ids, [0, 1, 2, 3]);
    }

    #[test]
    fn repartition_into_more_partitions_than_rows() {
        let df = DataFrame::from_rows(&context(1), rows(2));
        let df = df.repartition(NonZeroUsize::new(3).unwrap());

        assert_eq!(df.num_partitions(), 3);
        assert!(df.partitions()[2].is_empty());
    }
}
