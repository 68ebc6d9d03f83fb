use std::{
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineErr, Partition, Result, TaskError, TaskPanic};

/// The engine's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Amount of worker threads, all available cores if absent.
    pub parallelism: Option<NonZeroUsize>,
    /// Amount of times a task is tried before failing the whole job.
    pub max_task_attempts: NonZeroUsize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            max_task_attempts: NonZeroUsize::MIN,
        }
    }
}

/// Entry point to the engine, it owns the pool every job of its dataframes runs on.
///
/// Cloning a `Context` is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Context {
    pool: Arc<ThreadPool>,
    config: EngineConfig,
}

impl Context {
    /// Creates a new `Context`.
    ///
    /// # Errors
    /// Returns `EngineErr::ThreadPool` if the worker threads could not be spawned.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism.map_or(0, NonZeroUsize::get))
            .thread_name(|i| format!("dataframe-{i}"))
            .build()?;

        debug!(threads = pool.current_num_threads(); "engine context created");

        Ok(Self {
            pool: Arc::new(pool),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The amount of threads jobs run on.
    pub fn parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `task` once per partition, in parallel, and waits for every result.
    ///
    /// Failed or panicking tasks are retried up to `max_task_attempts` times in total.
    ///
    /// # Arguments
    /// * `partitions` - The partitions to process.
    /// * `task` - The per partition computation.
    ///
    /// # Returns
    /// One output per partition, in partition order, or the first task that ran out of attempts.
    pub fn run_job<T, E, F>(&self, partitions: &[Partition], task: F) -> Result<Vec<T>>
    where
        T: Send,
        E: Into<TaskError>,
        F: Fn(&Partition) -> std::result::Result<T, E> + Sync,
    {
        let max_attempts = self.config.max_task_attempts.get();
        debug!(partitions = partitions.len(); "running job");

        self.pool.install(|| {
            partitions
                .par_iter()
                .map(|partition| run_task(partition, max_attempts, &task))
                .collect()
        })
    }
}

fn run_task<T, E, F>(partition: &Partition, max_attempts: usize, task: &F) -> Result<T>
where
    E: Into<TaskError>,
    F: Fn(&Partition) -> std::result::Result<T, E>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        let cause: TaskError = match panic::catch_unwind(AssertUnwindSafe(|| task(partition))) {
            Ok(Ok(output)) => return Ok(output),
            Ok(Err(e)) => e.into(),
            Err(payload) => Box::new(TaskPanic::from_payload(payload)),
        };

        if attempts >= max_attempts {
            return Err(EngineErr::TaskFailed {
                partition: partition.id(),
                attempts,
                cause,
            });
        }

        warn!(partition = partition.id(), attempt = attempts; "task failed, retrying: {cause}");
    }
}
