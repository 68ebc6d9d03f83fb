use std::{
    any::Any,
    error::Error,
    fmt::{self, Display},
    io,
};

/// The engine's result type.
pub type Result<T> = std::result::Result<T, EngineErr>;

/// An error a task can fail with, whatever its origin.
pub type TaskError = Box<dyn Error + Send + Sync + 'static>;

/// The dataframe engine's error type.
#[derive(Debug)]
pub enum EngineErr {
    ThreadPool(rayon::ThreadPoolBuildError),
    InvalidPartitionCount(usize),
    TaskFailed {
        partition: usize,
        attempts: usize,
        cause: TaskError,
    },
    Io(io::Error),
    Json {
        line: usize,
        source: serde_json::Error,
    },
    InvalidRecord {
        line: usize,
        reason: String,
    },
}

impl Display for EngineErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineErr::ThreadPool(e) => write!(f, "failed to build the thread pool: {e}"),
            EngineErr::InvalidPartitionCount(n) => {
                write!(f, "invalid partition count {n}, it must be at least 1")
            }
            EngineErr::TaskFailed {
                partition,
                attempts,
                cause,
            } => write!(
                f,
                "task for partition {partition} failed after {attempts} attempt(s): {cause}"
            ),
            EngineErr::Io(e) => write!(f, "io error: {e}"),
            EngineErr::Json { line, source } => write!(f, "invalid json at line {line}: {source}"),
            EngineErr::InvalidRecord { line, reason } => {
                write!(f, "invalid record at line {line}: {reason}")
            }
        }
    }
}

impl Error for EngineErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineErr::ThreadPool(e) => Some(e),
            EngineErr::TaskFailed { cause, .. } => Some(cause.as_ref()),
            EngineErr::Io(e) => Some(e),
            EngineErr::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for EngineErr {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(value)
    }
}

impl From<io::Error> for EngineErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A panic caught while running a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPanic {
    message: String,
}

impl TaskPanic {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(msg) => msg.to_string(),
                Err(_) => "unknown panic payload".to_string(),
            },
        };

        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for TaskPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task panicked: {}", self.message)
    }
}

impl Error for TaskPanic {}
