mod context;
pub mod error;
mod frame;
pub mod io;
mod partition;
mod row;
mod value;

pub use context::{Context, EngineConfig};
pub use error::{EngineErr, Result, TaskError, TaskPanic};
pub use frame::DataFrame;
pub use partition::Partition;
pub use row::Row;
pub use value::Value;
