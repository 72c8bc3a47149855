pub mod clean;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod table;
pub mod validate;

pub use error::{ConfigError, PipelineError, ReadError, WriteError};
pub use table::{Table, Value};
