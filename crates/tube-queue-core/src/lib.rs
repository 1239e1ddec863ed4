mod error;
mod state;
mod task;

pub use error::{Result, TaskError};
pub use state::TaskState;
pub use task::Task;
