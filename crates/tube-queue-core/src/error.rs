use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task tuple must have 2 or 3 elements (got {0})")]
    TupleLength(usize),

    #[error("Task id must be an unsigned integer (got {0})")]
    InvalidId(String),

    #[error("Task state must be a string (got {0})")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, TaskError>;
