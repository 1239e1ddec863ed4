//! Client binding for a server-resident task queue.
//!
//! The queue engine itself (priority ordering, delayed/ready/taken/buried
//! transitions, ttr/ttl expiry, persistence, multi-consumer coordination)
//! runs inside the remote database process. This crate only marshals
//! arguments into remote-procedure invocations and unmarshals result tuples
//! back into [`Task`](tube_queue_core::Task) snapshots.
//!
//! The transport is supplied by the embedding application as a
//! [`RemoteCaller`] implementation; this crate issues exactly one remote
//! call per operation and never retries or translates transport failures.

mod adapter;
mod blocking;
mod caller;
mod options;
mod queue;
mod stats;

pub use adapter::{normalize, CallAdapter, STATS_FUNCTION};
pub use blocking::BlockingQueue;
pub use caller::RemoteCaller;
pub use options::TaskOptions;
pub use queue::Queue;
pub use rmpv::Value;
pub use tube_queue_core::{Task, TaskState};

use thiserror::Error;
use tube_queue_core::TaskError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid path \"{0}\"")]
    InvalidPath(String),

    #[error("Malformed task tuple: {0}")]
    Task(#[from] TaskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
