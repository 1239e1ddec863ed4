use crate::{TaskError, TaskState};
use rmpv::Value;
use serde::Serialize;

/// Snapshot of one queue entry.
///
/// A `Task` is materialized from the `(id, state[, data])` tuple the remote
/// engine returns for every queue operation. It reflects the entry as of the
/// moment the tuple was produced; operations that change remote state return
/// a fresh snapshot rather than mutating an existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: u64,
    state: String,
    data: Value,
}

impl Task {
    /// Build a task from a 2- or 3-element result row.
    ///
    /// A missing third element means the engine omitted the payload; it
    /// defaults to `Value::Nil`. The payload is opaque and carried through
    /// without inspection.
    pub fn from_tuple(tuple: &[Value]) -> Result<Self, TaskError> {
        if tuple.len() < 2 || tuple.len() > 3 {
            return Err(TaskError::TupleLength(tuple.len()));
        }

        let id = tuple[0]
            .as_u64()
            .ok_or_else(|| TaskError::InvalidId(tuple[0].to_string()))?;

        let state = tuple[1]
            .as_str()
            .ok_or_else(|| TaskError::InvalidState(tuple[1].to_string()))?
            .to_string();

        let data = tuple.get(2).cloned().unwrap_or(Value::Nil);

        Ok(Task { id, state, data })
    }

    /// Identifier assigned by the remote engine, unique within a queue.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Raw state code as received. Normally one of the five
    /// [`TaskState`] codes, but an unknown code is passed through as-is.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Opaque payload, exactly as received.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the snapshot, yielding the payload without cloning.
    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn is_ready(&self) -> bool {
        self.state == TaskState::Ready.as_str()
    }

    pub fn is_taken(&self) -> bool {
        self.state == TaskState::Taken.as_str()
    }

    pub fn is_done(&self) -> bool {
        self.state == TaskState::Done.as_str()
    }

    pub fn is_buried(&self) -> bool {
        self.state == TaskState::Buried.as_str()
    }

    pub fn is_delayed(&self) -> bool {
        self.state == TaskState::Delayed.as_str()
    }
}
