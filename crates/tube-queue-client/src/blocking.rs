use crate::{Queue, RemoteCaller, Result, TaskOptions};
use rmpv::Value;
use std::sync::Arc;
use std::time::Duration;
use tube_queue_core::Task;

/// Synchronous wrapper around [`Queue`] for embedders without an async
/// runtime of their own. Owns a current-thread runtime and drives each
/// operation to completion on the calling thread.
pub struct BlockingQueue {
    runtime: tokio::runtime::Runtime,
    queue: Queue,
}

impl BlockingQueue {
    pub fn new(caller: Arc<dyn RemoteCaller>, name: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(BlockingQueue {
            runtime,
            queue: Queue::new(caller, name),
        })
    }

    pub fn name(&self) -> &str {
        self.queue.name()
    }

    pub fn put(&self, data: Value) -> Result<Task> {
        self.runtime.block_on(self.queue.put(data))
    }

    pub fn put_with_options(&self, data: Value, options: &TaskOptions) -> Result<Task> {
        self.runtime
            .block_on(self.queue.put_with_options(data, options))
    }

    pub fn take(&self) -> Result<Option<Task>> {
        self.runtime.block_on(self.queue.take())
    }

    pub fn take_with_timeout(&self, timeout: Duration) -> Result<Option<Task>> {
        self.runtime.block_on(self.queue.take_with_timeout(timeout))
    }

    pub fn touch(&self, task_id: u64, increment: Duration) -> Result<Option<Task>> {
        self.runtime.block_on(self.queue.touch(task_id, increment))
    }

    pub fn ack(&self, task_id: u64) -> Result<Task> {
        self.runtime.block_on(self.queue.ack(task_id))
    }

    pub fn release(&self, task_id: u64) -> Result<Task> {
        self.runtime.block_on(self.queue.release(task_id))
    }

    pub fn release_with_options(&self, task_id: u64, options: &TaskOptions) -> Result<Task> {
        self.runtime
            .block_on(self.queue.release_with_options(task_id, options))
    }

    pub fn peek(&self, task_id: u64) -> Result<Task> {
        self.runtime.block_on(self.queue.peek(task_id))
    }

    pub fn bury(&self, task_id: u64) -> Result<Task> {
        self.runtime.block_on(self.queue.bury(task_id))
    }

    pub fn kick(&self, count: u64) -> Result<u64> {
        self.runtime.block_on(self.queue.kick(count))
    }

    pub fn delete(&self, task_id: u64) -> Result<Task> {
        self.runtime.block_on(self.queue.delete(task_id))
    }

    pub fn truncate(&self) -> Result<()> {
        self.runtime.block_on(self.queue.truncate())
    }

    pub fn stats(&self) -> Result<Value> {
        self.runtime.block_on(self.queue.stats())
    }

    pub fn stats_path(&self, path: &str) -> Result<Value> {
        self.runtime.block_on(self.queue.stats_path(path))
    }

    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Vec<Vec<Value>>> {
        self.runtime.block_on(self.queue.call(method, args))
    }
}
