use crate::adapter::{CallAdapter, STATS_FUNCTION};
use crate::stats::resolve_path;
use crate::{ClientError, RemoteCaller, Result, TaskOptions};
use rmpv::Value;
use std::sync::Arc;
use std::time::Duration;
use tube_queue_core::Task;

/// Handle to one named queue on the remote engine.
///
/// Holds nothing beyond the queue-name/transport binding, so it is cheap to
/// clone and safe to share across tasks to the exact extent the supplied
/// [`RemoteCaller`] is. Every method issues a single call against the
/// engine's `queue.tube.<name>:<operation>` function for that queue and
/// converts the first result row; all queue semantics live server-side.
#[derive(Clone)]
pub struct Queue {
    adapter: CallAdapter,
    name: String,
    prefix: String,
}

impl Queue {
    pub fn new(caller: Arc<dyn RemoteCaller>, name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = format!("queue.tube.{}:", name);

        Queue {
            adapter: CallAdapter::new(caller),
            name,
            prefix,
        }
    }

    /// Name of the bound queue.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a task with the engine's default options.
    pub async fn put(&self, data: Value) -> Result<Task> {
        self.task_op("put", vec![data]).await
    }

    /// Insert a task, passing the set option keys along. Empty options are
    /// omitted from the call, matching a plain [`put`](Queue::put).
    pub async fn put_with_options(&self, data: Value, options: &TaskOptions) -> Result<Task> {
        let args = if options.is_empty() {
            vec![data]
        } else {
            vec![data, options.to_value()]
        };
        self.task_op("put", args).await
    }

    /// Take the next ready task, returning immediately.
    ///
    /// `Ok(None)` means no task was ready — the engine signals this with an
    /// absent or empty row, not an error.
    pub async fn take(&self) -> Result<Option<Task>> {
        self.optional_task_op("take", vec![]).await
    }

    /// Take the next ready task, waiting up to `timeout` for one to appear.
    /// The wait happens server-side; the call blocks for its duration.
    pub async fn take_with_timeout(&self, timeout: Duration) -> Result<Option<Task>> {
        self.optional_task_op("take", vec![Value::F64(timeout.as_secs_f64())])
            .await
    }

    /// Extend the time-to-run of a taken task by `increment`.
    ///
    /// `Ok(None)` means the task was not found or not eligible.
    pub async fn touch(&self, task_id: u64, increment: Duration) -> Result<Option<Task>> {
        self.optional_task_op(
            "touch",
            vec![Value::from(task_id), Value::F64(increment.as_secs_f64())],
        )
        .await
    }

    /// Acknowledge a taken task as processed.
    pub async fn ack(&self, task_id: u64) -> Result<Task> {
        self.task_op("ack", vec![Value::from(task_id)]).await
    }

    /// Put a taken task back into the queue.
    pub async fn release(&self, task_id: u64) -> Result<Task> {
        self.task_op("release", vec![Value::from(task_id)]).await
    }

    /// Put a taken task back, with options (e.g. a redelivery delay).
    pub async fn release_with_options(
        &self,
        task_id: u64,
        options: &TaskOptions,
    ) -> Result<Task> {
        let args = if options.is_empty() {
            vec![Value::from(task_id)]
        } else {
            vec![Value::from(task_id), options.to_value()]
        };
        self.task_op("release", args).await
    }

    /// Look at a task without changing its state.
    pub async fn peek(&self, task_id: u64) -> Result<Task> {
        self.task_op("peek", vec![Value::from(task_id)]).await
    }

    /// Set a task aside so it will not be dispatched until kicked.
    pub async fn bury(&self, task_id: u64) -> Result<Task> {
        self.task_op("bury", vec![Value::from(task_id)]).await
    }

    /// Return up to `count` buried tasks to the ready state. Yields the
    /// number of tasks actually kicked.
    pub async fn kick(&self, count: u64) -> Result<u64> {
        let rows = self.call("kick", vec![Value::from(count)]).await?;
        let row = first_row(rows);

        row.first().and_then(Value::as_u64).ok_or_else(|| {
            ClientError::MalformedResponse(format!(
                "kick must return an integer count (got {:?})",
                row
            ))
        })
    }

    /// Remove a task from the queue whatever its state.
    pub async fn delete(&self, task_id: u64) -> Result<Task> {
        self.task_op("delete", vec![Value::from(task_id)]).await
    }

    /// Drop every task in the queue. The engine's reply is discarded.
    pub async fn truncate(&self) -> Result<()> {
        self.call("truncate", vec![]).await?;
        Ok(())
    }

    /// Fetch the full statistics mapping for this queue.
    pub async fn stats(&self) -> Result<Value> {
        let rows = self
            .adapter
            .call(STATS_FUNCTION, vec![Value::from(self.name.as_str())])
            .await?;

        first_row(rows)
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::MalformedResponse("statistics reply is empty".into()))
    }

    /// Fetch statistics and descend to the value at a dot-delimited path,
    /// e.g. `"tasks.ready"`. Path resolution is purely client-side over the
    /// single fetched mapping; an unknown segment fails with
    /// [`ClientError::InvalidPath`] naming the full requested path.
    pub async fn stats_path(&self, path: &str) -> Result<Value> {
        let stats = self.stats().await?;
        resolve_path(&stats, path)
    }

    /// Escape hatch: invoke an arbitrary method under this queue's
    /// namespace, forwarding `args` verbatim, and return the canonical row
    /// sequence unconverted.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Vec<Vec<Value>>> {
        let function = format!("{}{}", self.prefix, method);
        self.adapter.call(&function, args).await
    }

    async fn task_op(&self, operation: &str, args: Vec<Value>) -> Result<Task> {
        let rows = self.call(operation, args).await?;
        Ok(Task::from_tuple(&first_row(rows))?)
    }

    async fn optional_task_op(&self, operation: &str, args: Vec<Value>) -> Result<Option<Task>> {
        let rows = self.call(operation, args).await?;
        let row = first_row(rows);

        if no_task(&row) {
            return Ok(None);
        }
        Ok(Some(Task::from_tuple(&row)?))
    }
}

fn first_row(rows: Vec<Vec<Value>>) -> Vec<Value> {
    rows.into_iter().next().unwrap_or_default()
}

/// An absent row, an empty row, and a row holding one empty tuple are all
/// the same "no eligible task" signal; which one arrives depends on the
/// driver variant behind the caller.
fn no_task(row: &[Value]) -> bool {
    match row {
        [] => true,
        [Value::Array(fields)] => fields.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Recording transport double; a fresh one is built per test case.
    struct MockCaller {
        calls: Mutex<Vec<(String, Vec<Value>)>>,
        responses: Mutex<VecDeque<Result<Vec<Value>>>>,
    }

    impl MockCaller {
        fn respond(raw: Vec<Value>) -> Arc<Self> {
            Self::respond_all(vec![Ok(raw)])
        }

        fn respond_all(responses: Vec<Result<Vec<Value>>>) -> Arc<Self> {
            Arc::new(MockCaller {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into_iter().collect()),
            })
        }

        fn calls(&self) -> Vec<(String, Vec<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteCaller for MockCaller {
        async fn call(&self, function: &str, args: Vec<Value>) -> Result<Vec<Value>> {
            self.calls
                .lock()
                .unwrap()
                .push((function.to_string(), args));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra remote call")
        }
    }

    fn task_row(id: u64, state: &str, data: Value) -> Value {
        Value::Array(vec![Value::from(id), Value::from(state), data])
    }

    #[tokio::test]
    async fn test_put_sends_data_only() {
        let caller = MockCaller::respond(vec![task_row(1, "r", Value::from(42u64))]);
        let queue = Queue::new(caller.clone(), "foo");

        let task = queue.put(Value::from(42u64)).await.unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.tube.foo:put".to_string(), vec![Value::from(42u64)])]
        );
        assert_eq!(task.id(), 1);
        assert!(task.is_ready());
        assert_eq!(task.data(), &Value::from(42u64));
    }

    #[tokio::test]
    async fn test_put_with_options_appends_map() {
        let caller = MockCaller::respond(vec![task_row(1, "~", Value::Nil)]);
        let queue = Queue::new(caller.clone(), "foo");

        let options = TaskOptions::new().delay(2.0);
        let task = queue
            .put_with_options(Value::from("job"), &options)
            .await
            .unwrap();

        assert_eq!(
            caller.calls(),
            vec![(
                "queue.tube.foo:put".to_string(),
                vec![
                    Value::from("job"),
                    Value::Map(vec![(Value::from("delay"), Value::F64(2.0))]),
                ],
            )]
        );
        assert!(task.is_delayed());
    }

    #[tokio::test]
    async fn test_put_with_empty_options_omits_map() {
        let caller = MockCaller::respond(vec![task_row(1, "r", Value::Nil)]);
        let queue = Queue::new(caller.clone(), "foo");

        queue
            .put_with_options(Value::from("job"), &TaskOptions::new())
            .await
            .unwrap();

        assert_eq!(caller.calls()[0].1, vec![Value::from("job")]);
    }

    #[tokio::test]
    async fn test_take_sends_no_arguments() {
        let caller = MockCaller::respond(vec![task_row(3, "t", Value::Nil)]);
        let queue = Queue::new(caller.clone(), "foo");

        let task = queue.take().await.unwrap().unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.tube.foo:take".to_string(), vec![])]
        );
        assert!(task.is_taken());
    }

    #[tokio::test]
    async fn test_take_with_timeout_sends_seconds() {
        let caller = MockCaller::respond(vec![]);
        let queue = Queue::new(caller.clone(), "foo");

        let task = queue
            .take_with_timeout(Duration::from_millis(100))
            .await
            .unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.tube.foo:take".to_string(), vec![Value::F64(0.1)])]
        );
        assert!(task.is_none());
    }

    #[tokio::test]
    async fn test_take_empty_tuple_means_no_task() {
        // Some driver variants report "nothing ready" as one empty tuple
        // rather than an empty result.
        let caller = MockCaller::respond(vec![Value::Array(vec![])]);
        let queue = Queue::new(caller, "foo");

        assert!(queue.take().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_touch_extends_and_reports_task() {
        let caller = MockCaller::respond(vec![task_row(9, "t", Value::Nil)]);
        let queue = Queue::new(caller.clone(), "foo");

        let task = queue.touch(9, Duration::from_secs(5)).await.unwrap();

        assert_eq!(
            caller.calls(),
            vec![(
                "queue.tube.foo:touch".to_string(),
                vec![Value::from(9u64), Value::F64(5.0)],
            )]
        );
        assert_eq!(task.unwrap().id(), 9);
    }

    #[tokio::test]
    async fn test_touch_missing_task_is_none() {
        let caller = MockCaller::respond(vec![]);
        let queue = Queue::new(caller, "foo");

        assert!(queue.touch(9, Duration::from_secs(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_id_operations_send_task_id() {
        for op in ["ack", "release", "peek", "bury", "delete"] {
            let caller = MockCaller::respond(vec![task_row(7, "-", Value::Nil)]);
            let queue = Queue::new(caller.clone(), "foo");

            let task = match op {
                "ack" => queue.ack(7).await.unwrap(),
                "release" => queue.release(7).await.unwrap(),
                "peek" => queue.peek(7).await.unwrap(),
                "bury" => queue.bury(7).await.unwrap(),
                "delete" => queue.delete(7).await.unwrap(),
                _ => unreachable!(),
            };

            assert_eq!(
                caller.calls(),
                vec![(format!("queue.tube.foo:{}", op), vec![Value::from(7u64)])],
                "wrong call for {}",
                op
            );
            assert_eq!(task.id(), 7);
        }
    }

    #[tokio::test]
    async fn test_release_with_options() {
        let caller = MockCaller::respond(vec![task_row(7, "~", Value::Nil)]);
        let queue = Queue::new(caller.clone(), "foo");

        let options = TaskOptions::new().delay(1.5);
        let task = queue.release_with_options(7, &options).await.unwrap();

        assert_eq!(
            caller.calls()[0].1,
            vec![
                Value::from(7u64),
                Value::Map(vec![(Value::from("delay"), Value::F64(1.5))]),
            ]
        );
        assert!(task.is_delayed());
    }

    #[tokio::test]
    async fn test_kick_returns_count() {
        let caller = MockCaller::respond(vec![Value::from(5u64)]);
        let queue = Queue::new(caller.clone(), "foo");

        let kicked = queue.kick(5).await.unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.tube.foo:kick".to_string(), vec![Value::from(5u64)])]
        );
        assert_eq!(kicked, 5);
    }

    #[tokio::test]
    async fn test_kick_rejects_non_integer_reply() {
        let caller = MockCaller::respond(vec![Value::from("five")]);
        let queue = Queue::new(caller, "foo");

        assert!(matches!(
            queue.kick(5).await,
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_truncate_sends_nothing_discards_reply() {
        let caller = MockCaller::respond(vec![Value::from(123u64)]);
        let queue = Queue::new(caller.clone(), "foo");

        queue.truncate().await.unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.tube.foo:truncate".to_string(), vec![])]
        );
    }

    fn stats_mapping() -> Value {
        Value::Map(vec![
            (
                Value::from("tasks"),
                Value::Map(vec![
                    (Value::from("ready"), Value::from(1u64)),
                    (Value::from("done"), Value::from(0u64)),
                ]),
            ),
            (
                Value::from("calls"),
                Value::Map(vec![(Value::from("put"), Value::from(3u64))]),
            ),
        ])
    }

    #[tokio::test]
    async fn test_stats_fetches_whole_mapping() {
        let caller = MockCaller::respond(vec![stats_mapping()]);
        let queue = Queue::new(caller.clone(), "foo");

        let stats = queue.stats().await.unwrap();

        assert_eq!(
            caller.calls(),
            vec![("queue.stats".to_string(), vec![Value::from("foo")])]
        );
        assert_eq!(stats, stats_mapping());
    }

    #[tokio::test]
    async fn test_stats_path_resolves_leaf() {
        let caller = MockCaller::respond(vec![stats_mapping()]);
        let queue = Queue::new(caller, "foo");

        assert_eq!(
            queue.stats_path("tasks.ready").await.unwrap(),
            Value::from(1u64)
        );
    }

    #[tokio::test]
    async fn test_stats_path_single_fetch_per_lookup() {
        let caller = MockCaller::respond(vec![stats_mapping()]);
        let queue = Queue::new(caller.clone(), "foo");

        queue.stats_path("tasks.ready").await.unwrap();

        assert_eq!(caller.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stats_path_invalid_reports_input() {
        for path in ["tasks.foo", "", ".tasks", "tasks."] {
            let caller = MockCaller::respond(vec![stats_mapping()]);
            let queue = Queue::new(caller, "foo");

            match queue.stats_path(path).await {
                Err(ClientError::InvalidPath(reported)) => assert_eq!(reported, path),
                other => panic!("path {:?} must be invalid, got {:?}", path, other),
            }
        }
    }

    #[tokio::test]
    async fn test_escape_hatch_forwards_verbatim() {
        let caller = MockCaller::respond(vec![Value::Array(vec![
            Value::from(1u64),
            Value::from("r"),
            Value::Nil,
        ])]);
        let queue = Queue::new(caller.clone(), "foo");

        let rows = queue
            .call("kick", vec![Value::from(3u64), Value::from("extra")])
            .await
            .unwrap();

        assert_eq!(
            caller.calls(),
            vec![(
                "queue.tube.foo:kick".to_string(),
                vec![Value::from(3u64), Value::from("extra")],
            )]
        );
        // Rows come back unconverted.
        assert_eq!(
            rows,
            vec![vec![Value::from(1u64), Value::from("r"), Value::Nil]]
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates_unchanged() {
        let caller =
            MockCaller::respond_all(vec![Err(ClientError::Server("Task 99 not found".into()))]);
        let queue = Queue::new(caller, "foo");

        match queue.ack(99).await {
            Err(ClientError::Server(message)) => assert_eq!(message, "Task 99 not found"),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_name_is_bound() {
        let caller = MockCaller::respond_all(vec![]);
        let queue = Queue::new(caller, "notifications");

        assert_eq!(queue.name(), "notifications");
    }
}
