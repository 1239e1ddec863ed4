/// Lifecycle stage of a queue entry, as reported by the remote engine.
///
/// The engine encodes the state as a single-character code inside each
/// returned tuple. The five codes below are the closed set the engine
/// defines; an unrecognized code is carried through untouched by
/// [`Task`](crate::Task) and simply matches none of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Task is waiting to be taken by a consumer
    Ready,
    /// Task is currently held by a consumer
    Taken,
    /// Task was acknowledged and is awaiting removal
    Done,
    /// Task was set aside and will not be dispatched until kicked
    Buried,
    /// Task is not yet eligible for dispatch
    Delayed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Ready => "r",
            TaskState::Taken => "t",
            TaskState::Done => "-",
            TaskState::Buried => "!",
            TaskState::Delayed => "~",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "r" => Some(TaskState::Ready),
            "t" => Some(TaskState::Taken),
            "-" => Some(TaskState::Done),
            "!" => Some(TaskState::Buried),
            "~" => Some(TaskState::Delayed),
            _ => None,
        }
    }

    pub const ALL: [TaskState; 5] = [
        TaskState::Ready,
        TaskState::Taken,
        TaskState::Done,
        TaskState::Buried,
        TaskState::Delayed,
    ];
}
