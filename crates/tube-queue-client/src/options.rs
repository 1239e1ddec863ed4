use rmpv::Value;

/// Per-task options for `put` and `release`.
///
/// Only the keys that were explicitly set are sent; when nothing is set the
/// options argument is omitted from the call entirely. Which keys a given
/// queue honors depends on the tube type configured server-side (plain fifo
/// tubes ignore `ttl`/`ttr`, utube tubes add `utube`, and so on) — unknown
/// keys are the engine's problem, not ours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskOptions {
    pri: Option<u64>,
    ttl: Option<f64>,
    ttr: Option<f64>,
    delay: Option<f64>,
    utube: Option<String>,
}

impl TaskOptions {
    pub fn new() -> Self {
        TaskOptions::default()
    }

    /// Priority; lower values are dispatched first.
    pub fn pri(mut self, pri: u64) -> Self {
        self.pri = Some(pri);
        self
    }

    /// Time to live, in seconds.
    pub fn ttl(mut self, ttl: f64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Time to run once taken, in seconds.
    pub fn ttr(mut self, ttr: f64) -> Self {
        self.ttr = Some(ttr);
        self
    }

    /// Delay before the task becomes ready, in seconds.
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sub-queue name, for utube-type tubes.
    pub fn utube(mut self, utube: impl Into<String>) -> Self {
        self.utube = Some(utube.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pri.is_none()
            && self.ttl.is_none()
            && self.ttr.is_none()
            && self.delay.is_none()
            && self.utube.is_none()
    }

    /// Render the set keys as the map the remote operation expects.
    pub fn to_value(&self) -> Value {
        let mut entries = Vec::new();

        if let Some(pri) = self.pri {
            entries.push((Value::from("pri"), Value::from(pri)));
        }
        if let Some(ttl) = self.ttl {
            entries.push((Value::from("ttl"), Value::F64(ttl)));
        }
        if let Some(ttr) = self.ttr {
            entries.push((Value::from("ttr"), Value::F64(ttr)));
        }
        if let Some(delay) = self.delay {
            entries.push((Value::from("delay"), Value::F64(delay)));
        }
        if let Some(utube) = &self.utube {
            entries.push((Value::from("utube"), Value::from(utube.as_str())));
        }

        Value::Map(entries)
    }
}
