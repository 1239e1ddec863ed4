use crate::{RemoteCaller, Result};
use rmpv::Value;
use std::sync::Arc;
use tracing::debug;

/// Remote function answering the statistics query. Takes the queue name as
/// its sole argument and is not namespaced per queue.
pub const STATS_FUNCTION: &str = "queue.stats";

/// Normalize a raw driver result into the canonical sequence of rows.
///
/// Historical driver variants return one of:
///  1. a sequence of rows, `[[id, state, data], ...]`
///  2. a flat scalar row, `[value]`
///  3. an empty sequence, `[]`
///
/// The heuristic: if the first element is itself indexable at position 1,
/// the whole result already is a sequence of rows; otherwise the result is
/// one row and gets wrapped. The statistics function is the named
/// exception — its single mapping result is always wrapped as one row,
/// whatever it looks like.
pub fn normalize(function: &str, raw: Vec<Value>) -> Vec<Vec<Value>> {
    if function == STATS_FUNCTION {
        return vec![raw];
    }

    let row_shaped = matches!(raw.first(), Some(Value::Array(first)) if first.len() > 1);
    if row_shaped {
        raw.into_iter()
            .map(|row| match row {
                Value::Array(fields) => fields,
                other => vec![other],
            })
            .collect()
    } else {
        vec![raw]
    }
}

/// One canonical calling convention over any [`RemoteCaller`] variant.
///
/// Issues exactly one remote call per invocation and reshapes the result
/// with [`normalize`], so callers can uniformly index row 0 and its fields.
#[derive(Clone)]
pub struct CallAdapter {
    caller: Arc<dyn RemoteCaller>,
}

impl CallAdapter {
    pub fn new(caller: Arc<dyn RemoteCaller>) -> Self {
        CallAdapter { caller }
    }

    pub async fn call(&self, function: &str, args: Vec<Value>) -> Result<Vec<Vec<Value>>> {
        let raw = self.caller.call(function, args).await?;
        let rows = normalize(function, raw);
        debug!(function, rows = rows.len(), "remote call completed");
        Ok(rows)
    }
}
