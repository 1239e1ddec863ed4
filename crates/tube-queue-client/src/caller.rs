use crate::Result;
use async_trait::async_trait;
use rmpv::Value;

/// Transport capability supplied by the embedding application.
///
/// An implementation invokes the named remote function with positional
/// arguments and returns the raw top-level result sequence, in whatever
/// shape the underlying driver produces; [`normalize`](crate::normalize)
/// reconciles the historical shape differences afterwards.
///
/// Failures from the network or the remote engine (unknown task id, bad
/// argument type, connection loss) map into [`ClientError::Connection`]
/// or [`ClientError::Server`](crate::ClientError) and propagate to the
/// caller unchanged — no retries happen anywhere in this crate.
///
/// [`ClientError::Connection`]: crate::ClientError::Connection
#[async_trait]
pub trait RemoteCaller: Send + Sync {
    async fn call(&self, function: &str, args: Vec<Value>) -> Result<Vec<Value>>;
}
