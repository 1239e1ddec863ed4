use crate::{ClientError, Result};
use rmpv::Value;

/// Descend through nested maps by a dot-delimited key path.
///
/// Operates purely on the already-fetched statistics mapping; never talks
/// to the remote engine. Any miss — empty segment, absent key, or a segment
/// applied to a non-map — fails with the full original path string so the
/// caller sees exactly what they asked for.
pub(crate) fn resolve_path(root: &Value, path: &str) -> Result<Value> {
    let mut current = root;

    for segment in path.split('.') {
        if segment.is_empty() {
            return Err(ClientError::InvalidPath(path.to_string()));
        }

        let next = match current {
            Value::Map(entries) => entries
                .iter()
                .find(|(key, _)| key.as_str() == Some(segment))
                .map(|(_, value)| value),
            _ => None,
        };

        current = next.ok_or_else(|| ClientError::InvalidPath(path.to_string()))?;
    }

    Ok(current.clone())
}
