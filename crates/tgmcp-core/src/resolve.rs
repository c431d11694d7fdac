//! Normalization of caller-supplied chat/user references.

use serde_json::Value;

use crate::{domain::ChatRef, errors::Error, Result};

/// Normalize a string reference: integer-valued strings become ids, anything
/// else is a handle with one leading `@` marker stripped.
pub fn resolve_chat_str(raw: &str) -> ChatRef {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) => ChatRef::Id(id),
        Err(_) => ChatRef::Handle(trimmed.strip_prefix('@').unwrap_or(trimmed).to_string()),
    }
}

/// Normalize a JSON argument (`integer` or `string`) into a [`ChatRef`].
pub fn resolve_chat_ref(field: &str, raw: &Value) -> Result<ChatRef> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(ChatRef::Id)
            .ok_or_else(|| Error::invalid(format!("{field} must be an integer or a string"))),
        Value::String(s) if !s.trim().is_empty() => Ok(resolve_chat_str(s)),
        Value::String(_) => Err(Error::invalid(format!("{field} must not be empty"))),
        _ => Err(Error::invalid(format!(
            "{field} must be an integer or a string"
        ))),
    }
}

/// Like [`resolve_chat_ref`] for optional arguments; `null`, `""` and `0` count as absent.
pub fn resolve_opt_chat_ref(args: &Value, field: &str) -> Result<Option<ChatRef>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(None),
        Some(v) => resolve_chat_ref(field, v).map(Some),
    }
}
