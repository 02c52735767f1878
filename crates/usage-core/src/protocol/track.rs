//! Tracking payload (JSON) and the label key it resolves to.
//!
//! Decoding is lenient the same way the callback producers expect: only the
//! first JSON value in the body is read, unknown fields are ignored, and
//! `null` (top-level or per field) reads as empty. Any other non-object
//! top-level value is rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, UsageError};

/// One reported request, as posted to the tracking route.
///
/// `host` and `method` are informational: they are logged but never take
/// part in the label key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub method: String,
}

fn null_as_empty<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl TrackRequest {
    /// Decode a request body. Content type is not consulted.
    ///
    /// Bytes after the first value are not inspected.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let value = serde_json::Deserializer::from_slice(body)
            .into_iter::<Value>()
            .next()
            .ok_or_else(|| UsageError::InvalidJson("empty body".into()))?
            .map_err(|e| UsageError::InvalidJson(e.to_string()))?;

        match value {
            Value::Null => Ok(TrackRequest::default()),
            Value::Object(_) => TrackRequest::deserialize(value)
                .map_err(|e| UsageError::InvalidJson(e.to_string())),
            other => Err(UsageError::InvalidJson(format!(
                "expected object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Resolve the label key, rejecting an empty user.
    pub fn label_key(&self) -> Result<LabelKey> {
        LabelKey::new(self.user.clone(), self.groups.clone(), self.path.clone())
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The `(user, groups, path)` triple used to bucket counts.
///
/// Equality is literal string equality on all three fields: no trimming,
/// case folding, or reordering of group lists. Ordering follows field order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    user: String,
    groups: String,
    path: String,
}

impl LabelKey {
    /// `user` must be non-empty; `groups` and `path` may be empty.
    pub fn new(
        user: impl Into<String>,
        groups: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self> {
        let user = user.into();
        if user.is_empty() {
            return Err(UsageError::MissingUser);
        }
        Ok(Self {
            user,
            groups: groups.into(),
            path: path.into(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn groups(&self) -> &str {
        &self.groups
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
