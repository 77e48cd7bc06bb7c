use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::MetadataParseError;

/// One host being banned: when, for how long, and how often so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanRecord {
    pub host_address: String,
    /// Epoch seconds.
    #[serde(rename = "banned_on")]
    pub banned_at: i64,
    /// Seconds, never negative.
    #[serde(rename = "banned_for")]
    pub ban_duration: i64,
    pub ban_count: u64,
    /// Whatever fail2ban stored alongside the ban; `null` when absent or
    /// unreadable.
    #[serde(rename = "ban_data")]
    pub metadata: Value,
}

impl BanRecord {
    pub fn new(host_address: impl Into<String>, banned_at: i64, ban_duration: i64, ban_count: u64) -> Self {
        Self {
            host_address: host_address.into(),
            banned_at,
            ban_duration: ban_duration.max(0),
            ban_count,
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// End of the ban window in epoch seconds.
    pub fn banned_until(&self) -> i64 {
        self.banned_at.saturating_add(self.ban_duration)
    }

    pub fn banned_on_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.banned_at, 0)
    }

    /// `failures` counter from the metadata, if fail2ban recorded one.
    pub fn failures(&self) -> Option<u64> {
        self.metadata.get("failures").and_then(Value::as_u64)
    }
}

/// Decodes the metadata column, tolerating comments the way the config
/// parser does. An empty column is empty metadata, not an error.
pub fn parse_metadata(raw: &[u8]) -> Result<Value, MetadataParseError> {
    let text = std::str::from_utf8(raw)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(json5::from_str(text)?)
}

/// Like [`parse_metadata`], but logs and swallows failures.
pub fn metadata_or_empty(raw: &[u8], host: &str) -> Value {
    parse_metadata(raw).unwrap_or_else(|e| {
        tracing::debug!(host = %host, error = %e, "Ignoring unreadable ban metadata");
        Value::Null
    })
}
