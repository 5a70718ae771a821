//! Output format for log records
//!
//! Provides the two line formats a logger can be configured with:
//! - Text: human-readable, optionally colored by level
//! - Json: one self-contained JSON object per line

use super::error::Result;
use super::log_context::Fields;
use super::log_record::LogRecord;
use serde::{Deserialize, Serialize};

const COLOR_RESET: &str = "\x1b[0m";

/// Top-level JSON keys owned by the envelope. User fields with these names
/// are moved under `fields.<key>` (or `fields.<key>.N` when the record
/// already carries a field by that name); `caller` is not listed and may be
/// overwritten by a user field of the same name.
const RESERVED_KEYS: [&str; 3] = ["time", "level", "message"];

/// First `fields.<key>`, `fields.<key>.2`, ... not already used by `fields`
fn relocated_key(key: &str, fields: &Fields) -> String {
    let base = format!("fields.{}", key);
    if !fields.contains_key(&base) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}.{}", base, n);
        if !fields.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[INFO] 2025-01-08T10:30:45+02:00 main.rs:12 Request processed | user=alice`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"caller":"main.rs:12","level":"INFO","message":"Request processed","time":"2025-01-08T10:30:45+02:00","user":"alice"}`
    Json,
}

impl OutputFormat {
    /// Render a record as a single line, without the trailing newline
    ///
    /// `use_colors` only affects the text format.
    pub fn format(&self, record: &LogRecord<'_>, use_colors: bool) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(self.format_text(record, use_colors)),
            OutputFormat::Json => self.format_json(record),
        }
    }

    /// Format as `[LEVEL] TIMESTAMP [CALLER] MESSAGE [| k=v ...]`
    fn format_text(&self, record: &LogRecord<'_>, use_colors: bool) -> String {
        let mut line = format!("[{}] {}", record.level.to_str(), record.rfc3339());

        if let Some(caller) = record.caller {
            line.push(' ');
            line.push_str(&caller.to_string());
        }

        line.push(' ');
        line.push_str(&record.message);

        if !record.fields.is_empty() {
            line.push_str(" | ");
            line.push_str(&record.fields.format_fields());
        }

        if use_colors {
            format!("{}{}{}", record.level.ansi_prefix(), line, COLOR_RESET)
        } else {
            line
        }
    }

    /// Format as a flat JSON object
    fn format_json(&self, record: &LogRecord<'_>) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "time".to_string(),
            serde_json::Value::String(record.rfc3339()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );

        if let Some(caller) = record.caller {
            json_obj.insert(
                "caller".to_string(),
                serde_json::Value::String(caller.to_string()),
            );
        }

        for (key, value) in record.fields.iter() {
            let key = if RESERVED_KEYS.contains(&key) {
                relocated_key(key, record.fields)
            } else {
                key.to_string()
            };
            json_obj.insert(key, value.to_json_value());
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
    }
}
