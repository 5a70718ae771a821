//! Structured fields and request context
//!
//! This module provides:
//! - `FieldValue`: the value type carried by structured fields
//! - `Fields`: an immutable field map shared by a logger and copied on derivation
//! - `ContextKey` / `ContextLookup` / `RequestContext`: a small registry of
//!   well-known request-scoped keys and the store they are read from

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    /// Arbitrary structured value (arrays, objects)
    Json(serde_json::Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Json(serde_json::Value::String(s)) => write!(f, "{}", s),
            FieldValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Json(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null | FieldValue::Json(serde_json::Value::Null))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u64::from(u))
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Immutable map of structured fields attached to a logger
///
/// Cloning is cheap (the map is reference counted). The map is never
/// modified after construction: [`Fields::merged`] builds a new map and
/// leaves the receiver untouched, so loggers derived from one another can
/// be used from different threads without coordinating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    inner: Arc<BTreeMap<String, FieldValue>>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of `self` and `extra`; `extra` wins on key conflicts
    #[must_use]
    pub fn merged<I, K, V>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut extra = extra.into_iter().peekable();
        if extra.peek().is_none() {
            return self.clone();
        }

        let mut map = BTreeMap::clone(&self.inner);
        for (key, value) in extra {
            map.insert(key.into(), value.into());
        }
        Self {
            inner: Arc::new(map),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Format fields as space separated key=value pairs
    pub fn format_fields(&self) -> String {
        self.inner
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields::new().merged(iter)
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

/// Well-known request-scoped keys copied into a logger by `Logger::with_context`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    RequestId,
    UserId,
}

impl ContextKey {
    pub const WELL_KNOWN: [ContextKey; 2] = [ContextKey::RequestId, ContextKey::UserId];

    /// Field name used when the value is attached to a record
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::RequestId => "request_id",
            ContextKey::UserId => "user_id",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of request-scoped values
///
/// Implement this for whatever context type an application already threads
/// through its call chains (request extensions, task locals, ...).
pub trait ContextLookup {
    fn lookup(&self, key: ContextKey) -> Option<FieldValue>;
}

/// Request-scoped key/value store passed explicitly through call chains
///
/// # Example
///
/// ```
/// use leveled_logger::{ContextKey, RequestContext};
///
/// let ctx = RequestContext::new()
///     .with_value(ContextKey::RequestId, "req-42")
///     .with_value(ContextKey::UserId, 7);
/// assert_eq!(ctx.get(ContextKey::RequestId).map(ToString::to_string).as_deref(), Some("req-42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    values: HashMap<ContextKey, FieldValue>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value<V: Into<FieldValue>>(mut self, key: ContextKey, value: V) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn insert<V: Into<FieldValue>>(&mut self, key: ContextKey, value: V) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: ContextKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ContextLookup for RequestContext {
    fn lookup(&self, key: ContextKey) -> Option<FieldValue> {
        self.values.get(&key).cloned()
    }
}

impl ContextLookup for HashMap<ContextKey, FieldValue> {
    fn lookup(&self, key: ContextKey) -> Option<FieldValue> {
        self.get(&key).cloned()
    }
}

/// Collect the well-known keys that `ctx` holds a non-null value for
pub(crate) fn context_fields<C>(ctx: &C) -> Vec<(&'static str, FieldValue)>
where
    C: ContextLookup + ?Sized,
{
    ContextKey::WELL_KNOWN
        .iter()
        .filter_map(|key| {
            ctx.lookup(*key)
                .filter(|value| !value.is_null())
                .map(|value| (key.as_str(), value))
        })
        .collect()
}
