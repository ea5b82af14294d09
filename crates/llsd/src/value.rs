//! [`Value`] — the tagged-union value model shared by all llsd codecs.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// The tag identifying which of the nine llsd types a [`Value`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Boolean,
    Integer,
    Real,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Array,
    Map,
}

/// A dynamically-typed llsd value.
///
/// Every value holds exactly one kind; changing kind means replacing the
/// value. Trees of [`Value::Array`] / [`Value::Map`] may nest arbitrarily
/// deep and are assumed cycle-free by the codecs.
///
/// Map entries are unordered — callers must not depend on iteration
/// order, and the codecs may serialize a decoded map in a different entry
/// order than the wire input.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Boolean(bool),
    Integer(i32),
    Real(f64),
    String(String),
    Uuid(Uuid),
    Date(DateTime<Utc>),
    Uri(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// The undefined value, usable where a `&Value` default is needed.
    pub const UNDEF: Value = Value::Undefined;

    /// Builds a URI value. URI shares `String` as its payload type, so it
    /// gets a named constructor instead of a `From` impl.
    pub fn uri(uri: impl Into<String>) -> Value {
        Value::Uri(uri.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Boolean(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Real(_) => Kind::Real,
            Value::String(_) => Kind::String,
            Value::Uuid(_) => Kind::Uuid,
            Value::Date(_) => Kind::Date,
            Value::Uri(_) => Kind::Uri,
            Value::Binary(_) => Kind::Binary,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Element count of an array or map; 0 for every other kind.
    pub fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.len(),
            Value::Map(entries) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map lookup. Returns [`Value::UNDEF`] for a missing key or a
    /// non-map value.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Map(entries) => entries.get(key).unwrap_or(&Value::UNDEF),
            _ => &Value::UNDEF,
        }
    }

    /// Array indexing. Returns [`Value::UNDEF`] out of range or for a
    /// non-array value.
    pub fn index(&self, i: usize) -> &Value {
        match self {
            Value::Array(items) => items.get(i).unwrap_or(&Value::UNDEF),
            _ => &Value::UNDEF,
        }
    }

    // ------------------------------------------------------------------
    // Coercion accessors. Total: a kind with no natural interpretation in
    // the target type yields that type's canonical default.
    // ------------------------------------------------------------------

    pub fn as_boolean(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Real(r) => !r.is_nan() && *r != 0.0,
            Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
            _ => false,
        }
    }

    pub fn as_integer(&self) -> i32 {
        match self {
            Value::Boolean(b) => i32::from(*b),
            Value::Integer(i) => *i,
            // `as` truncates toward zero, saturates out of range, maps NaN to 0
            Value::Real(r) => *r as i32,
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i32>()
                    .unwrap_or_else(|_| s.parse::<f64>().map(|r| r as i32).unwrap_or(0))
            }
            Value::Date(d) => d.timestamp() as i32,
            _ => 0,
        }
    }

    pub fn as_real(&self) -> f64 {
        match self {
            Value::Boolean(b) => f64::from(*b),
            Value::Integer(i) => f64::from(*i),
            Value::Real(r) => *r,
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Date(d) => date_to_secs(d),
            _ => 0.0,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Value::Boolean(b) => if *b { "true" } else { "false" }.to_owned(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::String(s) => s.clone(),
            Value::Uuid(u) => u.to_string(),
            Value::Date(d) => format_date(d),
            Value::Uri(u) => u.clone(),
            Value::Binary(b) => String::from_utf8(b.clone()).unwrap_or_default(),
            _ => String::new(),
        }
    }

    pub fn as_uuid(&self) -> Uuid {
        match self {
            Value::Uuid(u) => *u,
            Value::String(s) => Uuid::parse_str(s.trim()).unwrap_or(Uuid::nil()),
            Value::Binary(b) if b.len() == 16 => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(b);
                Uuid::from_bytes(bytes)
            }
            _ => Uuid::nil(),
        }
    }

    pub fn as_date(&self) -> DateTime<Utc> {
        match self {
            Value::Date(d) => *d,
            Value::String(s) => parse_date(s).unwrap_or(epoch()),
            Value::Real(r) => date_from_secs(*r),
            Value::Integer(i) => date_from_secs(f64::from(*i)),
            _ => epoch(),
        }
    }

    pub fn as_uri(&self) -> String {
        match self {
            Value::Uri(u) => u.clone(),
            Value::String(s) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn as_binary(&self) -> Vec<u8> {
        match self {
            Value::Binary(b) => b.clone(),
            Value::String(s) => s.as_bytes().to_vec(),
            Value::Uuid(u) => u.as_bytes().to_vec(),
            // An array coerces to binary only when every element is an
            // integer in [0, 255]; one byte per element, in order.
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Integer(i) if (0..=255).contains(i) => out.push(*i as u8),
                        _ => return Vec::new(),
                    }
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Binary(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Binary(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(entries: HashMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

/// The Unix epoch — the canonical "empty" date.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Seconds since epoch, sub-second precision carried in the fraction.
pub fn date_to_secs(d: &DateTime<Utc>) -> f64 {
    d.timestamp() as f64 + f64::from(d.timestamp_subsec_nanos()) / 1e9
}

pub fn date_from_secs(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() {
        return epoch();
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999)).unwrap_or_else(epoch)
}

/// ISO-8601 in UTC; the fraction is written only when present.
pub fn format_date(d: &DateTime<Utc>) -> String {
    if d.timestamp_subsec_nanos() == 0 {
        d.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        d.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Timezone offsets are normalized to UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
