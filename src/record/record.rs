use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh64::Xxh64;

use crate::error::RecordError;
use crate::record_type::RecordType;
use crate::types::FieldMap;
use crate::value::Value;

// ─── Record ─────────────────────────────────────────────────────────────────
/// One value of a [`RecordType`]: an ordered field name → value mapping plus
/// a handle to the type that built it.
///
/// Fields can be rewritten through [`Record::set`] but never added or removed.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) record_type: RecordType,
    pub(crate) values: FieldMap,
}

impl Record {
    #[inline]
    pub(crate) fn from_parts(record_type: RecordType, values: FieldMap) -> Self {
        Self {
            record_type,
            values,
        }
    }

    #[inline]
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Invoke an extension method defined on this record's type.
    pub fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, RecordError> {
        let f = self
            .record_type
            .method(method)
            .ok_or_else(|| RecordError::UnknownMember(method.into()))?;
        f(self, args)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Identity
    // ════════════════════════════════════════════════════════════════════════

    /// Digest of (type identity, ordered values). Stable within a process.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Hash-based equality: true iff both records have the same
    /// [`Record::hash_code`].
    #[inline]
    pub fn eql(&self, other: &Record) -> bool {
        self.hash_code() == other.hash_code()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone().into()))
                .collect(),
        )
    }
}

/// Same concrete type and element-wise equal values.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.record_type == other.record_type
            && self.values.len() == other.values.len()
            && self.values.values().eq(other.values.values())
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record_type.hash(state);
        state.write_usize(self.values.len());
        for v in self.values.values() {
            v.hash(state);
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<record")?;
        if let Some(name) = self.record_type.name() {
            write!(f, " {}", name)?;
        }
        for (i, (k, v)) in self.values.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}={}", k, v)?;
        }
        f.write_str(">")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}
