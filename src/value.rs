use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::record::Record;
use crate::types::{FieldMap, Key, resolve_position};

// ─── Number ─────────────────────────────────────────────────────────────────

/// Integers compare by value across `I64`/`U64`; floats only equal floats.
#[derive(Clone, Copy)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(i) => write!(f, "I64({})", i),
            Number::U64(u) => write!(f, "U64({})", u),
            Number::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(i) => write!(f, "{}", i),
            Number::U64(u) => write!(f, "{}", u),
            Number::F64(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.1}", v),
            Number::F64(v) => write!(f, "{}", v),
        }
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(i) => Some(i),
            Number::U64(u) => i64::try_from(u).ok(),
            Number::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }
}

impl Number {
    #[inline]
    fn as_i128(self) -> Option<i128> {
        match self {
            Number::I64(i) => Some(i as i128),
            Number::U64(u) => Some(u as i128),
            Number::F64(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::F64(a), Number::F64(b)) => a == b,
            _ => match (self.as_i128(), other.as_i128()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // I64 and U64 holding the same integer must hash alike.
            Number::I64(_) | Number::U64(_) => {
                state.write_u8(0);
                self.as_i128().unwrap_or_default().hash(state);
            }
            // -0.0 and 0.0 compare equal, so they must hash equal.
            Number::F64(f) => {
                state.write_u8(2);
                let f = if *f == 0.0 { 0.0f64 } else { *f };
                f.to_bits().hash(state);
            }
        }
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value. Unfilled positional fields hold this.
    #[default]
    Nil,
    Bool(bool),
    Number(Number),
    Str(SmolStr),
    Array(Vec<Value>),
    Map(FieldMap),
    Record(Record),
}

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// One step of `dig`. Only arrays, maps and records can be dug into.
    pub fn dig_key(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Array(arr), Key::Position(i)) => {
                resolve_position(*i, arr.len()).map(|i| &arr[i])
            }
            (Value::Map(map), Key::Name(name)) => map.get(name),
            (Value::Record(rec), key) => rec.lookup(key),
            _ => None,
        }
    }
}

// NaN is the one value that is not equal to itself.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => n.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Array(arr) => arr.hash(state),
            // Map equality ignores order, so hash entries in key order.
            Value::Map(map) => {
                state.write_usize(map.len());
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Record(r) => r.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            Value::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Record(r) => write!(f, "{}", r),
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match n {
                Number::I64(i) => serializer.serialize_i64(*i),
                Number::U64(u) => serializer.serialize_u64(*u),
                Number::F64(f) => serializer.serialize_f64(*f),
            },
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
            Value::Record(r) => r.serialize(serializer),
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::I64(n as i64))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::U64(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<FieldMap> for Value {
    fn from(map: FieldMap) -> Self {
        Value::Map(map)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(val: Value) -> Self {
        match val {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => match n {
                Number::I64(i) => serde_json::json!(i),
                Number::U64(u) => serde_json::json!(u),
                Number::F64(f) => serde_json::json!(f),
            },
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
            Value::Record(r) => r.to_json(),
        }
    }
}

/// Build a [`FieldMap`] literal: `fields! { "a" => 1, "b" => "two" }`.
#[macro_export]
macro_rules! fields {
    ($($key:expr => $val:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::FieldMap::default();
        $(
            map.insert(
                $crate::SmolStr::new($key),
                $crate::Value::from($val),
            );
        )*
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_becomes_ordered_map() {
        let json = serde_json::json!({"b": 1, "a": [true, null]});
        let v = Value::from(json);
        let map = v.as_map().expect("object");
        assert_eq!(map.get("b"), Some(&Value::from(1i64)));
        assert_eq!(
            map.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Nil]))
        );
    }

    #[test]
    fn test_dig_key_on_containers() {
        let arr = Value::from(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(arr.dig_key(&Key::Position(-1)), Some(&Value::from(2i64)));
        assert_eq!(arr.dig_key(&Key::Position(2)), None);
        assert_eq!(arr.dig_key(&Key::from("x")), None);

        let map = Value::from(crate::fields! { "k" => "v" });
        assert_eq!(map.dig_key(&Key::from("k")), Some(&Value::from("v")));
        assert_eq!(map.dig_key(&Key::Position(0)), None);

        assert_eq!(Value::from(3i64).dig_key(&Key::Position(0)), None);
        assert_eq!(Value::Nil.dig_key(&Key::from("k")), None);
    }

    #[test]
    fn test_display_literals() {
        let v = Value::from(vec![
            Value::Nil,
            Value::from(1i64),
            Value::from(2.0f64),
            Value::from("s"),
        ]);
        assert_eq!(v.to_string(), r#"[nil, 1, 2.0, "s"]"#);
        assert_eq!(Value::from(crate::fields! { "a" => 1 }).to_string(), "{a: 1}");
    }

    #[test]
    fn test_option_maps_none_to_nil() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some(5i64)), Value::from(5i64));
    }

    #[test]
    fn test_integers_equal_across_widths() {
        use std::collections::hash_map::DefaultHasher;
        let digest = |v: &Value| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };

        assert_eq!(Value::from(5u64), Value::from(5i64));
        assert_eq!(digest(&Value::from(5u64)), digest(&Value::from(5i64)));
        assert_ne!(Value::from(u64::MAX), Value::from(-1i64));
        assert_ne!(Value::from(1i64), Value::from(1.0f64));
    }

    #[test]
    fn test_float_to_i64_rejects_two_pow_63() {
        assert_eq!(Number::F64(9_223_372_036_854_775_808.0).as_i64(), None);
        assert_eq!(Number::F64(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
        assert_eq!(Number::F64(42.0).as_i64(), Some(42));
        assert_eq!(Number::F64(1.5).as_i64(), None);
    }
}
