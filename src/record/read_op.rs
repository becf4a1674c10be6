use smol_str::SmolStr;

use super::record::Record;
use crate::error::RecordError;
use crate::types::*;
use crate::value::Value;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Enumeration
    // ════════════════════════════════════════════════════════════════════════

    /// Lazy iterator over values in field order. Clone it to restart.
    #[inline]
    pub fn iter(&self) -> Values<'_> {
        self.values.values()
    }

    /// Call `f` once per value in field order.
    pub fn each<F: FnMut(&Value)>(&self, mut f: F) -> &Self {
        self.values.values().for_each(|v| f(v));
        self
    }

    /// Lazy iterator over `(field, value)` pairs in field order.
    #[inline]
    pub fn pairs(&self) -> Pairs<'_> {
        self.values.iter()
    }

    pub fn each_pair<F: FnMut(&SmolStr, &Value)>(&self, mut f: F) -> &Self {
        self.values.iter().for_each(|(k, v)| f(k, v));
        self
    }

    // ════════════════════════════════════════════════════════════════════════
    // Conversions
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn to_map(&self) -> &FieldMap {
        &self.values
    }

    pub fn into_map(self) -> FieldMap {
        self.values
    }

    pub fn values(&self) -> Vec<Value> {
        self.values.values().cloned().collect()
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<Value> {
        self.values()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Introspection
    // ════════════════════════════════════════════════════════════════════════

    /// Number of fields, including ones that were never filled.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn members(&self) -> Vec<SmolStr> {
        self.values.keys().cloned().collect()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════

    pub fn select<P: FnMut(&Value) -> bool>(&self, mut predicate: P) -> Vec<Value> {
        self.values
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    /// Values at the given positions, in request order. A position outside
    /// the record gives `Nil`.
    pub fn values_at<I: IntoIterator<Item = i64>>(&self, positions: I) -> Vec<Value> {
        positions
            .into_iter()
            .map(|i| {
                resolve_position(i, self.values.len())
                    .and_then(|i| self.values.get_index(i))
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Read a field by position or by name.
    pub fn get(&self, key: impl Into<Key>) -> Result<&Value, RecordError> {
        let idx = self.resolve(&key.into())?;
        self.values
            .get_index(idx)
            .map(|(_, v)| v)
            .ok_or(RecordError::IndexOutOfRange {
                index: idx as i64,
                size: self.values.len(),
            })
    }

    /// Non-failing lookup: `None` where [`Record::get`] would error.
    pub fn lookup(&self, key: &Key) -> Option<&Value> {
        let idx = self.resolve(key).ok()?;
        self.values.get_index(idx).map(|(_, v)| v)
    }

    /// Follow `keys` through this record and whatever it contains.
    ///
    /// Gives `Ok(None)` as soon as a step finds nothing or reaches a value
    /// that cannot be dug into. At least one key is required.
    pub fn dig<I, K>(&self, keys: I) -> Result<Option<&Value>, RecordError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let mut keys = keys.into_iter().map(Into::into);
        let first = keys.next().ok_or(RecordError::WrongArgumentCount {
            given: 0,
            expected: "1+",
        })?;
        let mut current = match self.lookup(&first) {
            Some(v) => v,
            None => return Ok(None),
        };
        for key in keys {
            current = match current.dig_key(&key) {
                Some(v) => v,
                None => return Ok(None),
            };
        }
        Ok(Some(current))
    }

    /// Resolve a key to a slot in the value mapping.
    pub(crate) fn resolve(&self, key: &Key) -> Result<usize, RecordError> {
        match key {
            Key::Position(i) => {
                resolve_position(*i, self.values.len()).ok_or(RecordError::IndexOutOfRange {
                    index: *i,
                    size: self.values.len(),
                })
            }
            Key::Name(name) => self
                .values
                .get_index_of(name.as_str())
                .ok_or_else(|| RecordError::UnknownMember(name.clone())),
        }
    }
}
