use super::record::Record;
use crate::error::RecordError;
use crate::types::Key;
use crate::value::Value;

impl Record {
    /// Rewrite one field by position or by name.
    ///
    /// The record is untouched when the key does not resolve.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<(), RecordError> {
        self.replace(key, value).map(|_| ())
    }

    /// Rewrite one field and hand back what it held before.
    pub fn replace(
        &mut self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<Value, RecordError> {
        let idx = self.resolve(&key.into())?;
        let size = self.values.len();
        let (_, slot) = self
            .values
            .get_index_mut(idx)
            .ok_or(RecordError::IndexOutOfRange {
                index: idx as i64,
                size,
            })?;
        Ok(std::mem::replace(slot, value.into()))
    }
}
