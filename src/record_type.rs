//! Record type descriptors.
//!
//! A [`RecordType`] is a cheap-to-clone handle. Two handles are the same type
//! only if they come from the same definition; matching field lists are not
//! enough.

use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::error::RecordError;
use crate::factory::TypeDef;
use crate::record::Record;
use crate::types::{FastMap, FieldMap};
use crate::value::Value;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// An extension method attached at definition time.
pub type Method = Arc<dyn Fn(&mut Record, &[Value]) -> Result<Value, RecordError> + Send + Sync>;

// ─── Accessor ───────────────────────────────────────────────────────────────

/// Get/set pair for one declared field. Built once per type and shared by
/// every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    name: SmolStr,
    position: usize,
}

impl Accessor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot of the field in the type's declaration.
    ///
    /// Keyword records keep the order of the mapping they were built from,
    /// so this need not be the field's index in a given instance. [`get`]
    /// and [`set`] always go through the name.
    ///
    /// [`get`]: Accessor::get
    /// [`set`]: Accessor::set
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn get<'r>(&self, record: &'r Record) -> Result<&'r Value, RecordError> {
        record.get(&self.name)
    }

    pub fn set(&self, record: &mut Record, value: impl Into<Value>) -> Result<(), RecordError> {
        record.set(&self.name, value)
    }
}

// ─── RecordType ─────────────────────────────────────────────────────────────

struct TypeInner {
    id: u64,
    name: Option<SmolStr>,
    fields: Vec<SmolStr>,
    keyword_init: bool,
    accessors: FastMap<SmolStr, Accessor>,
    methods: FastMap<SmolStr, Method>,
}

#[derive(Clone)]
pub struct RecordType {
    inner: Arc<TypeInner>,
}

impl RecordType {
    pub(crate) fn from_def(def: TypeDef) -> Self {
        let TypeDef {
            name,
            fields,
            keyword_init,
            methods,
        } = def;
        let accessors = fields
            .iter()
            .enumerate()
            .map(|(position, name)| {
                (
                    name.clone(),
                    Accessor {
                        name: name.clone(),
                        position,
                    },
                )
            })
            .collect();
        Self {
            inner: Arc::new(TypeInner {
                id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
                name,
                fields,
                keyword_init,
                accessors,
                methods,
            }),
        }
    }

    /// Unique identity of this type within the process.
    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Declared fields in order.
    #[inline]
    pub fn fields(&self) -> &[SmolStr] {
        &self.inner.fields
    }

    #[inline]
    pub fn keyword_init(&self) -> bool {
        self.inner.keyword_init
    }

    pub fn accessor(&self, field: &str) -> Option<&Accessor> {
        self.inner.accessors.get(field)
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.inner.methods.get(name).cloned()
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.inner.methods.contains_key(name)
    }

    /// Extension method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.methods.keys().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }

    // ════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════

    /// Build an instance from positional values.
    ///
    /// Fields past the last supplied value are `Nil`.
    pub fn construct<I, V>(&self, values: I) -> Result<Record, RecordError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.keyword_init() {
            return Err(RecordError::WrongConstructor { keyword_init: true });
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let max = self.inner.fields.len();
        if values.len() > max {
            return Err(RecordError::TooManyValues {
                given: values.len(),
                max,
            });
        }

        let mut supplied = values.into_iter();
        let map: FieldMap = self
            .inner
            .fields
            .iter()
            .map(|f| (f.clone(), supplied.next().unwrap_or_default()))
            .collect();
        trace!(record_type = %self, "constructed positional record");
        Ok(Record::from_parts(self.clone(), map))
    }

    /// Build an instance from a single mapping that covers every declared
    /// field. The mapping is kept as supplied, extra keys included.
    pub fn construct_keyword(&self, map: FieldMap) -> Result<Record, RecordError> {
        if !self.keyword_init() {
            return Err(RecordError::WrongConstructor {
                keyword_init: false,
            });
        }
        let missing: Vec<SmolStr> = self
            .inner
            .fields
            .iter()
            .filter(|f| !map.contains_key(f.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RecordError::UnknownKeywords(missing));
        }
        trace!(record_type = %self, fields = map.len(), "constructed keyword record");
        Ok(Record::from_parts(self.clone(), map))
    }

    /// Keyword construction from a JSON object.
    pub fn construct_json(&self, json: serde_json::Value) -> Result<Record, RecordError> {
        match Value::from(json) {
            Value::Map(map) => self.construct_keyword(map),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields)
            .field("keyword_init", &self.inner.keyword_init)
            .field("methods", &self.method_names())
            .finish()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => f.write_str(name),
            None => write!(f, "#<record type {}>", self.inner.fields.join(", ")),
        }
    }
}
