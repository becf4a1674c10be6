//! Runtime record types.
//!
//! A [`RecordFactory`] turns a list of field names into a [`RecordType`].
//! Each type builds [`Record`]s: ordered field → value mappings addressable by
//! position or by name, compared by value, and enumerable in field order.
//!
//! ```
//! use struct_factory::{RecordFactory, RecordSpec, Value, tokens};
//!
//! let factory = RecordFactory::new();
//! let point = factory.define(RecordSpec::new(tokens!["Point"; x, y])).unwrap();
//! let p = point.construct([1, 2]).unwrap();
//!
//! assert_eq!(p.get(0), Ok(&Value::from(1)));
//! assert_eq!(p.get("y"), Ok(&Value::from(2)));
//! assert_eq!(factory.get("Point"), Some(point));
//! ```

pub mod error;
pub mod factory;
pub mod record;
pub mod record_type;
pub mod registry;
pub mod types;
pub mod value;

pub use error::{ErrorKind, RecordError};
pub use factory::{ExtensionBlock, FactoryConfig, RecordFactory, RecordSpec, TypeDef};
pub use record::Record;
pub use record_type::{Accessor, Method, RecordType};
pub use registry::{DuplicatePolicy, Registry, RegistryConfig};
pub use smol_str::SmolStr;
pub use types::{FieldMap, Key, Token};
pub use value::{Number, Value};

/// Define a record type with the process-wide factory.
pub fn define(spec: RecordSpec) -> Result<RecordType, RecordError> {
    RecordFactory::global().define(spec)
}

/// Look up a type registered with the process-wide factory.
pub fn lookup(name: &str) -> Option<RecordType> {
    RecordFactory::global().get(name)
}
