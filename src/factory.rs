//! Defining record types.
//!
//! ```text
//! RecordSpec ──▶ RecordFactory::define ──▶ TypeDef ──▶ extension block
//!                                                          │
//!                     Registry ◀── (named only) ── RecordType
//! ```

use once_cell::sync::Lazy;
use serde::Deserialize;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::RecordError;
use crate::record::Record;
use crate::record_type::{Method, RecordType};
use crate::registry::{Registry, RegistryConfig};
use crate::types::{FastHashSet, FastMap, Token};
use crate::value::Value;

/// Runs against the in-progress definition before it is frozen.
pub type ExtensionBlock = Box<dyn FnOnce(&mut TypeDef)>;

// ─── TypeDef ────────────────────────────────────────────────────────────────

/// A record type under construction, as seen by an extension block.
pub struct TypeDef {
    pub(crate) name: Option<SmolStr>,
    pub(crate) fields: Vec<SmolStr>,
    pub(crate) keyword_init: bool,
    pub(crate) methods: FastMap<SmolStr, Method>,
}

impl TypeDef {
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn fields(&self) -> &[SmolStr] {
        &self.fields
    }

    #[inline]
    pub fn keyword_init(&self) -> bool {
        self.keyword_init
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Attach a method to the type. A later definition under the same name
    /// replaces the earlier one.
    pub fn define_method<F>(&mut self, name: impl Into<SmolStr>, f: F) -> &mut Self
    where
        F: Fn(&mut Record, &[Value]) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }
}

// ─── RecordSpec ─────────────────────────────────────────────────────────────

/// Everything a definition call takes.
pub struct RecordSpec {
    tokens: Vec<Token>,
    keyword_init: bool,
    extension: Option<ExtensionBlock>,
}

impl RecordSpec {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            keyword_init: false,
            extension: None,
        }
    }

    pub fn keyword_init(mut self, keyword_init: bool) -> Self {
        self.keyword_init = keyword_init;
        self
    }

    pub fn extend<F>(mut self, block: F) -> Self
    where
        F: FnOnce(&mut TypeDef) + 'static,
    {
        self.extension = Some(Box::new(block));
        self
    }
}

// ─── Configuration ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub registry: RegistryConfig,
}

// ─── RecordFactory ──────────────────────────────────────────────────────────

static GLOBAL: Lazy<RecordFactory> = Lazy::new(RecordFactory::new);

pub struct RecordFactory {
    registry: Arc<Registry>,
}

impl RecordFactory {
    /// A factory with its own, empty registry.
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self::with_registry(Arc::new(Registry::with_config(config.registry)))
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The process-wide factory.
    pub fn global() -> &'static RecordFactory {
        &GLOBAL
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Look up a type registered under `name`.
    pub fn get(&self, name: &str) -> Option<RecordType> {
        self.registry.get(name)
    }

    /// Produce a new record type.
    ///
    /// A leading [`Token::Str`] becomes the binding name and must look like a
    /// constant. The rest are fields. Only keyword-mode types may declare no
    /// fields; their members then come from each construction mapping.
    pub fn define(&self, spec: RecordSpec) -> Result<RecordType, RecordError> {
        let RecordSpec {
            tokens,
            keyword_init,
            extension,
        } = spec;
        if tokens.is_empty() {
            return Err(RecordError::WrongArgumentCount {
                given: 0,
                expected: "1+",
            });
        }

        let mut tokens = tokens.into_iter().peekable();
        let name = match tokens.next_if(|t| matches!(t, Token::Str(_))) {
            Some(t) => {
                let name = t.into_name();
                validate_constant(&name)?;
                Some(name)
            }
            None => None,
        };

        let fields: Vec<SmolStr> = tokens.map(Token::into_name).collect();
        if fields.is_empty() && !keyword_init {
            return Err(RecordError::WrongArgumentCount {
                given: 0,
                expected: "1+",
            });
        }
        let mut seen = FastHashSet::default();
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(RecordError::DuplicateMember(field.clone()));
            }
        }

        let mut def = TypeDef {
            name,
            fields,
            keyword_init,
            methods: FastMap::default(),
        };
        if let Some(block) = extension {
            block(&mut def);
        }

        let record_type = RecordType::from_def(def);
        debug!(
            record_type = %record_type,
            fields = record_type.fields().len(),
            keyword_init,
            methods = record_type.method_names().len(),
            "defined record type"
        );
        if let Some(name) = record_type.name() {
            self.registry.register(SmolStr::new(name), &record_type)?;
        }
        Ok(record_type)
    }
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase first letter, then letters, digits or underscores.
fn validate_constant(name: &str) -> Result<(), RecordError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(char::is_uppercase)
        && chars.all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RecordError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tokens;

    #[test]
    fn test_no_arguments_is_argument_error() {
        let factory = RecordFactory::new();
        let err = factory.define(RecordSpec::new(Vec::<Token>::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert_eq!(
            err.to_string(),
            "wrong number of arguments (given 0, expected 1+)"
        );

        let err = factory
            .define(RecordSpec::new(Vec::<Token>::new()).keyword_init(true))
            .unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_name_only_positional_is_argument_error() {
        let factory = RecordFactory::new();
        let err = factory
            .define(RecordSpec::new(vec![Token::str("Empty")]))
            .unwrap_err();
        assert!(err.is_argument_error());
        assert!(factory.get("Empty").is_none());
    }

    #[test]
    fn test_leading_string_becomes_name() {
        let factory = RecordFactory::new();
        let ty = factory
            .define(RecordSpec::new(tokens!["Point"; x, y]))
            .expect("define");

        assert_eq!(ty.name(), Some("Point"));
        assert_eq!(ty.fields(), &[SmolStr::new("x"), SmolStr::new("y")]);
        assert_eq!(factory.get("Point"), Some(ty));
    }

    #[test]
    fn test_later_strings_are_fields() {
        let factory = RecordFactory::new();
        let ty = factory
            .define(RecordSpec::new(vec![
                Token::str("Pair"),
                Token::str("left"),
                Token::sym("right"),
            ]))
            .expect("define");
        assert_eq!(ty.fields(), &[SmolStr::new("left"), SmolStr::new("right")]);
    }

    #[test]
    fn test_lowercase_name_is_invalid_identifier() {
        let factory = RecordFactory::new();
        for bad in ["point", "_Point", "1Point", "Po int", ""] {
            let err = factory
                .define(RecordSpec::new(vec![Token::str(bad), Token::sym("x")]))
                .unwrap_err();
            assert_eq!(err, RecordError::InvalidIdentifier(bad.to_string()));
            assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        }
        assert!(factory.registry().is_empty());
    }

    #[test]
    fn test_invalid_identifier_message() {
        let err = validate_constant("point").unwrap_err();
        assert_eq!(err.to_string(), "identifier point needs to be constant");
        assert!(validate_constant("Point3_d").is_ok());
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let factory = RecordFactory::new();
        let err = factory.define(RecordSpec::new(tokens![a, b, a])).unwrap_err();
        assert_eq!(err, RecordError::DuplicateMember("a".into()));
    }

    #[test]
    fn test_anonymous_type_not_registered() {
        let factory = RecordFactory::new();
        let ty = factory.define(RecordSpec::new(["x", "y"])).expect("define");
        assert_eq!(ty.name(), None);
        assert!(factory.registry().is_empty());
        assert_eq!(ty.to_string(), "#<record type x, y>");
    }

    #[test]
    fn test_same_fields_different_types() {
        let factory = RecordFactory::new();
        let a = factory.define(RecordSpec::new(["x"])).expect("a");
        let b = factory.define(RecordSpec::new(["x"])).expect("b");
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_extension_block_sees_fields_and_adds_methods() {
        let factory = RecordFactory::new();
        let ty = factory
            .define(RecordSpec::new(tokens![x, y]).extend(|def| {
                assert_eq!(def.fields().len(), 2);
                assert!(def.has_field("x"));
                assert!(!def.keyword_init());
                def.define_method("sum", |rec, _args| {
                    let x = rec.get("x")?.as_i64().unwrap_or(0);
                    let y = rec.get("y")?.as_i64().unwrap_or(0);
                    Ok(Value::from(x + y))
                })
                .define_method("shift", |rec, args| {
                    let by = args.first().and_then(Value::as_i64).unwrap_or(1);
                    let x = rec.get(0)?.as_i64().unwrap_or(0);
                    rec.set("x", x + by)?;
                    Ok(Value::Nil)
                });
            }))
            .expect("define");

        assert!(ty.responds_to("sum"));
        assert_eq!(ty.method_names(), vec!["shift", "sum"]);

        let mut p = ty.construct([1, 2]).expect("construct");
        assert_eq!(p.call("sum", &[]), Ok(Value::from(3i64)));
        p.call("shift", &[Value::from(10i64)]).expect("shift");
        assert_eq!(p.get("x"), Ok(&Value::from(11i64)));
        assert_eq!(p.call("sum", &[]), Ok(Value::from(13i64)));

        let err = p.call("missing", &[]).unwrap_err();
        assert_eq!(err, RecordError::UnknownMember("missing".into()));
    }

    #[test]
    fn test_method_error_propagates() {
        let factory = RecordFactory::new();
        let ty = factory
            .define(RecordSpec::new(tokens![x]).extend(|def| {
                def.define_method("bad", |rec, _| rec.get("nope").cloned());
            }))
            .expect("define");
        let mut r = ty.construct([1]).expect("construct");
        assert_eq!(
            r.call("bad", &[]),
            Err(RecordError::UnknownMember("nope".into()))
        );
    }

    #[test]
    fn test_keyword_type_without_fields() {
        let factory = RecordFactory::new();
        let ty = factory
            .define(RecordSpec::new(vec![Token::str("Bag")]).keyword_init(true))
            .expect("define");
        assert!(ty.fields().is_empty());

        let bag = ty
            .construct_keyword(crate::fields! { "anything" => 1 })
            .expect("construct");
        assert_eq!(bag.members(), vec![SmolStr::new("anything")]);
    }

    #[test]
    fn test_global_factory_is_shared() {
        let ty = RecordFactory::global()
            .define(RecordSpec::new(tokens!["GlobalFactoryProbe"; v]))
            .expect("define");
        assert_eq!(RecordFactory::global().get("GlobalFactoryProbe"), Some(ty));
    }

    #[test]
    fn test_factory_config_from_json() {
        let config: FactoryConfig =
            serde_json::from_str(r#"{"registry": {"on_duplicate": "reject"}}"#).expect("parse");
        let factory = RecordFactory::with_config(config);
        factory
            .define(RecordSpec::new(tokens!["Once"; a]))
            .expect("first");
        let err = factory
            .define(RecordSpec::new(tokens!["Once"; a]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameCollision);
    }
}
