//! Name → record type table shared by the factories that hold it.

use parking_lot::RwLock;
use serde::Deserialize;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::RecordError;
use crate::record_type::RecordType;
use crate::types::FastMap;

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last writer wins. The replaced binding is logged.
    #[default]
    Replace,
    /// Fail with [`RecordError::AlreadyDefined`].
    Reject,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub on_duplicate: DuplicatePolicy,
}

/// Registered types by name. Entries are never removed.
pub struct Registry {
    config: RegistryConfig,
    types: RwLock<FastMap<SmolStr, RecordType>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            types: RwLock::new(FastMap::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Bind `record_type` under `name`.
    ///
    /// Returns the binding it replaced, if any.
    pub(crate) fn register(
        &self,
        name: SmolStr,
        record_type: &RecordType,
    ) -> Result<Option<RecordType>, RecordError> {
        let mut types = self.types.write();
        if types.contains_key(&name) && self.config.on_duplicate == DuplicatePolicy::Reject {
            return Err(RecordError::AlreadyDefined(name));
        }
        let previous = types.insert(name.clone(), record_type.clone());
        drop(types);

        match &previous {
            Some(old) => warn!(
                %name,
                old_id = old.id(),
                new_id = record_type.id(),
                "replaced record type binding"
            ),
            None => debug!(%name, id = record_type.id(), "registered record type"),
        }
        Ok(previous)
    }

    pub fn get(&self, name: &str) -> Option<RecordType> {
        self.types.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<SmolStr> {
        let mut names: Vec<SmolStr> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
