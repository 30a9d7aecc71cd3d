use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::checker::Checker;
use crate::config::RegistryConfig;
use crate::content::ContentType;
use crate::envelope::{Message, MessageSchema};
use crate::error::{Result, SchemaError, ValidationResult};

/// A named validator producing a typed [`Message`].
pub trait Schema: Send + Sync + fmt::Debug {
    /// Walk `value`, recording every issue on `checker`.
    fn check(&self, checker: &mut Checker, value: &Value) -> Option<Message>;

    /// `contentType` tags this schema accepts.
    fn content_types(&self) -> Vec<&'static str>;

    fn validate(&self, value: &Value, config: RegistryConfig) -> ValidationResult<Message> {
        let mut checker = Checker::new(config);
        let message = self.check(&mut checker, value);
        checker.finish(message)
    }
}

/// Registry keys of the built-in schemas with the content types each accepts.
pub fn builtin_schema_names() -> Vec<(String, Vec<ContentType>)> {
    let mut names = vec![
        ("message".to_string(), ContentType::ALL.to_vec()),
        ("whatsapp.message".to_string(), ContentType::ALL.to_vec()),
        ("whatsapp.media".to_string(), ContentType::MEDIA.to_vec()),
    ];
    names.extend(
        ContentType::ALL
            .into_iter()
            .map(|kind| (format!("whatsapp.{kind}"), vec![kind])),
    );
    names
}

/// Name-keyed registry of message schemas.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<dyn Schema>>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// A registry holding every built-in schema.
    pub fn whatsapp() -> Self {
        Self::with_builtin_schemas(RegistryConfig::default())
    }

    pub fn with_builtin_schemas(config: RegistryConfig) -> Self {
        let mut registry = Self::with_config(config);
        let all: Arc<dyn Schema> = Arc::new(MessageSchema::whatsapp());
        for (name, types) in builtin_schema_names() {
            let schema: Arc<dyn Schema> = if types.len() == ContentType::ALL.len() {
                Arc::clone(&all)
            } else {
                Arc::new(MessageSchema::for_content(&types))
            };
            registry.register(name, schema);
        }
        registry
    }

    /// Process-wide built-in registry. Built on first use, immutable afterwards.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: OnceLock<SchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(SchemaRegistry::whatsapp)
    }

    /// Bind `name` to `schema`. A later registration under the same name
    /// replaces the earlier one, which is returned.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: Arc<dyn Schema>,
    ) -> Option<Arc<dyn Schema>> {
        let name = name.into();
        debug!(schema = %name, content_types = ?schema.content_types(), "registering schema");
        self.schemas.insert(name, schema)
    }

    /// Look up a schema by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Schema>> {
        match self.schemas.get(name) {
            Some(schema) => Ok(Arc::clone(schema)),
            None => {
                debug!(schema = name, "schema not found");
                Err(SchemaError::NotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Resolve `name` and validate `value` against it.
    pub fn validate(&self, name: &str, value: &Value) -> Result<Message> {
        let schema = self.resolve(name)?;
        schema.validate(value, self.config).map_err(|err| {
            debug!(schema = name, issues = err.issues().len(), "message failed validation");
            SchemaError::from(err)
        })
    }

    /// Like [`SchemaRegistry::validate`] but every failure, including an
    /// unknown schema name, is folded into the outcome.
    pub fn safe_validate(&self, name: &str, value: &Value) -> ValidationOutcome {
        match self.validate(name, value) {
            Ok(message) => ValidationOutcome::Valid(message),
            Err(err) => ValidationOutcome::Invalid(err),
        }
    }

    /// Copy of the current name-to-schema table, ordered by name. Changing
    /// the copy does not affect the registry.
    pub fn snapshot(&self) -> BTreeMap<String, Arc<dyn Schema>> {
        self.schemas
            .iter()
            .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
            .collect()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-failing validation result. Serializes as `{"ok":true,"data":..}` or
/// `{"ok":false,"error":..}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(Message),
    Invalid(SchemaError),
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn data(&self) -> Option<&Message> {
        match self {
            ValidationOutcome::Valid(message) => Some(message),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SchemaError> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Message> {
        match self {
            ValidationOutcome::Valid(message) => Ok(message),
            ValidationOutcome::Invalid(err) => Err(err),
        }
    }
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            ValidationOutcome::Valid(message) => {
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("data", message)?;
            }
            ValidationOutcome::Invalid(err) => {
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("error", err)?;
            }
        }
        map.end()
    }
}
