use crate::{
    AttributeDef, AttributeSpec, Connection, Model, ModelDef, ModelTarget, PRIMARY_KEY, Registry,
    Relationship, Result, SchemaError, Value, registry::SchemaList, util::pluralize,
};
use std::{
    collections::HashSet,
    fmt::{self, Debug},
    ptr,
    sync::{Arc, PoisonError, RwLock, Weak},
};

/// Settings shared by every model of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaConfig {
    /// Type of the implicit `id` attribute: `Value::Varchar(None)` or `Value::Int64(None)`.
    pub primary_key: Value,
}

impl SchemaConfig {
    pub fn text_ids() -> Self {
        Self {
            primary_key: Value::Varchar(None),
        }
    }

    pub fn numeric_ids() -> Self {
        Self {
            primary_key: Value::Int64(None),
        }
    }

    pub(crate) fn validated(self) -> Result<Self> {
        match self.primary_key {
            Value::Varchar(..) | Value::Int64(..) => Ok(Self {
                primary_key: self.primary_key.as_type(),
            }),
            v => Err(SchemaError::Config(format!(
                "the primary key must be text or integer, not {}",
                v.type_name()
            ))
            .into()),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::text_ids()
    }
}

/// Owns a connection and the models declared against it.
pub struct Schema<C: Connection> {
    connection: C,
    config: SchemaConfig,
    models: RwLock<Vec<Arc<ModelDef>>>,
    registry: Weak<SchemaList<C>>,
}

impl<C: Connection> Schema<C> {
    pub(crate) fn new(connection: C, config: SchemaConfig, registry: Weak<SchemaList<C>>) -> Self {
        Self {
            connection,
            config,
            models: Default::default(),
            registry,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Declare and register a model.
    ///
    /// Each declaration is classified by its variant:
    /// - `Scalar(type)` adds a plain attribute;
    /// - `BelongsTo(target)` adds the `<name>Id` attribute, typed like the target's primary
    ///   key, and a belongs-to relationship;
    /// - `HasMany(target)` adds only a has-many relationship.
    ///
    /// The implicit `id` always comes first. Nothing is registered if any declaration fails.
    pub fn create<N, I>(&self, name: &str, attributes: I) -> Result<Model<C>>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, AttributeSpec)>,
    {
        let registry = Registry::upgrade(&self.registry)?;
        let model = Arc::new(self.build_model(name, attributes)?);
        {
            let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
            if models.iter().any(|v| v.name() == name) {
                return Err(SchemaError::DuplicateModel { model: name.into() }.into());
            }
            models.push(model.clone());
        }
        log::debug!(
            "Registered model `{}` on table `{}` with {} attributes and {} relationships",
            model.name(),
            model.table(),
            model.attributes().len(),
            model.relationships().len(),
        );
        Ok(Model::new(registry, model))
    }

    fn build_model<N, I>(&self, name: &str, attributes: I) -> Result<ModelDef>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, AttributeSpec)>,
    {
        if name.is_empty() {
            return Err(SchemaError::Config("the model name cannot be empty".into()).into());
        }
        let classification = |attribute: &str, reason: &str| SchemaError::Classification {
            model: name.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        };
        let mut names = HashSet::from([PRIMARY_KEY.to_string()]);
        let mut claim = |attribute: &str| -> Result<()> {
            if names.insert(attribute.to_string()) {
                Ok(())
            } else {
                Err(SchemaError::DuplicateName {
                    model: name.into(),
                    name: attribute.into(),
                }
                .into())
            }
        };
        let check_target = |attribute: &str, target: &ModelTarget| -> Result<()> {
            if target.name().is_empty() {
                return Err(classification(attribute, "the target model has no name").into());
            }
            Ok(())
        };
        let mut model = ModelDef {
            name: name.into(),
            table: pluralize(&name.to_lowercase()),
            attributes: vec![AttributeDef::new(PRIMARY_KEY, self.config.primary_key.clone())],
            relationships: Vec::new(),
        };
        for (attribute, spec) in attributes {
            let attribute: String = attribute.into();
            if attribute.is_empty() {
                return Err(classification(&attribute, "the attribute has no name").into());
            }
            match spec {
                AttributeSpec::Scalar(value) => {
                    if value == Value::Null {
                        return Err(classification(&attribute, "null is not a scalar type").into());
                    }
                    claim(&attribute)?;
                    model
                        .attributes
                        .push(AttributeDef::new(attribute, value.as_type()));
                }
                AttributeSpec::BelongsTo(target) => {
                    check_target(&attribute, &target)?;
                    let relationship = Relationship::belongs_to(name, &attribute, target.name());
                    claim(&attribute)?;
                    claim(&relationship.foreign_key)?;
                    let value = target
                        .primary_key_type()
                        .unwrap_or(&self.config.primary_key)
                        .as_type();
                    model.attributes.push(AttributeDef::new(
                        relationship.foreign_key.clone(),
                        value,
                    ));
                    model.relationships.push(relationship);
                }
                AttributeSpec::HasMany(target) => {
                    check_target(&attribute, &target)?;
                    claim(&attribute)?;
                    model
                        .relationships
                        .push(Relationship::has_many(name, &attribute, target.name()));
                }
            }
        }
        Ok(model)
    }

    /// True if `model` is the very descriptor this schema registered.
    pub fn owns(&self, model: &ModelDef) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|v| ptr::eq(v.as_ref(), model))
    }

    pub fn descriptor(&self, name: &str) -> Option<Arc<ModelDef>> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|v| v.name() == name)
            .cloned()
    }

    pub fn models(&self) -> Vec<Arc<ModelDef>> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handle on the model named `name`.
    pub fn model(&self, name: &str) -> Result<Model<C>> {
        let model = self
            .descriptor(name)
            .ok_or_else(|| SchemaError::UnknownModel { model: name.into() })?;
        Ok(Model::new(Registry::upgrade(&self.registry)?, model))
    }
}

impl<C: Connection> Debug for Schema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("config", &self.config)
            .field(
                "models",
                &self
                    .models()
                    .iter()
                    .map(|v| v.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
