use crate::{Connection, ModelDef, Result, Schema, SchemaConfig, SchemaError};
use std::{
    fmt::{self, Debug},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak},
};

pub(crate) type SchemaList<C> = RwLock<Vec<Arc<Schema<C>>>>;

/// The set of live schemas, used to find which one owns a model.
///
/// Cloning is cheap and every clone shares the same list. Models, queries and records carry
/// a clone and resolve their schema (and so their connection) through it only when they
/// execute. The registry lives as long as any of those handles; [`Registry::clear`] empties
/// it, for example between tests.
pub struct Registry<C: Connection> {
    schemas: Arc<SchemaList<C>>,
}

impl<C: Connection> Registry<C> {
    pub fn new() -> Self {
        Self {
            schemas: Default::default(),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<SchemaList<C>> {
        Arc::downgrade(&self.schemas)
    }

    pub(crate) fn upgrade(weak: &Weak<SchemaList<C>>) -> Result<Self> {
        weak.upgrade()
            .map(|schemas| Self { schemas })
            .ok_or_else(|| SchemaError::RegistryDropped.into())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Schema<C>>>> {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<Schema<C>>>> {
        self.schemas.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new schema owning `connection`, with text primary keys.
    pub fn schema(&self, connection: C) -> Result<Arc<Schema<C>>> {
        self.schema_with_config(connection, SchemaConfig::default())
    }

    pub fn schema_with_config(&self, connection: C, config: SchemaConfig) -> Result<Arc<Schema<C>>> {
        let config = config.validated()?;
        let schema = Arc::new(Schema::new(connection, config, self.downgrade()));
        let mut schemas = self.write();
        schemas.push(schema.clone());
        log::debug!("Registered schema #{}", schemas.len());
        Ok(schema)
    }

    /// Open a connection from `url` and register a schema for it.
    pub async fn connect(&self, url: &str) -> Result<Arc<Schema<C>>> {
        let connection = C::connect(url).await?;
        self.schema(connection)
    }

    pub fn schemas(&self) -> Vec<Arc<Schema<C>>> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// The schema that registered `model`.
    ///
    /// Ownership is by identity: two schemas may each define a model with the same name, and
    /// each descriptor resolves to the schema that created it.
    pub fn find_for(&self, model: &ModelDef) -> Result<Arc<Schema<C>>> {
        let found = self.read().iter().find(|v| v.owns(model)).cloned();
        found.ok_or_else(|| {
            let error = SchemaError::NotRegistered {
                model: model.name().into(),
            };
            log::error!("{}", error);
            error.into()
        })
    }

    /// Unregister `schema`, returns false if it was not registered here.
    pub fn remove(&self, schema: &Arc<Schema<C>>) -> bool {
        let mut schemas = self.write();
        let len = schemas.len();
        schemas.retain(|v| !Arc::ptr_eq(v, schema));
        schemas.len() != len
    }

    /// Unregister every schema.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// True if both handles share the same schema list.
    pub fn ptr_eq(&self, other: &Registry<C>) -> bool {
        Arc::ptr_eq(&self.schemas, &other.schemas)
    }
}

impl<C: Connection> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            schemas: self.schemas.clone(),
        }
    }
}

impl<C: Connection> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemas", &self.len())
            .finish()
    }
}
