use crate::{
    AsValue, AttributeDef, Connection, Error, FieldMap, ModelDef, Order, PRIMARY_KEY, Query, Record,
    Registry, Relationship, Result, RowsAffected, Schema,
};
use futures::TryFutureExt;
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// Handle on a registered model.
///
/// Returned by [`Schema::create`]. It pairs the frozen [`ModelDef`] with the registry used to
/// find its schema, and is the entry point for queries over the model: every method here
/// starts a fresh [`Query`].
pub struct Model<C: Connection> {
    registry: Registry<C>,
    model: Arc<ModelDef>,
}

impl<C: Connection> Model<C> {
    pub(crate) fn new(registry: Registry<C>, model: Arc<ModelDef>) -> Self {
        Self { registry, model }
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }
    pub fn descriptor(&self) -> &Arc<ModelDef> {
        &self.model
    }
    pub fn name(&self) -> &str {
        self.model.name()
    }
    pub fn table_name(&self) -> &str {
        self.model.table()
    }
    pub fn attributes(&self) -> &[AttributeDef] {
        self.model.attributes()
    }
    pub fn relationships(&self) -> &[Relationship] {
        self.model.relationships()
    }
    /// The schema owning this model, fails if it was unregistered.
    pub fn schema(&self) -> Result<Arc<Schema<C>>> {
        self.registry.find_for(&self.model)
    }

    pub fn query(&self) -> Query<C> {
        Query::new(self)
    }
    pub fn filter(&self, conditions: impl Into<FieldMap>) -> Query<C> {
        self.query().filter(conditions)
    }
    pub fn order_by(&self, field: impl Into<String>, order: Order) -> Query<C> {
        self.query().order_by(field, order)
    }
    pub fn group_by(&self, field: impl Into<String>) -> Query<C> {
        self.query().group_by(field)
    }
    pub fn limit(&self, limit: u64) -> Query<C> {
        self.query().limit(limit)
    }
    pub fn offset(&self, offset: u64) -> Query<C> {
        self.query().offset(offset)
    }

    pub async fn all(&self) -> Result<Vec<Record<C>>> {
        self.query().all().await
    }
    pub async fn first(&self) -> Result<Option<Record<C>>> {
        self.query().first().await
    }
    pub async fn last(&self) -> Result<Option<Record<C>>> {
        self.query().last().await
    }
    pub async fn count(&self) -> Result<u64> {
        self.query().count().await
    }

    /// The record with the given primary key, if any.
    ///
    /// The id is converted to the primary key type first; an id that cannot be converted
    /// (`"abc"` for a numeric key) matches nothing.
    pub async fn find(&self, id: impl AsValue) -> Result<Option<Record<C>>> {
        let id = id.as_value();
        let Ok(id) = id.cast(&self.model.primary_key().value) else {
            log::debug!("`{}` cannot match the primary key of `{}`", id, self.name());
            return Ok(None);
        };
        self.filter([(PRIMARY_KEY, id)]).first().await
    }

    /// Insert one record and return it as stored.
    pub async fn create(&self, params: impl Into<FieldMap>) -> Result<Record<C>> {
        let params: FieldMap = params.into();
        self.query()
            .insert([params])
            .map_ok(|records| records.into_iter().next())
            .await?
            .ok_or_else(|| {
                Error::msg(format!(
                    "The connection returned no row for the new `{}`",
                    self.name()
                ))
            })
    }

    pub async fn create_many<I, R>(&self, rows: I) -> Result<Vec<Record<C>>>
    where
        I: IntoIterator<Item = R>,
        R: Into<FieldMap>,
    {
        self.query().insert(rows).await
    }

    /// Update every row of the model.
    pub async fn update(&self, params: impl Into<FieldMap>) -> Result<RowsAffected> {
        self.query().update(params).await
    }

    /// Delete every row of the model.
    pub async fn delete(&self) -> Result<RowsAffected> {
        self.query().delete().await
    }

    /// A new, unsaved record.
    pub fn build(&self, payload: impl Into<FieldMap>) -> Record<C> {
        Record::new(self, payload)
    }
}

impl<C: Connection> Clone for Model<C> {
    fn clone(&self) -> Self {
        Self::new(self.registry.clone(), self.model.clone())
    }
}

impl<C: Connection> PartialEq for Model<C> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }
}

impl<C: Connection> Debug for Model<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.model, f)
    }
}
