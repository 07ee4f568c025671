use crate::{
    AsValue, Connection, FieldMap, Model, ModelDef, PRIMARY_KEY, Query, Registry, RelationshipKind,
    Result, SchemaError, Value,
};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// One row of a model, persisted or not.
///
/// A record holds any field it is given, but [`Record::attributes`] only exposes the fields
/// its model declares. Persistence methods return the same instance once the connection
/// answered.
pub struct Record<C: Connection> {
    registry: Registry<C>,
    model: Arc<ModelDef>,
    fields: FieldMap,
}

impl<C: Connection> Record<C> {
    /// A new record holding every field of `payload`, declared or not.
    pub fn new(model: &Model<C>, payload: impl Into<FieldMap>) -> Self {
        Self::from_parts(
            model.registry().clone(),
            model.descriptor().clone(),
            payload.into(),
        )
    }

    pub(crate) fn from_parts(registry: Registry<C>, model: Arc<ModelDef>, fields: FieldMap) -> Self {
        Self {
            registry,
            model,
            fields,
        }
    }

    pub fn model(&self) -> &ModelDef {
        &self.model
    }

    /// Every field set on the instance, including the ones the model does not declare.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// The declared attributes currently set, in declaration order.
    pub fn attributes(&self) -> FieldMap {
        self.model
            .attribute_names()
            .filter_map(|name| self.fields.get(name).map(|v| (name, v.clone())))
            .collect()
    }

    /// Replace the declared attributes with `payload`.
    ///
    /// Every field of the payload is assigned, then declared attributes missing from the
    /// payload are removed.
    pub fn set_attributes(&mut self, payload: impl Into<FieldMap>) {
        let payload = payload.into();
        let model = &self.model;
        self.fields
            .retain(|name, _| !model.has_attribute(name) || payload.contains_key(name));
        self.fields.merge(payload);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field `name` converted to `T`, `None` when it is unset or null.
    pub fn get_as<T: AsValue>(&self, name: &str) -> Result<Option<T>> {
        match self.fields.get(name) {
            Some(v) if !v.is_null() => T::try_from_value(v.clone()).map(Some),
            _ => Ok(None),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn id(&self) -> Option<&Value> {
        self.fields.get(PRIMARY_KEY)
    }

    /// True if the record has a non-empty `id`.
    pub fn is_saved(&self) -> bool {
        self.id().is_some_and(|v| !v.is_empty())
    }

    fn query(&self) -> Query<C> {
        Query::from_parts(self.registry.clone(), self.model.clone())
    }

    fn by_id(&self) -> Query<C> {
        self.query()
            .filter([(PRIMARY_KEY, self.id().cloned().unwrap_or_default())])
    }

    /// Insert the record if it has no `id`, update it otherwise.
    ///
    /// After an insert the attributes are replaced by the stored row, which carries the new
    /// `id`. Updates never send the `id` itself.
    pub async fn save(&mut self) -> Result<&mut Self> {
        let mut params = self.attributes();
        if self.is_saved() {
            params.remove(PRIMARY_KEY);
            self.by_id().update(params).await?;
        } else {
            let stored = self.query().insert([params]).await?;
            if let Some(row) = stored.into_iter().next() {
                self.set_attributes(row.fields);
            }
        }
        Ok(self)
    }

    /// Merge `params` into the attributes and update the stored row.
    pub async fn update(&mut self, params: impl Into<FieldMap>) -> Result<&mut Self> {
        let attributes = self.attributes().merged(params.into());
        self.set_attributes(attributes);
        if !self.is_saved() {
            log::warn!(
                "Updating a `{}` that was never saved, no row will match",
                self.model.name()
            );
        }
        let mut params = self.attributes();
        params.remove(PRIMARY_KEY);
        self.by_id().update(params).await?;
        Ok(self)
    }

    /// Delete the stored row, the instance keeps its fields.
    pub async fn delete(&mut self) -> Result<&mut Self> {
        self.by_id().delete().await?;
        Ok(self)
    }

    /// Query over the records on the other side of relationship `name`.
    ///
    /// Has-many relationships select the target rows whose foreign key is this record's
    /// `id`, and fail with [`SchemaError::UnsavedRecord`] when the record has none.
    /// Belongs-to relationships select the target row whose `id` is this record's foreign
    /// key; an unset foreign key gives a null condition, which matches no row.
    pub fn related(&self, name: &str) -> Result<Query<C>> {
        let relationship =
            self.model
                .relationship(name)
                .ok_or_else(|| SchemaError::UnknownRelationship {
                    model: self.model.name().into(),
                    name: name.into(),
                })?;
        let target = self
            .registry
            .find_for(&self.model)?
            .model(&relationship.target)?;
        let field = |name: &str| self.fields.get(name).cloned().unwrap_or_default();
        Ok(match relationship.kind {
            RelationshipKind::HasMany => {
                if !self.is_saved() {
                    return Err(SchemaError::UnsavedRecord {
                        model: self.model.name().into(),
                        name: name.into(),
                    }
                    .into());
                }
                target.filter([(relationship.foreign_key.as_str(), field(PRIMARY_KEY))])
            }
            RelationshipKind::BelongsTo => {
                target.filter([(PRIMARY_KEY, field(&relationship.foreign_key))])
            }
        })
    }
}

impl<C: Connection> Clone for Record<C> {
    fn clone(&self) -> Self {
        Self::from_parts(
            self.registry.clone(),
            self.model.clone(),
            self.fields.clone(),
        )
    }
}

/// Same model and same fields, regardless of their order.
impl<C: Connection> PartialEq for Record<C> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model) && self.fields == other.fields
    }
}

impl<C: Connection> Debug for Record<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.model.name(), self.fields)
    }
}
