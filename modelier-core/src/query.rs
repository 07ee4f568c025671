use crate::{
    Connection, FieldMap, Model, ModelDef, Record, Registry, Result, RowsAffected, Schema,
};
use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        })
    }
}

/// Parameters accumulated by the builder methods of [`Query`].
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Equality conditions, merged by field name.
    pub conditions: FieldMap,
    /// Ordering, in call order.
    pub order_by: Vec<(String, Order)>,
    /// Grouping, in call order.
    pub group_by: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// An immutable, lazily executed query over one model.
///
/// Builder methods (`filter`, `order_by`, `group_by`, `offset`, `limit`) never touch the
/// receiver, they return a new query. Terminal methods (`count`, `all`, `first`, `last`,
/// `insert`, `update`, `delete`) look the owning [`Schema`] up in the registry at call time
/// and make a single call into its connection, except `last` which counts first.
pub struct Query<C: Connection> {
    registry: Registry<C>,
    model: Arc<ModelDef>,
    params: QueryParams,
}

impl<C: Connection> Query<C> {
    pub fn new(model: &Model<C>) -> Self {
        Self::from_parts(model.registry().clone(), model.descriptor().clone())
    }

    pub(crate) fn from_parts(registry: Registry<C>, model: Arc<ModelDef>) -> Self {
        Self {
            registry,
            model,
            params: Default::default(),
        }
    }

    fn with_params(&self, params: QueryParams) -> Self {
        Self {
            registry: self.registry.clone(),
            model: self.model.clone(),
            params,
        }
    }

    pub fn model(&self) -> &ModelDef {
        &self.model
    }

    pub fn descriptor(&self) -> &Arc<ModelDef> {
        &self.model
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Merge `conditions` into the current ones, later values win.
    pub fn filter(&self, conditions: impl Into<FieldMap>) -> Self {
        let mut params = self.params.clone();
        params.conditions.merge(conditions.into());
        self.with_params(params)
    }

    /// Append an ordering term.
    pub fn order_by(&self, field: impl Into<String>, order: Order) -> Self {
        let mut params = self.params.clone();
        params.order_by.push((field.into(), order));
        self.with_params(params)
    }

    /// Append a grouping field.
    pub fn group_by(&self, field: impl Into<String>) -> Self {
        let mut params = self.params.clone();
        params.group_by.push(field.into());
        self.with_params(params)
    }

    pub fn offset(&self, offset: u64) -> Self {
        let mut params = self.params.clone();
        params.offset = Some(offset);
        self.with_params(params)
    }

    pub fn limit(&self, limit: u64) -> Self {
        let mut params = self.params.clone();
        params.limit = Some(limit);
        self.with_params(params)
    }

    /// The schema currently owning the model.
    pub fn schema(&self) -> Result<Arc<Schema<C>>> {
        self.registry.find_for(&self.model)
    }

    pub async fn count(&self) -> Result<u64> {
        let schema = self.schema()?;
        log::debug!("Counting `{}`", self.model.table());
        schema.connection().count(self).await
    }

    /// Every matching record, in the order the connection returned them.
    pub async fn all(&self) -> Result<Vec<Record<C>>> {
        let schema = self.schema()?;
        log::debug!("Selecting from `{}`", self.model.table());
        let rows = schema.connection().select(self).await?;
        Ok(rows.into_iter().map(|row| self.materialize(row)).collect())
    }

    pub async fn first(&self) -> Result<Option<Record<C>>> {
        let records = self.offset(0).limit(1).all().await?;
        Ok(records.into_iter().next())
    }

    /// Counts, then fetches the row at `count - 1`.
    ///
    /// The two calls are not atomic: rows written in between can make the result differ from
    /// the actual last row.
    pub async fn last(&self) -> Result<Option<Record<C>>> {
        let count = self.count().await?;
        if count == 0 {
            return Ok(None);
        }
        let records = self.offset(count - 1).limit(1).all().await?;
        if records.is_empty() {
            log::warn!(
                "`{}` counted {} rows but none was found at offset {}",
                self.model.table(),
                count,
                count - 1
            );
        }
        Ok(records.into_iter().next())
    }

    /// Insert one record per item, returned as stored by the connection.
    pub async fn insert<I, R>(&self, rows: I) -> Result<Vec<Record<C>>>
    where
        I: IntoIterator<Item = R>,
        R: Into<FieldMap>,
    {
        let rows = rows.into_iter().map(Into::into).collect::<Vec<_>>();
        let schema = self.schema()?;
        log::debug!("Inserting {} rows into `{}`", rows.len(), self.model.table());
        let stored = schema.connection().insert(self, &rows).await?;
        Ok(stored.into_iter().map(|row| self.materialize(row)).collect())
    }

    /// Apply `params` to every row matching the conditions.
    pub async fn update(&self, params: impl Into<FieldMap>) -> Result<RowsAffected> {
        let params = params.into();
        let schema = self.schema()?;
        log::debug!("Updating `{}` with {}", self.model.table(), params);
        schema.connection().update(self, &params).await
    }

    /// Remove every row matching the conditions.
    pub async fn delete(&self) -> Result<RowsAffected> {
        let schema = self.schema()?;
        log::debug!("Deleting from `{}`", self.model.table());
        schema.connection().delete(self).await
    }

    fn materialize(&self, row: impl Into<FieldMap>) -> Record<C> {
        Record::from_parts(self.registry.clone(), self.model.clone(), row.into())
    }
}

impl<C: Connection> Clone for Query<C> {
    fn clone(&self) -> Self {
        self.with_params(self.params.clone())
    }
}

impl<C: Connection> Debug for Query<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("model", &self.model.name())
            .field("params", &self.params)
            .finish()
    }
}
