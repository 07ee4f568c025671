use crate::{IdStrategy, MemoryConfig, MemoryTable, StatementWriter};
use modelier_core::{
    Connection, Context, Error, FieldMap, PRIMARY_KEY, Query, Result, RowLabeled, RowsAffected,
    Value,
};
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};

/// Connection keeping every table in process memory.
///
/// Tables are created on first use and named after the model table. Every call is also
/// rendered as a statement and appended to a log readable with [`MemoryConnection::statements`].
#[derive(Debug, Default)]
pub struct MemoryConnection {
    config: MemoryConfig,
    tables: RwLock<HashMap<String, MemoryTable>>,
    statements: Mutex<Vec<String>>,
    writer: StatementWriter,
}

impl MemoryConnection {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    async fn log(&self, statement: String) {
        log::trace!("[{}] {}", self.config.name, statement);
        self.statements.lock().await.push(statement);
    }

    /// Statements executed so far, oldest first.
    pub async fn statements(&self) -> Vec<String> {
        self.statements.lock().await.clone()
    }

    pub async fn last_statement(&self) -> Option<String> {
        self.statements.lock().await.last().cloned()
    }

    /// Current content of `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<FieldMap> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|v| v.rows().to_vec())
            .unwrap_or_default()
    }

    /// Store rows as they are, bypassing id generation and the statement log.
    pub async fn seed<I, R>(&self, table: &str, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<FieldMap>,
    {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        for row in rows {
            table.push(row.into());
        }
    }

    /// Drop every row of `table`, the id counter keeps its value.
    pub async fn truncate(&self, table: &str) {
        if let Some(table) = self.tables.write().await.get_mut(table) {
            table.clear();
        }
    }

    /// Fails when the configured strategy cannot produce ids of the primary key type.
    fn check_id_strategy(&self, primary_key: &Value) -> Result<()> {
        match (self.config.ids, primary_key) {
            (IdStrategy::Uuid, ty) if !matches!(ty, Value::Varchar(..)) => {
                let error = Error::msg(format!(
                    "Uuid ids need a text primary key, found {}",
                    ty.type_name()
                ));
                log::error!("{:#}", error);
                Err(error)
            }
            _ => Ok(()),
        }
    }

    fn generate_id(&self, table: &mut MemoryTable, primary_key: &Value) -> Value {
        match (self.config.ids, primary_key) {
            (IdStrategy::Sequence, Value::Int64(..)) => Value::Int64(Some(table.next_sequence())),
            (IdStrategy::Sequence, _) => Value::Varchar(Some(table.next_sequence().to_string())),
            (IdStrategy::Uuid, _) => Value::Varchar(Some(uuid::Uuid::new_v4().to_string())),
        }
    }
}

impl Connection for MemoryConnection {
    async fn connect(url: &str) -> Result<Self> {
        let config = MemoryConfig::from_url(url)?;
        log::debug!(
            "Opened memory connection `{}` with {} ids",
            config.name,
            config.ids
        );
        Ok(MemoryConnection::new(config))
    }

    async fn select(&self, query: &Query<Self>) -> Result<Vec<RowLabeled>> {
        let mut statement = String::new();
        self.writer.write_select(&mut statement, query);
        self.log(statement).await;
        let tables = self.tables.read().await;
        let Some(table) = tables.get(query.model().table()) else {
            return Ok(Vec::new());
        };
        Ok(table
            .select(query.params())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn count(&self, query: &Query<Self>) -> Result<u64> {
        let mut statement = String::new();
        self.writer.write_count(&mut statement, query);
        self.log(statement).await;
        Ok(self
            .tables
            .read()
            .await
            .get(query.model().table())
            .map_or(0, |table| table.count(&query.params().conditions)))
    }

    async fn insert(&self, query: &Query<Self>, rows: &[FieldMap]) -> Result<Vec<RowLabeled>> {
        let model = query.model();
        let primary_key = &model.primary_key().value;
        // The whole batch is rejected before anything is stored
        let ids = rows
            .iter()
            .map(|row| match row.get(PRIMARY_KEY) {
                Some(id) if !id.is_empty() => id
                    .cast(primary_key)
                    .map(Some)
                    .with_context(|| {
                        format!("While inserting into `{}` with id `{}`", model.table(), id)
                    }),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;
        if ids.iter().any(Option::is_none) {
            self.check_id_strategy(primary_key)?;
        }
        let mut statements = Vec::with_capacity(rows.len());
        let mut stored = Vec::with_capacity(rows.len());
        {
            let mut tables = self.tables.write().await;
            let table = tables.entry(model.table().to_string()).or_default();
            for (row, id) in rows.iter().zip(ids) {
                let id = match id {
                    Some(id) => id,
                    None => self.generate_id(table, primary_key),
                };
                let mut values = row.clone();
                values.remove(PRIMARY_KEY);
                let new_row = FieldMap::from_iter([(PRIMARY_KEY, id)]).merged(values);
                let mut statement = String::new();
                self.writer.write_insert(&mut statement, model.table(), &new_row);
                statements.push(statement);
                table.push(new_row.clone());
                stored.push(new_row.into());
            }
        }
        for statement in statements {
            self.log(statement).await;
        }
        Ok(stored)
    }

    async fn update(&self, query: &Query<Self>, params: &FieldMap) -> Result<RowsAffected> {
        let mut statement = String::new();
        self.writer.write_update(&mut statement, query, params);
        self.log(statement).await;
        let rows_affected = self
            .tables
            .write()
            .await
            .get_mut(query.model().table())
            .map_or(0, |table| table.update(&query.params().conditions, params));
        Ok(RowsAffected::new(rows_affected))
    }

    async fn delete(&self, query: &Query<Self>) -> Result<RowsAffected> {
        let mut statement = String::new();
        self.writer.write_delete(&mut statement, query);
        self.log(statement).await;
        let rows_affected = self
            .tables
            .write()
            .await
            .get_mut(query.model().table())
            .map_or(0, |table| table.delete(&query.params().conditions));
        Ok(RowsAffected::new(rows_affected))
    }
}
