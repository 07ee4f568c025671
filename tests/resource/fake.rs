#![allow(dead_code)]

use modelier::{
    Connection, Error, FieldMap, PRIMARY_KEY, Query, QueryParams, Registry, Result, RowLabeled,
    RowsAffected, Schema, fields,
};
use std::sync::{Arc, Mutex};

/// One call received by a [`FakeConnection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select { table: String, params: QueryParams },
    Count { table: String, params: QueryParams },
    Insert { table: String, rows: Vec<FieldMap> },
    Update {
        table: String,
        conditions: FieldMap,
        params: FieldMap,
    },
    Delete { table: String, conditions: FieldMap },
}

/// Connection recording every call and answering from a fixed set of rows.
///
/// Selects and counts filter the rows by equality (null matching nothing) and apply offset
/// and limit, ordering is ignored. Nothing is ever written: inserts answer with the next id, updates and deletes
/// with the number of matching rows.
#[derive(Debug, Default)]
pub struct FakeConnection {
    rows: Vec<FieldMap>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<String>>,
    next_id: Mutex<u64>,
}

impl FakeConnection {
    pub fn new(rows: Vec<FieldMap>) -> Self {
        let next_id = rows.len() as u64 + 1;
        Self {
            rows,
            next_id: Mutex::new(next_id),
            ..Default::default()
        }
    }

    /// Three users with ids `"1"`, `"2"` and `"3"`.
    pub fn users() -> Self {
        Self::new(
            (1..=3)
                .map(|i| {
                    fields! {
                        "id" => i.to_string(),
                        "username" => format!("user-{i}"),
                        "admin" => i == 1,
                    }
                })
                .collect(),
        )
    }

    /// The next call fails with `message`.
    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().take() {
            Some(message) => Err(Error::msg(message)),
            None => Ok(()),
        }
    }

    fn matching(&self, conditions: &FieldMap) -> impl Iterator<Item = &FieldMap> {
        self.rows.iter().filter(move |row| {
            conditions
                .iter()
                .all(|(name, value)| !value.is_null() && row.get(name) == Some(value))
        })
    }
}

impl Connection for FakeConnection {
    async fn connect(url: &str) -> Result<Self> {
        if url.starts_with("fake://") {
            Ok(FakeConnection::users())
        } else {
            Err(Error::msg("Fake connection url must start with `fake://`"))
        }
    }

    async fn select(&self, query: &Query<Self>) -> Result<Vec<RowLabeled>> {
        let params = query.params().clone();
        self.record(Call::Select {
            table: query.model().table().into(),
            params: params.clone(),
        })?;
        Ok(self
            .matching(&params.conditions)
            .skip(params.offset.unwrap_or_default() as usize)
            .take(params.limit.map_or(usize::MAX, |v| v as usize))
            .map(Into::into)
            .collect())
    }

    async fn count(&self, query: &Query<Self>) -> Result<u64> {
        self.record(Call::Count {
            table: query.model().table().into(),
            params: query.params().clone(),
        })?;
        Ok(self.matching(&query.params().conditions).count() as u64)
    }

    async fn insert(&self, query: &Query<Self>, rows: &[FieldMap]) -> Result<Vec<RowLabeled>> {
        self.record(Call::Insert {
            table: query.model().table().into(),
            rows: rows.to_vec(),
        })?;
        let mut next_id = self.next_id.lock().unwrap();
        Ok(rows
            .iter()
            .map(|row| {
                let id = next_id.to_string();
                *next_id += 1;
                fields! { PRIMARY_KEY => id }.merged(row.clone()).into()
            })
            .collect())
    }

    async fn update(&self, query: &Query<Self>, params: &FieldMap) -> Result<RowsAffected> {
        let conditions = query.params().conditions.clone();
        self.record(Call::Update {
            table: query.model().table().into(),
            conditions: conditions.clone(),
            params: params.clone(),
        })?;
        Ok(RowsAffected::new(self.matching(&conditions).count() as u64))
    }

    async fn delete(&self, query: &Query<Self>) -> Result<RowsAffected> {
        let conditions = query.params().conditions.clone();
        self.record(Call::Delete {
            table: query.model().table().into(),
            conditions: conditions.clone(),
        })?;
        Ok(RowsAffected::new(self.matching(&conditions).count() as u64))
    }
}

/// A registry with one schema over [`FakeConnection::users`].
pub fn registry() -> (Registry<FakeConnection>, Arc<Schema<FakeConnection>>) {
    let registry = Registry::new();
    let schema = registry
        .schema(FakeConnection::users())
        .expect("Failed to register the schema");
    (registry, schema)
}
