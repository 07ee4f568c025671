use modelier_core::{FieldMap, Order, QueryParams, Value};
use std::cmp::Ordering;

/// Rows of one model, kept in insertion order.
#[derive(Default, Debug, Clone)]
pub struct MemoryTable {
    rows: Vec<FieldMap>,
    sequence: i64,
}

/// Total order used for sorting and grouping: null, booleans, numbers, text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            v if v.is_null() => 0,
            Value::Boolean(..) => 1,
            Value::Int64(..) | Value::Float64(..) => 2,
            _ => 3,
        }
    }
    match (a, b) {
        (Value::Boolean(Some(a)), Value::Boolean(Some(b))) => a.cmp(b),
        (Value::Int64(Some(a)), Value::Int64(Some(b))) => a.cmp(b),
        (Value::Int64(Some(a)), Value::Float64(Some(b))) => (*a as f64).total_cmp(b),
        (Value::Float64(Some(a)), Value::Int64(Some(b))) => a.total_cmp(&(*b as f64)),
        (Value::Float64(Some(a)), Value::Float64(Some(b))) => a.total_cmp(b),
        (Value::Varchar(Some(a)), Value::Varchar(Some(b))) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn field<'a>(row: &'a FieldMap, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    row.get(name).unwrap_or(&NULL)
}

/// Every condition equals the field of the row. Null never equals anything, missing fields
/// included.
pub fn matches(row: &FieldMap, conditions: &FieldMap) -> bool {
    conditions.iter().all(|(name, value)| {
        !value.is_null()
            && row
                .get(name)
                .is_some_and(|v| compare_values(v, value) == Ordering::Equal)
    })
}

impl MemoryTable {
    pub fn rows(&self) -> &[FieldMap] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Next value of the id counter.
    pub fn next_sequence(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    /// Append a row, an integer `id` above the counter moves it forward.
    pub fn push(&mut self, row: FieldMap) {
        if let Some(id) = row.get("id").and_then(|v| match v {
            Value::Int64(Some(v)) => Some(*v),
            Value::Varchar(Some(v)) => v.parse::<i64>().ok(),
            _ => None,
        }) {
            self.sequence = self.sequence.max(id);
        }
        self.rows.push(row);
    }

    pub fn count(&self, conditions: &FieldMap) -> u64 {
        self.rows.iter().filter(|row| matches(row, conditions)).count() as u64
    }

    /// Filter, group (first row of each group), sort (stable), then slice.
    pub fn select(&self, params: &QueryParams) -> Vec<FieldMap> {
        let mut rows = self
            .rows
            .iter()
            .filter(|row| matches(row, &params.conditions))
            .collect::<Vec<_>>();
        if !params.group_by.is_empty() {
            let mut seen: Vec<Vec<&Value>> = Vec::new();
            rows.retain(|row| {
                let key = params
                    .group_by
                    .iter()
                    .map(|name| field(*row, name))
                    .collect::<Vec<_>>();
                let duplicate = seen.iter().any(|other| {
                    other
                        .iter()
                        .zip(&key)
                        .all(|(a, b)| compare_values(a, b) == Ordering::Equal)
                });
                if !duplicate {
                    seen.push(key);
                }
                !duplicate
            });
        }
        if !params.order_by.is_empty() {
            rows.sort_by(|a, b| {
                params
                    .order_by
                    .iter()
                    .map(|(name, order)| {
                        let ordering = compare_values(field(a, name), field(b, name));
                        match order {
                            Order::Asc => ordering,
                            Order::Desc => ordering.reverse(),
                        }
                    })
                    .find(|v| v.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }
        rows.into_iter()
            .skip(params.offset.unwrap_or_default() as usize)
            .take(params.limit.map_or(usize::MAX, |v| v as usize))
            .cloned()
            .collect()
    }

    /// Merge `params` into every matching row.
    pub fn update(&mut self, conditions: &FieldMap, params: &FieldMap) -> u64 {
        let mut affected = 0;
        for row in self.rows.iter_mut().filter(|row| matches(row, conditions)) {
            row.merge(params.clone());
            affected += 1;
        }
        affected
    }

    pub fn delete(&mut self, conditions: &FieldMap) -> u64 {
        let before = self.rows.len();
        self.rows.retain(|row| !matches(row, conditions));
        (before - self.rows.len()) as u64
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelier_core::fields;

    fn table() -> MemoryTable {
        let mut table = MemoryTable::default();
        table.push(fields! { "id" => 1_i64, "name" => "b", "group" => "x" });
        table.push(fields! { "id" => 2_i64, "name" => "a", "group" => "y" });
        table.push(fields! { "id" => 3_i64, "name" => "c", "group" => "x" });
        table.push(fields! { "id" => 4_i64, "name" => "a" });
        table
    }

    fn ids(rows: &[FieldMap]) -> Vec<i64> {
        rows.iter()
            .map(|row| match row.get("id") {
                Some(Value::Int64(Some(v))) => *v,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn compare_mixed_values() {
        assert!(compare_values(&Value::Null, &Value::Boolean(Some(false))).is_lt());
        assert!(compare_values(&Value::Int64(Some(2)), &Value::Float64(Some(1.5))).is_gt());
        assert!(compare_values(&Value::Int64(None), &Value::Null).is_eq());
        assert!(compare_values(&Value::Varchar(Some("1".into())), &Value::Int64(Some(1))).is_gt());
    }

    #[test]
    fn select_filters_sorts_and_slices() {
        let table = table();
        let params = QueryParams {
            conditions: fields! { "name" => "a" },
            ..Default::default()
        };
        assert_eq!(ids(&table.select(&params)), [2, 4]);
        let params = QueryParams {
            order_by: vec![("name".into(), Order::Asc), ("id".into(), Order::Desc)],
            offset: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(ids(&table.select(&params)), [2, 1]);
    }

    #[test]
    fn null_conditions_match_nothing() {
        let mut table = table();
        table.push(fields! { "id" => 5_i64, "name" => "e", "group" => Value::Null });
        let params = QueryParams {
            conditions: fields! { "group" => Value::Null },
            ..Default::default()
        };
        assert!(table.select(&params).is_empty());
        assert_eq!(table.count(&fields! { "group" => Value::Varchar(None) }), 0);
        assert_eq!(
            table.update(&fields! { "group" => Value::Null }, &fields! { "name" => "z" }),
            0
        );
        assert_eq!(table.delete(&fields! { "id" => Value::Null }), 0);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn select_groups_keep_first_row() {
        let params = QueryParams {
            group_by: vec!["group".into()],
            ..Default::default()
        };
        assert_eq!(ids(&table().select(&params)), [1, 2, 4]);
    }

    #[test]
    fn update_and_delete_count_rows() {
        let mut table = table();
        assert_eq!(table.update(&fields! { "group" => "x" }, &fields! { "name" => "z" }), 2);
        assert_eq!(table.count(&fields! { "name" => "z" }), 2);
        assert_eq!(table.delete(&fields! { "name" => "a" }), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.next_sequence(), 5);
    }
}
