use modelier_core::{Connection, FieldMap, Query, QueryParams, Value, separated_by};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $out.push_str(if $value.is_sign_negative() {
                "'-Infinity'"
            } else {
                "'Infinity'"
            });
        } else if $value.is_nan() {
            $out.push_str("'NaN'");
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Renders the statement log of a [`crate::MemoryConnection`].
///
/// Nothing parses these statements back, they describe what each call did in a form close to
/// SQL so that tests can assert on them.
#[derive(Default, Debug, Clone, Copy)]
pub struct StatementWriter;

impl StatementWriter {
    pub fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => out.push_str("NULL"),
            Value::Boolean(Some(v)) => out.push_str(if *v { "true" } else { "false" }),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::Float64(Some(v)) => write_float!(out, *v),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            _ => out.push_str("NULL"),
        }
    }

    pub fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut pos = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[pos..i]);
                out.push_str("''");
                pos = i + 1;
            } else if c == '\n' {
                out.push_str(&value[pos..i]);
                out.push_str("\\n");
                pos = i + 1;
            }
        }
        out.push_str(&value[pos..]);
        out.push('\'');
    }

    /// `a=1, b='x'`, joined by `separator`.
    pub fn write_assignments(&self, out: &mut String, fields: &FieldMap, separator: &str) {
        separated_by(
            out,
            fields.iter(),
            |out, (name, value)| {
                out.push_str(name);
                out.push('=');
                self.write_value(out, value);
            },
            separator,
        );
    }

    pub fn write_where(&self, out: &mut String, conditions: &FieldMap) {
        if conditions.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        self.write_assignments(out, conditions, " AND ");
    }

    pub fn write_modifiers(&self, out: &mut String, params: &QueryParams) {
        if !params.group_by.is_empty() {
            out.push_str(" GROUP BY ");
            separated_by(out, &params.group_by, |out, v| out.push_str(v), ", ");
        }
        if !params.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            separated_by(
                out,
                &params.order_by,
                |out, (field, order)| {
                    out.push_str(field);
                    out.push(' ');
                    out.push_str(&order.to_string().to_uppercase());
                },
                ", ",
            );
        }
        if let Some(offset) = params.offset {
            out.push_str(" OFFSET ");
            write_integer!(out, offset);
        }
        if let Some(limit) = params.limit {
            out.push_str(" LIMIT ");
            write_integer!(out, limit);
        }
    }

    pub fn write_select<C: Connection>(&self, out: &mut String, query: &Query<C>) {
        out.push_str("SELECT * FROM ");
        out.push_str(query.model().table());
        self.write_where(out, &query.params().conditions);
        self.write_modifiers(out, query.params());
    }

    pub fn write_count<C: Connection>(&self, out: &mut String, query: &Query<C>) {
        out.push_str("SELECT COUNT(*) FROM ");
        out.push_str(query.model().table());
        self.write_where(out, &query.params().conditions);
    }

    pub fn write_insert(&self, out: &mut String, table: &str, row: &FieldMap) {
        out.push_str("INSERT INTO ");
        out.push_str(table);
        if !row.is_empty() {
            out.push(' ');
            self.write_assignments(out, row, ", ");
        }
    }

    pub fn write_update<C: Connection>(&self, out: &mut String, query: &Query<C>, params: &FieldMap) {
        out.push_str("UPDATE ");
        out.push_str(query.model().table());
        out.push_str(" SET ");
        self.write_assignments(out, params, ", ");
        self.write_where(out, &query.params().conditions);
    }

    pub fn write_delete<C: Connection>(&self, out: &mut String, query: &Query<C>) {
        out.push_str("DELETE FROM ");
        out.push_str(query.model().table());
        self.write_where(out, &query.params().conditions);
    }
}
