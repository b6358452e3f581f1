//! Single-value SELECT builder.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::exec::{fetch_rows, pre_read_check, read_first};
use crate::query::Target;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::Registry;
use crate::row::{RowReader, field_value};
use crate::schema::{Field, Schema};
use crate::value::FromValue;
use std::marker::PhantomData;

/// `SELECT col FROM t WHERE cond`, read as one value of the field's type.
///
/// The condition defaults to `false`.
#[derive(Debug, Clone)]
pub struct ValueQuery<'r, T, V> {
    target: Target<'r>,
    column: String,
    reader: Option<RowReader<T>>,
    _marker: PhantomData<fn() -> V>,
}

impl<'r, T: Schema, V: FromValue> ValueQuery<'r, T, V> {
    pub fn new(registry: &'r Registry, table: &str, field: &Field<T, V>) -> Self {
        let column = registry.column_name(field);
        let reader = (!column.is_empty()).then(|| RowReader::new(registry, std::slice::from_ref(&column)));
        Self {
            target: Target::required(registry, table),
            column,
            reader,
            _marker: PhantomData,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Value from the first matching row; no match is [`OrmError::NotFound`].
    pub async fn fetch_value(&self, conn: &impl GenericClient) -> OrmResult<V> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "value", &built).await?;
        let item = read_first(&rows, reader)?;
        let path = reader
            .field_at(0)
            .ok_or_else(|| OrmError::field_not_found(T::TYPE_NAME, self.column.as_str()))?;
        field_value(&item, path)
    }
}

impl<T: Schema, V> Query for ValueQuery<'_, T, V> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.column.is_empty() {
            return BuiltQuery::empty();
        }
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            self.column,
            self.target.table(),
            condition.sql
        );
        BuiltQuery::new(sql, condition.values)
    }
}
