//! SELECT DISTINCT builder.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::exec::{fetch_rows, pre_read_check, read_each};
use crate::query::Target;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::Registry;
use crate::row::{RowReader, field_value};
use crate::schema::{Field, Schema};
use crate::value::FromValue;
use std::marker::PhantomData;

/// `SELECT DISTINCT col FROM t WHERE cond`
///
/// The condition defaults to `true`. Rows that fail to decode are skipped.
#[derive(Debug, Clone)]
pub struct DistinctValues<'r, T, V> {
    target: Target<'r>,
    column: String,
    reader: Option<RowReader<T>>,
    _marker: PhantomData<fn() -> V>,
}

impl<'r, T: Schema, V: FromValue> DistinctValues<'r, T, V> {
    pub fn new(registry: &'r Registry, table: &str, field: &Field<T, V>) -> Self {
        let column = registry.column_name(field);
        let reader = (!column.is_empty()).then(|| RowReader::new(registry, std::slice::from_ref(&column)));
        Self {
            target: Target::optional(registry, table),
            column,
            reader,
            _marker: PhantomData,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Distinct values in the order the database returned them.
    pub async fn fetch_values(&self, conn: &impl GenericClient) -> OrmResult<Vec<V>> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "distinct", &built).await?;

        let Some(path) = reader.field_at(0) else {
            return Ok(Vec::new());
        };
        let mut values = Vec::with_capacity(rows.len());
        read_each(&rows, reader, |item: T| {
            if let Ok(value) = field_value::<T, V>(&item, path) {
                values.push(value);
            }
        });
        Ok(values)
    }
}

impl<T: Schema, V> Query for DistinctValues<'_, T, V> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.column.is_empty() {
            return BuiltQuery::empty();
        }
        let sql = format!(
            "SELECT DISTINCT {} FROM {} WHERE {}",
            self.column,
            self.target.table(),
            condition.sql
        );
        BuiltQuery::new(sql, condition.values)
    }
}
