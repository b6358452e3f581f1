//! Key → value lookup builder.

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
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// `SELECT keyCol, valueCol FROM t WHERE cond` collected into a map.
///
/// The condition defaults to `true`. Both fields must resolve or the build is
/// empty. Rows whose key or value cannot be decoded are skipped.
#[derive(Debug, Clone)]
pub struct Lookup<'r, T, K, V> {
    target: Target<'r>,
    key_column: String,
    value_column: String,
    reader: Option<RowReader<T>>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<'r, T, K, V> Lookup<'r, T, K, V>
where
    T: Schema,
    K: FromValue + Eq + Hash,
    V: FromValue,
{
    pub fn new(registry: &'r Registry, table: &str, key: &Field<T, K>, value: &Field<T, V>) -> Self {
        let columns = registry.columns([key.key(), value.key()]);
        let (key_column, value_column, reader) = match columns.as_slice() {
            [k, v] => (k.clone(), v.clone(), Some(RowReader::new(registry, &columns))),
            _ => (String::new(), String::new(), None),
        };
        Self {
            target: Target::optional(registry, table),
            key_column,
            value_column,
            reader,
            _marker: PhantomData,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Run the query and build the map. Later rows overwrite earlier keys.
    pub async fn fetch_map(&self, conn: &impl GenericClient) -> OrmResult<HashMap<K, V>> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "lookup", &built).await?;

        let (Some(key_path), Some(value_path)) = (reader.field_at(0), reader.field_at(1)) else {
            return Ok(HashMap::new());
        };
        let mut lookup = HashMap::with_capacity(rows.len());
        read_each(&rows, reader, |item: T| {
            let key = field_value::<T, K>(&item, key_path);
            let value = field_value::<T, V>(&item, value_path);
            if let (Ok(key), Ok(value)) = (key, value) {
                lookup.insert(key, value);
            }
        });
        Ok(lookup)
    }
}

impl<T, K, V> Query for Lookup<'_, T, K, V>
where
    T: Schema,
{
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.key_column.is_empty() || self.value_column.is_empty() {
            return BuiltQuery::empty();
        }
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {}",
            self.key_column,
            self.value_column,
            self.target.table(),
            condition.sql
        );
        BuiltQuery::new(sql, condition.values)
    }
}
