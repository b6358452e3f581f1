//! Ordered top-N builders.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::exec::{fetch_rows, pre_read_check, read_each, read_first};
use crate::query::traits::{BuiltQuery, Query};
use crate::query::{Order, Target};
use crate::registry::Registry;
use crate::row::{RowReader, field_value};
use crate::schema::{AsFieldKey, Field, Schema};
use crate::value::FromValue;
use std::marker::PhantomData;

/// `SELECT cols FROM t WHERE cond ORDER BY col ASC|DESC LIMIT n`
///
/// Projects every column of `T`. An ordering is required; `n` defaults to 1
/// and the condition to `false`.
#[derive(Debug, Clone)]
pub struct Top<'r, T> {
    target: Target<'r>,
    columns: Vec<String>,
    reader: Option<RowReader<T>>,
    order: Option<Order>,
    limit: u64,
}

impl<'r, T: Schema> Top<'r, T> {
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        let columns = registry.all_columns::<T>();
        let reader = RowReader::new(registry, &columns);
        Self {
            target: Target::required(registry, table),
            columns,
            reader: Some(reader),
            order: None,
            limit: 1,
        }
    }

    /// Replace the reader used to decode rows.
    pub fn reader(mut self, reader: RowReader<T>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    pub fn order_asc(mut self, field: impl AsFieldKey) -> Self {
        self.order = Some(Order::asc(field));
        self
    }

    pub fn order_desc(mut self, field: impl AsFieldKey) -> Self {
        self.order = Some(Order::desc(field));
        self
    }

    /// Number of rows to return; 0 builds an empty query.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }

    /// The top row; no match is [`OrmError::NotFound`].
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> OrmResult<T> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "top", &built).await?;
        read_first(&rows, reader)
    }

    /// The top `n` rows. Rows that fail to decode are skipped.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> OrmResult<Vec<T>> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "top", &built).await?;
        let mut items = Vec::with_capacity(rows.len());
        read_each(&rows, reader, |item| items.push(item));
        Ok(items)
    }
}

impl<T: Schema> Query for Top<'_, T> {
    fn build(&self) -> BuiltQuery {
        build_top(&self.target, &self.columns, self.order.as_ref(), self.limit)
    }
}

/// `SELECT col FROM t WHERE cond ORDER BY ord LIMIT 1`, read as one value.
#[derive(Debug, Clone)]
pub struct TopValue<'r, T, V> {
    target: Target<'r>,
    column: String,
    reader: Option<RowReader<T>>,
    order: Option<Order>,
    _marker: PhantomData<fn() -> V>,
}

impl<'r, T: Schema, V: FromValue> TopValue<'r, T, V> {
    pub fn new(registry: &'r Registry, table: &str, field: &Field<T, V>) -> Self {
        let column = registry.column_name(field);
        let reader = (!column.is_empty()).then(|| RowReader::new(registry, std::slice::from_ref(&column)));
        Self {
            target: Target::required(registry, table),
            column,
            reader,
            order: None,
            _marker: PhantomData,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    pub fn order_asc(mut self, field: impl AsFieldKey) -> Self {
        self.order = Some(Order::asc(field));
        self
    }

    pub fn order_desc(mut self, field: impl AsFieldKey) -> Self {
        self.order = Some(Order::desc(field));
        self
    }

    /// The value from the top row; no match is [`OrmError::NotFound`].
    pub async fn fetch_value(&self, conn: &impl GenericClient) -> OrmResult<V> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "top_value", &built).await?;
        let item = read_first(&rows, reader)?;
        let path = reader
            .field_at(0)
            .ok_or_else(|| OrmError::field_not_found(T::TYPE_NAME, self.column.as_str()))?;
        field_value(&item, path)
    }
}

impl<T: Schema, V> Query for TopValue<'_, T, V> {
    fn build(&self) -> BuiltQuery {
        if self.column.is_empty() {
            return BuiltQuery::empty();
        }
        build_top(&self.target, std::slice::from_ref(&self.column), self.order.as_ref(), 1)
    }
}

fn build_top(target: &Target<'_>, columns: &[String], order: Option<&Order>, limit: u64) -> BuiltQuery {
    let Some(condition) = target.prepare() else {
        return BuiltQuery::empty();
    };
    if columns.is_empty() || limit == 0 {
        return BuiltQuery::empty();
    }
    let Some(order) = order.and_then(|order| order.render(target.registry())) else {
        return BuiltQuery::empty();
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT {}",
        columns.join(", "),
        target.table(),
        condition.sql,
        order,
        limit
    );
    BuiltQuery::new(sql, condition.values)
}
