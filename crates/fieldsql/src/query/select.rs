//! SELECT builders that decode whole rows into `T`.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::OrmResult;
use crate::exec::{fetch_rows, pre_read_check, read_each, read_first};
use crate::query::traits::{BuiltQuery, Query};
use crate::query::{Order, Target};
use crate::registry::Registry;
use crate::row::RowReader;
use crate::schema::{AsFieldKey, Schema};

/// `SELECT cols FROM t WHERE cond LIMIT 1`
///
/// The condition defaults to `false`.
#[derive(Debug, Clone)]
pub struct SelectRow<'r, T> {
    target: Target<'r>,
    columns: Vec<String>,
    reader: Option<RowReader<T>>,
}

impl<'r, T: Schema> SelectRow<'r, T> {
    /// Builder with no columns and no reader.
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        Self {
            target: Target::required(registry, table),
            columns: Vec::new(),
            reader: None,
        }
    }

    /// Builder over every column of `T`, with a matching reader.
    pub fn full(registry: &'r Registry, table: &str) -> Self {
        let columns = registry.all_columns::<T>();
        let reader = RowReader::new(registry, &columns);
        Self::new(registry, table).columns(columns).reader(reader)
    }

    /// Project the given quoted columns.
    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Project the given fields and read them back in the same order.
    pub fn fields<I>(self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsFieldKey,
    {
        let registry = self.target.registry();
        let columns = registry.columns(fields);
        let reader = RowReader::new(registry, &columns);
        self.columns(columns).reader(reader)
    }

    pub fn reader(mut self, reader: RowReader<T>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Fetch the row; no match is [`OrmError::NotFound`](crate::OrmError::NotFound).
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> OrmResult<T> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "select_row", &built).await?;
        read_first(&rows, reader)
    }

    /// Fetch the row if there is one.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> OrmResult<Option<T>> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "select_row", &built).await?;
        rows.first().map(|row| reader.read(row)).transpose()
    }
}

impl<T: Schema> Query for SelectRow<'_, T> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.columns.is_empty() {
            return BuiltQuery::empty();
        }
        let sql = format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            self.columns.join(", "),
            self.target.table(),
            condition.sql
        );
        BuiltQuery::new(sql, condition.values)
    }
}

/// `SELECT cols FROM t WHERE cond [ORDER BY col ASC|DESC] [LIMIT offset, limit]`
///
/// The condition defaults to `true`.
#[derive(Debug, Clone)]
pub struct SelectRows<'r, T> {
    target: Target<'r>,
    columns: Vec<String>,
    reader: Option<RowReader<T>>,
    order: Option<Order>,
    limit: u64,
    // None once a page offset overflows
    offset: Option<u64>,
}

impl<'r, T: Schema> SelectRows<'r, T> {
    /// Builder with no columns and no reader.
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        Self {
            target: Target::optional(registry, table),
            columns: Vec::new(),
            reader: None,
            order: None,
            limit: 0,
            offset: Some(0),
        }
    }

    /// Builder over every column of `T`, with a matching reader.
    pub fn full(registry: &'r Registry, table: &str) -> Self {
        let columns = registry.all_columns::<T>();
        let reader = RowReader::new(registry, &columns);
        Self::new(registry, table).columns(columns).reader(reader)
    }

    /// Project the given quoted columns.
    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Project the given fields and read them back in the same order.
    pub fn fields<I>(self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsFieldKey,
    {
        let registry = self.target.registry();
        let columns = registry.columns(fields);
        let reader = RowReader::new(registry, &columns);
        self.columns(columns).reader(reader)
    }

    pub fn reader(mut self, reader: RowReader<T>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Return at most `limit` rows from the start. Resets any page offset.
    pub fn limit(mut self, limit: u64) -> Self {
        self.offset = Some(0);
        self.limit = limit;
        self
    }

    /// Return page `number` (1-based) of `batch_size` rows.
    ///
    /// A page whose offset does not fit in a `u64` builds an empty query.
    pub fn page(mut self, number: u64, batch_size: u64) -> Self {
        self.offset = number.saturating_sub(1).checked_mul(batch_size);
        self.limit = batch_size;
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

    /// Fetch every matching row. Rows that fail to decode are skipped.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> OrmResult<Vec<T>> {
        let (built, reader) = pre_read_check(self, conn, self.reader.as_ref())?;
        let rows = fetch_rows(conn, "select_rows", &built).await?;
        let mut items = Vec::with_capacity(rows.len());
        read_each(&rows, reader, |item| items.push(item));
        Ok(items)
    }
}

impl<T: Schema> Query for SelectRows<'_, T> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.columns.is_empty() {
            return BuiltQuery::empty();
        }
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {}",
            self.columns.join(", "),
            self.target.table(),
            condition.sql
        );
        if let Some(order) = &self.order {
            match order.render(self.target.registry()) {
                Some(order) => {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&order);
                }
                None => return BuiltQuery::empty(),
            }
        }
        if self.limit > 0 {
            let Some(offset) = self.offset else {
                return BuiltQuery::empty();
            };
            sql.push_str(&format!(" LIMIT {}, {}", offset, self.limit));
        }
        BuiltQuery::new(sql, condition.values)
    }
}
