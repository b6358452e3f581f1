//! INSERT builders over [`RowMap`]s.

use crate::query::placeholders;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::quote_ident;
use crate::row::RowMap;

fn quoted_table(table: &str) -> String {
    if table.is_empty() {
        String::new()
    } else {
        quote_ident(table)
    }
}

/// `INSERT INTO t (cols) VALUES (?, ...)`
///
/// Columns come from the row map in its key order.
#[derive(Debug, Clone, Default)]
pub struct InsertRow {
    table: String,
    row: RowMap,
}

impl InsertRow {
    pub fn new(table: &str) -> Self {
        Self {
            table: quoted_table(table),
            row: RowMap::new(),
        }
    }

    /// Insert this row, usually from [`to_row`](crate::to_row).
    pub fn row(mut self, row: RowMap) -> Self {
        self.row = row;
        self
    }
}

impl Query for InsertRow {
    fn build(&self) -> BuiltQuery {
        if self.table.is_empty() || self.row.is_empty() {
            return BuiltQuery::empty();
        }
        let columns: Vec<&str> = self.row.keys().map(String::as_str).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders(columns.len())
        );
        BuiltQuery::new(sql, self.row.values().cloned().collect())
    }
}

/// `INSERT INTO t (cols) VALUES (?, ...), (?, ...)`
///
/// Every row must have exactly the column set of the first row; otherwise the
/// build is empty.
#[derive(Debug, Clone, Default)]
pub struct InsertRows {
    table: String,
    rows: Vec<RowMap>,
}

impl InsertRows {
    pub fn new(table: &str) -> Self {
        Self {
            table: quoted_table(table),
            rows: Vec::new(),
        }
    }

    pub fn rows(mut self, rows: Vec<RowMap>) -> Self {
        self.rows = rows;
        self
    }

    pub fn push(mut self, row: RowMap) -> Self {
        self.rows.push(row);
        self
    }
}

impl Query for InsertRows {
    fn build(&self) -> BuiltQuery {
        let Some(first) = self.rows.first() else {
            return BuiltQuery::empty();
        };
        if self.table.is_empty() || first.is_empty() {
            return BuiltQuery::empty();
        }

        let columns: Vec<&String> = first.keys().collect();
        let mut params = Vec::with_capacity(columns.len() * self.rows.len());
        for row in &self.rows {
            if !row.keys().eq(columns.iter().copied()) {
                return BuiltQuery::empty();
            }
            params.extend(row.values().cloned());
        }

        let tuple = format!("({})", placeholders(columns.len()));
        let tuples = vec![tuple.as_str(); self.rows.len()].join(", ");
        let columns: Vec<&str> = columns.into_iter().map(String::as_str).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            columns.join(", "),
            tuples
        );
        BuiltQuery::new(sql, params)
    }
}
