//! Field-addressed query builders.
//!
//! One builder per statement shape. Every builder renders to a
//! [`BuiltQuery`]; an empty one means a precondition failed (blank table, no
//! columns, no updates, an unresolved column) and the execution layer refuses
//! to run it with [`OrmError::EmptyQuery`](crate::OrmError::EmptyQuery).
//!
//! Statements that change or probe specific rows (`Update`, `Delete`, `Count`,
//! `SelectRow`, `Top`, `ValueQuery`) default to the `false` condition; reads
//! that list rows (`SelectRows`, `Lookup`, `DistinctValues`) default to `true`.
//!
//! # Usage
//!
//! ```ignore
//! use fieldsql::prelude::*;
//!
//! let f = User::fields();
//!
//! let users = SelectRows::<User>::full(&registry, "users")
//!     .filter(Condition::eq(&f.status, "active".to_string()))
//!     .order_desc(&f.created_at)
//!     .page(2, 20)
//!     .fetch_all(&conn)
//!     .await?;
//!
//! let q = Update::<User>::new(&registry, "users")
//!     .set(&f.status, "inactive".to_string())
//!     .filter(Condition::eq(&f.id, user_id));
//! exec_tx(&q, &tx, assert_rows_affected(1)).await?;
//! ```

mod count;
mod delete;
mod distinct;
mod insert;
mod lookup;
mod scalar;
mod select;
mod top;
mod traits;
mod update;

pub use count::Count;
pub use delete::Delete;
pub use distinct::DistinctValues;
pub use insert::{InsertRow, InsertRows};
pub use lookup::Lookup;
pub use scalar::ValueQuery;
pub use select::{SelectRow, SelectRows};
pub use top::{Top, TopValue};
pub use traits::{BuiltQuery, Query};
pub use update::{FieldUpdate, FieldUpdates, Update};

use crate::condition::{Condition, Fragment};
use crate::registry::{Registry, quote_ident};
use crate::schema::{AsFieldKey, FieldKey};

/// Table plus WHERE condition shared by the builders.
#[derive(Debug, Clone)]
pub(crate) struct Target<'r> {
    registry: &'r Registry,
    table: String,
    condition: Condition,
}

impl<'r> Target<'r> {
    /// Condition defaults to `false`.
    pub(crate) fn required(registry: &'r Registry, table: &str) -> Self {
        Self::with_condition(registry, table, Condition::Missing)
    }

    /// Condition defaults to `true`.
    pub(crate) fn optional(registry: &'r Registry, table: &str) -> Self {
        Self::with_condition(registry, table, Condition::MatchAll)
    }

    fn with_condition(registry: &'r Registry, table: &str, condition: Condition) -> Self {
        let table = if table.is_empty() {
            String::new()
        } else {
            quote_ident(table)
        };
        Self {
            registry,
            table,
            condition,
        }
    }

    pub(crate) fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    /// Render the condition; `None` if no table is set.
    pub(crate) fn prepare(&self) -> Option<Fragment> {
        if self.table.is_empty() {
            return None;
        }
        Some(self.condition.build(self.registry))
    }
}

/// ORDER BY a single field.
#[derive(Debug, Clone)]
pub(crate) struct Order {
    field: FieldKey,
    descending: bool,
}

impl Order {
    pub(crate) fn asc(field: impl AsFieldKey) -> Self {
        Self {
            field: field.field_key().clone(),
            descending: false,
        }
    }

    pub(crate) fn desc(field: impl AsFieldKey) -> Self {
        Self {
            field: field.field_key().clone(),
            descending: true,
        }
    }

    /// `` `col` ASC `` / `` `col` DESC ``, or `None` if the field does not resolve.
    pub(crate) fn render(&self, registry: &Registry) -> Option<String> {
        let column = registry.column_name(&self.field);
        if column.is_empty() {
            return None;
        }
        let direction = if self.descending { "DESC" } else { "ASC" };
        Some(format!("{column} {direction}"))
    }
}

/// `n` placeholders joined by `, `.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
