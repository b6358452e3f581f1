//! # fieldsql
//!
//! Field-addressed SQL for MySQL: queries name struct fields, not column strings.
//!
//! ## Features
//!
//! - **Typed fields**: `#[derive(Schema)]` generates field handles; conditions and
//!   updates are checked against the field's Rust type
//! - **Explicit registry**: columns resolve through a [`Registry`] populated once at startup
//! - **Fail closed**: an unresolved field, blank table or empty column list builds an
//!   empty query that is never sent; reads and writes of specific rows default to `false`
//! - **Row mapping**: [`to_row`] for INSERT, [`RowReader`] for SELECT
//! - **Transaction-friendly**: [`exec_tx`] rolls back on any failure
//!
//! ## Example
//!
//! ```ignore
//! use fieldsql::prelude::*;
//!
//! #[derive(Debug, Default, Schema)]
//! struct User {
//!     #[orm(column = "ID")]
//!     id: u64,
//!     name: String,
//!     #[orm(skip)]
//!     display: String,
//! }
//!
//! let mut registry = Registry::new();
//! registry.register::<User>();
//!
//! let f = User::fields();
//! let user = SelectRow::<User>::full(&registry, "users")
//!     .filter(Condition::eq(&f.id, 7))
//!     .fetch_one(&client)
//!     .await?;
//!
//! let q = Update::<User>::new(&registry, "users")
//!     .set(&f.name, "grace".to_string())
//!     .filter(Condition::eq(&f.id, 7));
//! exec(&q, &client).await?;
//! ```

// Lets `#[derive(Schema)]` output, which names `::fieldsql`, expand inside this crate.
extern crate self as fieldsql;

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod exec;
pub mod prelude;
pub mod query;
pub mod registry;
pub mod row;
pub mod schema;
pub mod transaction;
pub mod types;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(test)]
mod fixtures;

pub use client::{ExecResult, GenericClient, TransactionClient};
pub use condition::{Condition, Fragment, Logic, Operator};
pub use config::ConnParams;
pub use error::{OrmError, OrmResult};
pub use exec::{ResultChecker, accept_any, assert_rows_affected, exec};
pub use query::{
    BuiltQuery, Count, Delete, DistinctValues, FieldUpdate, FieldUpdates, InsertRow, InsertRows,
    Lookup, Query, SelectRow, SelectRows, Top, TopValue, Update, ValueQuery,
};
pub use registry::{Registry, SchemaInfo};
pub use row::{Row, RowMap, RowReader, to_row};
pub use schema::{AsFieldKey, Field, FieldDef, FieldKey, Schema};
pub use transaction::{exec_tx, rollback};
pub use value::{FromValue, ToValue, Value};

#[cfg(feature = "mysql")]
pub use mysql::{MySqlClient, MySqlTx};

#[cfg(feature = "derive")]
pub use fieldsql_derive::Schema;
