//! Convenient imports for typical `fieldsql` usage.
//!
//! ```ignore
//! use fieldsql::prelude::*;
//! ```

pub use crate::{
    Condition, ConnParams, ExecResult, Field, GenericClient, OrmError, OrmResult, Query, Registry,
    RowReader, Schema, TransactionClient, Value, accept_any, assert_rows_affected, exec, exec_tx,
    to_row,
};

pub use crate::{
    Count, Delete, DistinctValues, FieldUpdate, FieldUpdates, InsertRow, InsertRows, Lookup,
    SelectRow, SelectRows, Top, TopValue, Update, ValueQuery,
};

#[cfg(feature = "mysql")]
pub use crate::{MySqlClient, MySqlTx};
