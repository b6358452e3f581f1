//! Client traits the execution layer runs statements through.
//!
//! [`GenericClient`] unifies connections and transactions, so builders and
//! repository code can take either. [`TransactionClient`] adds the
//! commit/rollback half used by [`exec_tx`](crate::exec_tx).

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Rows changed by the statement.
    pub rows_affected: u64,
    /// Auto-increment id generated by an INSERT, if any.
    pub last_insert_id: Option<u64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: u64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// A database handle that can run `?`-parameterized statements.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a statement and report its outcome.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send;

    /// Whether the handle can currently run statements.
    ///
    /// Checked before every statement; `false` fails with
    /// [`OrmError::NoConnection`](crate::OrmError::NoConnection).
    fn is_connected(&self) -> bool {
        true
    }
}

/// A linear transaction: statements, then one commit or rollback.
pub trait TransactionClient: GenericClient {
    /// `false` once committed or rolled back.
    fn is_active(&self) -> bool;

    fn commit(&self) -> impl Future<Output = OrmResult<()>> + Send;

    fn rollback(&self) -> impl Future<Output = OrmResult<()>> + Send;
}

impl<C: GenericClient> GenericClient for &C {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql, params)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
