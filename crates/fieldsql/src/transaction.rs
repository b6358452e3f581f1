//! Transactional execution with rollback on failure.
//!
//! A transaction is linear: statements run one after another through
//! [`exec_tx`], and the first failure rolls the whole transaction back before
//! the error is returned. Commit is the caller's job once every statement has
//! succeeded.
//!
//! # Example
//!
//! ```ignore
//! use fieldsql::prelude::*;
//!
//! let f = Account::fields();
//! let debit = Update::<Account>::new(&registry, "accounts")
//!     .set(&f.balance, balance - amount)
//!     .filter(Condition::eq(&f.id, from));
//! exec_tx(&debit, &tx, assert_rows_affected(1)).await?;
//!
//! let log = InsertRow::new("transfers").row(to_row(&registry, &transfer));
//! exec_tx(&log, &tx, accept_any()).await?;
//!
//! tx.commit().await?;
//! ```

use crate::client::{ExecResult, TransactionClient};
use crate::error::{OrmError, OrmResult};
use crate::exec::{ResultChecker, log_statement};
use crate::query::Query;

/// Run a mutating statement inside `tx`.
///
/// On an empty query, a driver error or a rejected result the transaction is
/// rolled back and the original error returned; if the rollback fails too the
/// error is [`OrmError::RollbackFailed`] carrying both.
pub async fn exec_tx<Q, Tx, C>(q: &Q, tx: &Tx, check: C) -> OrmResult<ExecResult>
where
    Q: Query + ?Sized,
    Tx: TransactionClient,
    C: ResultChecker,
{
    if !tx.is_active() {
        return Err(OrmError::NoTransaction);
    }

    let built = q.build();
    if built.is_empty() {
        return Err(rollback(tx, OrmError::EmptyQuery).await);
    }

    log_statement("exec_tx", &built);
    let result = match tx.execute(&built.sql, &built.params).await {
        Ok(result) => result,
        Err(err) => return Err(rollback(tx, err).await),
    };

    if !check.check(&result) {
        let err = OrmError::ResultCheckFailed {
            rows_affected: result.rows_affected,
        };
        return Err(rollback(tx, err).await);
    }

    Ok(result)
}

/// Roll `tx` back because of `err`, returning the error to surface.
pub async fn rollback(tx: &impl TransactionClient, err: OrmError) -> OrmError {
    #[cfg(feature = "tracing")]
    tracing::warn!(target: "fieldsql.sql", error = %err, "rolling back transaction");

    match tx.rollback().await {
        Ok(()) => err,
        Err(rollback_err) => OrmError::RollbackFailed {
            source: Box::new(err),
            rollback: Box::new(rollback_err),
        },
    }
}
