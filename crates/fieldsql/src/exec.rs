//! Statement execution against a [`GenericClient`].

use crate::client::{ExecResult, GenericClient};
use crate::error::{OrmError, OrmResult};
use crate::query::{BuiltQuery, Query};
use crate::row::{Row, RowReader};
use crate::schema::Schema;

/// Longest SQL text written to logs, in chars.
#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

/// Post-execution check over the outcome of a mutating statement.
///
/// Implemented for any `Fn(&ExecResult) -> bool`.
pub trait ResultChecker: Send + Sync {
    fn check(&self, result: &ExecResult) -> bool;
}

impl<F> ResultChecker for F
where
    F: Fn(&ExecResult) -> bool + Send + Sync,
{
    fn check(&self, result: &ExecResult) -> bool {
        self(result)
    }
}

/// Accept every result.
pub fn accept_any() -> impl ResultChecker {
    |_: &ExecResult| true
}

/// Require exactly `n` affected rows.
pub fn assert_rows_affected(n: u64) -> impl ResultChecker {
    move |result: &ExecResult| result.rows_affected == n
}

/// Run a mutating statement outside a transaction.
pub async fn exec<Q>(q: &Q, conn: &impl GenericClient) -> OrmResult<ExecResult>
where
    Q: Query + ?Sized,
{
    let built = pre_query_check(q, conn)?;
    log_statement("exec", &built);
    conn.execute(&built.sql, &built.params).await
}

/// Connection check, then build; an empty build is an error.
pub(crate) fn pre_query_check<Q>(q: &Q, conn: &impl GenericClient) -> OrmResult<BuiltQuery>
where
    Q: Query + ?Sized,
{
    if !conn.is_connected() {
        return Err(OrmError::NoConnection);
    }
    let built = q.build();
    if built.is_empty() {
        return Err(OrmError::EmptyQuery);
    }
    Ok(built)
}

/// [`pre_query_check`] plus a reader presence check.
pub(crate) fn pre_read_check<'a, Q, T>(
    q: &Q,
    conn: &impl GenericClient,
    reader: Option<&'a RowReader<T>>,
) -> OrmResult<(BuiltQuery, &'a RowReader<T>)>
where
    Q: Query + ?Sized,
{
    let built = pre_query_check(q, conn)?;
    let reader = reader.ok_or(OrmError::NoReader)?;
    Ok((built, reader))
}

/// Run a read statement and return the raw rows.
pub(crate) async fn fetch_rows(
    conn: &impl GenericClient,
    kind: &'static str,
    built: &BuiltQuery,
) -> OrmResult<Vec<Row>> {
    log_statement(kind, built);
    conn.query(&built.sql, &built.params).await
}

/// Decode the first row; no rows is [`OrmError::NotFound`].
pub(crate) fn read_first<T: Schema>(rows: &[Row], reader: &RowReader<T>) -> OrmResult<T> {
    let row = rows
        .first()
        .ok_or_else(|| OrmError::not_found(format!("no {} row", T::TYPE_NAME)))?;
    reader.read(row)
}

/// Decode every row, handing each item to `task`. Rows that fail to decode are
/// skipped.
pub(crate) fn read_each<T: Schema>(rows: &[Row], reader: &RowReader<T>, mut task: impl FnMut(T)) {
    for row in rows {
        match reader.read(row) {
            Ok(item) => task(item),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "fieldsql.sql",
                    type_name = T::TYPE_NAME,
                    error = %_err,
                    "skipping row"
                );
            }
        }
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn log_statement(kind: &'static str, built: &BuiltQuery) {
    tracing::debug!(
        target: "fieldsql.sql",
        kind,
        params = built.params.len(),
        sql = %truncate_sql(&built.sql, MAX_LOGGED_SQL),
        "executing statement"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn log_statement(_kind: &'static str, _built: &BuiltQuery) {}

#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    match sql.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &sql[..end]).into(),
        None => sql.into(),
    }
}
