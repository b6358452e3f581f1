//! MySQL adapter over a `sqlx` pool.
//!
//! [`MySqlClient`] implements [`GenericClient`] for statements outside a
//! transaction; [`MySqlTx`] implements [`TransactionClient`].
//!
//! ```ignore
//! let params = ConnParams::from_env()?;
//! let client = MySqlClient::connect(&params).await?;
//!
//! let tx = client.begin().await?;
//! exec_tx(&update, &tx, assert_rows_affected(1)).await?;
//! tx.commit().await?;
//! ```

use crate::client::{ExecResult, GenericClient, TransactionClient};
use crate::config::ConnParams;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use sqlx::mysql::{
    MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlQueryResult,
    MySqlRow,
};
use sqlx::query::Query as SqlxQuery;
use sqlx::{Column, Connection, Row as SqlxRow, Transaction, TypeInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// A pooled MySQL connection handle.
#[derive(Debug, Clone)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Open a pool for `params` and ping the server once.
    pub async fn connect(params: &ConnParams) -> OrmResult<Self> {
        params.validate()?;
        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.username)
            .password(&params.password)
            .database(&params.database);
        let pool = MySqlPoolOptions::new()
            .max_connections(params.max_connections)
            .connect_with(options)
            .await?;

        let mut conn = pool.acquire().await?;
        conn.ping().await?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "fieldsql.mysql",
            url = %params.redacted_url(),
            max_connections = params.max_connections,
            "connected"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Start a transaction on a pooled connection.
    pub async fn begin(&self) -> OrmResult<MySqlTx> {
        let tx = self.pool.begin().await?;
        Ok(MySqlTx {
            inner: Mutex::new(Some(tx)),
            active: AtomicBool::new(true),
        })
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl GenericClient for MySqlClient {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await?;
        Ok(convert_rows(&rows))
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(exec_result(&result))
    }

    fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }
}

/// An open MySQL transaction.
///
/// Dropping it without [`commit`](TransactionClient::commit) rolls back.
pub struct MySqlTx {
    inner: Mutex<Option<Transaction<'static, MySql>>>,
    active: AtomicBool,
}

impl MySqlTx {
    async fn finish(&self, commit: bool) -> OrmResult<()> {
        let tx = self.inner.lock().await.take().ok_or(OrmError::NoTransaction)?;
        self.active.store(false, Ordering::Release);
        if commit {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MySqlTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlTx")
            .field("active", &self.is_active())
            .finish()
    }
}

impl GenericClient for MySqlTx {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let mut guard = self.inner.lock().await;
        let tx = guard.as_mut().ok_or(OrmError::NoTransaction)?;
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut **tx)
            .await?;
        Ok(convert_rows(&rows))
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let mut guard = self.inner.lock().await;
        let tx = guard.as_mut().ok_or(OrmError::NoTransaction)?;
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut **tx)
            .await?;
        Ok(exec_result(&result))
    }
}

impl TransactionClient for MySqlTx {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    async fn commit(&self) -> OrmResult<()> {
        self.finish(true).await
    }

    async fn rollback(&self) -> OrmResult<()> {
        self.finish(false).await
    }
}

fn exec_result(result: &MySqlQueryResult) -> ExecResult {
    let outcome = ExecResult::new(result.rows_affected());
    match result.last_insert_id() {
        0 => outcome,
        id => outcome.with_last_insert_id(id),
    }
}

fn bind_all<'q>(
    mut query: SqlxQuery<'q, MySql, MySqlArguments>,
    params: &[Value],
) -> SqlxQuery<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param.clone() {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::UInt(v) => query.bind(v),
            Value::Float(v) => query.bind(v),
            Value::Text(v) => query.bind(v),
            Value::Bytes(v) => query.bind(v),
            Value::Date(v) => query.bind(v),
            Value::Time(v) => query.bind(v),
            Value::DateTime(v) => query.bind(v),
            Value::Json(v) => query.bind(sqlx::types::Json(v)),
        };
    }
    query
}

fn convert_rows(rows: &[MySqlRow]) -> Vec<Row> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    decode_each(rows, columns, |row| {
        (0..row.len()).map(|idx| decode_column(row, idx)).collect()
    })
}

/// Decode every row, skipping the ones with a column that fails to decode.
fn decode_each<R>(
    rows: &[R],
    columns: Arc<[String]>,
    decode: impl Fn(&R) -> OrmResult<Vec<Value>>,
) -> Vec<Row> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match decode(row) {
            Ok(values) => out.push(Row::new(columns.clone(), values)),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "fieldsql.mysql",
                    error = %_err,
                    "skipping undecodable row"
                );
            }
        }
    }
    out
}

/// How a column of a given MySQL type is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Null,
    Bool,
    Unsigned,
    Signed,
    Year,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    DateTime,
    Json,
    Bytes,
    /// Raw bytes whose type sqlx's `Vec<u8>` decoder does not accept.
    RawBytes,
    Text,
}

impl ColumnKind {
    fn of(type_name: &str) -> Self {
        match type_name {
            "NULL" => Self::Null,
            "BOOLEAN" => Self::Bool,
            name if name.ends_with("UNSIGNED") => Self::Unsigned,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Self::Signed,
            "YEAR" => Self::Year,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DECIMAL" => Self::Decimal,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" | "TIMESTAMP" => Self::DateTime,
            "JSON" => Self::Json,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => Self::Bytes,
            "BIT" | "GEOMETRY" => Self::RawBytes,
            _ => Self::Text,
        }
    }
}

/// Decode column `idx` according to its reported MySQL type.
fn decode_column(row: &MySqlRow, idx: usize) -> OrmResult<Value> {
    let value = match ColumnKind::of(row.column(idx).type_info().name()) {
        ColumnKind::Null => None,
        ColumnKind::Bool => row.try_get::<Option<bool>, _>(idx)?.map(Value::Bool),
        ColumnKind::Unsigned => row.try_get::<Option<u64>, _>(idx)?.map(Value::UInt),
        ColumnKind::Signed => row.try_get::<Option<i64>, _>(idx)?.map(Value::Int),
        ColumnKind::Year => row
            .try_get_unchecked::<Option<u16>, _>(idx)?
            .map(|v| Value::UInt(u64::from(v))),
        ColumnKind::Float => row
            .try_get::<Option<f32>, _>(idx)?
            .map(|v| Value::Float(f64::from(v))),
        ColumnKind::Double => row.try_get::<Option<f64>, _>(idx)?.map(Value::Float),
        // sent as text; f64::from_value parses it
        ColumnKind::Decimal => row.try_get_unchecked::<Option<String>, _>(idx)?.map(Value::Text),
        ColumnKind::Date => row.try_get::<Option<chrono::NaiveDate>, _>(idx)?.map(Value::Date),
        ColumnKind::Time => row.try_get::<Option<chrono::NaiveTime>, _>(idx)?.map(Value::Time),
        ColumnKind::DateTime => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .map(Value::DateTime),
        ColumnKind::Json => row.try_get::<Option<serde_json::Value>, _>(idx)?.map(Value::Json),
        ColumnKind::Bytes => row.try_get::<Option<Vec<u8>>, _>(idx)?.map(Value::Bytes),
        ColumnKind::RawBytes => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(idx)?
            .map(Value::Bytes),
        ColumnKind::Text => row.try_get::<Option<String>, _>(idx)?.map(Value::Text),
    };
    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_and_geometry_are_read_unchecked() {
        assert_eq!(ColumnKind::of("BIT"), ColumnKind::RawBytes);
        assert_eq!(ColumnKind::of("GEOMETRY"), ColumnKind::RawBytes);
        assert_eq!(ColumnKind::of("VARBINARY"), ColumnKind::Bytes);
        assert_eq!(ColumnKind::of("INT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(ColumnKind::of("VARCHAR"), ColumnKind::Text);
    }

    #[test]
    fn undecodable_rows_are_skipped() {
        let columns: Arc<[String]> = vec!["flags".to_string()].into();
        let raw = [Some(1_i64), None, Some(3)];
        let rows = decode_each(&raw, columns, |cell| match cell {
            Some(v) => Ok(vec![Value::Int(*v)]),
            None => Err(OrmError::TypeMismatch {
                expected: "BIT".to_string(),
                found: "GEOMETRY".to_string(),
            }),
        });

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_by_name("flags"), Some(&Value::Int(1)));
        assert_eq!(rows[1].get(0), Some(&Value::Int(3)));
    }
}
