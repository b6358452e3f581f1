//! COUNT builder.

use crate::client::GenericClient;
use crate::condition::Condition;
use crate::error::{OrmError, OrmResult};
use crate::exec::{fetch_rows, pre_query_check};
use crate::query::Target;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::Registry;

/// `SELECT COUNT(*) FROM t WHERE cond`
///
/// The condition defaults to `false`, so an unfiltered count is always 0.
/// Count everything explicitly with [`Condition::MatchAll`].
#[derive(Debug, Clone)]
pub struct Count<'r> {
    target: Target<'r>,
}

impl<'r> Count<'r> {
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        Self {
            target: Target::required(registry, table),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }

    /// Number of matching rows.
    pub async fn fetch_count(&self, conn: &impl GenericClient) -> OrmResult<u64> {
        let built = pre_query_check(self, conn)?;
        let rows = fetch_rows(conn, "count", &built).await?;
        let row = rows
            .first()
            .ok_or_else(|| OrmError::not_found("COUNT(*) returned no row"))?;
        row.try_get(0)
    }

    /// Whether at least one row matches.
    pub async fn exists(&self, conn: &impl GenericClient) -> OrmResult<bool> {
        Ok(self.fetch_count(conn).await? > 0)
    }
}

impl Query for Count<'_> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.target.table(),
            condition.sql
        );
        BuiltQuery::new(sql, condition.values)
    }
}
