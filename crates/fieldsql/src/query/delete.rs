//! DELETE builder.

use crate::condition::Condition;
use crate::query::Target;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::Registry;

/// `DELETE FROM t WHERE cond`
///
/// The condition defaults to `false`: a delete without [`filter`](Self::filter)
/// removes nothing.
#[derive(Debug, Clone)]
pub struct Delete<'r> {
    target: Target<'r>,
}

impl<'r> Delete<'r> {
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        Self {
            target: Target::required(registry, table),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }
}

impl Query for Delete<'_> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        let sql = format!("DELETE FROM {} WHERE {}", self.target.table(), condition.sql);
        BuiltQuery::new(sql, condition.values)
    }
}
