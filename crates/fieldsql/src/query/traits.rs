//! Trait definitions for query builders.

use crate::value::Value;
use std::fmt::Write as _;

/// A built statement: SQL text with `?` placeholders and the bound values.
///
/// An empty `sql` means a precondition failed and the statement must not run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// The "don't run this" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// SQL with every placeholder replaced by its rendered value.
    ///
    /// For logs and debugging only; never execute the result.
    pub fn to_debug_string(&self) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut params = self.params.iter();
        for ch in self.sql.chars() {
            match ch {
                '?' => match params.next() {
                    Some(value) => {
                        let _ = write!(out, "{value}");
                    }
                    None => out.push('?'),
                },
                other => out.push(other),
            }
        }
        out
    }
}

/// Base trait for all query builders.
pub trait Query: Sync {
    /// Build the SQL and parameters, or [`BuiltQuery::empty`].
    fn build(&self) -> BuiltQuery;

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> String {
        self.build().sql
    }

    /// Debug helper rendering values inline.
    fn to_debug_string(&self) -> String {
        self.build().to_debug_string()
    }
}

impl Query for BuiltQuery {
    fn build(&self) -> BuiltQuery {
        self.clone()
    }
}
