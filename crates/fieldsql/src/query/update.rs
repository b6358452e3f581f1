//! UPDATE builder.

use crate::condition::Condition;
use crate::query::Target;
use crate::query::traits::{BuiltQuery, Query};
use crate::registry::Registry;
use crate::schema::{Field, Schema};
use crate::value::{ToValue, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// An `(old, new)` pair for one field; only `new` is written.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub old: Value,
    pub new: Value,
}

impl FieldUpdate {
    pub fn new(old: impl ToValue, new: impl ToValue) -> Self {
        Self {
            old: old.to_value(),
            new: new.to_value(),
        }
    }
}

/// Field path → change.
pub type FieldUpdates = BTreeMap<String, FieldUpdate>;

/// `UPDATE t SET col = ?, ... WHERE cond`
///
/// The condition defaults to `false`. Columns are resolved as updates are
/// added; one unresolved column makes the whole build empty.
#[derive(Debug, Clone)]
pub struct Update<'r, T> {
    target: Target<'r>,
    updates: Vec<(String, Value)>,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Schema> Update<'r, T> {
    pub fn new(registry: &'r Registry, table: &str) -> Self {
        Self {
            target: Target::required(registry, table),
            updates: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// `col = value` for a typed field of `T`.
    pub fn set<V: ToValue>(mut self, field: &Field<T, V>, value: V) -> Self {
        let column = self.target.registry().column_name(field);
        self.updates.push((column, value.to_value()));
        self
    }

    /// `col = value` for the field at `path` of `T`.
    pub fn set_field(mut self, path: &str, value: impl ToValue) -> Self {
        let column = self
            .target
            .registry()
            .column_of::<T>(path)
            .unwrap_or_default()
            .to_string();
        self.updates.push((column, value.to_value()));
        self
    }

    /// Apply the `new` side of every change, in field path order.
    pub fn set_fields(self, updates: FieldUpdates) -> Self {
        updates
            .into_iter()
            .fold(self, |q, (path, update)| q.set_field(&path, update.new))
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.target.set_condition(condition);
        self
    }
}

impl<T: Schema> Query for Update<'_, T> {
    fn build(&self) -> BuiltQuery {
        let Some(condition) = self.target.prepare() else {
            return BuiltQuery::empty();
        };
        if self.updates.is_empty() {
            return BuiltQuery::empty();
        }

        let mut sets = Vec::with_capacity(self.updates.len());
        let mut params = Vec::with_capacity(self.updates.len() + condition.values.len());
        for (column, value) in &self.updates {
            if column.is_empty() {
                return BuiltQuery::empty();
            }
            sets.push(format!("{column} = ?"));
            params.push(value.clone());
        }
        params.extend(condition.values);

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.target.table(),
            sets.join(", "),
            condition.sql
        );
        BuiltQuery::new(sql, params)
    }
}
