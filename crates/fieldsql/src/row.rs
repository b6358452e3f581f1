//! Struct ↔ row conversion.
//!
//! [`to_row`] reads a struct into a [`RowMap`] keyed by quoted column, for
//! INSERT. [`RowReader`] scans driver [`Row`]s back into structs, for SELECT.

use crate::error::{OrmError, OrmResult};
use crate::registry::{Registry, unquote_ident};
use crate::schema::Schema;
use crate::value::{FromValue, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Column → value map produced from a struct.
pub type RowMap = BTreeMap<String, Value>;

/// One result row as returned by a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. `columns` is usually shared by every row of a result set.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Column names reported by the driver.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at position `idx`.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Value of the column named `name`, with or without backticks.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let name = unquote_ident(name);
        self.columns
            .iter()
            .position(|c| unquote_ident(c) == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Decode the value at position `idx`.
    pub fn try_get<V: FromValue>(&self, idx: usize) -> OrmResult<V> {
        let value = self
            .values
            .get(idx)
            .cloned()
            .ok_or_else(|| OrmError::IncompleteFields {
                expected: idx + 1,
                resolved: self.values.len(),
            })?;
        V::from_value(value)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Read every registered column of `item` into a [`RowMap`].
///
/// All-or-nothing: if any column of `T` cannot be read, the map is empty.
pub fn to_row<T: Schema>(registry: &Registry, item: &T) -> RowMap {
    let Some(info) = registry.schema::<T>() else {
        return RowMap::new();
    };
    let mut row = RowMap::new();
    for column in info.columns() {
        let value = info.field_of(column).and_then(|field| item.get_field(field));
        match value {
            Some(value) => {
                row.insert(column.clone(), value);
            }
            None => return RowMap::new(),
        }
    }
    row
}

/// Scans rows into `T`, one requested column per row position.
///
/// Field paths are resolved once when the reader is created. A reader whose
/// columns did not all resolve fails every read with
/// [`OrmError::IncompleteFields`] instead of reading a partial struct.
pub struct RowReader<T> {
    columns: Vec<String>,
    fields: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Schema> RowReader<T> {
    /// Reader for the given quoted columns of `T`. Blank columns are skipped
    /// but still count as requested.
    pub fn new(registry: &Registry, columns: &[String]) -> Self {
        let fields = columns
            .iter()
            .filter(|column| !column.is_empty())
            .filter_map(|column| registry.field_of::<T>(column))
            .map(str::to_string)
            .collect();
        Self {
            columns: columns.to_vec(),
            fields,
            _marker: PhantomData,
        }
    }

    /// Reader over all registered columns of `T`.
    pub fn full(registry: &Registry) -> Self {
        Self::new(registry, &registry.all_columns::<T>())
    }

    /// The requested columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether every requested column resolved to a field.
    pub fn is_complete(&self) -> bool {
        self.fields.len() == self.columns.len()
    }

    /// Decode one row into a fresh `T`.
    pub fn read(&self, row: &Row) -> OrmResult<T> {
        if !self.is_complete() || row.len() < self.fields.len() {
            return Err(OrmError::IncompleteFields {
                expected: self.columns.len(),
                resolved: self.fields.len().min(row.len()),
            });
        }

        let mut item = T::default();
        for (field, value) in self.fields.iter().zip(row.values()) {
            match item.set_field(field, value.clone()) {
                Some(result) => result?,
                None => return Err(OrmError::field_not_found(T::TYPE_NAME, field.as_str())),
            }
        }
        Ok(item)
    }

    /// Field path backing the requested column at position `idx`.
    pub(crate) fn field_at(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

impl<T> Clone for RowReader<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            fields: self.fields.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for RowReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowReader")
            .field("columns", &self.columns)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Read field `path` of `item` and decode it as `V`.
pub(crate) fn field_value<T: Schema, V: FromValue>(item: &T, path: &str) -> OrmResult<V> {
    let value = item
        .get_field(path)
        .ok_or_else(|| OrmError::field_not_found(T::TYPE_NAME, path))?;
    V::from_value(value)
}
