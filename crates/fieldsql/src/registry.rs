//! Schema registry and field locator.
//!
//! The registry is populated once with [`Registry::register`] and then shared
//! read-only with the query builders. It keeps, per registered type:
//!
//! - the ordered, backtick-quoted column list
//! - column → field path and field path → column maps
//!
//! plus one index over every registered field, mapping a [`Field`](crate::Field)
//! handle to its column. Lookups never fail loudly: an unknown field resolves to
//! the empty string, an unknown type to an empty column list.

use crate::schema::{AsFieldKey, FieldDef, FieldKey, Schema};
use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered column layout of one schema type.
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    type_name: &'static str,
    owner: TypeId,
    columns: Vec<String>,
    column_fields: HashMap<String, String>,
    field_columns: HashMap<String, String>,
}

impl SchemaInfo {
    fn from_defs(type_name: &'static str, owner: TypeId, defs: Vec<FieldDef>) -> Self {
        let mut info = SchemaInfo {
            type_name,
            owner,
            columns: Vec::with_capacity(defs.len()),
            column_fields: HashMap::with_capacity(defs.len()),
            field_columns: HashMap::with_capacity(defs.len()),
        };
        for def in defs {
            let column = quote_ident(&def.column);
            info.columns.push(column.clone());
            info.column_fields.insert(column.clone(), def.path.clone());
            info.field_columns.insert(def.path, column);
        }
        info
    }

    /// Bare type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this layout was registered for `T`.
    pub fn is_for<T: 'static>(&self) -> bool {
        self.owner == TypeId::of::<T>()
    }

    /// Quoted columns in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Field path mapped to a quoted column.
    pub fn field_of(&self, column: &str) -> Option<&str> {
        self.column_fields.get(column).map(String::as_str)
    }

    /// Quoted column mapped to a field path.
    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.field_columns.get(field).map(String::as_str)
    }
}

/// Registry of schema types and their field → column index.
#[derive(Debug, Default)]
pub struct Registry {
    schemas: HashMap<&'static str, Arc<SchemaInfo>>,
    field_index: HashMap<FieldKey, String>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`, replacing any previous entry under the same type name.
    ///
    /// Struct-ness is enforced at compile time by `#[derive(Schema)]`.
    pub fn register<T: Schema>(&mut self) -> &mut Self {
        let mut defs = Vec::new();
        T::describe(&mut defs, "");

        let owner = TypeId::of::<T>();
        for def in &defs {
            let key = FieldKey {
                owner,
                owner_name: T::TYPE_NAME,
                path: Arc::from(def.path.as_str()),
            };
            self.field_index.insert(key, quote_ident(&def.column));
        }

        if let Some(previous) = self.schemas.get(T::TYPE_NAME)
            && previous.owner != owner
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "fieldsql.registry",
                type_name = T::TYPE_NAME,
                "replacing schema of a different type with the same name"
            );
        }

        let info = SchemaInfo::from_defs(T::TYPE_NAME, owner, defs);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "fieldsql.registry",
            type_name = T::TYPE_NAME,
            columns = info.columns.len(),
            "registered schema"
        );
        self.schemas.insert(T::TYPE_NAME, Arc::new(info));
        self
    }

    /// Whether `T` has been registered.
    pub fn contains<T: Schema>(&self) -> bool {
        self.schemas.contains_key(T::TYPE_NAME)
    }

    /// Registered layout of `T`.
    pub fn schema<T: Schema>(&self) -> Option<&SchemaInfo> {
        self.schema_by_name(T::TYPE_NAME)
    }

    /// Registered layout by bare type name.
    pub fn schema_by_name(&self, type_name: &str) -> Option<&SchemaInfo> {
        self.schemas.get(type_name).map(|info| info.as_ref())
    }

    /// All quoted columns of `T` in declaration order; empty if unregistered.
    pub fn all_columns<T: Schema>(&self) -> Vec<String> {
        self.schema::<T>()
            .map(|info| info.columns.clone())
            .unwrap_or_default()
    }

    /// Column of a field handle, or the empty string when it cannot be resolved.
    pub fn column_name(&self, field: impl AsFieldKey) -> String {
        self.field_index
            .get(field.field_key())
            .cloned()
            .unwrap_or_default()
    }

    /// Columns of several field handles; all-or-nothing.
    pub fn columns<I>(&self, fields: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsFieldKey,
    {
        let mut columns = Vec::new();
        for field in fields {
            let column = self.column_name(field);
            if column.is_empty() {
                return Vec::new();
            }
            columns.push(column);
        }
        columns
    }

    /// Field path of a handle if it resolves, or the empty string.
    pub fn field_name(&self, field: impl AsFieldKey) -> String {
        let key = field.field_key();
        if self.field_index.contains_key(key) {
            key.path().to_string()
        } else {
            String::new()
        }
    }

    /// Field paths of several handles; all-or-nothing.
    pub fn field_names<I>(&self, fields: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsFieldKey,
    {
        let mut names = Vec::new();
        for field in fields {
            let name = self.field_name(field);
            if name.is_empty() {
                return Vec::new();
            }
            names.push(name);
        }
        names
    }

    /// Field path behind a quoted column of `T`.
    pub(crate) fn field_of<T: Schema>(&self, column: &str) -> Option<&str> {
        self.schema::<T>()?.field_of(column)
    }

    /// Quoted column behind a field path of `T`.
    pub(crate) fn column_of<T: Schema>(&self, field: &str) -> Option<&str> {
        self.schema::<T>()?.column_of(field)
    }
}

/// Wrap an identifier in backticks, doubling any embedded backtick.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Inverse of [`quote_ident`]; unquoted names pass through unchanged.
pub(crate) fn unquote_ident(name: &str) -> Cow<'_, str> {
    match name
        .strip_prefix('`')
        .and_then(|inner| inner.strip_suffix('`'))
    {
        Some(inner) if inner.contains("``") => Cow::Owned(inner.replace("``", "`")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(name),
    }
}
