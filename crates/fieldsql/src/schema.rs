//! Schema description and typed field handles.
//!
//! A [`Schema`] type describes its columns once (normally through
//! `#[derive(Schema)]`) and exposes typed [`Field`] handles, so queries name
//! struct fields instead of column strings.

use crate::error::OrmResult;
use crate::value::Value;
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// One leaf field of a schema, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field path, `.`-separated through embedded structs (e.g. `item.code`).
    pub path: String,
    /// Unquoted column name.
    pub column: String,
}

impl FieldDef {
    pub fn new(path: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }
}

/// A struct mapped to table rows.
///
/// This trait should typically be derived using `#[derive(Schema)]`
/// from the `fieldsql-derive` crate.
///
/// # Example
///
/// ```ignore
/// use fieldsql::Schema;
///
/// #[derive(Debug, Default, Schema)]
/// struct Account {
///     #[orm(embed)]
///     item: fieldsql::types::Item,
///     #[orm(column = "name")]
///     name: String,
///     #[orm(skip)]
///     display_name: String,
/// }
/// ```
pub trait Schema: Default + Send + Sync + 'static {
    /// Bare type name used as the registry key.
    const TYPE_NAME: &'static str;

    /// Typed field handles owned by `O`.
    type Fields<O: 'static>;

    /// Build the field handles, prefixing every path with `prefix`.
    fn fields_in<O: 'static>(prefix: &str) -> Self::Fields<O>;

    /// Push one [`FieldDef`] per column, depth-first through embedded structs.
    fn describe(out: &mut Vec<FieldDef>, prefix: &str);

    /// Read the field at `path`. `None` if there is no such field.
    fn get_field(&self, path: &str) -> Option<Value>;

    /// Write the field at `path`. `None` if there is no such field.
    fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>>;

    /// Field handles rooted at this type.
    fn fields() -> Self::Fields<Self> {
        Self::fields_in::<Self>("")
    }
}

/// Type-erased field reference: owner type plus field path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub(crate) owner: TypeId,
    pub(crate) owner_name: &'static str,
    pub(crate) path: Arc<str>,
}

impl FieldKey {
    /// The field path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Short name of the owning type.
    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner_name, self.path)
    }
}

/// A typed handle to field `path` of schema `O` holding values of type `V`.
///
/// Handles come from [`Schema::fields`]; they resolve to a column only through a
/// [`Registry`](crate::Registry) in which `O` was registered.
pub struct Field<O, V> {
    key: FieldKey,
    _marker: PhantomData<fn() -> (O, V)>,
}

impl<O: 'static, V> Field<O, V> {
    /// Create a handle for `path` on `O`.
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self {
            key: FieldKey {
                owner: TypeId::of::<O>(),
                owner_name: short_type_name::<O>(),
                path: path.into(),
            },
            _marker: PhantomData,
        }
    }
}

impl<O, V> Field<O, V> {
    /// The field path.
    pub fn path(&self) -> &str {
        &self.key.path
    }

    /// The type-erased key.
    pub fn key(&self) -> &FieldKey {
        &self.key
    }
}

impl<O, V> Clone for Field<O, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<O, V> fmt::Debug for Field<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.key).finish()
    }
}

/// Anything that names a field: typed handles and their erased keys.
pub trait AsFieldKey {
    fn field_key(&self) -> &FieldKey;
}

impl AsFieldKey for FieldKey {
    fn field_key(&self) -> &FieldKey {
        self
    }
}

impl<O, V> AsFieldKey for Field<O, V> {
    fn field_key(&self) -> &FieldKey {
        &self.key
    }
}

impl<T: AsFieldKey + ?Sized> AsFieldKey for &T {
    fn field_key(&self) -> &FieldKey {
        (**self).field_key()
    }
}

/// Last path segment of `std::any::type_name`, generics stripped.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owner;

    #[test]
    fn short_type_name_strips_module_path() {
        assert_eq!(short_type_name::<Owner>(), "Owner");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn field_keys_compare_by_owner_and_path() {
        let a: Field<Owner, u32> = Field::new("id");
        let b: Field<Owner, String> = Field::new("id");
        let c: Field<String, u32> = Field::new("id");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(format!("{:?}", a.key()), "Owner.id");
    }
}
