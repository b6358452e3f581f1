//! Reusable embeddable schemas.
//!
//! Embed these with `#[orm(embed)]` to pick up the common `ID`, `CreatedAt`,
//! `IsActive` and `Code` columns:
//!
//! ```ignore
//! #[derive(Debug, Default, Schema)]
//! struct Product {
//!     #[orm(embed)]
//!     item: fieldsql::types::Item,
//!     #[orm(column = "Name")]
//!     name: String,
//! }
//! ```

use crate::error::OrmResult;
use crate::schema::{Field, FieldDef, Schema};
use crate::value::{FromValue, ToValue, Value};
use chrono::NaiveDateTime;

/// Schema impl for a struct holding exactly one column.
macro_rules! single_column_schema {
    ($ty:ident, $fields:ident, $field:ident: $value:ty => $column:literal) => {
        #[doc = concat!("Field handles of [`", stringify!($ty), "`].")]
        pub struct $fields<O> {
            pub $field: Field<O, $value>,
        }

        impl Schema for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            type Fields<O: 'static> = $fields<O>;

            fn fields_in<O: 'static>(prefix: &str) -> $fields<O> {
                $fields {
                    $field: Field::new(format!(concat!("{}", stringify!($field)), prefix)),
                }
            }

            fn describe(out: &mut Vec<FieldDef>, prefix: &str) {
                out.push(FieldDef::new(
                    format!(concat!("{}", stringify!($field)), prefix),
                    $column,
                ));
            }

            fn get_field(&self, path: &str) -> Option<Value> {
                (path == stringify!($field)).then(|| self.$field.to_value())
            }

            fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>> {
                (path == stringify!($field))
                    .then(|| FromValue::from_value(value).map(|v| self.$field = v))
            }
        }
    };
}

/// Auto-increment `ID` column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueItem {
    pub id: u64,
}

single_column_schema!(UniqueItem, UniqueItemFields, id: u64 => "ID");

/// `CreatedAt` timestamp column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CreatedItem {
    pub created_at: NaiveDateTime,
}

single_column_schema!(CreatedItem, CreatedItemFields, created_at: NaiveDateTime => "CreatedAt");

/// `IsActive` flag column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActiveItem {
    pub is_active: bool,
}

single_column_schema!(ActiveItem, ActiveItemFields, is_active: bool => "IsActive");

/// `Code` column.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodedItem {
    pub code: String,
}

single_column_schema!(CodedItem, CodedItemFields, code: String => "Code");

/// `ID`, `CreatedAt`, `IsActive`, `Code`, in that order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Item {
    pub unique: UniqueItem,
    pub created: CreatedItem,
    pub active: ActiveItem,
    pub coded: CodedItem,
}

/// Field handles of [`Item`].
pub struct ItemFields<O: 'static> {
    pub unique: UniqueItemFields<O>,
    pub created: CreatedItemFields<O>,
    pub active: ActiveItemFields<O>,
    pub coded: CodedItemFields<O>,
}

impl Item {
    pub fn id(&self) -> u64 {
        self.unique.id
    }

    pub fn code(&self) -> &str {
        &self.coded.code
    }

    pub fn is_active(&self) -> bool {
        self.active.is_active
    }
}

impl Schema for Item {
    const TYPE_NAME: &'static str = "Item";
    type Fields<O: 'static> = ItemFields<O>;

    fn fields_in<O: 'static>(prefix: &str) -> ItemFields<O> {
        ItemFields {
            unique: UniqueItem::fields_in::<O>(&format!("{prefix}unique.")),
            created: CreatedItem::fields_in::<O>(&format!("{prefix}created.")),
            active: ActiveItem::fields_in::<O>(&format!("{prefix}active.")),
            coded: CodedItem::fields_in::<O>(&format!("{prefix}coded.")),
        }
    }

    fn describe(out: &mut Vec<FieldDef>, prefix: &str) {
        UniqueItem::describe(out, &format!("{prefix}unique."));
        CreatedItem::describe(out, &format!("{prefix}created."));
        ActiveItem::describe(out, &format!("{prefix}active."));
        CodedItem::describe(out, &format!("{prefix}coded."));
    }

    fn get_field(&self, path: &str) -> Option<Value> {
        let (head, rest) = path.split_once('.')?;
        match head {
            "unique" => self.unique.get_field(rest),
            "created" => self.created.get_field(rest),
            "active" => self.active.get_field(rest),
            "coded" => self.coded.get_field(rest),
            _ => None,
        }
    }

    fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>> {
        let (head, rest) = path.split_once('.')?;
        match head {
            "unique" => self.unique.set_field(rest, value),
            "created" => self.created.set_field(rest, value),
            "active" => self.active.set_field(rest, value),
            "coded" => self.coded.set_field(rest, value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::row::{Row, RowReader, to_row};
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn item_columns_in_embedding_order() {
        let mut registry = Registry::new();
        registry.register::<Item>();
        assert_eq!(
            registry.all_columns::<Item>(),
            vec!["`ID`", "`CreatedAt`", "`IsActive`", "`Code`"]
        );

        let f = Item::fields();
        assert_eq!(registry.column_name(&f.coded.code), "`Code`");
        assert_eq!(registry.field_name(&f.active.is_active), "active.is_active");
    }

    #[test]
    fn embedded_handles_belong_to_the_outer_type() {
        let mut registry = Registry::new();
        registry.register::<Item>();
        // Handles rooted at CodedItem itself are unknown until it is registered.
        assert_eq!(registry.column_name(&CodedItem::fields().code), "");
        registry.register::<CodedItem>();
        assert_eq!(registry.column_name(&CodedItem::fields().code), "`Code`");
    }

    #[test]
    fn item_reads_and_writes_through_paths() {
        let mut registry = Registry::new();
        registry.register::<Item>();

        let created_at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap();
        let item = Item {
            unique: UniqueItem { id: 7 },
            created: CreatedItem { created_at },
            active: ActiveItem { is_active: true },
            coded: CodedItem { code: "A-1".into() },
        };

        let row = to_row(&registry, &item);
        assert_eq!(row["`ID`"], Value::UInt(7));
        assert_eq!(row["`CreatedAt`"], Value::DateTime(created_at));

        let columns: Arc<[String]> = registry.all_columns::<Item>().into();
        let values = columns.iter().map(|c| row[c].clone()).collect();
        let read = RowReader::<Item>::full(&registry)
            .read(&Row::new(columns, values))
            .unwrap();
        assert_eq!(read, item);
        assert_eq!(read.id(), 7);
        assert_eq!(read.code(), "A-1");
        assert!(read.is_active());

        let mut blank = Item::default();
        assert!(blank.set_field("coded", Value::Null).is_none());
        assert!(blank.set_field("nope.code", Value::Null).is_none());
    }
}
