//! Hand-written schemas shared by the unit tests.
//!
//! These mirror what `#[derive(Schema)]` generates, so the core can be tested
//! without the proc-macro crate.

use crate::error::OrmResult;
use crate::schema::{Field, FieldDef, Schema};
use crate::value::{FromValue, ToValue, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Audit {
    pub created_by: String,
    pub revision: u32,
}

pub(crate) struct AuditFields<O> {
    pub created_by: Field<O, String>,
    pub revision: Field<O, u32>,
}

impl Schema for Audit {
    const TYPE_NAME: &'static str = "Audit";
    type Fields<O: 'static> = AuditFields<O>;

    fn fields_in<O: 'static>(prefix: &str) -> AuditFields<O> {
        AuditFields {
            created_by: Field::new(format!("{prefix}created_by")),
            revision: Field::new(format!("{prefix}revision")),
        }
    }

    fn describe(out: &mut Vec<FieldDef>, prefix: &str) {
        out.push(FieldDef::new(format!("{prefix}created_by"), "CreatedBy"));
        out.push(FieldDef::new(format!("{prefix}revision"), "Revision"));
    }

    fn get_field(&self, path: &str) -> Option<Value> {
        match path {
            "created_by" => Some(self.created_by.to_value()),
            "revision" => Some(self.revision.to_value()),
            _ => None,
        }
    }

    fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>> {
        match path {
            "created_by" => Some(FromValue::from_value(value).map(|v| self.created_by = v)),
            "revision" => Some(FromValue::from_value(value).map(|v| self.revision = v)),
            _ => None,
        }
    }
}

/// `ID`, `name`, `email`, embedded audit columns; `hidden` is skipped.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct User {
    pub id: u64,
    pub name: String,
    pub hidden: String,
    pub email: Option<String>,
    pub audit: Audit,
}

pub(crate) struct UserFields<O: 'static> {
    pub id: Field<O, u64>,
    pub name: Field<O, String>,
    pub email: Field<O, Option<String>>,
    pub audit: <Audit as Schema>::Fields<O>,
}

impl Schema for User {
    const TYPE_NAME: &'static str = "User";
    type Fields<O: 'static> = UserFields<O>;

    fn fields_in<O: 'static>(prefix: &str) -> UserFields<O> {
        UserFields {
            id: Field::new(format!("{prefix}id")),
            name: Field::new(format!("{prefix}name")),
            email: Field::new(format!("{prefix}email")),
            audit: <Audit as Schema>::fields_in::<O>(&format!("{prefix}audit.")),
        }
    }

    fn describe(out: &mut Vec<FieldDef>, prefix: &str) {
        out.push(FieldDef::new(format!("{prefix}id"), "ID"));
        out.push(FieldDef::new(format!("{prefix}name"), "name"));
        out.push(FieldDef::new(format!("{prefix}email"), "email"));
        <Audit as Schema>::describe(out, &format!("{prefix}audit."));
    }

    fn get_field(&self, path: &str) -> Option<Value> {
        match path {
            "id" => Some(self.id.to_value()),
            "name" => Some(self.name.to_value()),
            "email" => Some(self.email.to_value()),
            _ => path
                .strip_prefix("audit.")
                .and_then(|rest| self.audit.get_field(rest)),
        }
    }

    fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>> {
        match path {
            "id" => Some(FromValue::from_value(value).map(|v| self.id = v)),
            "name" => Some(FromValue::from_value(value).map(|v| self.name = v)),
            "email" => Some(FromValue::from_value(value).map(|v| self.email = v)),
            _ => match path.strip_prefix("audit.") {
                Some(rest) => self.audit.set_field(rest, value),
                None => None,
            },
        }
    }
}

/// A second schema, never registered in most tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Stray {
    pub code: String,
}

pub(crate) struct StrayFields<O> {
    pub code: Field<O, String>,
}

impl Schema for Stray {
    const TYPE_NAME: &'static str = "Stray";
    type Fields<O: 'static> = StrayFields<O>;

    fn fields_in<O: 'static>(prefix: &str) -> StrayFields<O> {
        StrayFields {
            code: Field::new(format!("{prefix}code")),
        }
    }

    fn describe(out: &mut Vec<FieldDef>, prefix: &str) {
        out.push(FieldDef::new(format!("{prefix}code"), "Code"));
    }

    fn get_field(&self, path: &str) -> Option<Value> {
        (path == "code").then(|| self.code.to_value())
    }

    fn set_field(&mut self, path: &str, value: Value) -> Option<OrmResult<()>> {
        (path == "code").then(|| FromValue::from_value(value).map(|v| self.code = v))
    }
}

pub(crate) fn registry() -> crate::Registry {
    let mut registry = crate::Registry::new();
    registry.register::<User>();
    registry
}
