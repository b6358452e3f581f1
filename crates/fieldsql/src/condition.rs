//! WHERE-clause condition trees.
//!
//! A [`Condition`] references fields through typed handles and is rendered
//! against a [`Registry`] into a [`Fragment`]: SQL text with `?` placeholders
//! plus the bound values in placeholder order.
//!
//! Any node whose field cannot be resolved renders as `false`, and a `false`
//! child collapses its whole AND/OR group to `false`. A condition mistake
//! therefore matches no rows rather than every row.
//!
//! # Example
//! ```ignore
//! use fieldsql::Condition;
//!
//! let f = User::fields();
//! let cond = Condition::and(vec![
//!     Condition::eq(&f.status, "active".to_string()),
//!     Condition::in_list(&f.role, vec!["admin".to_string(), "owner".to_string()]),
//!     Condition::eq(&f.deleted_at, None),
//! ]);
//! // (`status` = ? AND `role` IN (?, ?) AND `deleted_at` IS NULL)
//! ```

use crate::registry::Registry;
use crate::schema::{Field, FieldKey};
use crate::value::{ToValue, Value};
use std::fmt;

/// Comparison operator of a single-column condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    In,
    NotIn,
    /// `LIKE 'value%'`
    Prefix,
    /// `LIKE '%value'`
    Suffix,
    /// `LIKE '%value%'`
    Substring,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Prefix => "PREFIX",
            Operator::Suffix => "SUFFIX",
            Operator::Substring => "SUBSTRING",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join operator of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn as_str(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// A rendered condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub values: Vec<Value>,
    always_false: bool,
}

impl Fragment {
    fn new(sql: String, values: Vec<Value>) -> Self {
        Self {
            sql,
            values,
            always_false: false,
        }
    }

    /// `false`, no values.
    pub fn always_false() -> Self {
        Self {
            sql: "false".to_string(),
            values: Vec::new(),
            always_false: true,
        }
    }

    /// `true`, no values.
    pub fn always_true() -> Self {
        Self::new("true".to_string(), Vec::new())
    }

    /// Whether this fragment is the fail-safe `false`.
    pub fn is_always_false(&self) -> bool {
        self.always_false
    }
}

/// A composable WHERE condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Condition {
    /// Matches every row (`true`).
    MatchAll,
    /// Matches no row (`false`). Default for statements that require a condition.
    #[default]
    Missing,
    /// `column OP ?`
    Value {
        field: FieldKey,
        op: Operator,
        value: Value,
    },
    /// `column LIST_OP (?, ...)`, or `column SOLO_OP ?` for one value.
    List {
        field: FieldKey,
        list_op: Operator,
        solo_op: Operator,
        values: Vec<Value>,
    },
    /// Children joined by AND / OR.
    Multi {
        logic: Logic,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// Match all rows.
    pub fn match_all() -> Self {
        Condition::MatchAll
    }

    /// Match no rows.
    pub fn missing() -> Self {
        Condition::Missing
    }

    fn value<O, V: ToValue>(field: &Field<O, V>, op: Operator, value: &V) -> Self {
        Condition::Value {
            field: field.key().clone(),
            op,
            value: value.to_value(),
        }
    }

    fn list<O, V: ToValue>(
        field: &Field<O, V>,
        list_op: Operator,
        solo_op: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::List {
            field: field.key().clone(),
            list_op,
            solo_op,
            values: values.into_iter().map(|v| v.to_value()).collect(),
        }
    }

    /// `column = ?`, or `column IS NULL` when `value` is null.
    pub fn eq<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::Equal, &value)
    }

    /// `column != ?`, or `column IS NOT NULL` when `value` is null.
    pub fn ne<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::NotEqual, &value)
    }

    /// `column > ?`
    pub fn gt<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::Greater, &value)
    }

    /// `column >= ?`
    pub fn gte<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::GreaterEqual, &value)
    }

    /// `column < ?`
    pub fn lt<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::Less, &value)
    }

    /// `column <= ?`
    pub fn lte<O, V: ToValue>(field: &Field<O, V>, value: V) -> Self {
        Self::value(field, Operator::LessEqual, &value)
    }

    /// `column LIKE 'value%'`
    pub fn prefix<O>(field: &Field<O, String>, value: impl Into<String>) -> Self {
        Self::value(field, Operator::Prefix, &value.into())
    }

    /// `column LIKE '%value'`
    pub fn suffix<O>(field: &Field<O, String>, value: impl Into<String>) -> Self {
        Self::value(field, Operator::Suffix, &value.into())
    }

    /// `column LIKE '%value%'`
    pub fn substring<O>(field: &Field<O, String>, value: impl Into<String>) -> Self {
        Self::value(field, Operator::Substring, &value.into())
    }

    /// `column IN (?, ...)`; a single value degrades to `column = ?`.
    pub fn in_list<O, V: ToValue>(field: &Field<O, V>, values: impl IntoIterator<Item = V>) -> Self {
        Self::list(field, Operator::In, Operator::Equal, values)
    }

    /// `column NOT IN (?, ...)`; a single value degrades to `column != ?`.
    pub fn not_in<O, V: ToValue>(field: &Field<O, V>, values: impl IntoIterator<Item = V>) -> Self {
        Self::list(field, Operator::NotIn, Operator::NotEqual, values)
    }

    /// All children must hold.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Multi {
            logic: Logic::And,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// At least one child must hold.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Multi {
            logic: Logic::Or,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Render against `registry`.
    pub fn build(&self, registry: &Registry) -> Fragment {
        match self {
            Condition::MatchAll => Fragment::always_true(),
            Condition::Missing => Fragment::always_false(),
            Condition::Value { field, op, value } => {
                let column = registry.column_name(field);
                if column.is_empty() {
                    return Fragment::always_false();
                }
                solo_fragment(&column, *op, value)
            }
            Condition::List {
                field,
                list_op,
                solo_op,
                values,
            } => {
                let column = registry.column_name(field);
                match values.as_slice() {
                    _ if column.is_empty() => Fragment::always_false(),
                    [] => Fragment::always_false(),
                    [single] => solo_fragment(&column, *solo_op, single),
                    many => {
                        let placeholders = vec!["?"; many.len()].join(", ");
                        Fragment::new(
                            format!("{column} {list_op} ({placeholders})"),
                            many.to_vec(),
                        )
                    }
                }
            }
            Condition::Multi { logic, conditions } => match conditions.as_slice() {
                [] => Fragment::always_false(),
                [single] => single.build(registry),
                many => {
                    let mut parts = Vec::with_capacity(many.len());
                    let mut values = Vec::new();
                    for condition in many {
                        let fragment = condition.build(registry);
                        if fragment.is_always_false() {
                            return Fragment::always_false();
                        }
                        parts.push(fragment.sql);
                        values.extend(fragment.values);
                    }
                    let glue = format!(" {} ", logic.as_str());
                    Fragment::new(format!("({})", parts.join(&glue)), values)
                }
            },
        }
    }
}

fn solo_fragment(column: &str, op: Operator, value: &Value) -> Fragment {
    match op {
        Operator::Equal if value.is_null() => Fragment::new(format!("{column} IS NULL"), Vec::new()),
        Operator::NotEqual if value.is_null() => {
            Fragment::new(format!("{column} IS NOT NULL"), Vec::new())
        }
        Operator::Prefix => like_fragment(column, format!("{}%", like_text(value))),
        Operator::Suffix => like_fragment(column, format!("%{}", like_text(value))),
        Operator::Substring => like_fragment(column, format!("%{}%", like_text(value))),
        _ => Fragment::new(format!("{column} {op} ?"), vec![value.clone()]),
    }
}

fn like_fragment(column: &str, pattern: String) -> Fragment {
    Fragment::new(format!("{column} LIKE ?"), vec![Value::Text(pattern)])
}

fn like_text(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    }
}
