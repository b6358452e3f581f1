//! Derive macros for fieldsql
//!
//! Provides `#[derive(Schema)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod schema;

/// Derive the `Schema` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use fieldsql::Schema;
///
/// #[derive(Debug, Default, Schema)]
/// struct User {
///     #[orm(column = "ID")]
///     id: u64,
///     name: String,
///     #[orm(skip)]
///     display_name: String,
///     #[orm(embed)]
///     audit: Audit,
/// }
/// ```
///
/// # Generated
///
/// - `impl fieldsql::Schema for User`
/// - `struct UserFields<O>` holding one `fieldsql::Field<O, V>` per column and the
///   nested handles of every embedded struct; get it with `User::fields()`
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` or `#[orm(column = "-")]` - Not a column
/// - `#[orm(embed)]` - Flatten the columns of a nested `Schema` struct
#[proc_macro_derive(Schema, attributes(orm))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
