//! Field-level `#[orm(...)]` attribute parsing.

use syn::ext::IdentExt;
use syn::{Result, Token};

/// How a struct field maps to columns.
pub(crate) enum FieldKind {
    /// One column with the given name.
    Column(String),
    /// A nested `Schema` struct flattened in place.
    Embed,
    /// Not a column.
    Skip,
}

/// Parsed contents of one `#[orm(...)]` list.
#[derive(Default)]
struct FieldAttr {
    column: Option<syn::LitStr>,
    skip: bool,
    embed: bool,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attr.skip = true;
            } else if ident == "embed" {
                attr.embed = true;
            } else if ident == "column" {
                let _: Token![=] = input.parse()?;
                attr.column = Some(input.parse()?);
            } else {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "unknown orm attribute, expected `column = \"...\"`, `skip` or `embed`",
                ));
            }

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Resolve the mapping of `field` from its `#[orm(...)]` attributes.
///
/// Without attributes the column is the field's own name.
pub(crate) fn field_kind(field: &syn::Field, ident: &syn::Ident) -> Result<FieldKind> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        merged.skip |= parsed.skip;
        merged.embed |= parsed.embed;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }

    let column = merged.column.as_ref().map(syn::LitStr::value);
    if merged.skip || column.as_deref() == Some("-") {
        return Ok(FieldKind::Skip);
    }
    if merged.embed {
        if let Some(lit) = &merged.column {
            return Err(syn::Error::new_spanned(
                lit,
                "`embed` cannot be combined with `column`",
            ));
        }
        return Ok(FieldKind::Embed);
    }
    match column {
        Some(name) if name.is_empty() => Err(syn::Error::new_spanned(
            &merged.column,
            "column name must not be empty",
        )),
        Some(name) => Ok(FieldKind::Column(name)),
        None => Ok(FieldKind::Column(ident.unraw().to_string())),
    }
}
