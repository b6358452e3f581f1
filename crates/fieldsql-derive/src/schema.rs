//! Schema derive macro implementation

use crate::attrs::{FieldKind, field_kind};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Schema can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Schema can only be derived for structs with named fields",
            ));
        }
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Schema cannot be derived for generic structs",
        ));
    }

    let fields_name = format_ident!("{}Fields", name);
    let type_name = name.unraw().to_string();
    let fields_doc = format!("Field handles of [`{type_name}`].");

    let mut handle_decls = Vec::new();
    let mut handle_inits = Vec::new();
    let mut describes = Vec::new();
    let mut get_arms = Vec::new();
    let mut set_arms = Vec::new();
    let mut get_embeds = Vec::new();
    let mut set_embeds = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let path = ident.unraw().to_string();

        match field_kind(field, ident)? {
            FieldKind::Skip => {}
            FieldKind::Column(column) => {
                handle_decls.push(quote! {
                    #vis #ident: ::fieldsql::Field<O, #ty>
                });
                handle_inits.push(quote! {
                    #ident: ::fieldsql::Field::new(::std::format!("{}{}", prefix, #path))
                });
                describes.push(quote! {
                    out.push(::fieldsql::FieldDef::new(::std::format!("{}{}", prefix, #path), #column));
                });
                get_arms.push(quote! {
                    #path => return ::std::option::Option::Some(::fieldsql::ToValue::to_value(&self.#ident)),
                });
                set_arms.push(quote! {
                    #path => {
                        return ::std::option::Option::Some(
                            ::fieldsql::FromValue::from_value(value).map(|v| self.#ident = v),
                        );
                    }
                });
            }
            FieldKind::Embed => {
                let nested = format!("{path}.");
                handle_decls.push(quote! {
                    #vis #ident: <#ty as ::fieldsql::Schema>::Fields<O>
                });
                handle_inits.push(quote! {
                    #ident: <#ty as ::fieldsql::Schema>::fields_in::<O>(&::std::format!("{}{}", prefix, #nested))
                });
                describes.push(quote! {
                    <#ty as ::fieldsql::Schema>::describe(out, &::std::format!("{}{}", prefix, #nested));
                });
                get_embeds.push(quote! {
                    if let ::std::option::Option::Some(rest) = path.strip_prefix(#nested) {
                        return ::fieldsql::Schema::get_field(&self.#ident, rest);
                    }
                });
                set_embeds.push(quote! {
                    if let ::std::option::Option::Some(rest) = path.strip_prefix(#nested) {
                        return ::fieldsql::Schema::set_field(&mut self.#ident, rest, value);
                    }
                });
            }
        }
    }

    // Keeps unit-like schemas free of unused-variable warnings.
    let touch_params = describes.is_empty().then(|| quote! { let _ = (&out, prefix); });
    let touch_prefix = handle_inits.is_empty().then(|| quote! { let _ = prefix; });

    Ok(quote! {
        #[doc = #fields_doc]
        #[allow(dead_code)]
        #vis struct #fields_name<O: 'static> {
            #(#handle_decls,)*
            _owner: ::std::marker::PhantomData<fn() -> O>,
        }

        impl ::fieldsql::Schema for #name {
            const TYPE_NAME: &'static str = #type_name;
            type Fields<O: 'static> = #fields_name<O>;

            fn fields_in<O: 'static>(prefix: &str) -> #fields_name<O> {
                #touch_prefix
                #fields_name {
                    #(#handle_inits,)*
                    _owner: ::std::marker::PhantomData,
                }
            }

            fn describe(out: &mut ::std::vec::Vec<::fieldsql::FieldDef>, prefix: &str) {
                #touch_params
                #(#describes)*
            }

            #[allow(clippy::match_single_binding, clippy::needless_return)]
            fn get_field(&self, path: &str) -> ::std::option::Option<::fieldsql::Value> {
                match path {
                    #(#get_arms)*
                    _ => {}
                }
                #(#get_embeds)*
                ::std::option::Option::None
            }

            #[allow(clippy::match_single_binding, clippy::needless_return)]
            fn set_field(
                &mut self,
                path: &str,
                value: ::fieldsql::Value,
            ) -> ::std::option::Option<::fieldsql::OrmResult<()>> {
                match path {
                    #(#set_arms)*
                    _ => {}
                }
                #(#set_embeds)*
                let _ = value;
                ::std::option::Option::None
            }
        }
    })
}
