//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait and
//! field name constants.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let record_label = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut entry_exprs: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let record_attrs = parse_record_attrs(&field.attrs)?;
        if record_attrs.skip {
            continue;
        }

        let record_name = record_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());
        if !seen.insert(record_name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record field name '{}'", record_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&record_name));
        field_constants.push(quote! {
            /// Record field name constant.
            pub const #const_name: &'static str = #record_name;
        });

        let value_expr = quote! {
            ::lazyseq::field_value(#record_label, #record_name, &self.#field_name)
        };

        field_arms.push(quote! {
            #record_name => ::core::option::Option::Some(#value_expr),
        });
        entry_exprs.push(quote! {
            (::std::string::String::from(#record_name), #value_expr)
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::lazyseq::Record for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::lazyseq::serde_json::Value> {
                match name {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn entries(
                &self,
            ) -> ::std::vec::Vec<(::std::string::String, ::lazyseq::serde_json::Value)> {
                ::std::vec![#(#entry_exprs),*]
            }
        }
    };

    Ok(expanded)
}

/// Convert a field name to a SCREAMING_SNAKE_CASE constant name.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c.is_alphanumeric() {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        } else {
            result.push('_');
            prev_was_lower = false;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("first name"), "FIRST_NAME");
        assert_eq!(to_screaming_snake_case("my-field"), "MY_FIELD");
        assert_eq!(to_screaming_snake_case("2fa"), "_2FA");
    }

    #[test]
    fn test_generates_constants_and_arms() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                name: String,
                #[record(rename = "years")]
                age: u32,
                #[record(skip)]
                secret: String,
            }
        };
        let output = record_derive_impl(input).unwrap().to_string();

        assert!(output.contains("pub const NAME"));
        assert!(output.contains("pub const YEARS"));
        assert!(output.contains("\"years\""));
        assert!(!output.contains("SECRET"));
        assert!(!output.contains("self . secret"));
        assert!(output.contains(":: lazyseq :: field_value"));
        assert!(output.contains("\"Person\""));
    }

    #[test]
    fn test_keeps_generics() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T: Clone> {
                inner: T,
            }
        };
        let output = record_derive_impl(input).unwrap().to_string();
        assert!(output.contains("T : Clone"));
        assert!(output.contains("Record for Wrapper < T >"));
    }

    #[test]
    fn test_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i32, i32);
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_rejects_enum() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let input: DeriveInput = parse_quote! {
            struct Clash {
                id: u32,
                #[record(rename = "id")]
                other: u32,
            }
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("duplicate record field name"));
    }
}
