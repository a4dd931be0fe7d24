//! Attribute parsing for the Record derive macro.
//!
//! Parses the `#[record(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone)]
pub struct RecordAttr {
    /// Hide this field from the record.
    pub skip: bool,
    /// Name the field is exposed under (default: the field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for RecordAttr {
    fn default() -> Self {
        RecordAttr {
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr {
            span: input.span(),
            ..RecordAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    };
                    if s.value().is_empty() {
                        return Err(Error::new(s.span(), "rename must not be empty"));
                    }
                    attr.rename = Some(s.value());
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.rename.is_some() {
            return Err(Error::new(attr.span, "a skipped field cannot be renamed"));
        }

        Ok(attr)
    }
}

/// Extract `#[record(...)]` attributes from a field's attributes.
///
/// Repeated `#[record]` attributes are merged.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    let mut merged = RecordAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let parsed = attr.parse_args::<RecordAttr>()?;
        merged.skip |= parsed.skip;
        if parsed.rename.is_some() {
            merged.rename = parsed.rename;
        }
        merged.span = attr.span();
    }
    if merged.skip && merged.rename.is_some() {
        return Err(Error::new(merged.span, "a skipped field cannot be renamed"));
    }
    Ok(merged)
}
