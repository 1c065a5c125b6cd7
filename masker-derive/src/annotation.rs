//! Parsing of `#[mask(...)]` field attributes.
//!
//! The derive does not interpret annotation text. It only validates the
//! attribute syntax and collects `(key, text)` pairs for the runtime.

use proc_macro2::Span;
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Ident, LitStr, Meta, Result, Token,
};

/// Key used for unkeyed annotations such as `#[mask("filled")]`.
pub(crate) const DEFAULT_KEY: &str = "mask";

/// One annotation attached to a member.
#[derive(Clone, Debug)]
pub(crate) struct FieldAnnotation {
    pub(crate) key: String,
    pub(crate) text: LitStr,
}

/// A single argument inside `#[mask(...)]`.
enum AnnotationArg {
    /// `"filled4"`
    Unkeyed(LitStr),
    /// `log = "zero"`
    Keyed(Ident, LitStr),
}

impl Parse for AnnotationArg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Unkeyed(input.parse()?));
        }
        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        let text: LitStr = input.parse()?;
        Ok(Self::Keyed(key, text))
    }
}

fn push_annotation(
    target: &mut Vec<FieldAnnotation>,
    key: String,
    text: LitStr,
    span: Span,
) -> Result<()> {
    if text.value().trim().is_empty() {
        return Err(syn::Error::new(
            text.span(),
            "annotation text cannot be empty",
        ));
    }
    if target.iter().any(|existing| existing.key == key) {
        return Err(syn::Error::new(
            span,
            format!("multiple annotations for key `{key}` on the same field"),
        ));
    }
    target.push(FieldAnnotation { key, text });
    Ok(())
}

pub(crate) fn parse_field_annotations(attrs: &[Attribute]) -> Result<Vec<FieldAnnotation>> {
    let mut annotations = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("mask") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected an annotation (e.g., #[mask(\"filled\")])",
                ));
            }
            Meta::List(list) => {
                let args = list.parse_args_with(
                    Punctuated::<AnnotationArg, Token![,]>::parse_terminated,
                )?;
                if args.is_empty() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected an annotation (e.g., #[mask(\"filled\")])",
                    ));
                }
                for arg in args {
                    match arg {
                        AnnotationArg::Unkeyed(text) => {
                            let span = text.span();
                            push_annotation(&mut annotations, DEFAULT_KEY.to_string(), text, span)?;
                        }
                        AnnotationArg::Keyed(key, text) => {
                            let span = key.span();
                            push_annotation(&mut annotations, key.unraw().to_string(), text, span)?;
                        }
                    }
                }
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[mask]",
                ));
            }
        }
    }

    Ok(annotations)
}
