//! Shared member transformation logic for struct and enum derivation.
//!
//! Every member, in declaration order, gets a positional index into the
//! type's member list. The generated traversal passes that index back to the
//! walker, which looks up the resolved annotation in the cached metadata.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{Attribute, Result};

use crate::{annotation::parse_field_annotations, generics::collect_generics_from_type};

/// Accumulated state while walking the members of a struct or all variants of
/// an enum.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) crate_root: &'a TokenStream,
    pub(crate) descriptors: Vec<TokenStream>,
    pub(crate) used_generics: Vec<Ident>,
}

impl<'a> DeriveContext<'a> {
    pub(crate) fn new(generics: &'a syn::Generics, crate_root: &'a TokenStream) -> Self {
        Self {
            generics,
            crate_root,
            descriptors: Vec::new(),
            used_generics: Vec::new(),
        }
    }
}

/// Registers one member and returns the expression producing its masked copy.
///
/// `binding` must name a reference to the member's current value. Bindings
/// come from [`member_binding`] so they never collide with the generated
/// locals.
pub(crate) fn generate_member_transform(
    ctx: &mut DeriveContext<'_>,
    name: &str,
    binding: &Ident,
    ty: &syn::Type,
    attrs: &[Attribute],
    span: Span,
) -> Result<TokenStream> {
    let annotations = parse_field_annotations(attrs)?;
    let crate_root = ctx.crate_root;
    let index = ctx.descriptors.len();

    let pairs = annotations.iter().map(|annotation| {
        let key = &annotation.key;
        let text = &annotation.text;
        quote! { (#key, #text) }
    });
    ctx.descriptors.push(quote_spanned! { span =>
        #crate_root::MemberDescriptor::new(#name, &[#(#pairs),*])
    });

    collect_generics_from_type(ty, ctx.generics, &mut ctx.used_generics);

    Ok(quote_spanned! { span =>
        masker_walker.member(&masker_metadata, #index, #binding)?
    })
}

/// Local name bound to a member while its value is masked.
///
/// Prefixed so members named `masker_walker` or `masker_metadata` do not
/// shadow the locals of the generated `mask_with`.
pub(crate) fn member_binding(member: &str) -> Ident {
    format_ident!("field_{member}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_bindings_are_prefixed() {
        assert_eq!(member_binding("metadata").to_string(), "field_metadata");
        assert_eq!(member_binding("masker_walker").to_string(), "field_masker_walker");
        assert_eq!(member_binding("0").to_string(), "field_0");
    }
}
